//! Application user entity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user of the bookshelf.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Subject identifier carried in session tokens.
    #[serde(rename = "userid")]
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Unique email address, used as the login name.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role label checked against the access table.
    pub role: String,
    /// Whether the user currently has an open session.
    pub active: bool,
    /// Free-form profile details.
    pub details: String,
    pub gender: String,
    pub phone: String,
    /// Date of birth, if given at registration.
    pub dob: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    pub role: String,
    pub details: String,
    pub gender: String,
    pub phone: String,
    pub dob: Option<NaiveDate>,
}

impl NewUser {
    /// Build the stored row, stamping both timestamps with `now`.
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            active: false,
            details: self.details,
            gender: self.gender,
            phone: self.phone,
            dob: self.dob,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Mutable profile fields. `None` leaves the stored value untouched.
///
/// Subject id, email, role, date of birth and creation time are not
/// editable through a profile update.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub details: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    /// Pre-hashed replacement password.
    pub password_hash: Option<String>,
}

impl UserUpdate {
    /// Apply the present fields to `user` and bump `updated_at`.
    pub fn apply_to(self, user: &mut User, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(details) = self.details {
            user.details = details;
        }
        if let Some(gender) = self.gender {
            user.gender = gender;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(hash) = self.password_hash {
            user.password_hash = hash;
        }
        user.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        NewUser {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$stub".into(),
            role: "editor".into(),
            details: String::new(),
            gender: "f".into(),
            phone: "555".into(),
            dob: Some(NaiveDate::from_ymd_opt(1990, 1, 2).unwrap()),
        }
        .into_user(Utc::now())
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("userid").is_some());
        assert_eq!(json["email"], "alice@example.com");
    }

    #[test]
    fn test_update_preserves_immutable_fields() {
        let mut user = sample();
        let id = user.id;
        let created = user.created_at;
        UserUpdate {
            name: Some("Alicia".into()),
            ..Default::default()
        }
        .apply_to(&mut user, Utc::now());
        assert_eq!(user.name, "Alicia");
        assert_eq!(user.id, id);
        assert_eq!(user.created_at, created);
        assert_eq!(user.role, "editor");
        assert_eq!(user.phone, "555");
    }
}
