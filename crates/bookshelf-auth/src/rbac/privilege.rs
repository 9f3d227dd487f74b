//! Named privileges checked by the request gate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Privileges guarding book operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    BookRead,
    BookCreate,
    BookUpdate,
    BookDelete,
}

impl Privilege {
    /// The privilege name stored in the access table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BookRead => "book_read",
            Self::BookCreate => "book_create",
            Self::BookUpdate => "book_update",
            Self::BookDelete => "book_delete",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Privilege {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "book_read" => Ok(Self::BookRead),
            "book_create" => Ok(Self::BookCreate),
            "book_update" => Ok(Self::BookUpdate),
            "book_delete" => Ok(Self::BookDelete),
            other => Err(format!("Unknown privilege: {other}")),
        }
    }
}
