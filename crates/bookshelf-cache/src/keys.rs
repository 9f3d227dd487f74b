//! Cache key builders for Bookshelf cache entries.

use uuid::Uuid;

/// Key of the session record for a subject, e.g. `jwt:<uuid>`.
pub fn session_record(prefix: &str, subject_id: Uuid) -> String {
    format!("{prefix}{subject_id}")
}
