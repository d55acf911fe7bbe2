use serde::{Deserialize, Serialize};

/// A registered user. `name` is not required to be unique; the relay treats
/// it as a lookup key anyway, so duplicate names make sync requests ambiguous
/// (the store warns when that happens).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// SQLite rowid surrogate key.
    pub user_id: i64,
    pub name: String,
    /// ISO-8601 timestamp of registration.
    pub created_at: String,
}
