use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Suggestion record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Suggestion {
    /// Assigned by storage.
    pub id: i64,
    pub name: String,
    pub email: String,
    pub category: String,
    pub message: String,
    /// Set by the database on insert.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Filled in out-of-band, empty on creation.
    #[serde(rename = "aiReply")]
    pub ai_reply: String,
}

/// Column values supplied by the client on insert.
#[derive(Debug, Clone, Default)]
pub struct NewSuggestion {
    pub name: String,
    pub email: String,
    pub category: String,
    pub message: String,
}
