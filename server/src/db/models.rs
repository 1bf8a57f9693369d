//! Database Models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Member model.
///
/// Rows are owned by the user directory (registration lives outside this
/// service); the like and message services only read them.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub known_as: String,
    pub date_of_birth: NaiveDate,
    pub city: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Directed like relation: `source_user_id` has liked `liked_user_id`.
///
/// The `(source_user_id, liked_user_id)` pair is the primary key, so at most
/// one row can exist per ordered pair. Rows are never updated.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserLike {
    pub source_user_id: Uuid,
    pub liked_user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Direct message between two members.
///
/// Each side owns an independent soft-delete flag. A flag only ever moves
/// false -> true; once both are true the row is physically removed.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender_username: String,
    pub receiver_id: Uuid,
    pub receiver_username: String,
    pub content: String,
    pub date_read: Option<DateTime<Utc>>,
    pub message_sent: DateTime<Utc>,
    pub sender_deleted: bool,
    pub receiver_deleted: bool,
}

impl Message {
    /// Whether `username` is a participant (stored sender or receiver name).
    #[must_use]
    pub fn is_participant(&self, username: &str) -> bool {
        self.sender_username == username || self.receiver_username == username
    }

    /// Flags after `username` deletes their side of the message.
    ///
    /// A flag never reverses; the caller only adds their own side. When both
    /// returned flags are true the record is due for physical removal.
    #[must_use]
    pub fn flags_after_delete_by(&self, username: &str) -> (bool, bool) {
        (
            self.sender_deleted || self.sender_username == username,
            self.receiver_deleted || self.receiver_username == username,
        )
    }
}
