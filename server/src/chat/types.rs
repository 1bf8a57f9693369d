//! Message Service Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug)]
pub enum MessageError {
    NotFound,
    SelfMessage,
    NotParticipant,
    Validation(String),
    SaveFailed(&'static str),
    Database(sqlx::Error),
}

impl IntoResponse for MessageError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", "Not found".to_string()),
            Self::SelfMessage => (
                StatusCode::BAD_REQUEST,
                "SELF_MESSAGE",
                "You cannot send messages to yourself".to_string(),
            ),
            Self::NotParticipant => (
                StatusCode::UNAUTHORIZED,
                "NOT_PARTICIPANT",
                "You are not a participant of this message".to_string(),
            ),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            Self::SaveFailed(msg) => (StatusCode::BAD_REQUEST, "SAVE_FAILED", msg.to_string()),
            Self::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Database error".to_string(),
                )
            }
        };
        (
            status,
            Json(serde_json::json!({ "error": code, "message": message })),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for MessageError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Which slice of a member's messages to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
pub enum MessageContainer {
    Inbox,
    Outbox,
    #[default]
    Unread,
}

/// Query parameters selecting the container.
///
/// Pagination parameters ride in the same query string and are extracted
/// separately.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MessagesQuery {
    #[serde(default)]
    pub container: MessageContainer,
}

/// Query parameter for message deletion.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DeleteMessageQuery {
    pub id: Uuid,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    #[validate(length(min = 1, message = "Receiver username is required"))]
    pub receiver_username: String,
    #[validate(length(min = 1, max = 4000, message = "Content must be 1-4000 characters"))]
    pub content: String,
}

/// A message as seen by either party, enriched with both profile photos.
#[derive(Debug, Clone, FromRow, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender_username: String,
    pub sender_photo_url: Option<String>,
    pub receiver_id: Uuid,
    pub receiver_username: String,
    pub receiver_photo_url: Option<String>,
    pub content: String,
    pub date_read: Option<DateTime<Utc>>,
    pub message_sent: DateTime<Utc>,
}
