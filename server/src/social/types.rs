//! Like Service Types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Direction of the relation to list: users the caller liked, or users who
/// liked the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum LikePredicate {
    #[default]
    Liked,
    LikedBy,
}

/// Query parameters selecting the predicate direction.
///
/// Pagination parameters ride in the same query string and are extracted
/// separately.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesQuery {
    #[serde(default)]
    pub predicate: LikePredicate,
}

/// Profile summary of a liked/liking member.
#[derive(Debug, Clone, FromRow, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub username: String,
    pub known_as: String,
    pub age: i32,
    pub photo_url: Option<String>,
    pub city: String,
}

/// Error types for like operations.
#[derive(Debug, thiserror::Error)]
pub enum LikeError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("User not found")]
    UserNotFound,

    #[error("You cannot like yourself")]
    SelfLike,

    #[error("You already liked this user")]
    AlreadyLiked,

    #[error("Failed to like {0}")]
    SaveFailed(String),
}

impl axum::response::IntoResponse for LikeError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::Json;
        use serde_json::json;

        let (status, code, message) = match &self {
            Self::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Database error".to_string(),
                )
            }
            Self::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND", self.to_string()),
            Self::SelfLike => (StatusCode::BAD_REQUEST, "SELF_LIKE", self.to_string()),
            Self::AlreadyLiked => (StatusCode::BAD_REQUEST, "ALREADY_LIKED", self.to_string()),
            Self::SaveFailed(_) => (StatusCode::BAD_REQUEST, "SAVE_FAILED", self.to_string()),
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}
