//! Like Handlers
//!
//! Records and queries directed "like" relations between members.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use super::types::{LikeError, LikePredicate, LikesQuery, MemberSummary};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::db;
use crate::pagination::{Page, PaginationParams};

/// POST /api/likes/{username}
/// Like another member.
pub async fn add_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> Result<StatusCode, LikeError> {
    let liked_user = db::find_user_by_username(&state.db, &username)
        .await?
        .ok_or(LikeError::UserNotFound)?;

    // Self-check compares usernames, not IDs, matching the wire contract:
    // the path segment is held against the caller's stored username.
    if auth.username == username {
        return Err(LikeError::SelfLike);
    }

    if db::find_user_like(&state.db, auth.id, liked_user.id)
        .await?
        .is_some()
    {
        return Err(LikeError::AlreadyLiked);
    }

    match db::create_user_like(&state.db, auth.id, liked_user.id).await {
        Ok(_) => Ok(StatusCode::OK),
        // A concurrent request for the same pair loses to the primary key.
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(LikeError::AlreadyLiked),
        Err(e) => {
            tracing::error!(username = %username, error = %e, "Failed to persist like");
            Err(LikeError::SaveFailed(username))
        }
    }
}

/// GET /api/likes
/// List members related to the caller by the chosen predicate direction.
pub async fn get_user_likes(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<LikesQuery>,
) -> Result<(HeaderMap, Json<Vec<MemberSummary>>), LikeError> {
    let (count_sql, page_sql) = match query.predicate {
        LikePredicate::Liked => (
            "SELECT COUNT(*) FROM user_likes WHERE source_user_id = $1",
            r"SELECT u.username, u.known_as,
                     EXTRACT(YEAR FROM age(u.date_of_birth))::int AS age,
                     u.photo_url, u.city
              FROM user_likes l
              JOIN users u ON u.id = l.liked_user_id
              WHERE l.source_user_id = $1
              ORDER BY u.username
              LIMIT $2 OFFSET $3",
        ),
        LikePredicate::LikedBy => (
            "SELECT COUNT(*) FROM user_likes WHERE liked_user_id = $1",
            r"SELECT u.username, u.known_as,
                     EXTRACT(YEAR FROM age(u.date_of_birth))::int AS age,
                     u.photo_url, u.city
              FROM user_likes l
              JOIN users u ON u.id = l.source_user_id
              WHERE l.liked_user_id = $1
              ORDER BY u.username
              LIMIT $2 OFFSET $3",
        ),
    };

    let total_count: i64 = sqlx::query_scalar(count_sql)
        .bind(auth.id)
        .fetch_one(&state.db)
        .await?;

    let members = sqlx::query_as::<_, MemberSummary>(page_sql)
        .bind(auth.id)
        .bind(pagination.size())
        .bind(pagination.offset())
        .fetch_all(&state.db)
        .await?;

    let page = Page::new(members, total_count, &pagination);
    Ok((page.headers(), Json(page.items)))
}
