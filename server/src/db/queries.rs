//! Database Queries
//!
//! Runtime queries (no compile-time `DATABASE_URL` required).
//!
//! All query functions include error context logging to aid debugging.

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::models::{Message, User, UserLike};

/// Log and return a database error with context.
///
/// This helper ensures all database errors are logged with relevant context
/// before being propagated, making production debugging easier.
macro_rules! db_error {
    ($query:expr, $($field:tt)*) => {
        |e| {
            error!(query = $query, $($field)*, error = %e, "Database query failed");
            e
        }
    };
}

// ============================================================================
// User Queries
// ============================================================================

/// Find user by ID.
pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_user_by_id", user_id = %id))
}

/// Find user by username.
pub async fn find_user_by_username(pool: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_user_by_username", username = %username))
}

/// Create a new user.
///
/// Registration is handled by the user directory; this exists for seeding
/// and tests.
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    known_as: &str,
    date_of_birth: NaiveDate,
    city: &str,
    photo_url: Option<&str>,
) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(
        r"
        INSERT INTO users (id, username, known_as, date_of_birth, city, photo_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        ",
    )
    .bind(Uuid::now_v7())
    .bind(username)
    .bind(known_as)
    .bind(date_of_birth)
    .bind(city)
    .bind(photo_url)
    .fetch_one(pool)
    .await
    .map_err(db_error!("create_user", username = %username))
}

// ============================================================================
// Like Queries
// ============================================================================

/// Find a like relation by its ordered (source, liked) pair.
pub async fn find_user_like(
    pool: &PgPool,
    source_user_id: Uuid,
    liked_user_id: Uuid,
) -> sqlx::Result<Option<UserLike>> {
    sqlx::query_as::<_, UserLike>(
        "SELECT * FROM user_likes WHERE source_user_id = $1 AND liked_user_id = $2",
    )
    .bind(source_user_id)
    .bind(liked_user_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("find_user_like", source = %source_user_id, liked = %liked_user_id))
}

/// Create a like relation.
///
/// The composite primary key rejects a second row for the same ordered pair,
/// so a concurrent duplicate surfaces as a unique violation.
pub async fn create_user_like(
    pool: &PgPool,
    source_user_id: Uuid,
    liked_user_id: Uuid,
) -> sqlx::Result<UserLike> {
    sqlx::query_as::<_, UserLike>(
        r"
        INSERT INTO user_likes (source_user_id, liked_user_id)
        VALUES ($1, $2)
        RETURNING *
        ",
    )
    .bind(source_user_id)
    .bind(liked_user_id)
    .fetch_one(pool)
    .await
}

// ============================================================================
// Message Queries
// ============================================================================

/// Find message by ID.
pub async fn find_message_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<Message>> {
    sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_message_by_id", message_id = %id))
}

/// Create a new message.
pub async fn create_message(
    pool: &PgPool,
    sender: &User,
    receiver: &User,
    content: &str,
) -> sqlx::Result<Message> {
    sqlx::query_as::<_, Message>(
        r"
        INSERT INTO messages (id, sender_id, sender_username, receiver_id, receiver_username, content)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        ",
    )
    .bind(Uuid::now_v7())
    .bind(sender.id)
    .bind(&sender.username)
    .bind(receiver.id)
    .bind(&receiver.username)
    .bind(content)
    .fetch_one(pool)
    .await
    .map_err(db_error!("create_message", sender = %sender.username, receiver = %receiver.username))
}

/// Persist per-side soft-delete flags.
///
/// Flags only move false -> true; the update never clears a flag, so
/// repeating it for the same side is harmless.
pub async fn set_message_deleted(
    pool: &PgPool,
    id: Uuid,
    sender_deleted: bool,
    receiver_deleted: bool,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r"
        UPDATE messages
        SET sender_deleted = sender_deleted OR $2,
            receiver_deleted = receiver_deleted OR $3
        WHERE id = $1
        ",
    )
    .bind(id)
    .bind(sender_deleted)
    .bind(receiver_deleted)
    .execute(pool)
    .await
    .map_err(db_error!("set_message_deleted", message_id = %id))?;

    Ok(result.rows_affected() > 0)
}

/// Permanently remove a message.
///
/// Called once both parties have deleted their side. Returns false if the
/// row was already gone (e.g. a concurrent purge won the race).
pub async fn purge_message(pool: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM messages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(db_error!("purge_message", message_id = %id))?;

    Ok(result.rows_affected() > 0)
}
