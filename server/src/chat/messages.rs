//! Message Handlers
//!
//! Sending, listing, thread retrieval, and two-sided soft deletion of
//! direct messages. A message stays visible to each party until that party
//! deletes their side; once both sides are deleted the row is purged.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use sqlx::PgPool;
use validator::Validate;

use super::types::{
    CreateMessageRequest, DeleteMessageQuery, MessageContainer, MessageError, MessageView,
    MessagesQuery,
};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::db;
use crate::pagination::{Page, PaginationParams};

/// Select list shared by every view query: message columns plus both
/// parties' photo URLs.
const MESSAGE_VIEW_COLUMNS: &str = r"
    m.id, m.sender_id, m.sender_username, s.photo_url AS sender_photo_url,
    m.receiver_id, m.receiver_username, r.photo_url AS receiver_photo_url,
    m.content, m.date_read, m.message_sent
";

// ============================================================================
// Database Functions
// ============================================================================

/// One page of a member's messages for the given container, plus the total
/// matching count.
pub async fn list_messages_for_user(
    pool: &PgPool,
    username: &str,
    container: MessageContainer,
    params: &PaginationParams,
) -> sqlx::Result<(Vec<MessageView>, i64)> {
    let filter = match container {
        MessageContainer::Inbox => "m.receiver_username = $1 AND m.receiver_deleted = FALSE",
        MessageContainer::Outbox => "m.sender_username = $1 AND m.sender_deleted = FALSE",
        MessageContainer::Unread => {
            "m.receiver_username = $1 AND m.receiver_deleted = FALSE AND m.date_read IS NULL"
        }
    };

    let total_count: i64 =
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM messages m WHERE {filter}"))
            .bind(username)
            .fetch_one(pool)
            .await?;

    let messages = sqlx::query_as::<_, MessageView>(&format!(
        r"SELECT {MESSAGE_VIEW_COLUMNS}
          FROM messages m
          JOIN users s ON s.id = m.sender_id
          JOIN users r ON r.id = m.receiver_id
          WHERE {filter}
          ORDER BY m.message_sent DESC
          LIMIT $2 OFFSET $3"
    ))
    .bind(username)
    .bind(params.size())
    .bind(params.offset())
    .fetch_all(pool)
    .await?;

    Ok((messages, total_count))
}

/// The full conversation between two members, oldest first, excluding
/// messages the caller has deleted on their side.
///
/// Marks unread messages addressed to the caller as read in the same
/// transaction, so a retrieved thread is never reported unread afterwards.
pub async fn fetch_message_thread(
    pool: &PgPool,
    caller_username: &str,
    other_username: &str,
) -> sqlx::Result<Vec<MessageView>> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r"UPDATE messages
          SET date_read = now()
          WHERE receiver_username = $1 AND sender_username = $2
            AND receiver_deleted = FALSE AND date_read IS NULL",
    )
    .bind(caller_username)
    .bind(other_username)
    .execute(&mut *tx)
    .await?;

    let messages = sqlx::query_as::<_, MessageView>(&format!(
        r"SELECT {MESSAGE_VIEW_COLUMNS}
          FROM messages m
          JOIN users s ON s.id = m.sender_id
          JOIN users r ON r.id = m.receiver_id
          WHERE (m.receiver_username = $1 AND m.receiver_deleted = FALSE
                 AND m.sender_username = $2)
             OR (m.receiver_username = $2 AND m.sender_username = $1
                 AND m.sender_deleted = FALSE)
          ORDER BY m.message_sent ASC"
    ))
    .bind(caller_username)
    .bind(other_username)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(messages)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/message
/// Send a direct message to another member.
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateMessageRequest>,
) -> Result<Json<MessageView>, MessageError> {
    body.validate()
        .map_err(|e| MessageError::Validation(e.to_string()))?;

    // Usernames are stored lower-case; the raw input is lower-cased for the
    // self-check the same way the wire contract defines it.
    if auth.username == body.receiver_username.to_lowercase() {
        return Err(MessageError::SelfMessage);
    }

    let receiver = db::find_user_by_username(&state.db, &body.receiver_username)
        .await?
        .ok_or(MessageError::NotFound)?;

    let sender = db::find_user_by_id(&state.db, auth.id)
        .await?
        .ok_or(MessageError::NotFound)?;

    let message = match db::create_message(&state.db, &sender, &receiver, &body.content).await {
        Ok(message) => message,
        Err(e) => {
            tracing::error!(receiver = %receiver.username, error = %e, "Failed to persist message");
            return Err(MessageError::SaveFailed("Failed to send message"));
        }
    };

    // Direct field copy into the view; the photo URLs come from the two
    // profiles already in hand.
    Ok(Json(MessageView {
        id: message.id,
        sender_id: message.sender_id,
        sender_username: message.sender_username,
        sender_photo_url: sender.photo_url,
        receiver_id: message.receiver_id,
        receiver_username: message.receiver_username,
        receiver_photo_url: receiver.photo_url,
        content: message.content,
        date_read: message.date_read,
        message_sent: message.message_sent,
    }))
}

/// GET /api/message
/// List the caller's messages for the requested container.
pub async fn get_messages_for_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<MessagesQuery>,
) -> Result<(HeaderMap, Json<Vec<MessageView>>), MessageError> {
    let (messages, total_count) =
        list_messages_for_user(&state.db, &auth.username, query.container, &pagination).await?;

    let page = Page::new(messages, total_count, &pagination);
    Ok((page.headers(), Json(page.items)))
}

/// GET /api/message/thread/{username}
/// Get the conversation between the caller and another member.
pub async fn get_message_thread(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> Result<Json<Vec<MessageView>>, MessageError> {
    let messages = fetch_message_thread(&state.db, &auth.username, &username).await?;
    Ok(Json(messages))
}

/// DELETE /api/message?id={id}
/// Delete the caller's side of a message; purge once both sides are deleted.
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DeleteMessageQuery>,
) -> Result<StatusCode, MessageError> {
    let message = db::find_message_by_id(&state.db, query.id)
        .await?
        .ok_or(MessageError::NotFound)?;

    if !message.is_participant(&auth.username) {
        return Err(MessageError::NotParticipant);
    }

    let (sender_deleted, receiver_deleted) = message.flags_after_delete_by(&auth.username);

    let result = if sender_deleted && receiver_deleted {
        // Both sides gone: the record reaches its terminal state and is
        // physically removed. A concurrent purge losing the race is fine;
        // the row is absent either way.
        db::purge_message(&state.db, message.id).await.map(|_| true)
    } else {
        db::set_message_deleted(
            &state.db,
            message.id,
            message.sender_username == auth.username,
            message.receiver_username == auth.username,
        )
        .await
    };

    match result {
        Ok(true) => Ok(StatusCode::OK),
        // The row vanished between the read and the update.
        Ok(false) => Err(MessageError::NotFound),
        Err(e) => {
            tracing::error!(message_id = %query.id, error = %e, "Failed to persist message deletion");
            Err(MessageError::SaveFailed("Failed to delete message"))
        }
    }
}
