//! Message Service
//!
//! Direct messages between members: send, list by container, thread
//! retrieval, and two-sided soft deletion.

mod messages;
pub mod types;

pub use messages::{fetch_message_thread, list_messages_for_user};

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::api::AppState;

/// Create the message router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(messages::send_message))
        .route("/", get(messages::get_messages_for_user))
        .route("/", delete(messages::delete_message))
        .route("/thread/{username}", get(messages::get_message_thread))
}
