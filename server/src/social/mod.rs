pub mod likes;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::AppState;

/// Create the likes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(likes::get_user_likes))
        .route("/{username}", post(likes::add_like))
}
