pub mod engine;
pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session/interview/next", post(handlers::next_step))
        .route("/session/interview/transcript", get(handlers::transcript))
}
