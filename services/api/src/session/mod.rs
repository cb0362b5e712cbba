pub mod handlers;
pub mod model;
pub mod requests;
pub mod responses;
pub mod store;

use axum::routing::{get, post, put};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(handlers::create_session))
        .route("/session", get(handlers::get_session))
        .route("/session/policy", put(handlers::set_policy))
}
