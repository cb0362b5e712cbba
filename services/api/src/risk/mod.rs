pub mod handlers;
pub mod responses;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session/classify", post(handlers::classify))
        .route("/session/checklist", get(handlers::checklist))
        .route("/session/scenarios", get(handlers::scenarios))
}
