pub mod handlers;
pub mod report;

use axum::routing::get;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session/coverage", get(handlers::coverage))
        .route("/session/redlines", get(handlers::redline_suggestions))
}
