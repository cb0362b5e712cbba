pub mod formatters;
pub mod handlers;

use axum::routing::get;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session/export/project", get(handlers::export_project))
        .route("/session/export/transcript", get(handlers::export_transcript))
        .route("/session/export/coverage", get(handlers::export_coverage))
        .route("/session/export/redlines", get(handlers::export_redlines))
}
