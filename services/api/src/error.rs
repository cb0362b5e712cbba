use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kanon_common::error::KanonError;

pub struct ApiError(pub KanonError);

impl From<KanonError> for ApiError {
    fn from(err: KanonError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            KanonError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            KanonError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
