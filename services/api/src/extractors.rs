use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

pub struct SessionId(pub Uuid);

#[derive(Debug)]
pub struct SessionIdRejection(String);

impl IntoResponse for SessionIdRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.0 });
        (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = SessionIdRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-session-id")
            .ok_or_else(|| SessionIdRejection("missing x-session-id header".to_string()))?;

        let value = header
            .to_str()
            .map_err(|_| SessionIdRejection("invalid x-session-id header value".to_string()))?;

        let uuid = Uuid::parse_str(value)
            .map_err(|_| SessionIdRejection(format!("invalid UUID in x-session-id: {value}")))?;

        Ok(SessionId(uuid))
    }
}
