use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kanon_common::error::KanonError;

use crate::error::ApiError;
use crate::extractors::SessionId;
use crate::session::model::Session;
use crate::session::requests::{CreateSessionRequest, SetPolicyRequest};
use crate::session::responses::{CreateSessionResponse, SessionResponse, SetPolicyResponse};
use crate::AppState;

pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.app_name.trim().is_empty() {
        return Err(ApiError(KanonError::Validation(
            "app_name must not be empty".to_string(),
        )));
    }
    if body.app_description.trim().is_empty() {
        return Err(ApiError(KanonError::Validation(
            "app_description must not be empty".to_string(),
        )));
    }

    let model_key = body.model_key.filter(|k| !k.trim().is_empty());
    let session = Session::new(
        body.app_name,
        body.app_description,
        body.region,
        model_key,
        body.allow_fallback,
    );
    let created_at = session.created_at;
    let id = state.store.insert(session)?;

    tracing::info!(session_id = %id, "session created");
    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse { id, created_at }),
    ))
}

pub async fn get_session(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<SessionResponse>, ApiError> {
    let snapshot = state.store.with_session(id, |s| SessionResponse {
        id: s.id,
        app_name: s.app_name.clone(),
        app_description: s.app_description.clone(),
        region: s.region.clone(),
        has_model_key: s.model_key.is_some(),
        allow_fallback: s.allow_fallback,
        policy_set: s.policy_text.is_some(),
        verdict: s.verdict.clone(),
        classification_path: s.classification_path,
        fallback_notice: s.fallback_notice.clone(),
        created_at: s.created_at,
    })?;
    Ok(Json(snapshot))
}

pub async fn set_policy(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    Json(body): Json<SetPolicyRequest>,
) -> Result<Json<SetPolicyResponse>, ApiError> {
    let policy_chars = body.text.chars().count();
    state.store.with_session_mut(id, |s| {
        s.policy_text = Some(body.text);
        Ok(())
    })?;

    tracing::debug!(session_id = %id, policy_chars, "policy text stored");
    Ok(Json(SetPolicyResponse { policy_chars }))
}
