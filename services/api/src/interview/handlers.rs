use axum::extract::State;
use axum::Json;
use kanon_checklists::select_framework;
use kanon_common::error::KanonError;

use crate::error::ApiError;
use crate::extractors::SessionId;
use crate::interview::engine::{advance, StepOutcome};
use crate::interview::requests::NextStepRequest;
use crate::interview::responses::TranscriptResponse;
use crate::AppState;

pub async fn next_step(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    Json(body): Json<NextStepRequest>,
) -> Result<Json<StepOutcome>, ApiError> {
    let source = state.response_source.clone();
    let outcome = state.store.with_session_mut(id, |s| {
        let level = s
            .verdict
            .as_ref()
            .map(|v| v.level)
            .ok_or_else(|| {
                KanonError::Validation(
                    "no classification yet; POST /session/classify first".to_string(),
                )
            })?;
        let framework = select_framework(level);
        Ok(advance(&mut s.interview, framework, source.as_ref(), body.skip))
    })?;

    Ok(Json(outcome))
}

pub async fn transcript(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let response = state.store.with_session(id, |s| TranscriptResponse {
        transcript: s.interview.transcript.clone(),
        conflicts: s.interview.conflicts.clone(),
        facts: s.interview.facts.clone(),
    })?;
    Ok(Json(response))
}
