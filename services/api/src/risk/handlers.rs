use axum::extract::State;
use axum::Json;
use kanon_checklists::{select_framework, SCENARIOS};
use kanon_common::error::KanonError;

use crate::error::ApiError;
use crate::extractors::SessionId;
use crate::risk::responses::{ClassifyResponse, FrameworkResponse, ScenariosResponse};
use crate::AppState;

/// Runs the classification pipeline for the session's policy text, selects
/// the matching checklist, and resets the interview for the new framework.
pub async fn classify(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let (policy_text, session_key, allow_fallback) = state.store.with_session(id, |s| {
        (
            s.policy_text.clone(),
            s.model_key.clone(),
            s.allow_fallback,
        )
    })?;

    let policy_text = policy_text.ok_or_else(|| {
        KanonError::Validation("no policy text set; PUT /session/policy first".to_string())
    })?;
    let key = session_key.or_else(|| state.default_model_key.clone());

    let classification = state
        .engine
        .classify(&policy_text, key.as_deref(), allow_fallback)
        .await?;

    let framework = select_framework(classification.verdict.level);
    tracing::info!(
        session_id = %id,
        level = classification.verdict.level.as_str(),
        path = ?classification.path,
        framework = framework.name,
        "policy classified"
    );

    state.store.with_session_mut(id, |s| {
        s.verdict = Some(classification.verdict.clone());
        s.classification_path = Some(classification.path);
        s.fallback_notice = classification.notice.clone();
        s.interview.reset(framework);
        Ok(())
    })?;

    Ok(Json(ClassifyResponse {
        verdict: classification.verdict,
        path: classification.path,
        notice: classification.notice,
        framework: FrameworkResponse {
            name: framework.name,
            risk_path: framework.risk_path,
            items: framework.items,
        },
    }))
}

pub async fn checklist(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<FrameworkResponse>, ApiError> {
    let level = state.store.with_session(id, |s| {
        s.verdict.as_ref().map(|v| v.level)
    })?;
    let level = level.ok_or_else(|| {
        KanonError::Validation("no classification yet; POST /session/classify first".to_string())
    })?;

    let framework = select_framework(level);
    Ok(Json(FrameworkResponse {
        name: framework.name,
        risk_path: framework.risk_path,
        items: framework.items,
    }))
}

pub async fn scenarios(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<ScenariosResponse>, ApiError> {
    // Scenario list is static but still scoped to a valid session.
    state.store.with_session(id, |_| ())?;
    Ok(Json(ScenariosResponse {
        scenarios: SCENARIOS,
    }))
}
