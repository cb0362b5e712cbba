use axum::extract::State;
use axum::Json;
use kanon_checklists::select_framework;
use kanon_common::error::KanonError;
use serde::Serialize;

use crate::coverage::report::{
    coverage_rows, progress, redlines, CoverageProgress, CoverageRow, Redline,
};
use crate::error::ApiError;
use crate::extractors::SessionId;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CoverageResponse {
    pub rows: Vec<CoverageRow>,
    pub progress: CoverageProgress,
}

#[derive(Debug, Serialize)]
pub struct RedlinesResponse {
    pub redlines: Vec<Redline>,
}

pub async fn coverage(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<CoverageResponse>, ApiError> {
    let response = state.store.with_session(id, |s| {
        let level = s.verdict.as_ref().map(|v| v.level).ok_or_else(|| {
            KanonError::Validation(
                "no classification yet; POST /session/classify first".to_string(),
            )
        })?;
        let framework = select_framework(level);
        Ok::<_, KanonError>(CoverageResponse {
            rows: coverage_rows(framework, &s.interview),
            progress: progress(framework, &s.interview),
        })
    })??;
    Ok(Json(response))
}

pub async fn redline_suggestions(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<RedlinesResponse>, ApiError> {
    let response = state.store.with_session(id, |s| {
        let level = s.verdict.as_ref().map(|v| v.level).ok_or_else(|| {
            KanonError::Validation(
                "no classification yet; POST /session/classify first".to_string(),
            )
        })?;
        let framework = select_framework(level);
        Ok::<_, KanonError>(RedlinesResponse {
            redlines: redlines(framework, &s.interview),
        })
    })??;
    Ok(Json(response))
}
