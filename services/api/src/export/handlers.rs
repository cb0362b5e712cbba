use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use kanon_checklists::select_framework;
use kanon_classifier::{RiskVerdict, TakenPath};
use kanon_common::error::KanonError;
use serde::Serialize;
use uuid::Uuid;

use crate::coverage::report::{coverage_rows, redlines, CoverageRow, Redline};
use crate::error::ApiError;
use crate::export::formatters::{coverage_csv, redlines_markdown, transcript_markdown};
use crate::extractors::SessionId;
use crate::interview::engine::{Conflict, Fact, TranscriptEntry};
use crate::AppState;

/// Everything a session produced, for the JSON download. The model key is
/// deliberately absent.
#[derive(Debug, Serialize)]
struct ProjectRecord {
    id: Uuid,
    app_name: String,
    app_description: String,
    region: Option<String>,
    allow_fallback: bool,
    policy_text: Option<String>,
    verdict: Option<RiskVerdict>,
    classification_path: Option<TakenPath>,
    fallback_notice: Option<String>,
    framework: Option<&'static str>,
    transcript: Vec<TranscriptEntry>,
    facts: Vec<Fact>,
    conflicts: Vec<Conflict>,
    coverage: Vec<CoverageRow>,
    redlines: Vec<Redline>,
    created_at: DateTime<Utc>,
}

fn attachment(
    filename: String,
    content_type: &'static str,
    body: String,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, content_type.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

pub async fn export_project(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.store.with_session(id, |s| {
        let framework = s.verdict.as_ref().map(|v| select_framework(v.level));
        ProjectRecord {
            id: s.id,
            app_name: s.app_name.clone(),
            app_description: s.app_description.clone(),
            region: s.region.clone(),
            allow_fallback: s.allow_fallback,
            policy_text: s.policy_text.clone(),
            verdict: s.verdict.clone(),
            classification_path: s.classification_path,
            fallback_notice: s.fallback_notice.clone(),
            framework: framework.map(|f| f.name),
            transcript: s.interview.transcript.clone(),
            facts: s.interview.facts.clone(),
            conflicts: s.interview.conflicts.clone(),
            coverage: framework
                .map(|f| coverage_rows(f, &s.interview))
                .unwrap_or_default(),
            redlines: framework
                .map(|f| redlines(f, &s.interview))
                .unwrap_or_default(),
            created_at: s.created_at,
        }
    })?;

    let body = serde_json::to_string_pretty(&record)
        .map_err(|e| KanonError::Internal(format!("project serialization failed: {e}")))?;
    Ok(attachment(
        format!("{id}_project.json"),
        "application/json",
        body,
    ))
}

pub async fn export_transcript(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, ApiError> {
    let body = state.store.with_session(id, |s| {
        transcript_markdown(
            &s.app_name,
            &today(),
            s.verdict.as_ref().map(|v| v.level.as_str()),
            &s.interview.transcript,
            &s.interview.conflicts,
        )
    })?;

    Ok(attachment(
        format!("{id}_transcript.md"),
        "text/markdown",
        body,
    ))
}

pub async fn export_coverage(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, ApiError> {
    let body = state.store.with_session(id, |s| {
        let level = s.verdict.as_ref().map(|v| v.level).ok_or_else(|| {
            KanonError::Validation(
                "no classification yet; POST /session/classify first".to_string(),
            )
        })?;
        let framework = select_framework(level);
        Ok::<_, KanonError>(coverage_csv(&coverage_rows(framework, &s.interview)))
    })??;

    Ok(attachment(format!("{id}_coverage.csv"), "text/csv", body))
}

pub async fn export_redlines(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, ApiError> {
    let body = state.store.with_session(id, |s| {
        let level = s.verdict.as_ref().map(|v| v.level).ok_or_else(|| {
            KanonError::Validation(
                "no classification yet; POST /session/classify first".to_string(),
            )
        })?;
        let framework = select_framework(level);
        Ok::<_, KanonError>(redlines_markdown(
            &s.app_name,
            &today(),
            &redlines(framework, &s.interview),
        ))
    })??;

    Ok(attachment(
        format!("{id}_redlines.md"),
        "text/markdown",
        body,
    ))
}
