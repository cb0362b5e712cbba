use chrono::{DateTime, Utc};
use kanon_classifier::{RiskVerdict, TakenPath};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of a session. The model key itself never leaves the server;
/// only its presence is reported.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub app_name: String,
    pub app_description: String,
    pub region: Option<String>,
    pub has_model_key: bool,
    pub allow_fallback: bool,
    pub policy_set: bool,
    pub verdict: Option<RiskVerdict>,
    pub classification_path: Option<TakenPath>,
    pub fallback_notice: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SetPolicyResponse {
    pub policy_chars: usize,
}
