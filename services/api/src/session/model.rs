use chrono::{DateTime, Utc};
use kanon_classifier::{RiskVerdict, TakenPath};
use uuid::Uuid;

use crate::interview::engine::InterviewState;

/// One wizard run: project metadata, the pasted policy, the latest
/// classification outcome, and the interview that follows it.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub app_name: String,
    pub app_description: String,
    pub region: Option<String>,
    pub model_key: Option<String>,
    pub allow_fallback: bool,
    pub policy_text: Option<String>,
    pub verdict: Option<RiskVerdict>,
    pub classification_path: Option<TakenPath>,
    pub fallback_notice: Option<String>,
    pub interview: InterviewState,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        app_name: String,
        app_description: String,
        region: Option<String>,
        model_key: Option<String>,
        allow_fallback: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            app_name,
            app_description,
            region,
            model_key,
            allow_fallback,
            policy_text: None,
            verdict: None,
            classification_path: None,
            fallback_notice: None,
            interview: InterviewState::default(),
            created_at: Utc::now(),
        }
    }
}
