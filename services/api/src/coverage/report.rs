//! Coverage rows and redline suggestions derived from the interview state.

use kanon_checklists::Framework;
use serde::Serialize;

use crate::interview::engine::{InterviewState, ItemStatus, Role};

const POSITIVE_KEYWORDS: &[&str] = &["yes", "implemented", "documented", "compliant", "clear"];
const NEGATIVE_KEYWORDS: &[&str] = &["no", "not sure", "haven't", "might need", "unclear"];

const NO_EVIDENCE: &str = "No evidence collected";
const NO_QUOTE: &str = "No relevant quote found";

/// Mock policy quote extraction, keyed by checklist item id.
const QUOTE_HINTS: &[(&str, &str)] = &[
    ("1.1", "We process personal data based on legitimate interest"),
    ("1.2", "Users have the right to access, rectify, and delete their data"),
    ("1.3", "Data is retained for 24 months after last use"),
    ("2.1", "Users must provide explicit consent before data collection"),
    ("2.2", "Data portability requests are processed within 30 days"),
];

struct RedlineTemplate {
    item_id: &'static str,
    section: &'static str,
    title: &'static str,
    suggestion: &'static str,
}

const REDLINE_TEMPLATES: &[RedlineTemplate] = &[
    RedlineTemplate {
        item_id: "1.1",
        section: "Legal Basis",
        title: "Clarify Lawful Basis for Processing",
        suggestion: "We process your personal data based on [INSERT SPECIFIC LEGAL BASIS - e.g., legitimate interest for improving VR experience, consent for personalized content, contract for service delivery]. This processing is necessary for [INSERT PURPOSE].",
    },
    RedlineTemplate {
        item_id: "5.1",
        section: "Biometric Data",
        title: "Add Biometric Data Protection Clause",
        suggestion: "Our VR application may collect biometric identifiers including eye-tracking data, hand gesture patterns, and facial recognition data. This sensitive data is processed with enhanced security measures including encryption at rest and in transit, limited access controls, and automated deletion after [INSERT TIMEFRAME].",
    },
    RedlineTemplate {
        item_id: "6.1",
        section: "Real-Time Processing",
        title: "Disclose Real-Time Data Processing",
        suggestion: "During VR sessions, we continuously process environmental scanning data, movement patterns, and interaction data in real-time to deliver immersive experiences. You will receive ongoing indicators when such processing occurs.",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CoverageStatus {
    Yes,
    No,
    Unknown,
}

impl CoverageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageRow {
    pub item_id: String,
    pub description: String,
    pub status: CoverageStatus,
    pub questions_asked: u32,
    pub evidence: String,
    pub policy_quote: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageProgress {
    pub total_items: usize,
    pub completed: usize,
    pub in_progress: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Redline {
    pub section: &'static str,
    pub title: &'static str,
    pub suggestion: &'static str,
    #[serde(rename = "type")]
    pub change_type: &'static str,
}

/// One coverage row per framework item, in checklist order.
pub fn coverage_rows(framework: &Framework, interview: &InterviewState) -> Vec<CoverageRow> {
    framework
        .items
        .iter()
        .map(|item| {
            let questions_asked = interview
                .progress
                .get(item.id)
                .map(|p| p.questions_used)
                .unwrap_or(0);
            CoverageRow {
                item_id: item.id.to_string(),
                description: item.text.to_string(),
                status: item_status(item.id, interview),
                questions_asked,
                evidence: item_evidence(interview),
                policy_quote: policy_quote(item.id).to_string(),
            }
        })
        .collect()
}

pub fn progress(framework: &Framework, interview: &InterviewState) -> CoverageProgress {
    let completed = interview
        .progress
        .values()
        .filter(|p| p.status == ItemStatus::Complete)
        .count();
    let in_progress = interview
        .progress
        .values()
        .filter(|p| p.status == ItemStatus::Asked)
        .count();
    CoverageProgress {
        total_items: framework.items.len(),
        completed,
        in_progress,
    }
}

/// Gap analysis: items answered No (or never established) contribute a
/// redline when a suggestion template exists for them.
pub fn redlines(framework: &Framework, interview: &InterviewState) -> Vec<Redline> {
    framework
        .items
        .iter()
        .filter(|item| {
            matches!(
                item_status(item.id, interview),
                CoverageStatus::No | CoverageStatus::Unknown
            )
        })
        .filter_map(|item| {
            REDLINE_TEMPLATES
                .iter()
                .find(|template| template.item_id == item.id)
        })
        .map(|template| Redline {
            section: template.section,
            title: template.title,
            suggestion: template.suggestion,
            change_type: "addition",
        })
        .collect()
}

/// Keyword heuristic over the facts related to the item. Facts relate by id
/// mention, so most items stay Unknown unless a reply names them directly.
fn item_status(item_id: &str, interview: &InterviewState) -> CoverageStatus {
    let questions_used = interview
        .progress
        .get(item_id)
        .map(|p| p.questions_used)
        .unwrap_or(0);

    let responses: Vec<String> = interview
        .facts
        .iter()
        .filter(|fact| fact.topic.contains(item_id) || fact.value.to_lowercase().contains(item_id))
        .map(|fact| fact.value.to_lowercase())
        .collect();

    if responses.is_empty() || questions_used == 0 {
        return CoverageStatus::Unknown;
    }

    let has_positive = responses
        .iter()
        .any(|r| POSITIVE_KEYWORDS.iter().any(|k| r.contains(k)));
    let has_negative = responses
        .iter()
        .any(|r| NEGATIVE_KEYWORDS.iter().any(|k| r.contains(k)));

    if has_positive && !has_negative {
        CoverageStatus::Yes
    } else if has_negative {
        CoverageStatus::No
    } else {
        CoverageStatus::Unknown
    }
}

fn item_evidence(interview: &InterviewState) -> String {
    interview
        .transcript
        .iter()
        .find(|entry| entry.role == Role::Developer)
        .map(|entry| entry.content.chars().take(50).collect::<String>() + "...")
        .unwrap_or_else(|| NO_EVIDENCE.to_string())
}

fn policy_quote(item_id: &str) -> &'static str {
    QUOTE_HINTS
        .iter()
        .find(|(id, _)| *id == item_id)
        .map(|(_, quote)| *quote)
        .unwrap_or(NO_QUOTE)
}
