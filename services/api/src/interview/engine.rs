//! Simulated compliance interview: a question per checklist item, a canned
//! developer reply, conflict detection, and fact recording.

use chrono::{DateTime, Utc};
use kanon_checklists::{ChecklistItem, Framework};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MAX_QUESTIONS_PER_ITEM: u32 = 3;

const COMPLETION_MESSAGE: &str =
    "Interview completed. All checklist items have been addressed.";

const CONFLICT_NOTE: &str = "Potential gap detected: Response indicates uncertainty or \
     incomplete implementation. This may require clarification in the privacy policy.";

/// Phrases in a developer reply that flag a potential compliance gap.
const CONFLICT_KEYWORDS: &[&str] = &[
    "not sure",
    "might need",
    "haven't implemented",
    "i think",
    "default settings",
];

/// Hand-written questions for specific items; anything else gets the
/// generic template built from the item text.
const QUESTION_TEMPLATES: &[(&str, &str)] = &[
    ("1.1", "Can you explain the specific lawful basis your VR application relies on for processing personal data, and where this is documented in your privacy policy?"),
    ("1.2", "How does your privacy policy inform users about their rights under GDPR, particularly regarding data collected through VR interactions?"),
    ("1.3", "What are your data retention periods for VR usage data, and how are these communicated to users?"),
    ("2.1", "Walk me through your consent mechanism - how do users provide consent for data collection in your VR environment?"),
    ("2.2", "If a user requests data portability for their VR interaction data, what process do you follow?"),
    ("3.1", "Does your VR application transfer data internationally? If so, what safeguards are in place?"),
    ("4.1", "Have you conducted a risk assessment specifically for AI components in your VR system?"),
    ("4.2", "How do you ensure transparency when AI algorithms process user data in real-time during VR sessions?"),
    ("5.1", "Your VR app likely collects biometric data (eye tracking, hand gestures). What specific protections are in place?"),
    ("5.2", "What VR-specific privacy risks have you identified and how are they addressed in your policy?"),
    ("6.1", "How do you inform users about real-time data processing that occurs during VR experiences?"),
];

/// Canned developer-persona replies, cycled in declaration order.
pub const DEVELOPER_RESPONSES: &[&str] = &[
    "We collect basic usage analytics through our VR platform, but I'm not entirely sure about the specific legal basis. I think it's legitimate interest?",
    "Users can contact us via email to request their data, though we haven't implemented an automated system yet.",
    "We use Google Analytics and some third-party VR tracking services, but I'd need to check the exact data transfer details with our backend team.",
    "Our privacy policy covers the basics, but we might need to add more specific language about VR data collection.",
    "We do collect eye tracking data for user experience optimization, but I'm not sure if we explicitly mention biometric data protections.",
    "Data retention is handled by our cloud provider's default settings. We haven't set specific retention periods yet.",
];

/// Source of simulated developer replies. Injectable so tests (or a future
/// real dialogue backend) can replace the canned cycle.
pub trait ResponseSource: Send + Sync {
    fn reply(&self, turn: usize) -> String;
}

/// Default source: round-robin over [`DEVELOPER_RESPONSES`], keyed by how
/// many replies the session has already received. Deterministic per session.
pub struct CannedResponses;

impl ResponseSource for CannedResponses {
    fn reply(&self, turn: usize) -> String {
        DEVELOPER_RESPONSES[turn % DEVELOPER_RESPONSES.len()].to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    NotAsked,
    Asked,
    Complete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemProgress {
    pub questions_used: u32,
    pub status: ItemStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Interviewer,
    Developer,
    Conflict,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interviewer => "interviewer",
            Self::Developer => "developer",
            Self::Conflict => "conflict",
            Self::System => "system",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub turn: usize,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    pub topic: String,
    pub value: String,
    pub scope: String,
    pub quote: String,
    pub turn: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub question: String,
    pub answer: String,
    pub conflict: String,
    pub turn: usize,
}

/// Per-session interview state. Reset whenever a new classification selects
/// a framework, since the item set may change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewState {
    pub progress: HashMap<String, ItemProgress>,
    pub transcript: Vec<TranscriptEntry>,
    pub facts: Vec<Fact>,
    pub conflicts: Vec<Conflict>,
    pub replies_given: usize,
    pub completed: bool,
}

impl InterviewState {
    pub fn reset(&mut self, framework: &Framework) {
        *self = Self::default();
        for item in framework.items {
            self.progress.insert(
                item.id.to_string(),
                ItemProgress {
                    questions_used: 0,
                    status: ItemStatus::NotAsked,
                },
            );
        }
    }

    fn push_entry(&mut self, role: Role, content: &str) {
        self.transcript.push(TranscriptEntry {
            turn: self.transcript.len() + 1,
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        });
    }
}

/// Result of one interview step.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub question: Option<String>,
    pub reply: Option<String>,
    pub conflict: Option<String>,
    pub done: bool,
}

/// Asks the next open checklist item's question and, unless skipping,
/// collects the simulated developer reply, runs conflict detection, and
/// records a fact. When no item remains, a system line marks the interview
/// complete (once) and `done` is reported.
pub fn advance(
    state: &mut InterviewState,
    framework: &Framework,
    source: &dyn ResponseSource,
    skip: bool,
) -> StepOutcome {
    let next = framework.items.iter().find(|item| {
        state.progress.get(item.id).is_some_and(|p| {
            p.status == ItemStatus::NotAsked && p.questions_used < MAX_QUESTIONS_PER_ITEM
        })
    });

    let Some(item) = next else {
        if !state.completed {
            state.push_entry(Role::System, COMPLETION_MESSAGE);
            state.completed = true;
        }
        return StepOutcome {
            question: None,
            reply: None,
            conflict: None,
            done: true,
        };
    };

    let question = question_for(item);
    state.push_entry(Role::Interviewer, &question);
    if let Some(progress) = state.progress.get_mut(item.id) {
        progress.status = ItemStatus::Asked;
        progress.questions_used += 1;
    }

    if skip {
        return StepOutcome {
            question: Some(question),
            reply: None,
            conflict: None,
            done: false,
        };
    }

    let reply = source.reply(state.replies_given);
    state.replies_given += 1;
    state.push_entry(Role::Developer, &reply);

    let conflict = detect_conflict(&reply);
    if let Some(note) = &conflict {
        state.push_entry(Role::Conflict, note);
        state.conflicts.push(Conflict {
            question: question.clone(),
            answer: reply.clone(),
            conflict: note.clone(),
            turn: state.transcript.len(),
        });
    }

    record_fact(state, &question, &reply);
    if let Some(progress) = state.progress.get_mut(item.id) {
        progress.status = ItemStatus::Complete;
    }

    StepOutcome {
        question: Some(question),
        reply: Some(reply),
        conflict,
        done: false,
    }
}

fn question_for(item: &ChecklistItem) -> String {
    QUESTION_TEMPLATES
        .iter()
        .find(|(id, _)| *id == item.id)
        .map(|(_, text)| text.to_string())
        .unwrap_or_else(|| {
            format!(
                "Please explain how your privacy policy addresses: {}",
                item.text
            )
        })
}

fn detect_conflict(reply: &str) -> Option<String> {
    let lower = reply.to_lowercase();
    CONFLICT_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
        .then(|| CONFLICT_NOTE.to_string())
}

fn record_fact(state: &mut InterviewState, question: &str, value: &str) {
    let quote: String = value.chars().take(50).collect::<String>() + "...";
    state.facts.push(Fact {
        topic: extract_topic(question),
        value: value.to_string(),
        scope: "policy_compliance".to_string(),
        quote,
        turn: state.transcript.len(),
    });
}

fn extract_topic(question: &str) -> String {
    let topic = if question.contains("lawful basis") {
        "lawful_basis"
    } else if question.contains("consent") {
        "consent_mechanism"
    } else if question.contains("retention") {
        "data_retention"
    } else if question.contains("biometric") {
        "biometric_data"
    } else if question.contains("transfer") {
        "data_transfer"
    } else {
        "general_compliance"
    };
    topic.to_string()
}
