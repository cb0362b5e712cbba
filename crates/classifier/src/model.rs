use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Risk tier assigned to a privacy policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    #[serde(rename = "low-risk")]
    Low,
    #[serde(rename = "potential-risk")]
    Potential,
    #[serde(rename = "high-risk")]
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low-risk",
            Self::Potential => "potential-risk",
            Self::High => "high-risk",
        }
    }

    /// Levels that route a project onto the strict checklist.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Potential | Self::High)
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low-risk" => Ok(Self::Low),
            "potential-risk" => Ok(Self::Potential),
            "high-risk" => Ok(Self::High),
            _ => Err(format!("unknown risk level: {value}")),
        }
    }
}

/// One piece of evidence for a high-risk classification, already normalized:
/// every field is populated, with placeholder defaults where the model reply
/// had nothing usable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskSignal {
    #[serde(rename = "type")]
    pub signal_type: String,
    pub detail: String,
    pub quote: String,
    pub start: i64,
    pub end: i64,
}

/// Shape-stable form of a model reply. Invariant: fully populated, never
/// carries absent fields; the only representation handed to verdict
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedModelResult {
    pub is_high_risk: bool,
    pub signals: Vec<RiskSignal>,
    pub rationale: String,
}

/// Final classification output consumed by checklist selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskVerdict {
    pub level: RiskLevel,
    pub reasons: Vec<String>,
    pub indicators: Vec<String>,
    #[serde(rename = "usedFallback")]
    pub used_fallback: bool,
}
