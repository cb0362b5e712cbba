//! Deterministic keyword scorer used whenever the remote model path is
//! unavailable or untrustworthy.

use crate::model::{RiskLevel, RiskVerdict};

/// Indicator vocabulary, matched as case-insensitive substrings. Order is
/// load-bearing: matched terms are reported in declaration order.
pub const RISK_INDICATORS: &[&str] = &[
    "biometric",
    "facial recognition",
    "eye tracking",
    "behavioral analysis",
    "location tracking",
    "voice recording",
    "machine learning",
    "artificial intelligence",
    "third party",
    "data sharing",
    "physiological",
    "gaze data",
    "heart rate",
    "body temperature",
    "fingerprint",
    "voiceprint",
    "iris scan",
];

/// Distinct-term counts at or below this are potential-risk; above, high-risk.
pub const POTENTIAL_RISK_MAX_MATCHES: usize = 3;

/// Scores a policy text by counting which indicator terms occur at least
/// once. 0 matches is low-risk, 1–3 potential-risk, 4 or more high-risk.
/// Pure function of the text; the verdict always carries `usedFallback`.
pub fn score(policy_text: &str) -> RiskVerdict {
    let text = policy_text.to_lowercase();
    let found: Vec<&str> = RISK_INDICATORS
        .iter()
        .copied()
        .filter(|term| text.contains(term))
        .collect();

    let (level, reasons) = if found.is_empty() {
        (
            RiskLevel::Low,
            vec!["No high-risk indicators detected in policy text (keyword-based analysis)"
                .to_string()],
        )
    } else if found.len() <= POTENTIAL_RISK_MAX_MATCHES {
        (
            RiskLevel::Potential,
            vec![
                format!(
                    "Found {} potential risk indicators (keyword-based analysis)",
                    found.len()
                ),
                "VR/AR applications typically involve immersive data collection".to_string(),
                format!("Detected keywords: {}", found.join(", ")),
            ],
        )
    } else {
        (
            RiskLevel::High,
            vec![
                format!(
                    "Found {} high-risk indicators (keyword-based analysis)",
                    found.len()
                ),
                "Multiple data collection mechanisms detected".to_string(),
                "Complex VR/AR data processing identified".to_string(),
                format!("Detected keywords: {}", found.join(", ")),
            ],
        )
    };

    RiskVerdict {
        level,
        reasons,
        indicators: found.into_iter().map(str::to_string).collect(),
        used_fallback: true,
    }
}
