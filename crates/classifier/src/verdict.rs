//! Conversion of a normalized model result into the final risk verdict.

use crate::model::{NormalizedModelResult, RiskLevel, RiskVerdict};

/// Builds the verdict for a model-path classification.
///
/// Signal-count thresholds: 3 or more signals is high-risk, 1–2 is
/// potential-risk. A high-risk flag with zero supporting signals is still
/// treated as high-risk; that asymmetry with the keyword thresholds is
/// intentional and tracked as an open product question, not a bug.
pub fn build_verdict(result: &NormalizedModelResult) -> RiskVerdict {
    let indicators: Vec<String> = result
        .signals
        .iter()
        .map(|signal| signal.detail.clone())
        .collect();

    if !result.is_high_risk {
        return RiskVerdict {
            level: RiskLevel::Low,
            reasons: non_blank(vec![
                result.rationale.clone(),
                "No high-risk signal reported".to_string(),
            ]),
            indicators,
            used_fallback: false,
        };
    }

    let level = match result.signals.len() {
        1 | 2 => RiskLevel::Potential,
        _ => RiskLevel::High,
    };

    let mut reasons = vec![result.rationale.clone()];
    if !result.signals.is_empty() {
        reasons.push(format!("Found {} risk signal(s):", result.signals.len()));
        for signal in &result.signals {
            reasons.push(format!("- {}: {}", signal.signal_type, signal.detail));
        }
    }

    RiskVerdict {
        level,
        reasons: non_blank(reasons),
        indicators,
        used_fallback: false,
    }
}

fn non_blank(reasons: Vec<String>) -> Vec<String> {
    reasons.into_iter().filter(|r| !r.is_empty()).collect()
}
