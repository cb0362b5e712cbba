//! Pure report formatters. Handlers gather the data; these only render it,
//! so they stay trivially testable.

use crate::coverage::report::{CoverageRow, Redline};
use crate::interview::engine::{Conflict, Role, TranscriptEntry};

/// Interview transcript as Markdown: header, one block per turn, and a
/// conflicts summary when any were detected.
pub fn transcript_markdown(
    app_name: &str,
    date: &str,
    risk_level: Option<&str>,
    transcript: &[TranscriptEntry],
    conflicts: &[Conflict],
) -> String {
    let mut markdown = String::from("# VR/AR Compliance Interview Transcript\n\n");
    markdown.push_str(&format!("**Project:** {app_name}\n"));
    markdown.push_str(&format!("**Date:** {date}\n"));
    markdown.push_str(&format!(
        "**Risk Level:** {}\n\n",
        risk_level.unwrap_or("Unknown")
    ));

    markdown.push_str("## Interview Log\n\n");
    for (index, entry) in transcript.iter().enumerate() {
        markdown.push_str(&format!(
            "### Turn {} - {}\n\n",
            index + 1,
            entry.role.as_str().to_uppercase()
        ));
        markdown.push_str(&format!("{}\n\n", entry.content));
        if entry.role == Role::Conflict {
            markdown.push_str("> **⚠️ Conflict Detected**\n\n");
        }
    }

    if !conflicts.is_empty() {
        markdown.push_str("## Conflicts Summary\n\n");
        for (index, conflict) in conflicts.iter().enumerate() {
            markdown.push_str(&format!(
                "{}. **Turn {}:** {}\n\n",
                index + 1,
                conflict.turn,
                conflict.conflict
            ));
        }
    }

    markdown
}

/// Coverage table as CSV. Description and evidence are quoted; commas inside
/// evidence become semicolons so spreadsheet imports stay aligned.
pub fn coverage_csv(rows: &[CoverageRow]) -> String {
    let mut csv = String::from("Item ID,Description,Status,Questions Asked,Evidence\n");
    for row in rows {
        let evidence = row.evidence.replace(',', ";");
        csv.push_str(&format!(
            "{},\"{}\",{},{},\"{}\"\n",
            row.item_id,
            row.description,
            row.status.as_str(),
            row.questions_asked,
            evidence
        ));
    }
    csv
}

/// Redline suggestions as Markdown, numbered per section.
pub fn redlines_markdown(app_name: &str, date: &str, redlines: &[Redline]) -> String {
    let mut markdown = String::from("# VR/AR Privacy Policy Redlines\n\n");
    markdown.push_str(&format!("**Project:** {app_name}\n"));
    markdown.push_str(&format!("**Date:** {date}\n\n"));

    for (index, redline) in redlines.iter().enumerate() {
        markdown.push_str(&format!(
            "## {}. {}: {}\n\n",
            index + 1,
            redline.section,
            redline.title
        ));
        markdown.push_str("**Suggested Addition:**\n\n");
        markdown.push_str(&format!("{}\n\n", redline.suggestion));
        markdown.push_str("---\n\n");
    }

    markdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::report::CoverageStatus;
    use chrono::Utc;

    fn entry(turn: usize, role: Role, content: &str) -> TranscriptEntry {
        TranscriptEntry {
            turn,
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn transcript_markdown_renders_turns_and_roles() {
        let transcript = vec![
            entry(1, Role::Interviewer, "What is your lawful basis?"),
            entry(2, Role::Developer, "Legitimate interest, documented."),
        ];

        let md = transcript_markdown("HoloFit", "2026-08-26", Some("high-risk"), &transcript, &[]);
        assert!(md.starts_with("# VR/AR Compliance Interview Transcript\n\n"));
        assert!(md.contains("**Project:** HoloFit\n"));
        assert!(md.contains("**Risk Level:** high-risk\n\n"));
        assert!(md.contains("### Turn 1 - INTERVIEWER\n\n"));
        assert!(md.contains("### Turn 2 - DEVELOPER\n\n"));
        assert!(!md.contains("## Conflicts Summary"));
    }

    #[test]
    fn transcript_markdown_annotates_conflict_turns() {
        let transcript = vec![
            entry(1, Role::Interviewer, "Retention periods?"),
            entry(2, Role::Developer, "We haven't implemented that yet."),
            entry(3, Role::Conflict, "Potential gap detected"),
        ];
        let conflicts = vec![Conflict {
            question: "Retention periods?".to_string(),
            answer: "We haven't implemented that yet.".to_string(),
            conflict: "Potential gap detected".to_string(),
            turn: 3,
        }];

        let md = transcript_markdown("HoloFit", "2026-08-26", None, &transcript, &conflicts);
        assert!(md.contains("> **⚠️ Conflict Detected**\n\n"));
        assert!(md.contains("**Risk Level:** Unknown\n\n"));
        assert!(md.contains("## Conflicts Summary\n\n"));
        assert!(md.contains("1. **Turn 3:** Potential gap detected\n\n"));
    }

    #[test]
    fn coverage_csv_quotes_and_sanitizes() {
        let rows = vec![CoverageRow {
            item_id: "1.1".to_string(),
            description: "Lawful basis identified".to_string(),
            status: CoverageStatus::Unknown,
            questions_asked: 1,
            evidence: "We use analytics, tracking, and more...".to_string(),
            policy_quote: "n/a".to_string(),
        }];

        let csv = coverage_csv(&rows);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Item ID,Description,Status,Questions Asked,Evidence")
        );
        assert_eq!(
            lines.next(),
            Some("1.1,\"Lawful basis identified\",Unknown,1,\"We use analytics; tracking; and more...\"")
        );
    }

    #[test]
    fn redlines_markdown_numbers_sections() {
        let redlines = vec![
            Redline {
                section: "Legal Basis",
                title: "Clarify Lawful Basis for Processing",
                suggestion: "Add the basis.",
                change_type: "addition",
            },
            Redline {
                section: "Biometric Data",
                title: "Add Biometric Data Protection Clause",
                suggestion: "Add the clause.",
                change_type: "addition",
            },
        ];

        let md = redlines_markdown("HoloFit", "2026-08-26", &redlines);
        assert!(md.starts_with("# VR/AR Privacy Policy Redlines\n\n"));
        assert!(md.contains("## 1. Legal Basis: Clarify Lawful Basis for Processing\n\n"));
        assert!(md.contains("## 2. Biometric Data: Add Biometric Data Protection Clause\n\n"));
        assert!(md.contains("**Suggested Addition:**\n\nAdd the clause.\n\n---\n\n"));
    }
}
