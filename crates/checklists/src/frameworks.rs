use kanon_classifier::RiskLevel;
use serde::Serialize;

/// One compliance question with its stable id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub id: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Framework {
    pub name: &'static str,
    pub risk_path: &'static str,
    pub items: &'static [ChecklistItem],
}

impl Framework {
    pub fn item_by_id(&self, id: &str) -> Option<&'static ChecklistItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

const fn item(id: &'static str, text: &'static str) -> ChecklistItem {
    ChecklistItem { id, text }
}

/// Full list for high-risk and potential-risk applications.
pub const STRICT: Framework = Framework {
    name: "High Risk AI/VR Compliance Checklist",
    risk_path: "HIGH RISK PATH",
    items: &[
        item("1.1", "Are all data types collected clearly listed (e.g., biometric, audio, behavioral)?"),
        item("1.2", "Are the data sources explained (user-provided, device sensors, third parties)?"),
        item("1.3", "Are sensitive data (e.g., biometric) distinguished from regular data?"),
        item("1.4", "Does the policy commit to data minimisation (collecting only what is necessary)?"),
        item("1.5", "Does the policy mention anonymisation or de-identification where possible?"),
        item("2.1", "Are data usage purposes stated clearly and specifically?"),
        item("2.2", "If used for automated decision-making, is this explicitly stated?"),
        item("2.3", "Does the policy allow users to request an explanation for automated decisions?"),
        item("3.1", "Is the legal basis for data processing provided (e.g., consent, contract)?"),
        item("3.2", "Does the policy explicitly state compliance with relevant laws/regulations (e.g., GDPR, CCPA, AI Act)?"),
        item("4.1", "Are users informed how their data is used in the AI system?"),
        item("4.2", "Are user rights (access, correction, deletion, objection) explained?"),
        item("4.3", "Can users opt out of fully automated decisions?"),
        item("4.4", "Does the policy commit to keeping user data accurate and up-to-date?"),
        item("5.1", "Is the data retention period or policy clearly stated?"),
        item("5.2", "Are users informed of their \"Right to be Forgotten\" and how to request deletion?"),
        item("6.1", "Is a contact point (e.g., Data Protection Officer) provided?"),
        item("6.2", "Does the policy identify the organisation(s) responsible for data processing (Data Controller/Processor)?"),
        item("6.3", "Does the policy describe a complaint or redress mechanism (e.g., filing with a regulator)?"),
        item("6.4", "If sensitive information is involved, does the policy confirm express consent was obtained and explain how consent can be withdrawn?"),
    ],
};

/// Standard list for low-risk applications: the strict list without the
/// automated-decision items (2.2, 2.3, 4.3).
pub const GDPR_ONLY: Framework = Framework {
    name: "Standard VR/AR Compliance Checklist",
    risk_path: "LOW RISK PATH",
    items: &[
        item("1.1", "Are all data types collected clearly listed (e.g., biometric, audio, behavioral)?"),
        item("1.2", "Are the data sources explained (user-provided, device sensors, third parties)?"),
        item("1.3", "Are sensitive data (e.g., biometric) distinguished from regular data?"),
        item("1.4", "Does the policy commit to data minimisation (collecting only what is necessary)?"),
        item("1.5", "Does the policy mention anonymisation or de-identification where possible?"),
        item("2.1", "Are data usage purposes stated clearly and specifically?"),
        item("3.1", "Is the legal basis for data processing provided (e.g., consent, contract)?"),
        item("3.2", "Does the policy explicitly state compliance with relevant laws/regulations (e.g., GDPR, CCPA, AI Act)?"),
        item("4.1", "Are users informed how their data is used in the AI system?"),
        item("4.2", "Are user rights (access, correction, deletion, objection) explained?"),
        item("4.4", "Does the policy commit to keeping user data accurate and up-to-date?"),
        item("5.1", "Is the data retention period or policy clearly stated?"),
        item("5.2", "Are users informed of their \"Right to be Forgotten\" and how to request deletion?"),
        item("6.1", "Is a contact point (e.g., Data Protection Officer) provided?"),
        item("6.2", "Does the policy identify the organisation(s) responsible for data processing (Data Controller/Processor)?"),
        item("6.3", "Does the policy describe a complaint or redress mechanism (e.g., filing with a regulator)?"),
        item("6.4", "If sensitive information is involved, does the policy confirm express consent was obtained and explain how consent can be withdrawn?"),
    ],
};

/// High-risk and potential-risk verdicts route onto the strict framework.
pub fn select_framework(level: RiskLevel) -> &'static Framework {
    if level.is_elevated() {
        &STRICT
    } else {
        &GDPR_ONLY
    }
}
