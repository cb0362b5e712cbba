use serde::Serialize;

/// Gherkin-style review scenario tagged with the checklist items it covers.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Scenario {
    pub title: &'static str,
    pub body: &'static str,
    pub tags: &'static [&'static str],
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        title: "Data Collection Consent",
        body: "Given a user launches the VR application\n\
               When they are presented with data collection options\n\
               Then they must provide explicit consent before any data is processed\n\
               And the consent mechanism must be GDPR-compliant",
        tags: &["1.1", "2.1"],
    },
    Scenario {
        title: "Biometric Data Processing",
        body: "Given the app collects biometric data (eye tracking, facial recognition)\n\
               When this data is processed for personalization\n\
               Then specific safeguards must be documented\n\
               And users must be informed of biometric data use",
        tags: &["5.1", "1.2"],
    },
    Scenario {
        title: "Cross-Border Data Transfer",
        body: "Given user data is transferred outside the EU\n\
               When the transfer occurs for cloud processing\n\
               Then adequate safeguards must be in place\n\
               And users must be notified of international transfers",
        tags: &["3.1", "1.3"],
    },
    Scenario {
        title: "Real-Time Processing Transparency",
        body: "Given the VR app processes data in real-time\n\
               When environmental scanning occurs continuously\n\
               Then users must be informed of ongoing data collection\n\
               And processing purposes must be clearly disclosed",
        tags: &["6.1", "4.2"],
    },
    Scenario {
        title: "Data Subject Rights Exercise",
        body: "Given a user wants to exercise their GDPR rights\n\
               When they request data deletion or portability\n\
               Then the app must provide clear mechanisms\n\
               And respond within the required timeframe",
        tags: &["1.2", "2.2"],
    },
];
