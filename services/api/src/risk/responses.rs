use kanon_checklists::{ChecklistItem, Scenario};
use kanon_classifier::{RiskVerdict, TakenPath};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub verdict: RiskVerdict,
    pub path: TakenPath,
    pub notice: Option<String>,
    pub framework: FrameworkResponse,
}

#[derive(Debug, Serialize)]
pub struct FrameworkResponse {
    pub name: &'static str,
    pub risk_path: &'static str,
    pub items: &'static [ChecklistItem],
}

#[derive(Debug, Serialize)]
pub struct ScenariosResponse {
    pub scenarios: &'static [Scenario],
}
