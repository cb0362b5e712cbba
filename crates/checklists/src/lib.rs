//! Static compliance frameworks and scenario fixtures.
//!
//! Two fixed checklists cover the wizard's branches: the strict AI Act +
//! GDPR list for elevated risk levels and the standard GDPR-only list
//! otherwise. Item ids and question texts are design constants shared with
//! the interview, coverage, and redline steps.

pub mod frameworks;
pub mod scenarios;

pub use frameworks::{select_framework, ChecklistItem, Framework, GDPR_ONLY, STRICT};
pub use scenarios::{Scenario, SCENARIOS};
