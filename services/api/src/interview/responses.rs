use serde::Serialize;

use crate::interview::engine::{Conflict, Fact, TranscriptEntry};

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub transcript: Vec<TranscriptEntry>,
    pub conflicts: Vec<Conflict>,
    pub facts: Vec<Fact>,
}
