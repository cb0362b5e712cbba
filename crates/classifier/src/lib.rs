//! Risk classification for VR/AR privacy policies.
//!
//! The pipeline sends policy text to a chat-completion service with a fixed
//! auditor prompt, defensively parses the semi-structured reply, and
//! converts it into a [`RiskVerdict`]. A deterministic keyword scorer backs
//! every failure path, so classification only errors when the caller
//! provides no credential and forbids the fallback.

pub mod client;
pub mod engine;
pub mod fallback;
pub mod model;
pub mod parse;
pub mod prompt;
pub mod verdict;

pub use client::{ChatClient, ChatClientConfig, ChatClientError, ChatCompletion};
pub use engine::{Classification, RiskEngine, TakenPath};
pub use model::{NormalizedModelResult, RiskLevel, RiskSignal, RiskVerdict};
