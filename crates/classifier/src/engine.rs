//! Classification flow: prompt, remote call, tolerant parse, verdict, with
//! the keyword scorer as the landing spot for every non-fatal failure.

use kanon_common::error::{KanonError, KanonResult};
use serde::{Deserialize, Serialize};

use crate::client::ChatCompletion;
use crate::model::RiskVerdict;
use crate::prompt::{build_system_prompt, AUDITOR_SYSTEM_PROMPT};
use crate::{fallback, parse, verdict};

/// Which branch of the classification flow produced the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TakenPath {
    Model,
    FallbackNoCredential,
    FallbackTransport,
    FallbackUnparseable,
}

/// Verdict plus a trace of how it was reached. `notice` carries the
/// user-facing explanation whenever a degraded path ran; callers surface it
/// as a dismissible banner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub verdict: RiskVerdict,
    pub path: TakenPath,
    pub notice: Option<String>,
}

/// Drives one classification attempt over an injected chat-completion
/// transport. Pure with respect to session state: the caller owns the
/// policy text, credential, and what happens with the result.
pub struct RiskEngine<C: ChatCompletion> {
    chat: C,
}

impl<C: ChatCompletion> RiskEngine<C> {
    pub fn new(chat: C) -> Self {
        Self { chat }
    }

    /// Classifies a policy text.
    ///
    /// No credential routes straight to the keyword scorer when fallback is
    /// allowed, and errors otherwise — the only failure that crosses this
    /// boundary. With a credential, one remote attempt is made; transport
    /// failures and unparseable replies each land in the scorer exactly
    /// once. No retries.
    pub async fn classify(
        &self,
        policy_text: &str,
        api_key: Option<&str>,
        allow_fallback: bool,
    ) -> KanonResult<Classification> {
        let api_key = api_key.filter(|key| !key.is_empty());

        let Some(key) = api_key else {
            if !allow_fallback {
                return Err(KanonError::Validation(
                    "no API key provided and fallback is disabled".to_string(),
                ));
            }
            tracing::info!("no API key; classifying with keyword fallback");
            return Ok(Classification {
                verdict: fallback::score(policy_text),
                path: TakenPath::FallbackNoCredential,
                notice: Some(
                    "Proceeding with reduced accuracy (no API key provided). \
                     Falling back to keyword detection."
                        .to_string(),
                ),
            });
        };

        let system_prompt = build_system_prompt(Some(AUDITOR_SYSTEM_PROMPT));
        let raw = match self.chat.complete(key, &system_prompt, policy_text).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "model call failed; using keyword fallback");
                return Ok(Classification {
                    verdict: fallback::score(policy_text),
                    path: TakenPath::FallbackTransport,
                    notice: Some(format!("{err}. Falling back to keyword detection.")),
                });
            }
        };

        match parse::parse_model_reply(&raw) {
            Ok(normalized) => {
                tracing::debug!(
                    is_high_risk = normalized.is_high_risk,
                    signals = normalized.signals.len(),
                    "model reply parsed"
                );
                Ok(Classification {
                    verdict: verdict::build_verdict(&normalized),
                    path: TakenPath::Model,
                    notice: None,
                })
            }
            Err(_) => {
                tracing::warn!("model reply unparseable; using keyword fallback");
                Ok(Classification {
                    verdict: fallback::score(policy_text),
                    path: TakenPath::FallbackUnparseable,
                    notice: Some(
                        "Malformed JSON in model output. Falling back to keyword detection."
                            .to_string(),
                    ),
                })
            }
        }
    }
}
