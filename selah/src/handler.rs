//! Meditation request handler: the linear per-request state machine.
//!
//! parse body → validate+normalize reference → credential check → verse
//! table probe → one provider call → completion validation → merge →
//! envelope. Single attempt, no retry, no shared mutable state; the only
//! awaited external operation is the provider call.
//!
//! Recovery mapping: a missing credential and provider quota signals are
//! recovered with the fixed fallback payload (success + `fallback: true` +
//! warning) so the flow stays usable; a malformed request or unsupported
//! reference is a 400; a contract-violating completion is a hard 500 —
//! masking it with the fallback would hide a provider or prompt regression.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::bible;
use crate::books;
use crate::fallback::{fallback_result, VERSE_TEXT_UNAVAILABLE};
use crate::llm::{MeditationModel, ModelError};
use crate::schema::{validate_completion, validate_request, MeditationResult};

/// User-visible message when the request body is not parsable JSON.
pub const MSG_MALFORMED_JSON: &str = "올바른 JSON 형식이 필요해요.";

/// Warning attached to the fallback when no provider credential is set.
pub const MSG_MISSING_CREDENTIAL: &str = "OPENAI_API_KEY가 설정되지 않아 예시 응답을 반환했어요.";

/// Warning attached to the fallback under provider rate/cost limiting.
pub const MSG_QUOTA_FALLBACK: &str = "OpenAI 호출 제한으로 예시 응답을 반환했어요.";

/// User-visible message when the completion violates the contract.
pub const MSG_CONTRACT_VIOLATION: &str = "모델 응답이 예상한 형식을 벗어났어요. 다시 시도해 주세요.";

/// Successful response: the validated result, plus the fallback flag and
/// warning when a deterministic substitute was served.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope {
    pub success: bool,
    pub data: MeditationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Failed response: uniform error shape; `status` travels out of band as
/// the transport status code.
#[derive(Debug, Clone, Serialize)]
pub struct FailureEnvelope {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing)]
    pub status: u16,
}

/// The uniform outbound envelope. Serializes to exactly
/// `{"success":true,"data":...,"fallback"?,"warning"?}` or
/// `{"success":false,"error":...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    Success(SuccessEnvelope),
    Failure(FailureEnvelope),
}

impl Envelope {
    fn success(data: MeditationResult) -> Self {
        Envelope::Success(SuccessEnvelope {
            success: true,
            data,
            fallback: None,
            warning: None,
        })
    }

    fn fallback(data: MeditationResult, warning: &str) -> Self {
        Envelope::Success(SuccessEnvelope {
            success: true,
            data,
            fallback: Some(true),
            warning: Some(warning.to_string()),
        })
    }

    fn failure(status: u16, error: impl Into<String>) -> Self {
        Envelope::Failure(FailureEnvelope {
            success: false,
            error: error.into(),
            status,
        })
    }

    /// Transport status code for this envelope.
    pub fn status(&self) -> u16 {
        match self {
            Envelope::Success(_) => 200,
            Envelope::Failure(f) => f.status,
        }
    }
}

/// Runs one meditation request end to end. `model` is `None` when no
/// provider credential is configured (deliberate demoable path, not a
/// failure).
pub async fn handle_meditation(model: Option<&dyn MeditationModel>, raw_body: &str) -> Envelope {
    let body: Value = match serde_json::from_str(raw_body) {
        Ok(value) => value,
        Err(error) => {
            debug!(%error, "request body is not valid JSON");
            return Envelope::failure(400, MSG_MALFORMED_JSON);
        }
    };

    let canonical = match validate_request(&body) {
        Ok(reference) => reference,
        Err(error) => return Envelope::failure(400, error.to_string()),
    };

    let Some(model) = model else {
        warn!(reference = %canonical, "no provider credential configured, serving fallback");
        return Envelope::fallback(fallback_result(&canonical), MSG_MISSING_CREDENTIAL);
    };

    let table_text = bible::verse_text(&books::lookup_key(&canonical)).map(str::to_string);

    let raw_completion = match model.complete(&canonical).await {
        Ok(raw) => raw,
        Err(ModelError::QuotaExhausted(message)) => {
            warn!(reference = %canonical, %message, "provider quota exhausted, serving fallback");
            return Envelope::fallback(fallback_result(&canonical), MSG_QUOTA_FALLBACK);
        }
        Err(error) => {
            warn!(reference = %canonical, %error, "provider call failed");
            return Envelope::failure(error.status(), error.to_string());
        }
    };

    let mut result = match validate_completion(&raw_completion, &canonical) {
        Ok(result) => result,
        Err(error) => {
            warn!(reference = %canonical, %error, "completion violated the contract");
            return Envelope::failure(500, MSG_CONTRACT_VIOLATION);
        }
    };

    // Merge: table text wins, then the provider's, then the placeholder.
    result.verse_text = table_text
        .or(result.verse_text)
        .or_else(|| Some(VERSE_TEXT_UNAVAILABLE.to_string()));
    result.verse_input = canonical;

    Envelope::success(result)
}
