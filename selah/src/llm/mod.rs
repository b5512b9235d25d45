//! Model client abstraction for the meditation completion.
//!
//! The handler depends on a callable that turns a canonical reference into
//! one raw structured-output JSON document; this module defines the trait,
//! the provider error taxonomy, and the implementations: [`OpenAiModel`]
//! (real API) and [`MockModel`] (fixed reply, tests and demos).
//!
//! Validation of the returned document lives in `crate::schema`, not here:
//! the client's job ends at classified transport/provider errors.

mod mock;
mod openai;

pub use mock::MockModel;
pub use openai::OpenAiModel;

use async_trait::async_trait;
use thiserror::Error;

/// Why a completion call failed, classified so the handler can pick a
/// recovery path: quota signals fall back, everything else surfaces.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Rate/cost limiting from the provider (429 / quota exhausted).
    /// Recovered by the handler with the fixed fallback payload.
    #[error("provider quota exhausted: {0}")]
    QuotaExhausted(String),

    /// The provider answered without any completion content.
    #[error("모델에서 응답을 받지 못했어요.")]
    EmptyCompletion,

    /// Any other provider/transport error. `status` carries the provider's
    /// status when the error class supplies one.
    #[error("{message}")]
    Api { status: Option<u16>, message: String },

    /// The completion request could not be built.
    #[error("completion request build failed: {0}")]
    Request(String),
}

impl ModelError {
    /// Transport status for the failure envelope; defaults to 500 when the
    /// provider did not supply one.
    pub fn status(&self) -> u16 {
        match self {
            ModelError::Api { status: Some(code), .. } => *code,
            _ => 500,
        }
    }
}

/// One structured-output completion per request: canonical reference in,
/// raw completion JSON text out. Single attempt; retries belong to callers.
///
/// **Interaction**: `crate::handler` holds an `Option<&dyn MeditationModel>`
/// — `None` is the missing-credential short circuit.
#[async_trait]
pub trait MeditationModel: Send + Sync {
    /// Requests one meditation completion for the canonical reference and
    /// returns the raw JSON document the provider produced.
    async fn complete(&self, reference: &str) -> Result<String, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_error_display_carries_provider_message() {
        let err = ModelError::QuotaExhausted("rate limited".to_string());
        assert!(err.to_string().contains("rate limited"));
    }

    #[test]
    fn api_error_status_defaults_to_500() {
        let err = ModelError::Api {
            status: None,
            message: "boom".to_string(),
        };
        assert_eq!(err.status(), 500);
        let err = ModelError::Api {
            status: Some(401),
            message: "unauthorized".to_string(),
        };
        assert_eq!(err.status(), 401);
    }

    #[test]
    fn non_api_errors_map_to_500() {
        assert_eq!(ModelError::EmptyCompletion.status(), 500);
        assert_eq!(ModelError::Request("bad".to_string()).status(), 500);
    }
}
