//! OpenAI Chat Completions client implementing [`MeditationModel`].
//!
//! One non-streaming completion per call, with the strict JSON-schema
//! response format from `crate::schema` so the provider returns exactly one
//! conforming document. Requires `OPENAI_API_KEY` (or explicit config);
//! [`OpenAiModel::from_env`] returns `None` without it so the handler can
//! take its fallback path instead of failing.
//!
//! Provider errors are classified here: rate/cost signals become
//! [`ModelError::QuotaExhausted`]; other API errors keep a reconstructed
//! status for the failure envelope.

use async_trait::async_trait;
use tracing::{debug, trace};

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
    Client,
};

use crate::prompts::{user_prompt, SYSTEM_PROMPT};
use crate::schema::completion_json_schema;

use super::{MeditationModel, ModelError};

/// Default completion model; override with `SELAH_MODEL` or `OPENAI_MODEL`.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default sampling temperature; override with `SELAH_TEMPERATURE`.
pub const DEFAULT_TEMPERATURE: f32 = 0.6;

/// Name of the structured-output schema sent with every request.
const SCHEMA_NAME: &str = "selah_meditation";

/// Error `type`/`code` markers the provider pairs with rate/cost limiting.
const QUOTA_MARKERS: &[&str] = &[
    "rate_limit_exceeded",
    "rate_limit_error",
    "insufficient_quota",
    "quota_exceeded",
    "429",
    "402",
];

/// OpenAI Chat Completions client for meditation requests.
///
/// Uses `OPENAI_API_KEY` from the environment by default, or explicit
/// config via [`OpenAiModel::with_config`] (custom key or base URL).
pub struct OpenAiModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiModel {
    /// Builds a client with default config (API key from `OPENAI_API_KEY`).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Builds a client with custom config (e.g. custom key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Sets the sampling temperature (0–2).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Builds the client from the environment, or `None` when no
    /// `OPENAI_API_KEY` is configured — the handler's credential check.
    ///
    /// Model: `SELAH_MODEL`, else `OPENAI_MODEL`, else [`DEFAULT_MODEL`].
    /// Temperature: `SELAH_TEMPERATURE` when it parses, else
    /// [`DEFAULT_TEMPERATURE`].
    pub fn from_env() -> Option<Self> {
        let key = std::env::var("OPENAI_API_KEY").ok()?;
        if key.trim().is_empty() {
            return None;
        }
        let model = std::env::var("SELAH_MODEL")
            .or_else(|_| std::env::var("OPENAI_MODEL"))
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let temperature = std::env::var("SELAH_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);
        Some(Self::new(model).with_temperature(temperature))
    }
}

fn marker_matches(value: &str) -> bool {
    let value = value.to_ascii_lowercase();
    QUOTA_MARKERS.iter().any(|marker| value == *marker)
}

/// True when the API error carries the provider's rate/cost-limit pairing
/// (429 "too many requests" / quota exceeded).
fn is_quota_signal(api: &ApiError) -> bool {
    if api.r#type.as_deref().is_some_and(marker_matches) {
        return true;
    }
    match &api.code {
        Some(code) => {
            marker_matches(code)
                || code.parse::<u64>().is_ok_and(|n| n == 429 || n == 402)
        }
        None => false,
    }
}

/// Reconstructs a transport status from the API error class; the client
/// library does not surface the raw HTTP status on typed errors.
fn api_status(api: &ApiError) -> Option<u16> {
    if let Some(code) = api.code.as_ref().and_then(|c| c.parse::<u64>().ok()) {
        return u16::try_from(code).ok();
    }
    match api.r#type.as_deref() {
        Some("invalid_request_error") => Some(400),
        Some("authentication_error") => Some(401),
        Some("permission_error") => Some(403),
        Some("not_found_error") => Some(404),
        Some("server_error") => Some(500),
        _ => None,
    }
}

fn classify(error: OpenAIError) -> ModelError {
    match error {
        OpenAIError::ApiError(api) => {
            if is_quota_signal(&api) {
                ModelError::QuotaExhausted(api.message)
            } else {
                ModelError::Api {
                    status: api_status(&api),
                    message: api.message,
                }
            }
        }
        other => ModelError::Api {
            status: None,
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl MeditationModel for OpenAiModel {
    async fn complete(&self, reference: &str) -> Result<String, ModelError> {
        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage::from(
                SYSTEM_PROMPT,
            )),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(
                user_prompt(reference).as_str(),
            )),
        ];

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(messages);
        args.temperature(self.temperature);
        args.response_format(ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: None,
                name: SCHEMA_NAME.to_string(),
                schema: Some(completion_json_schema()),
                strict: Some(true),
            },
        });

        let request = args.build().map_err(|e| ModelError::Request(e.to_string()))?;

        debug!(
            model = %self.model,
            reference = %reference,
            temperature = self.temperature,
            "meditation completion create"
        );
        if let Ok(body) = serde_json::to_string(&request) {
            trace!(request = %body, "completion request body");
        }

        let response = self.client.chat().create(request).await.map_err(classify)?;

        if let Ok(body) = serde_json::to_string(&response) {
            trace!(response = %body, "completion response body");
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(ModelError::EmptyCompletion)?;
        let content = choice.message.content.ok_or(ModelError::EmptyCompletion)?;
        if content.trim().is_empty() {
            return Err(ModelError::EmptyCompletion);
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(
        message: &str,
        r#type: Option<&str>,
        code: Option<serde_json::Value>,
    ) -> ApiError {
        ApiError {
            message: message.to_string(),
            r#type: r#type.map(str::to_string),
            param: None,
            code: code.map(|v| v.as_str().map(String::from).unwrap_or_else(|| v.to_string())),
        }
    }

    #[test]
    fn rate_limit_type_classifies_as_quota() {
        let err = classify(OpenAIError::ApiError(api_error(
            "Rate limit reached",
            Some("rate_limit_exceeded"),
            None,
        )));
        assert!(matches!(err, ModelError::QuotaExhausted(_)));
    }

    #[test]
    fn insufficient_quota_code_classifies_as_quota() {
        let err = classify(OpenAIError::ApiError(api_error(
            "You exceeded your current quota",
            Some("insufficient_quota"),
            Some(serde_json::json!("insufficient_quota")),
        )));
        assert!(matches!(err, ModelError::QuotaExhausted(_)));
    }

    #[test]
    fn numeric_429_code_classifies_as_quota() {
        let err = classify(OpenAIError::ApiError(api_error(
            "too many requests",
            None,
            Some(serde_json::json!(429)),
        )));
        assert!(matches!(err, ModelError::QuotaExhausted(_)));
    }

    #[test]
    fn auth_error_keeps_reconstructed_status() {
        let err = classify(OpenAIError::ApiError(api_error(
            "invalid api key",
            Some("authentication_error"),
            None,
        )));
        assert_eq!(
            err,
            ModelError::Api {
                status: Some(401),
                message: "invalid api key".to_string()
            }
        );
    }

    #[test]
    fn unknown_api_error_has_no_status() {
        let err = classify(OpenAIError::ApiError(api_error("odd", Some("mystery"), None)));
        assert_eq!(err.status(), 500);
    }

    /// **Scenario**: builder chain sets model and temperature without panic.
    #[test]
    fn builder_sets_model_and_temperature() {
        let config = OpenAIConfig::new().with_api_key("test-key");
        let _ = OpenAiModel::with_config(config, DEFAULT_MODEL).with_temperature(0.2);
    }

    /// One test covers all `from_env` branches: env mutation is process-wide,
    /// so parallel test functions would race on the same variables.
    #[test]
    fn from_env_requires_api_key() {
        let prev_key = std::env::var("OPENAI_API_KEY").ok();
        let prev_model = std::env::var("SELAH_MODEL").ok();

        std::env::remove_var("OPENAI_API_KEY");
        assert!(OpenAiModel::from_env().is_none());

        std::env::set_var("OPENAI_API_KEY", "  ");
        assert!(OpenAiModel::from_env().is_none());

        std::env::set_var("OPENAI_API_KEY", "test-key");
        std::env::set_var("SELAH_MODEL", "gpt-4o");
        let model = OpenAiModel::from_env().expect("key is set");
        assert_eq!(model.model, "gpt-4o");

        match prev_key {
            Some(v) => std::env::set_var("OPENAI_API_KEY", v),
            None => std::env::remove_var("OPENAI_API_KEY"),
        }
        match prev_model {
            Some(v) => std::env::set_var("SELAH_MODEL", v),
            None => std::env::remove_var("SELAH_MODEL"),
        }
    }

    /// **Scenario**: complete() against an unreachable API base returns an
    /// error (no real API key needed).
    #[tokio::test]
    async fn complete_with_unreachable_base_returns_error() {
        let config = OpenAIConfig::new()
            .with_api_key("test-key")
            .with_api_base("https://127.0.0.1:1");
        let model = OpenAiModel::with_config(config, DEFAULT_MODEL);

        let result = model.complete("시편 23:1").await;

        assert!(result.is_err(), "unreachable base should return Err");
    }

    /// **Scenario**: complete() against the real API returns a JSON document
    /// when OPENAI_API_KEY is set.
    #[tokio::test]
    #[ignore = "Requires OPENAI_API_KEY; run with: cargo test -p selah complete_with_real_api -- --ignored"]
    async fn complete_with_real_api_returns_json() {
        std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set for this test");

        let model = OpenAiModel::from_env().expect("from_env with key set");
        let raw = model.complete("마가복음 10:27").await.expect("completion");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON document");
        assert!(value.get("prayer").is_some());
    }
}
