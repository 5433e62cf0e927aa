//! Chat-completions engine for OpenAI-protocol providers.
//!
//! OpenAI and Mistral both speak the same `/chat/completions` protocol, so
//! one engine covers both; a [`ProviderProfile`] supplies the base URL and
//! the credential/model resolution chain. The API key lives in a
//! [`SecretString`] and is only exposed when building the auth header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use warelay_types::error::EngineError;
use warelay_types::webhook::InboundMessage;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful WhatsApp assistant. Answer briefly.";
const DEFAULT_TEMPERATURE: f64 = 0.2;
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_MAX_RETRIES: u64 = 2;

/// Provider-specific endpoint and defaults for the shared protocol.
pub(crate) struct ProviderProfile {
    pub name: &'static str,
    pub base_url: &'static str,
    /// Name used in the missing-credential error (matches the env var).
    pub credential_name: &'static str,
    pub default_api_key: Option<String>,
    pub default_model: Option<String>,
    pub fallback_model: &'static str,
}

/// One tenant's LLM reply engine, built per event.
#[derive(Debug)]
pub struct ChatCompletionsEngine {
    client: reqwest::Client,
    provider: &'static str,
    base_url: String,
    api_key: SecretString,
    model: String,
    system_prompt: String,
    temperature: f64,
    max_retries: u64,
}

impl ChatCompletionsEngine {
    pub(crate) fn new(
        profile: ProviderProfile,
        config: &Map<String, Value>,
    ) -> Result<Self, EngineError> {
        let api_key = config
            .get("api_key")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or(profile.default_api_key)
            .ok_or(EngineError::MissingCredential(profile.credential_name))?;

        let model = config
            .get("model")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or(profile.default_model)
            .unwrap_or_else(|| profile.fallback_model.to_string());

        let system_prompt = config
            .get("system_prompt")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
            .to_string();

        let temperature = config
            .get("temperature")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_TEMPERATURE);

        let timeout = config
            .get("timeout")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let max_retries = config
            .get("max_retries")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_MAX_RETRIES);

        let base_url = config
            .get("base_url")
            .and_then(Value::as_str)
            .unwrap_or(profile.base_url)
            .trim_end_matches('/')
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| EngineError::Provider(e.to_string()))?;

        Ok(Self {
            client,
            provider: profile.name,
            base_url,
            api_key: SecretString::from(api_key),
            model,
            system_prompt,
            temperature,
            max_retries,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Reply to a text message; non-text messages yield `None`.
    ///
    /// Transport failures are retried up to `max_retries` times; a
    /// malformed provider response is not retried.
    pub async fn reply(&self, message: &InboundMessage) -> Result<Option<String>, EngineError> {
        let Some(text) = message.text_body() else {
            return Ok(None);
        };

        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                {"role": "system", "content": self.system_prompt},
                {"role": "user", "content": text},
            ],
        });

        let mut last_err = None;
        for attempt in 0..=self.max_retries {
            match self.request(&body).await {
                Ok(reply) => return Ok(reply),
                Err(err @ EngineError::Provider(_)) => {
                    tracing::warn!(
                        provider = self.provider,
                        attempt,
                        error = %err,
                        "chat completion attempt failed"
                    );
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err
            .unwrap_or_else(|| EngineError::Provider("retries exhausted".to_string())))
    }

    async fn request(&self, body: &Value) -> Result<Option<String>, EngineError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| EngineError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EngineError::Provider(format!(
                "{} returned {status}: {detail}",
                self.provider
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| EngineError::MalformedResponse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        let trimmed = content.trim();
        Ok(if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
