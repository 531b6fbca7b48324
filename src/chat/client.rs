// HTTP client for the chat completion API
//
// Works against any OpenAI-compatible endpoint: POST with bearer auth, JSON
// body `{model, messages, temperature, max_tokens}`, payload under
// `choices[0].message.content`, optional `error` envelope.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::error::ChatError;
use super::types::{ChatMessage, ModelRole};
use crate::config::constants::{
    BASE_DELAY_MS, CHAT_TEMPERATURE, DEFAULT_MAX_TOKENS, MAX_DELAY_MS, MAX_JITTER_MS, MAX_RETRIES,
    REQUEST_TIMEOUT_SECS,
};
use crate::config::Settings;

/// A single logical chat request to a named role.
///
/// Implemented by `HttpChatClient` for production and by scripted fakes in
/// tests, so the dialogue phases never depend on a live endpoint.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send `messages` to the model configured for `role` and return the
    /// assistant text. Observes `cancel` before the request, after the
    /// response, and across every backoff delay.
    async fn chat(
        &self,
        role: ModelRole,
        messages: &[ChatMessage],
        cancel: &CancellationToken,
    ) -> Result<String, ChatError>;

    /// Number of successful requests since construction or the last reset.
    fn call_count(&self) -> u64;

    /// Reset the call counter for reuse across sessions.
    fn reset_call_count(&self);
}

pub struct HttpChatClient {
    client: Client,
    api_key: String,
    base_url: String,
    drafter_model: String,
    critic_model: String,
    calls: AtomicU64,
}

impl HttpChatClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        drafter_model: impl Into<String>,
        critic_model: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            drafter_model: drafter_model.into(),
            critic_model: critic_model.into(),
            calls: AtomicU64::new(0),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.api_key.clone(),
            settings.base_url.clone(),
            settings.drafter_model.clone(),
            settings.critic_model.clone(),
        )
    }

    fn model_for(&self, role: ModelRole) -> &str {
        match role {
            ModelRole::Drafter => &self.drafter_model,
            ModelRole::Critic => &self.critic_model,
        }
    }

    /// Send a single request attempt (no retry).
    async fn chat_once(&self, model: &str, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let request = CompletionRequest {
            model,
            messages,
            temperature: CHAT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        };
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!(model, messages = messages.len(), "sending chat request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::Malformed(format!("invalid JSON body: {e}")))?;

        // An error envelope is authoritative even on a 200 status.
        if let Some(err) = completion.error {
            return Err(ChatError::Api {
                message: err.message,
                code: err.code,
            });
        }

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ChatError::Malformed("response contained no choices".to_string()))?;

        if content.trim().is_empty() {
            return Err(ChatError::Malformed("empty message content".to_string()));
        }

        tracing::debug!(model, chars = content.len(), "received chat response");
        Ok(content)
    }
}

#[async_trait]
impl ChatService for HttpChatClient {
    async fn chat(
        &self,
        role: ModelRole,
        messages: &[ChatMessage],
        cancel: &CancellationToken,
    ) -> Result<String, ChatError> {
        let model = self.model_for(role).to_string();
        let mut last_error: Option<ChatError> = None;

        for attempt in 0..MAX_RETRIES {
            if cancel.is_cancelled() {
                return Err(ChatError::Cancelled);
            }

            match self.chat_once(&model, messages).await {
                Ok(content) => {
                    self.calls.fetch_add(1, Ordering::Relaxed);
                    if cancel.is_cancelled() {
                        return Err(ChatError::Cancelled);
                    }
                    return Ok(content);
                }
                Err(e) if e.is_retryable() && attempt + 1 < MAX_RETRIES => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        role = role.label(),
                        attempt = attempt + 1,
                        max = MAX_RETRIES,
                        ?delay,
                        "chat request failed, retrying: {e}"
                    );
                    last_error = Some(e);
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(ChatError::Cancelled),
                        _ = sleep(delay) => {}
                    }
                }
                // Retryable failure on the final attempt: fall out of the
                // loop and surface it below.
                Err(e) if e.is_retryable() => {
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| ChatError::Malformed("retry loop exited without error".to_string())))
    }

    fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    fn reset_call_count(&self) {
        self.calls.store(0, Ordering::Relaxed);
    }
}

/// Exponential backoff with uniform jitter, capped at `MAX_DELAY_MS`.
fn backoff_delay(attempt: u32) -> Duration {
    let jitter = rand::thread_rng().gen_range(0..MAX_JITTER_MS);
    let exponential = BASE_DELAY_MS.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(exponential.saturating_add(jitter).min(MAX_DELAY_MS))
}

// Wire types

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    error: Option<ApiErrorEnvelope>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpChatClient::new("test-key", "https://api.openai.com", "gpt-4o", "gpt-4o");
        assert!(client.is_ok());
    }

    #[test]
    fn test_model_resolution_per_role() {
        let client =
            HttpChatClient::new("k", "http://localhost", "drafter-model", "critic-model").unwrap();
        assert_eq!(client.model_for(ModelRole::Drafter), "drafter-model");
        assert_eq!(client.model_for(ModelRole::Critic), "critic-model");
    }

    #[test]
    fn test_backoff_delay_bounds() {
        for attempt in 0..MAX_RETRIES {
            let delay = backoff_delay(attempt).as_millis() as u64;
            let floor = (BASE_DELAY_MS * 2u64.pow(attempt)).min(MAX_DELAY_MS);
            assert!(delay >= floor.min(MAX_DELAY_MS) || delay == MAX_DELAY_MS);
            assert!(delay <= MAX_DELAY_MS);
        }
    }

    #[test]
    fn test_backoff_delay_caps_large_attempts() {
        assert_eq!(backoff_delay(30), Duration::from_millis(MAX_DELAY_MS));
    }

    #[test]
    fn test_request_wire_shape() {
        let messages = vec![ChatMessage::user("hello")];
        let request = CompletionRequest {
            model: "gpt-4o",
            messages: &messages,
            temperature: CHAT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert!(json["max_tokens"].is_u64());
    }

    #[test]
    fn test_response_parses_error_envelope() {
        let body = r#"{"error":{"message":"quota exceeded","code":"insufficient_quota"}}"#;
        let parsed: CompletionResponse = serde_json::from_str(body).unwrap();
        let err = parsed.error.unwrap();
        assert_eq!(err.message, "quota exceeded");
        assert_eq!(err.code.as_deref(), Some("insufficient_quota"));
    }

    #[test]
    fn test_response_parses_choices() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("hi")
        );
    }
}
