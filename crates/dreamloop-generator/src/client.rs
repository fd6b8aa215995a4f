//! HTTP client for the OpenRouter chat-completions API.
//!
//! OpenRouter speaks the OpenAI wire format, so the same client works against
//! any compatible endpoint by swapping the base URL.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;
use crate::parse::{decode_generation, GeneratedContent};
use crate::prompt::{system_prompt, user_prompt, GenerationInput, GENERATION_TEMPERATURE};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

// Attribution headers OpenRouter uses for rate limiting and app rankings.
const REFERER: &str = "https://dreamloop.local";
const APP_TITLE: &str = "DreamLoop";

/// Longest slice of an error body kept in [`GeneratorError::UnexpectedStatus`].
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for OpenRouter chat completions.
///
/// Use [`OpenRouterClient::new`] for production or
/// [`OpenRouterClient::with_base_url`] to point at a mock server in tests.
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
    completions_url: String,
}

impl OpenRouterClient {
    /// Creates a client pointed at the production OpenRouter API.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, GeneratorError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GeneratorError::InvalidBaseUrl`] if `base_url` is not
    /// an absolute http(s) URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeneratorError> {
        let parsed = reqwest::Url::parse(base_url).map_err(|e| GeneratorError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GeneratorError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            completions_url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    /// Model identifier sent with every request and stored on each record.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate today's two lines for one user.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError`] only when the API call itself fails. A reply
    /// the model botched still decodes, possibly to empty `lines`.
    pub async fn generate_two_lines(
        &self,
        input: &GenerationInput,
    ) -> Result<GeneratedContent, GeneratorError> {
        let system = system_prompt();
        let user = user_prompt(input);
        let reply = self.complete(&system, &user).await?;
        Ok(decode_generation(&reply))
    }

    /// Sends one chat completion and returns the first choice's text.
    ///
    /// A reply without content is returned as `"{}"`.
    async fn complete(&self, system: &str, user: &str) -> Result<String, GeneratorError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: GENERATION_TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GeneratorError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let envelope: ChatResponse =
            serde_json::from_str(&body).map_err(|e| GeneratorError::Deserialize {
                context: format!("chat completion ({})", self.model),
                source: e,
            })?;

        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty());

        if content.is_none() {
            tracing::warn!(model = %self.model, "chat completion returned no content");
        }

        Ok(content.unwrap_or_else(|| "{}".to_string()))
    }
}
