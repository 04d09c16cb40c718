/// LLM Client — the only place the Anthropic Messages API is called from.
///
/// Used by the LLM-backed scoring oracle. Transient failures (429, 5xx,
/// transport errors) are retried here with exponential backoff; everything
/// above this module sees a single success or a single `LlmError`.
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Hardcoded so every grading call uses the same model.
pub const MODEL: &str = "claude-sonnet-4-5";
/// Grades are a single small JSON object.
const MAX_TOKENS: u32 = 256;
const MAX_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Gave up after {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl MessagesResponse {
    fn first_text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

/// What one HTTP round trip produced.
enum Attempt {
    Done(MessagesResponse),
    Retry(LlmError),
    Fail(LlmError),
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, api_key })
    }

    /// Sends one user prompt and deserializes the reply text as JSON.
    /// The prompt must ask for JSON only.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system).await?;
        let text = response.first_text().ok_or(LlmError::EmptyContent)?;
        Ok(serde_json::from_str(strip_json_fences(text))?)
    }

    async fn call(&self, prompt: &str, system: &str) -> Result<MessagesResponse, LlmError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error = None;
        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                warn!(attempt, delay_ms = delay.as_millis() as u64, "retrying LLM call");
                tokio::time::sleep(delay).await;
            }

            match self.send(&body).await {
                Attempt::Done(response) => {
                    debug!(
                        input_tokens = response.usage.input_tokens,
                        output_tokens = response.usage.output_tokens,
                        "LLM call succeeded"
                    );
                    return Ok(response);
                }
                Attempt::Retry(e) => last_error = Some(e),
                Attempt::Fail(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(LlmError::Exhausted {
            attempts: MAX_ATTEMPTS,
        }))
    }

    async fn send(&self, body: &MessagesRequest<'_>) -> Attempt {
        let response = match self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return Attempt::Retry(LlmError::Http(e)),
        };

        let status = response.status();
        if status.is_success() {
            return match response.json::<MessagesResponse>().await {
                Ok(parsed) => Attempt::Done(parsed),
                Err(e) => Attempt::Fail(LlmError::Http(e)),
            };
        }

        let body = response.text().await.unwrap_or_default();
        let error = LlmError::Api {
            status: status.as_u16(),
            message: serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body),
        };
        if status.as_u16() == 429 || status.is_server_error() {
            warn!(status = status.as_u16(), "LLM API returned a retryable status");
            Attempt::Retry(error)
        } else {
            Attempt::Fail(error)
        }
    }
}

/// 1s, 2s, 4s, ...
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(1000 << attempt.saturating_sub(1).min(6))
}

/// Strips ```json ... ``` or ``` ... ``` fences the model sometimes adds.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let rest = rest.trim_start();
    rest.strip_suffix("```").map(str::trim).unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        assert_eq!(strip_json_fences("```json\n{\"score\": 70}\n```"), "{\"score\": 70}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        assert_eq!(strip_json_fences("```\n{\"score\": 70}\n```"), "{\"score\": 70}");
    }

    #[test]
    fn test_strip_json_fences_passthrough() {
        assert_eq!(strip_json_fences("  {\"score\": 70} "), "{\"score\": 70}");
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
    }

    #[test]
    fn test_first_text_skips_non_text_blocks() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{
                "content": [
                    {"type": "tool_use"},
                    {"type": "text", "text": "{\"score\": 55}"}
                ],
                "usage": {"input_tokens": 10, "output_tokens": 4}
            }"#,
        )
        .unwrap();
        assert_eq!(response.first_text(), Some("{\"score\": 55}"));
    }
}
