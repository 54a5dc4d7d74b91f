/// LLM Client — the single point of entry for all OpenRouter calls.
///
/// ARCHITECTURAL RULE: No other module may call the chat-completion API
/// directly. All model interactions MUST go through this module.
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Primary model for question generation.
pub const GENERATION_MODEL: &str = "qwen/qwen3-coder:free";
/// Secondary model, tried when the primary fails to return usable JSON.
pub const GENERATION_FALLBACK_MODEL: &str = "mistralai/mistral-7b-instruct:free";
/// Model used for grading submissions. Grading gets exactly one attempt —
/// a failed call is surfaced as a terminal status, never retried.
pub const GRADING_MODEL: &str = "mistralai/mistral-7b-instruct:free";

/// Per-request timeout. Grading is bounded by this; a slower reply counts
/// as a transport failure.
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum LlmError {
    /// Connection, DNS, or timeout failure before a status line arrived.
    /// Carried as a string so orchestration failure paths are testable
    /// without a live socket.
    #[error("HTTP Error: {0}")]
    Transport(String),

    #[error("API Error: {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Transport(e.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Knobs that vary per call site: generation wants defaults, grading wants
/// a low temperature and a bounded completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// The single LLM client used by all services.
/// Wraps the OpenRouter chat-completions API. No retry logic: callers that
/// want a fallback (generation) run their own second attempt against a
/// different model.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes one chat-completion call and returns the reply text.
    pub async fn complete(
        &self,
        model: &str,
        system: Option<&str>,
        prompt: &str,
        options: CallOptions,
    ) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let request_body = ChatRequest {
            model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Surface the provider's own message when the body has the
            // { "error": { "message" } } shape, else the raw body.
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyContent)?;

        debug!("LLM call succeeded: model={model}, reply_len={}", content.len());

        Ok(content)
    }

    /// Convenience method that calls the model and deserializes the reply as
    /// JSON. The prompt must instruct the model to return valid JSON.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        model: &str,
        system: Option<&str>,
        prompt: &str,
        options: CallOptions,
    ) -> Result<T, LlmError> {
        let text = self.complete(model, system, prompt, options).await?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n[{\"question\": \"q\"}]\n```";
        assert_eq!(strip_json_fences(input), "[{\"question\": \"q\"}]");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n[{\"question\": \"q\"}]\n```";
        assert_eq!(strip_json_fences(input), "[{\"question\": \"q\"}]");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "[{\"question\": \"q\"}]";
        assert_eq!(strip_json_fences(input), "[{\"question\": \"q\"}]");
    }

    #[test]
    fn test_transport_error_carries_description() {
        let err = LlmError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "HTTP Error: connection refused");
    }

    #[test]
    fn test_api_error_carries_provider_message() {
        let err = LlmError::Api {
            status: 402,
            message: "Insufficient credits".to_string(),
        };
        assert_eq!(err.to_string(), "API Error: Insufficient credits");
    }
}
