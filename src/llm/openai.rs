//! Blocking client for OpenAI-compatible chat completions.
//!
//! One `ureq::Agent` is shared by all worker threads; it pools connections
//! and is safe for concurrent use.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use super::error::{LlmError, LlmResult};
use super::{CompletionBackend, CompletionRequest};

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable overriding the configured base URL.
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Connection settings for the completion service.
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    /// Read credentials from the environment.
    ///
    /// `OPENAI_API_KEY` is required; `OPENAI_BASE_URL`, when set and not
    /// blank, replaces `base_url`.
    pub fn from_env(base_url: &str, timeout_secs: u64) -> LlmResult<Self> {
        Self::resolve(
            std::env::var(API_KEY_VAR).ok(),
            std::env::var(BASE_URL_VAR).ok(),
            base_url,
            timeout_secs,
        )
    }

    fn resolve(
        api_key: Option<String>,
        base_url_override: Option<String>,
        base_url: &str,
        timeout_secs: u64,
    ) -> LlmResult<Self> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingCredentials {
                var: API_KEY_VAR.into(),
            })?;
        let base_url = base_url_override
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| base_url.to_string());

        Ok(Self {
            base_url,
            api_key,
            timeout_secs,
        })
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Chat-completions client.
pub struct OpenAiClient {
    config: OpenAiConfig,
    agent: ureq::Agent,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self { config, agent }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

impl CompletionBackend for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> LlmResult<String> {
        let result = self
            .agent
            .post(&self.endpoint())
            .set("Authorization", &format!("Bearer {}", self.config.api_key))
            .set("Content-Type", "application/json")
            .send_json(request_body(request));

        match result {
            Ok(resp) => {
                let body = resp.into_string().map_err(|e| LlmError::ParseError {
                    message: e.to_string(),
                })?;
                parse_completion(&body)
            }
            Err(ureq::Error::Status(status, resp)) => {
                let retry_after_ms = resp.header("retry-after-ms").map(str::to_string);
                let retry_after = resp.header("retry-after").map(str::to_string);
                let body = resp.into_string().unwrap_or_default();
                Err(classify_status(
                    status,
                    retry_after_ms.as_deref(),
                    retry_after.as_deref(),
                    &body,
                ))
            }
            Err(ureq::Error::Transport(t)) => Err(LlmError::Transport {
                message: t.to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.config.base_url)
            .field("timeout_secs", &self.config.timeout_secs)
            .finish()
    }
}

/// JSON body for a chat-completions call.
fn request_body(request: &CompletionRequest) -> serde_json::Value {
    let mut body = serde_json::json!({
        "model": request.model,
        "messages": request.messages,
        "temperature": request.temperature,
    });
    if let Some(max_tokens) = request.max_tokens {
        body["max_tokens"] = serde_json::Value::from(max_tokens);
    }
    body
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

fn parse_completion(body: &str) -> LlmResult<String> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::ParseError {
            message: e.to_string(),
        })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(LlmError::EmptyCompletion)
}

/// Map a non-2xx response onto the error taxonomy.
fn classify_status(
    status: u16,
    retry_after_ms: Option<&str>,
    retry_after: Option<&str>,
    body: &str,
) -> LlmError {
    let message = error_message(body);
    match status {
        429 => LlmError::RateLimited {
            retry_after: parse_retry_after(retry_after_ms, retry_after, &message),
            message,
        },
        401 | 403 => LlmError::Auth { status, message },
        _ => LlmError::Api { status, message },
    }
}

/// `error.message` from an OpenAI error body, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Extract the server's retry directive.
///
/// Precedence: `retry-after-ms` header, `retry-after` header (seconds),
/// then a "try again in 20ms" / "try again in 1.5s" phrase in the message.
fn parse_retry_after(
    retry_after_ms: Option<&str>,
    retry_after: Option<&str>,
    message: &str,
) -> Option<Duration> {
    if let Some(ms) = retry_after_ms.and_then(parse_non_negative) {
        return Some(millis(ms));
    }
    if let Some(secs) = retry_after.and_then(parse_non_negative) {
        return Some(millis(secs * 1000.0));
    }

    static TRY_AGAIN: OnceLock<Regex> = OnceLock::new();
    let re = TRY_AGAIN.get_or_init(|| {
        Regex::new(r"(?i)try again in (\d+(?:\.\d+)?)\s*(ms|s)\b").expect("static regex")
    });
    let caps = re.captures(message)?;
    let value = parse_non_negative(caps.get(1)?.as_str())?;
    let ms = if caps.get(2)?.as_str().eq_ignore_ascii_case("ms") {
        value
    } else {
        value * 1000.0
    };
    Some(millis(ms))
}

/// Fractional milliseconds, rounded to the microsecond.
fn millis(ms: f64) -> Duration {
    Duration::from_micros((ms * 1000.0).round() as u64)
}

fn parse_non_negative(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}
