use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::error::{PlannerError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Minimal client for OpenAI-compatible chat and embedding endpoints.
///
/// Each call is a single request; failures are reported, never retried.
#[derive(Clone, Debug)]
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PlannerError::Http(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn chat_completion(&self, request: ChatCompletionRequest) -> Result<Value> {
        self.post_json("chat/completions", &request.into_value())
            .await
    }

    pub async fn embeddings(&self, model: &str, inputs: &[String]) -> Result<Value> {
        let body = json!({
            "model": model,
            "input": inputs,
        });
        self.post_json("embeddings", &body).await
    }

    async fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value> {
        let request_url = build_url(&self.base_url, endpoint);

        let response = self
            .http
            .post(&request_url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .header("X-Title", "trip-agent-rs")
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let response_text = response.text().await.map_err(map_transport_error)?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = headers
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

            return Err(PlannerError::RateLimit {
                retry_after: retry_after.max(1),
            });
        }

        let response_json: Option<Value> = serde_json::from_str(&response_text).ok();

        if !status.is_success() {
            let api_message = response_json
                .as_ref()
                .and_then(|json| json.get("error"))
                .and_then(|error| error.get("message"))
                .and_then(|value| value.as_str())
                .map(|s| s.to_string())
                .unwrap_or(response_text);

            return Err(PlannerError::Api {
                status: status.as_u16(),
                message: api_message,
            });
        }

        let response_json = response_json.ok_or_else(|| PlannerError::Api {
            status: status.as_u16(),
            message: "response body is not JSON".to_string(),
        })?;

        if let Some(error) = response_json.get("error").filter(|error| !error.is_null()) {
            let error_message = error
                .get("message")
                .and_then(|value| value.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| error.to_string());
            return Err(PlannerError::Api {
                status: status.as_u16(),
                message: error_message,
            });
        }

        Ok(response_json)
    }
}

fn map_transport_error(err: reqwest::Error) -> PlannerError {
    if err.is_timeout() {
        PlannerError::Timeout(format!("request timed out: {err}"))
    } else {
        PlannerError::Http(format!("HTTP request failed: {err}"))
    }
}

fn build_url(base_url: &str, endpoint: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with(endpoint) {
        trimmed.to_string()
    } else {
        format!("{}/{}", trimmed, endpoint)
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    /// A single user message carrying the whole prompt.
    pub fn from_prompt(model: impl Into<String>, prompt: &str) -> Self {
        Self::new(
            model,
            vec![json!({
                "role": "user",
                "content": prompt
            })],
        )
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }
}
