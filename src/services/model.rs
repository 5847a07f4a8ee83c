use async_trait::async_trait;
use tracing::{debug, warn};

use super::openai_client::{ChatCompletionRequest, OpenAIClient};
use crate::error::{PlannerError, Result};

/// Text-in, text-out language model capability.
///
/// The returned text is whatever the model produced; callers must not assume it is valid JSON.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// [`LanguageModel`] backed by an OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiChatModel {
    client: OpenAIClient,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAiChatModel {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: Some(0.2),
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest::from_prompt(self.model.clone(), prompt)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        debug!(target: "tripagent::llm", model = %self.model, prompt_len = prompt.len());
        let response = self.client.chat_completion(request).await?;

        let first_choice = response
            .get("choices")
            .and_then(|value| value.as_array())
            .and_then(|choices| choices.first())
            .ok_or_else(|| PlannerError::Api {
                status: 200,
                message: "Completion response contained no choices".to_string(),
            })?;

        match first_choice
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
        {
            Some(content) => Ok(content.to_string()),
            None => {
                warn!(target: "tripagent::llm", "completion carried no text content");
                Ok(String::new())
            }
        }
    }
}
