use crate::core::prompt::PromptBuilder;
use crate::core::{ConfigProvider, Story, StoryGenerator, StoryRequest};
use crate::utils::error::{Result, StoryError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// OpenAI 相容的 chat completions 客戶端
pub struct OpenAiGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_tokens: u32,
    temperature: f32,
    prompt: PromptBuilder,
}

impl OpenAiGenerator {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint().to_string(),
            model: config.model().to_string(),
            api_key: config.api_key().map(str::to_string),
            max_tokens: config.max_tokens(),
            temperature: config.temperature(),
            prompt: PromptBuilder::new(config.system_prompt(), config.story_template()),
        })
    }
}

#[async_trait]
impl StoryGenerator for OpenAiGenerator {
    async fn generate(&self, request: &StoryRequest) -> Result<Story> {
        let prompt = self.prompt.build(request);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::debug!("Making API request to: {} (model {})", self.endpoint, self.model);

        let mut http_request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoryError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&raw)?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                "Tokens - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(StoryError::EmptyResponse)?;

        Ok(Story::new(
            text,
            completion.model.unwrap_or_else(|| self.model.clone()),
        ))
    }
}
