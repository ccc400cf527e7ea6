//! OpenAiBrain implementation using the chat completions API.

use brain_core::{async_trait, BrainError, ChatMessage, ChatModel, CompletionOptions};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, ResponseFormat,
};
use crate::config::OpenAiBrainConfig;

/// A [`ChatModel`] backed by an OpenAI-compatible chat completions endpoint.
///
/// The brain is stateless: every call sends the full message list it is
/// given. History handling lives with the caller.
pub struct OpenAiBrain {
    client: Client,
    config: OpenAiBrainConfig,
}

impl OpenAiBrain {
    /// Create a new OpenAiBrain with the given configuration.
    pub fn new(config: OpenAiBrainConfig) -> Result<Self, BrainError> {
        if config.api_key.trim().is_empty() {
            return Err(BrainError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(model = %config.model, api_url = %config.api_url, "OpenAiBrain initialized");

        Ok(Self { client, config })
    }

    /// Create an OpenAiBrain from environment variables.
    ///
    /// See [`OpenAiBrainConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, BrainError> {
        let config = OpenAiBrainConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiBrainConfig {
        &self.config
    }

    /// Build the request body for a completion call.
    fn build_request(
        &self,
        messages: Vec<ChatMessage>,
        options: &CompletionOptions,
    ) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: messages.into_iter().map(Into::into).collect(),
            max_tokens: self.config.max_tokens,
            temperature: options.temperature.or(self.config.temperature),
            response_format: options.json_mode.then(ResponseFormat::json_object),
        }
    }

    /// Make a chat completion request.
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, BrainError> {
        let url = self.config.completions_url();

        debug!(model = %request.model, messages = request.messages.len(), "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BrainError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(BrainError::ProcessingFailed(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }

            return Err(BrainError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse response: {}", e)))?;

        debug!(model = %completion.model, "Received chat completion");

        Ok(completion)
    }
}

#[async_trait]
impl ChatModel for OpenAiBrain {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<String, BrainError> {
        let request = self.build_request(messages, &options);
        let completion = self.chat_completion(request).await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(BrainError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "OpenAiBrain"
    }
}
