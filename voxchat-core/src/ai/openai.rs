use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::ai::{error::AiError, provider::ChatProvider, types::*};

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub request_timeout: Duration,
}

/// Chat completion client for any OpenAI-compatible `/chat/completions`
/// endpoint (DeepSeek by default).
#[derive(Clone)]
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AiError::Transport(anyhow::anyhow!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl ChatProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, AiError> {
        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            stream: false,
        };

        debug!(model = %self.config.model, messages = messages.len(), "Sending chat completion");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                debug!(?e, "Chat API call failed");
                AiError::Transport(anyhow::anyhow!("Network error: {}", e))
            })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| AiError::Transport(anyhow::anyhow!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            debug!(?status, ?response_text, "Chat API returned error");
            return Err(AiError::Status {
                status: status.as_u16(),
                body: response_text,
            });
        }

        debug!(response_text = %response_text, "Chat API response");
        parse_completion(&response_text)
    }
}

fn parse_completion(body: &str) -> Result<ChatCompletion, AiError> {
    let response: CompletionResponse = serde_json::from_str(body)?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| {
            AiError::MalformedResponse("No choices[0].message.content in response".to_string())
        })?;

    Ok(ChatCompletion { content })
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
