use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{Advisor, ChatMessage, build_messages};
use crate::config::AdvisorConfig;
use crate::error::AdvisorError;
use crate::models::expense::ExpenseRecord;

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiAdvisor {
    client: reqwest::Client,
    completions_url: String,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiAdvisor {
    pub fn new(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AdvisorError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            completions_url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout: config.timeout,
        })
    }

    fn map_transport(&self, err: reqwest::Error) -> AdvisorError {
        if err.is_timeout() {
            AdvisorError::Timeout(self.timeout)
        } else {
            AdvisorError::Transport(err.to_string())
        }
    }
}

/// First choice's message content.
pub fn parse_completion(body: &str) -> Result<String, AdvisorError> {
    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| AdvisorError::Decode(e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(AdvisorError::EmptyResponse)
}

/// Non-2xx statuses become [`AdvisorError::Api`] carrying the raw body.
pub fn completion_from_response(status: StatusCode, body: String) -> Result<String, AdvisorError> {
    if !status.is_success() {
        warn!(status = status.as_u16(), "AI provider returned an error");
        return Err(AdvisorError::Api {
            status: status.as_u16(),
            body,
        });
    }
    parse_completion(&body)
}

#[async_trait]
impl Advisor for OpenAiAdvisor {
    async fn suggest(&self, records: &[ExpenseRecord]) -> Result<String, AdvisorError> {
        let api_key = self.api_key.as_deref().ok_or(AdvisorError::MissingApiKey)?;
        let messages = build_messages(records)?;
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: &messages,
        };

        info!(model = %self.model, records = records.len(), "requesting AI suggestions");
        let response = self
            .client
            .post(self.completions_url.as_str())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_transport(e))?;
        completion_from_response(status, body)
    }
}
