//! Bedrock runtime client
//!
//! Calls `InvokeModel` for Anthropic models with a Bedrock API key sent as a
//! bearer token. One request per call, no retries.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use super::ModelProvider;
use crate::config::BedrockConfig;
use crate::error::{AppError, AppResult};

/// Bedrock runtime client
#[derive(Clone)]
pub struct BedrockClient {
    client: Client,
    base_url: String,
    model_id: String,
    api_key: String,
    anthropic_version: String,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    anthropic_version: &'a str,
    max_tokens: u32,
    temperature: f64,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    completion: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

impl BedrockClient {
    pub fn new(client: Client, config: &BedrockConfig) -> Self {
        Self {
            client,
            base_url: config.base_url(),
            model_id: config.model_id.clone(),
            api_key: config.api_key.clone(),
            anthropic_version: config.anthropic_version.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// `<base>/model/<model-id>/invoke`, with the model id as one path segment
    fn invoke_url(&self) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::Configuration(format!("Invalid Bedrock endpoint: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Configuration("Bedrock endpoint cannot be a base".into()))?
            .pop_if_empty()
            .extend(["model", self.model_id.as_str(), "invoke"]);
        Ok(url)
    }
}

/// Reply text from an InvokeModel body: `content[0].text`, else `completion`
fn extract_text(body: InvokeResponse) -> AppResult<String> {
    if let Some(text) = body.content.into_iter().next().and_then(|block| block.text) {
        return Ok(text);
    }
    body.completion.ok_or(AppError::UnexpectedModelResponse)
}

fn is_access_denied(status: reqwest::StatusCode, error_type: Option<&str>) -> bool {
    status == reqwest::StatusCode::FORBIDDEN
        || error_type.is_some_and(|t| t.starts_with("AccessDeniedException"))
}

#[async_trait]
impl ModelProvider for BedrockClient {
    async fn invoke(&self, system_prompt: &str, user_message: &str) -> AppResult<String> {
        let payload = InvokeRequest {
            anthropic_version: &self.anthropic_version,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: system_prompt,
            messages: [Message {
                role: "user",
                content: user_message,
            }],
        };

        let response = self
            .client
            .post(self.invoke_url()?)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::ModelTransport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_type = response
                .headers()
                .get("x-amzn-ErrorType")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Bedrock API error: {} {}", status, body);

            if is_access_denied(status, error_type.as_deref()) {
                return Err(AppError::ModelAccessDenied(body));
            }
            return Err(AppError::ModelInvocation {
                status: status.as_u16(),
                body,
            });
        }

        let body: InvokeResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Bedrock response: {}", e);
            AppError::UnexpectedModelResponse
        })?;

        extract_text(body)
    }
}
