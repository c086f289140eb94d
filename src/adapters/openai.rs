use crate::config::AdvisorConfig;
use crate::domain::ports::{ChatCompletion, ChatRequest};
use crate::utils::error::{AdvisorError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

const SERVICE: &str = "OpenAI";

/// Chat-completions client that always asks for a JSON object.
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &AdvisorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn classify_failure(status: StatusCode, body: String) -> AdvisorError {
        let parsed = serde_json::from_str::<ErrorEnvelope>(&body).ok().map(|e| e.error);
        let message = parsed
            .as_ref()
            .map(|e| e.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.clone());
        let quota = parsed
            .as_ref()
            .map(|e| {
                e.code.as_deref() == Some("insufficient_quota")
                    || e.kind.as_deref() == Some("insufficient_quota")
            })
            .unwrap_or(false);

        match status {
            StatusCode::TOO_MANY_REQUESTS if quota => AdvisorError::QuotaExceeded {
                service: SERVICE.to_string(),
                message,
            },
            StatusCode::TOO_MANY_REQUESTS => AdvisorError::RateLimited {
                service: SERVICE.to_string(),
                message,
            },
            StatusCode::UNAUTHORIZED => AdvisorError::Unauthorized {
                service: SERVICE.to_string(),
            },
            _ => AdvisorError::HttpStatus {
                service: SERVICE.to_string(),
                status: status.as_u16(),
                body,
            },
        }
    }
}

#[async_trait]
impl ChatCompletion for OpenAiClient {
    async fn complete_json(&self, request: &ChatRequest) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| AdvisorError::MissingCredential {
                service: SERVICE.to_string(),
            })?;

        let body = serde_json::json!({
            "model": self.model,
            "temperature": request.temperature,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user},
            ],
        });

        tracing::debug!("Requesting chat completion from {} ({})", self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| AdvisorError::Network {
                service: SERVICE.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        tracing::debug!("Chat completion response status: {}", status);

        let text = response.text().await.map_err(|e| AdvisorError::Network {
            service: SERVICE.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(Self::classify_failure(status, text));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| AdvisorError::MalformedResponse {
                service: SERVICE.to_string(),
                message: e.to_string(),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AdvisorError::MalformedResponse {
                service: SERVICE.to_string(),
                message: "response carried no message content".to_string(),
            })
    }
}
