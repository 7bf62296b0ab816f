//! Anthropic messages API client

use crate::config::GenerationConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Thin client for the messages endpoint
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    base_url: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

impl AnthropicClient {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// Send a single user prompt and return the first text block of the reply
    pub async fn complete(&self, api_key: &str, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [
                {
                    "role": "user",
                    "content": prompt,
                }
            ],
        });

        debug!("Calling {} with model {}", self.base_url, self.model);

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("Content-Type", "application/json")
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let parsed: MessagesResponse = response.json().await?;

        parsed
            .content
            .into_iter()
            .find(|c| c.content_type == "text")
            .and_then(|c| c.text)
            .ok_or_else(|| Error::Generation("Response contained no text block".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> AnthropicClient {
        let config = GenerationConfig {
            api_base_url: base_url.to_string(),
            ..Default::default()
        };
        AnthropicClient::new(&config)
    }

    #[tokio::test]
    async fn test_complete_extracts_text_block() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-test"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [
                    {"type": "text", "text": "{\"summary\": \"ok\"}"}
                ],
                "stop_reason": "end_turn"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let text = client.complete("sk-test", "Summarize this").await.unwrap();
        assert_eq!(text, "{\"summary\": \"ok\"}");
    }

    #[tokio::test]
    async fn test_complete_surfaces_api_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string("{\"error\": {\"message\": \"bad request\"}}"),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete("sk-test", "Summarize this").await;
        assert!(matches!(result, Err(Error::Generation(_))));
    }

    #[tokio::test]
    async fn test_complete_rejects_missing_text_block() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": []
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete("sk-test", "Summarize this").await;
        assert!(matches!(result, Err(Error::Generation(_))));
    }
}
