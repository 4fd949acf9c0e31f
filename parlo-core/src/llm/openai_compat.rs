//! OpenAI-compatible provider for OpenAI, Groq, Together and similar services
//!
//! Any service exposing the /chat/completions surface with json_schema
//! response formats works through this backend.

use super::errors::ProviderError;
use super::{GenerationProvider, GenerationRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Configuration for OpenAI-compatible providers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiCompatConfig {
    /// Label used in logs and error messages ("openai", "groq", ...).
    pub provider: String,
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub auth_header: String,
    pub auth_prefix: String,
}

impl Default for OpenAiCompatConfig {
    fn default() -> Self {
        Self::openai("gpt-4o-mini")
    }
}

impl OpenAiCompatConfig {
    /// Create config for the OpenAI API
    pub fn openai(model: &str) -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: model.to_string(),
            max_tokens: 8192,
            temperature: 0.7,
            timeout_secs: 120,
            auth_header: "Authorization".to_string(),
            auth_prefix: "Bearer".to_string(),
        }
    }

    /// Create config for Groq
    pub fn groq(model: &str) -> Self {
        Self {
            provider: "groq".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            model: model.to_string(),
            max_tokens: 8192,
            temperature: 0.7,
            timeout_secs: 60,
            auth_header: "Authorization".to_string(),
            auth_prefix: "Bearer".to_string(),
        }
    }
}

/// Provider that speaks the OpenAI chat-completions protocol.
pub struct OpenAiCompatProvider {
    client: Client,
    config: OpenAiCompatConfig,
}

impl OpenAiCompatProvider {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ProviderError::configuration(err.to_string()))?;

        Ok(Self { client, config })
    }

    fn api_key(&self) -> Result<String, ProviderError> {
        std::env::var(&self.config.api_key_env).map_err(|_| {
            ProviderError::configuration(format!(
                "{} API key not found in environment variable {}",
                self.config.provider, self.config.api_key_env
            ))
        })
    }

    fn build_body(&self, request: &GenerationRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage { role: "system", content: request.system_prompt.clone() },
                ChatMessage { role: "user", content: request.user_prompt.clone() },
            ],
            temperature: request.options.temperature.unwrap_or(self.config.temperature),
            max_tokens: request.options.max_tokens.unwrap_or(self.config.max_tokens),
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: request.schema.name.clone(),
                    description: request.schema.description.clone(),
                    strict: true,
                    schema: request.schema.schema.clone(),
                },
            },
        }
    }

    async fn chat_completion(&self, body: &ChatCompletionRequest) -> Result<String, ProviderError> {
        let api_key = self.api_key()?;

        let mut req = self.client.post(format!("{}/chat/completions", self.config.base_url));
        if self.config.auth_prefix.is_empty() {
            req = req.header(&self.config.auth_header, api_key);
        } else {
            req = req
                .header(&self.config.auth_header, format!("{} {}", self.config.auth_prefix, api_key));
        }

        let response = req.json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::api(status.as_u16(), error_text));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::malformed(err.to_string()))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ProviderError::empty(&self.config.provider))
    }
}

#[async_trait]
impl GenerationProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.config.provider
    }

    async fn is_available(&self) -> bool {
        std::env::var(&self.config.api_key_env).is_ok()
    }

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<serde_json::Value, ProviderError> {
        debug!(
            provider = %self.config.provider,
            model = %self.config.model,
            schema = %request.schema.name,
            "sending structured generation request"
        );

        let body = self.build_body(&request);
        let content = self.chat_completion(&body).await?;

        serde_json::from_str(&content).map_err(|err| ProviderError::malformed(err.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: usize,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    description: String,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::OutputSchema;
    use serde_json::json;

    fn sample_request() -> GenerationRequest {
        GenerationRequest::new(
            "You are a test",
            "Do the thing",
            OutputSchema::new(
                "test_schema",
                "Shape for a test",
                json!({"type": "object", "properties": {"value": {"type": "integer"}}}),
            ),
        )
    }

    #[test]
    fn test_body_carries_schema_as_response_format() {
        let provider = OpenAiCompatProvider::new(OpenAiCompatConfig::openai("gpt-4o-mini")).unwrap();
        let body = provider.build_body(&sample_request());
        let wire = serde_json::to_value(&body).unwrap();

        assert_eq!(wire["response_format"]["type"], "json_schema");
        assert_eq!(wire["response_format"]["json_schema"]["name"], "test_schema");
        assert_eq!(wire["response_format"]["json_schema"]["strict"], true);
        assert_eq!(wire["messages"][0]["role"], "system");
        assert_eq!(wire["messages"][1]["role"], "user");
    }

    #[test]
    fn test_request_options_override_config_defaults() {
        let provider = OpenAiCompatProvider::new(OpenAiCompatConfig::openai("gpt-4o-mini")).unwrap();
        let mut request = sample_request();
        request.options.temperature = Some(0.1);
        request.options.max_tokens = Some(256);

        let body = provider.build_body(&request);
        assert_eq!(body.temperature, 0.1);
        assert_eq!(body.max_tokens, 256);
    }

    #[test]
    fn test_groq_config_points_at_groq() {
        let config = OpenAiCompatConfig::groq("llama-3.1-70b-versatile");
        assert_eq!(config.provider, "groq");
        assert!(config.base_url.contains("groq.com"));
        assert_eq!(config.api_key_env, "GROQ_API_KEY");
    }
}
