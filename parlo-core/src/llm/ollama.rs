//! Ollama provider for local model execution
//!
//! Runs against a local or remote Ollama instance. Ollama's JSON mode only
//! guarantees syntactically valid JSON, so the requested schema is embedded
//! in the system prompt and the response is validated on the way out.

use super::errors::ProviderError;
use super::{GenerationProvider, GenerationRequest, OutputSchema};
use async_trait::async_trait;
use ollama_rs::Ollama;
use ollama_rs::generation::chat::{ChatMessage, request::ChatMessageRequest};
use ollama_rs::generation::parameters::FormatType;
use ollama_rs::models::ModelOptions;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for the Ollama backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: usize,
    pub use_https: bool,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 11434,
            model: "llama3.1:8b".to_string(),
            temperature: 0.7,
            max_tokens: 8192,
            use_https: false,
        }
    }
}

/// Ollama provider implementation
pub struct OllamaProvider {
    client: Ollama,
    config: OllamaConfig,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance (doesn't connect yet)
    pub fn new(config: OllamaConfig) -> Self {
        let protocol = if config.use_https { "https" } else { "http" };
        let url = format!("{}://{}", protocol, config.host);
        let client = Ollama::new(url, config.port);

        Self { client, config }
    }

    /// Auto-detect a local Ollama installation
    pub async fn detect_local() -> Option<Self> {
        let provider = Self::new(OllamaConfig::default());
        if provider.client.list_local_models().await.is_ok() { Some(provider) } else { None }
    }

    fn convert_options(&self, request: &GenerationRequest) -> ModelOptions {
        let temperature = request.options.temperature.unwrap_or(self.config.temperature);
        let max_tokens = request.options.max_tokens.unwrap_or(self.config.max_tokens);
        let num_predict =
            if max_tokens > i32::MAX as usize { i32::MAX } else { max_tokens as i32 };

        ModelOptions::default().temperature(temperature).num_predict(num_predict)
    }

    /// Fold the schema into the system prompt; JSON mode alone does not
    /// constrain the shape.
    fn schema_clause(schema: &OutputSchema) -> String {
        format!(
            "\n\nRespond with a single JSON object and nothing else. \
             The object must conform to this JSON Schema ({}):\n{}",
            schema.description, schema.schema
        )
    }
}

#[async_trait]
impl GenerationProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        self.client.list_local_models().await.is_ok()
    }

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<serde_json::Value, ProviderError> {
        debug!(
            model = %self.config.model,
            schema = %request.schema.name,
            "sending structured generation request to ollama"
        );

        let system = format!(
            "{}{}",
            request.system_prompt,
            Self::schema_clause(&request.schema)
        );
        let messages = vec![ChatMessage::system(system), ChatMessage::user(request.user_prompt.clone())];

        let chat_request = ChatMessageRequest::new(self.config.model.clone(), messages)
            .options(self.convert_options(&request))
            .format(FormatType::Json);

        let response = self
            .client
            .send_chat_messages(chat_request)
            .await
            .map_err(|err| ProviderError::network(err.to_string()))?;

        let content = response.message.content;
        if content.trim().is_empty() {
            return Err(ProviderError::empty(self.name()));
        }

        serde_json::from_str(&content).map_err(|err| ProviderError::malformed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_creation() {
        let provider = OllamaProvider::new(OllamaConfig::default());
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.config.port, 11434);
    }

    #[test]
    fn test_schema_clause_embeds_the_schema() {
        let schema = OutputSchema::new(
            "word_list",
            "A list of words",
            json!({"type": "object", "properties": {"words": {"type": "array"}}}),
        );
        let clause = OllamaProvider::schema_clause(&schema);
        assert!(clause.contains("JSON Schema"));
        assert!(clause.contains("A list of words"));
        assert!(clause.contains("\"words\""));
    }

    #[tokio::test]
    #[ignore] // Requires Ollama to be running
    async fn test_local_detection() {
        if let Some(provider) = OllamaProvider::detect_local().await {
            assert!(provider.is_available().await);
        }
    }
}
