//! Generation provider abstraction
//!
//! A [`GenerationProvider`] turns a system prompt, a user prompt and a JSON
//! schema into one structured JSON document. The pipeline only ever talks to
//! this trait; the concrete backends live in [`ollama`] and
//! [`openai_compat`].

pub mod errors;
pub mod mock;
pub mod ollama;
pub mod openai_compat;

pub use errors::ProviderError;
pub use ollama::OllamaProvider;
pub use openai_compat::OpenAiCompatProvider;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Declared shape of a structured response.
///
/// `schema` holds a JSON Schema document. Backends that support native
/// structured output pass it through; the rest embed it in the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSchema {
    /// Short snake_case identifier ("course_outline", "vocabulary_list", ...).
    pub name: String,
    pub description: String,
    pub schema: serde_json::Value,
}

impl OutputSchema {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        Self { name: name.into(), description: description.into(), schema }
    }
}

/// Sampling knobs for a single call. `None` falls back to the backend's
/// configured defaults.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
}

/// One structured-generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub schema: OutputSchema,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        schema: OutputSchema,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            schema,
            options: GenerationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}

/// Common trait for backends that can produce schema-conforming JSON.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Short backend name for logs and error messages.
    fn name(&self) -> &str;

    /// Check whether the backend is reachable and usable.
    async fn is_available(&self) -> bool;

    /// Produce one JSON document conforming to `request.schema`.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<serde_json::Value, ProviderError>;
}

/// Run a request and deserialize the response into `T`.
///
/// A response that parses as JSON but not as `T` is malformed output, the
/// same as non-JSON text would be.
pub async fn generate_as<T: DeserializeOwned>(
    provider: &dyn GenerationProvider,
    request: GenerationRequest,
) -> Result<T, ProviderError> {
    let value = provider.generate(request).await?;
    serde_json::from_value(value).map_err(|err| ProviderError::malformed(err.to_string()))
}
