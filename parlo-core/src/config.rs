//! Application configuration
//!
//! One TOML file covers the provider backends, the pipeline shape and the
//! data directory. Every field has a default so a missing or partial file
//! still yields a working setup (local Ollama, standard course shape).

use crate::llm::ollama::OllamaConfig;
use crate::llm::openai_compat::OpenAiCompatConfig;
use crate::llm::{GenerationProvider, OllamaProvider, OpenAiCompatProvider, ProviderError};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "parlo.toml";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Generation provider selection and per-backend settings
    pub provider: ProviderConfig,

    /// Course shape and pipeline limits
    pub pipeline: PipelineConfig,

    /// Directory the content store keeps its data in
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            pipeline: PipelineConfig::default(),
            data_dir: PathBuf::from(".parlo"),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Load an explicit config file, or `parlo.toml` from the working
    /// directory when present, or the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(CONFIG_FILE);
                if fallback.exists() { Self::from_file(fallback) } else { Ok(Self::default()) }
            }
        }
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let pipeline = &self.pipeline;
        ensure!(pipeline.units_per_path >= 1, "units_per_path must be at least 1");
        ensure!(pipeline.lessons_per_unit_min >= 1, "lessons_per_unit_min must be at least 1");
        ensure!(
            pipeline.lessons_per_unit_min <= pipeline.lessons_per_unit_max,
            "lessons_per_unit_min must not exceed lessons_per_unit_max"
        );
        ensure!(pipeline.vocabulary_count >= 1, "vocabulary_count must be at least 1");
        ensure!(pipeline.phrase_count >= 1, "phrase_count must be at least 1");
        ensure!(pipeline.insert_batch_size >= 1, "insert_batch_size must be at least 1");
        ensure!(pipeline.stage_timeout_secs >= 1, "stage_timeout_secs must be at least 1");
        Ok(())
    }
}

/// Which generation backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderBackend {
    Openai,
    Ollama,
}

/// Provider selection plus the settings of each backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub backend: ProviderBackend,
    pub openai: OpenAiCompatConfig,
    pub ollama: OllamaConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: ProviderBackend::Ollama,
            openai: OpenAiCompatConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl ProviderConfig {
    /// Construct the configured provider.
    pub fn build(&self) -> Result<Arc<dyn GenerationProvider>, ProviderError> {
        match self.backend {
            ProviderBackend::Openai => {
                Ok(Arc::new(OpenAiCompatProvider::new(self.openai.clone())?))
            }
            ProviderBackend::Ollama => Ok(Arc::new(OllamaProvider::new(self.ollama.clone()))),
        }
    }
}

/// Shape of the generated course and limits of the pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Units per learning path
    pub units_per_path: usize,

    /// Fewest lessons the outline prompt asks for per unit
    pub lessons_per_unit_min: usize,

    /// Most lessons the outline prompt asks for per unit
    pub lessons_per_unit_max: usize,

    /// Vocabulary words generated per path
    pub vocabulary_count: usize,

    /// Common phrases generated per path
    pub phrase_count: usize,

    /// Rows per store insert for vocabulary and phrases
    pub insert_batch_size: usize,

    /// Deadline for each pipeline stage
    pub stage_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            units_per_path: 6,
            lessons_per_unit_min: 4,
            lessons_per_unit_max: 5,
            vocabulary_count: 80,
            phrase_count: 30,
            insert_batch_size: 50,
            stage_timeout_secs: 180,
        }
    }
}

impl PipelineConfig {
    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout_secs)
    }
}
