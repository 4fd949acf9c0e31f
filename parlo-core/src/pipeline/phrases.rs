//! Phrase stage
//!
//! Mirrors the vocabulary stage for common phrases and expressions: one
//! provider call, stamped rows, batched inserts. Runs last so a failure here
//! still leaves the course and word collection behind under a failed path.

use super::params::GenerationParams;
use super::prompts::PromptTemplates;
use super::{PipelineError, Stage};
use crate::config::PipelineConfig;
use crate::llm::{GenerationProvider, GenerationRequest, OutputSchema, ProviderError, generate_as};
use crate::model::{CefrLevel, ContentSource, Mastery, VocabularyPhrase};
use crate::store::ContentStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseList {
    pub phrases: Vec<GeneratedPhrase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPhrase {
    pub phrase: String,
    pub meaning: String,
    pub example_usage: String,
    pub category: String,
    pub level: CefrLevel,
    pub literal_translation: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

pub async fn generate_and_save_phrases(
    provider: &dyn GenerationProvider,
    store: &dyn ContentStore,
    user_id: Uuid,
    params: &GenerationParams,
    config: &PipelineConfig,
) -> Result<(), PipelineError> {
    let request = GenerationRequest::new(
        PromptTemplates::phrase_system(),
        PromptTemplates::phrase_user(config.phrase_count, params),
        phrase_schema(),
    );

    let list: PhraseList = generate_as(provider, request)
        .await
        .map_err(|source| PipelineError::Generation { stage: Stage::Phrases, source })?;

    if list.phrases.is_empty() {
        return Err(PipelineError::Generation {
            stage: Stage::Phrases,
            source: ProviderError::empty(provider.name()),
        });
    }

    let now = Utc::now();
    let rows: Vec<VocabularyPhrase> = list
        .phrases
        .into_iter()
        .map(|entry| VocabularyPhrase {
            id: Uuid::new_v4(),
            user_id,
            phrase: entry.phrase,
            meaning: entry.meaning,
            example_usage: entry.example_usage,
            category: entry.category,
            level: entry.level,
            literal_translation: entry.literal_translation,
            tags: entry.tags,
            mastery: Mastery::New,
            source: ContentSource::Generated,
            created_at: now,
        })
        .collect();

    for batch in rows.chunks(config.insert_batch_size) {
        store.insert_vocabulary_phrases(batch).await?;
    }

    info!(count = rows.len(), "phrase collection saved");
    Ok(())
}

fn phrase_schema() -> OutputSchema {
    let levels: Vec<&str> = CefrLevel::ALL.iter().map(|level| level.as_str()).collect();
    OutputSchema::new(
        "phrase_list",
        "Common phrases for one learner",
        json!({
            "type": "object",
            "properties": {
                "phrases": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "phrase": {"type": "string"},
                            "meaning": {"type": "string"},
                            "example_usage": {"type": "string"},
                            "category": {"type": "string"},
                            "level": {"type": "string", "enum": levels},
                            "literal_translation": {"type": "string"},
                            "tags": {"type": "array", "items": {"type": "string"}}
                        },
                        "required": [
                            "phrase", "meaning", "example_usage", "category",
                            "level", "literal_translation", "tags"
                        ],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["phrases"],
            "additionalProperties": false
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockProvider;
    use crate::store::MemoryStore;

    fn params() -> GenerationParams {
        GenerationParams {
            level: CefrLevel::B2,
            goal: "travel".to_string(),
            focus_areas: vec!["speaking".to_string()],
            native_language_name: "Spanish".to_string(),
        }
    }

    fn phrases_json(count: usize) -> serde_json::Value {
        json!({
            "phrases": (0..count).map(|i| json!({
                "phrase": format!("break the ice {i}"),
                "meaning": "to start a conversation in a social setting",
                "example_usage": "He told a joke to break the ice.",
                "category": "social",
                "level": "B2",
                "literal_translation": "romper el hielo",
                "tags": ["idiom"]
            })).collect::<Vec<_>>()
        })
    }

    #[tokio::test]
    async fn test_default_count_fits_one_batch() {
        let store = MemoryStore::new();
        let provider = MockProvider::new();
        provider.enqueue(phrases_json(30));

        let user_id = Uuid::new_v4();
        generate_and_save_phrases(
            &provider,
            &store,
            user_id,
            &params(),
            &PipelineConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(store.phrase_count().await, 30);
        assert_eq!(store.phrase_batch_sizes().await, vec![30]);
    }

    #[tokio::test]
    async fn test_oversized_lists_are_chunked() {
        let store = MemoryStore::new();
        let provider = MockProvider::new();
        provider.enqueue(phrases_json(120));

        generate_and_save_phrases(
            &provider,
            &store,
            Uuid::new_v4(),
            &params(),
            &PipelineConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(store.phrase_batch_sizes().await, vec![50, 50, 20]);
    }

    #[tokio::test]
    async fn test_empty_phrase_list_fails_the_stage() {
        let store = MemoryStore::new();
        let provider = MockProvider::new();
        provider.enqueue(json!({"phrases": []}));

        let result = generate_and_save_phrases(
            &provider,
            &store,
            Uuid::new_v4(),
            &params(),
            &PipelineConfig::default(),
        )
        .await;

        assert!(matches!(
            result,
            Err(PipelineError::Generation {
                stage: Stage::Phrases,
                source: ProviderError::Empty { .. }
            })
        ));
        assert_eq!(store.phrase_count().await, 0);
    }
}
