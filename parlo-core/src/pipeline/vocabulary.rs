//! Vocabulary stage
//!
//! One provider call produces the learner's starter vocabulary collection.
//! Rows get fresh ids, the new/generated markers and the run timestamp, then
//! go to the store in fixed-size batches.

use super::params::GenerationParams;
use super::prompts::PromptTemplates;
use super::{PipelineError, Stage};
use crate::config::PipelineConfig;
use crate::llm::{GenerationProvider, GenerationRequest, OutputSchema, ProviderError, generate_as};
use crate::model::{CefrLevel, ContentSource, Mastery, VocabularyWord};
use crate::store::ContentStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyList {
    pub words: Vec<GeneratedWord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedWord {
    pub word: String,
    pub translation: String,
    pub definition: String,
    pub level: CefrLevel,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

pub async fn generate_and_save_vocabulary(
    provider: &dyn GenerationProvider,
    store: &dyn ContentStore,
    user_id: Uuid,
    params: &GenerationParams,
    config: &PipelineConfig,
) -> Result<(), PipelineError> {
    let request = GenerationRequest::new(
        PromptTemplates::vocabulary_system(),
        PromptTemplates::vocabulary_user(config.vocabulary_count, params),
        vocabulary_schema(),
    );

    let list: VocabularyList = generate_as(provider, request)
        .await
        .map_err(|source| PipelineError::Generation { stage: Stage::Vocabulary, source })?;

    if list.words.is_empty() {
        return Err(PipelineError::Generation {
            stage: Stage::Vocabulary,
            source: ProviderError::empty(provider.name()),
        });
    }

    let now = Utc::now();
    let rows: Vec<VocabularyWord> = list
        .words
        .into_iter()
        .map(|entry| VocabularyWord {
            id: Uuid::new_v4(),
            user_id,
            word: entry.word,
            translation: entry.translation,
            definition: entry.definition,
            level: entry.level,
            category: entry.category,
            tags: entry.tags,
            mastery: Mastery::New,
            source: ContentSource::Generated,
            created_at: now,
        })
        .collect();

    for batch in rows.chunks(config.insert_batch_size) {
        store.insert_vocabulary_words(batch).await?;
    }

    info!(count = rows.len(), "vocabulary collection saved");
    Ok(())
}

fn vocabulary_schema() -> OutputSchema {
    let levels: Vec<&str> = CefrLevel::ALL.iter().map(|level| level.as_str()).collect();
    OutputSchema::new(
        "vocabulary_list",
        "Vocabulary entries for one learner",
        json!({
            "type": "object",
            "properties": {
                "words": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "word": {"type": "string"},
                            "translation": {"type": "string"},
                            "definition": {"type": "string"},
                            "level": {"type": "string", "enum": levels},
                            "category": {"type": "string"},
                            "tags": {"type": "array", "items": {"type": "string"}}
                        },
                        "required": ["word", "translation", "definition", "level", "category", "tags"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["words"],
            "additionalProperties": false
        }),
    )
}
