//! Lesson-content stage
//!
//! Expands every unit's lesson stubs into full lesson content, one provider
//! call per unit, all units in flight concurrently. Persistence is
//! all-or-nothing: nothing is written until every unit call has succeeded,
//! so a failed run never leaves a half-filled course behind.

use super::outline::UnitHandle;
use super::params::GenerationParams;
use super::prompts::{EXERCISE_TYPES, PromptTemplates};
use super::{PipelineError, Stage};
use crate::llm::{GenerationProvider, GenerationRequest, OutputSchema, ProviderError, generate_as};
use crate::model::{GrammarPoint, LessonContent, WordPair};
use crate::store::ContentStore;
use futures::future;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

/// What the provider returns for one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitLessonContent {
    pub lessons: Vec<GeneratedLesson>,
}

/// Provider-side shape of one lesson's content.
///
/// The counts are requested from the provider for redundancy but are
/// recomputed from the list lengths before anything is written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedLesson {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub word_count: u32,
    #[serde(default)]
    pub grammar_count: u32,
    pub exercise_types: Vec<String>,
    pub grammar_points: Vec<GrammarPoint>,
    pub words_to_learn: Vec<WordPair>,
}

pub async fn generate_and_save_lesson_content(
    provider: &dyn GenerationProvider,
    store: &dyn ContentStore,
    units: &[UnitHandle],
    params: &GenerationParams,
) -> Result<(), PipelineError> {
    let requests: Vec<_> =
        units.iter().map(|unit| generate_unit_content(provider, unit, params)).collect();
    let results = future::join_all(requests).await;

    // Collect everything before writing anything: the first failure, in unit
    // order, aborts the stage with zero writes.
    let mut generated = Vec::with_capacity(units.len());
    for (unit, result) in units.iter().zip(results) {
        match result {
            Ok(content) => generated.push((unit, content)),
            Err(source) => {
                warn!(unit = %unit.title, error = %source, "unit content generation failed");
                return Err(PipelineError::Generation { stage: Stage::Lessons, source });
            }
        }
    }

    for (unit, content) in generated {
        apply_unit_content(store, unit, content).await?;
    }

    info!(units = units.len(), "lesson content generated and saved");
    Ok(())
}

async fn generate_unit_content(
    provider: &dyn GenerationProvider,
    unit: &UnitHandle,
    params: &GenerationParams,
) -> Result<UnitLessonContent, ProviderError> {
    debug!(unit = %unit.title, lessons = unit.lessons.len(), "requesting lesson content");
    let request = GenerationRequest::new(
        PromptTemplates::lesson_content_system(),
        PromptTemplates::lesson_content_user(&unit.title, &unit.lessons, params),
        lesson_content_schema(),
    );
    generate_as(provider, request).await
}

/// Write one unit's generated content back onto its persisted lessons.
///
/// Matching is by exact title. Entries that match no lesson are dropped with
/// a warning; lessons the provider skipped simply keep no content.
async fn apply_unit_content(
    store: &dyn ContentStore,
    unit: &UnitHandle,
    content: UnitLessonContent,
) -> Result<(), PipelineError> {
    let persisted = store.lessons_for_unit(unit.unit_id).await?;

    for entry in content.lessons {
        let Some(lesson) = persisted.iter().find(|lesson| lesson.title == entry.title) else {
            warn!(
                unit = %unit.title,
                lesson = %entry.title,
                "generated content matches no lesson in this unit, dropping it"
            );
            continue;
        };

        let normalized = LessonContent::new(
            entry.description,
            entry.exercise_types,
            entry.grammar_points,
            entry.words_to_learn,
        );
        store.set_lesson_content(lesson.id, &normalized).await?;
    }

    Ok(())
}

fn lesson_content_schema() -> OutputSchema {
    OutputSchema::new(
        "unit_lesson_content",
        "Full content for every lesson of one unit",
        json!({
            "type": "object",
            "properties": {
                "lessons": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "description": {"type": "string"},
                            "word_count": {"type": "integer", "minimum": 0},
                            "grammar_count": {"type": "integer", "minimum": 0},
                            "exercise_types": {
                                "type": "array",
                                "items": {"type": "string", "enum": EXERCISE_TYPES},
                                "minItems": 2,
                                "maxItems": 4
                            },
                            "grammar_points": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "title": {"type": "string"},
                                        "description": {"type": "string"}
                                    },
                                    "required": ["title", "description"],
                                    "additionalProperties": false
                                }
                            },
                            "words_to_learn": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "word": {"type": "string"},
                                        "translation": {"type": "string"}
                                    },
                                    "required": ["word", "translation"],
                                    "additionalProperties": false
                                }
                            }
                        },
                        "required": [
                            "title", "description", "word_count", "grammar_count",
                            "exercise_types", "grammar_points", "words_to_learn"
                        ],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["lessons"],
            "additionalProperties": false
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockProvider;
    use crate::model::CefrLevel;
    use crate::pipeline::outline::{CourseOutline, OutlineLesson, OutlineUnit, persist_outline};
    use crate::store::MemoryStore;
    use uuid::Uuid;

    fn params() -> GenerationParams {
        GenerationParams {
            level: CefrLevel::B1,
            goal: "career".to_string(),
            focus_areas: vec![],
            native_language_name: "Ukrainian".to_string(),
        }
    }

    fn stub(title: &str) -> OutlineLesson {
        OutlineLesson {
            title: title.to_string(),
            subtitle: "sub".to_string(),
            lesson_type: "grammar".to_string(),
        }
    }

    async fn seeded_unit(store: &MemoryStore, titles: &[&str]) -> UnitHandle {
        let outline = CourseOutline {
            units: vec![OutlineUnit {
                title: "Workplace English".to_string(),
                description: "desc".to_string(),
                lessons: titles.iter().map(|t| stub(t)).collect(),
            }],
        };
        persist_outline(store, Uuid::new_v4(), &outline).await.unwrap().remove(0)
    }

    fn entry_json(title: &str, words: usize) -> serde_json::Value {
        json!({
            "title": title,
            "description": format!("All about {title}"),
            "word_count": 999,
            "grammar_count": 999,
            "exercise_types": ["flashcards", "multiple-choice"],
            "grammar_points": [{"title": "Present perfect", "description": "Recent past"}],
            "words_to_learn": (0..words).map(|i| json!({
                "word": format!("word{i}"),
                "translation": format!("слово{i}")
            })).collect::<Vec<_>>()
        })
    }

    #[tokio::test]
    async fn test_content_is_matched_by_title_and_normalized() {
        let store = MemoryStore::new();
        let unit = seeded_unit(&store, &["Meetings", "Emails"]).await;

        let provider = MockProvider::new();
        provider.enqueue(json!({"lessons": [entry_json("Meetings", 3), entry_json("Emails", 2)]}));

        generate_and_save_lesson_content(&provider, &store, &[unit.clone()], &params())
            .await
            .unwrap();

        let lessons = store.lessons_for_unit(unit.unit_id).await.unwrap();
        let meetings = lessons.iter().find(|l| l.title == "Meetings").unwrap();
        let content = meetings.content.as_ref().unwrap();
        // Counts come from the list lengths, not the provider's 999s.
        assert_eq!(content.word_count, 3);
        assert_eq!(content.grammar_count, 1);
        assert_eq!(content.exercise_types.len(), 2);
    }

    #[tokio::test]
    async fn test_unmatched_titles_are_dropped_silently() {
        let store = MemoryStore::new();
        let unit = seeded_unit(&store, &["Meetings"]).await;

        let provider = MockProvider::new();
        provider.enqueue(json!({"lessons": [
            entry_json("Meetings", 1),
            entry_json("A Lesson Nobody Asked For", 1)
        ]}));

        generate_and_save_lesson_content(&provider, &store, &[unit.clone()], &params())
            .await
            .unwrap();

        let lessons = store.lessons_for_unit(unit.unit_id).await.unwrap();
        assert_eq!(lessons.len(), 1);
        assert!(lessons[0].content.is_some());
    }

    #[tokio::test]
    async fn test_one_failed_unit_persists_nothing() {
        let store = MemoryStore::new();
        let first = seeded_unit(&store, &["Meetings"]).await;
        let second = seeded_unit(&store, &["Packing"]).await;

        let provider = MockProvider::with_handler(move |request| {
            if request.user_prompt.contains("Packing") {
                return Ok(json!({"lessons": [entry_json("Packing", 1)]}));
            }
            Err(ProviderError::network("scripted outage"))
        });

        let result = generate_and_save_lesson_content(
            &provider,
            &store,
            &[first.clone(), second.clone()],
            &params(),
        )
        .await;

        assert!(matches!(
            result,
            Err(PipelineError::Generation { stage: Stage::Lessons, .. })
        ));

        // The successful unit's content must not have been written either.
        for unit in [&first, &second] {
            let lessons = store.lessons_for_unit(unit.unit_id).await.unwrap();
            assert!(lessons.iter().all(|l| l.content.is_none()));
        }
    }

    #[test]
    fn test_schema_limits_exercise_types() {
        let schema = lesson_content_schema();
        let exercises = &schema.schema["properties"]["lessons"]["items"]["properties"]
            ["exercise_types"];
        assert_eq!(exercises["minItems"], 2);
        assert_eq!(exercises["maxItems"], 4);
        assert_eq!(exercises["items"]["enum"].as_array().map(|a| a.len()), Some(4));
    }
}
