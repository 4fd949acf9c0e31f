//! Course-outline stage
//!
//! One provider call produces the whole course skeleton: units with lesson
//! stubs. Persisting the skeleton assigns ids, 1-based order indices and the
//! initial status ladder (first unit active with its first lesson current,
//! everything else locked).

use super::params::GenerationParams;
use super::prompts::{LESSON_TYPES, PromptTemplates};
use super::{PipelineError, Stage};
use crate::config::PipelineConfig;
use crate::llm::{GenerationProvider, GenerationRequest, OutputSchema, ProviderError, generate_as};
use crate::model::{Lesson, LessonStatus, Unit, UnitStatus};
use crate::store::ContentStore;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

/// Course skeleton returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseOutline {
    pub units: Vec<OutlineUnit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineUnit {
    pub title: String,
    pub description: String,
    pub lessons: Vec<OutlineLesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineLesson {
    pub title: String,
    pub subtitle: String,
    #[serde(rename = "type")]
    pub lesson_type: String,
}

/// A persisted unit plus the stubs the lesson-content stage expands.
#[derive(Debug, Clone)]
pub struct UnitHandle {
    pub unit_id: Uuid,
    pub title: String,
    pub lessons: Vec<OutlineLesson>,
}

pub async fn generate_course_outline(
    provider: &dyn GenerationProvider,
    params: &GenerationParams,
    config: &PipelineConfig,
) -> Result<CourseOutline, PipelineError> {
    let request = GenerationRequest::new(
        PromptTemplates::outline_system(config),
        PromptTemplates::outline_user(params),
        outline_schema(),
    );

    let outline: CourseOutline = generate_as(provider, request)
        .await
        .map_err(|source| PipelineError::Generation { stage: Stage::Outline, source })?;

    if outline.units.is_empty() {
        return Err(PipelineError::Generation {
            stage: Stage::Outline,
            source: ProviderError::empty(provider.name()),
        });
    }

    info!(units = outline.units.len(), "course outline generated");
    Ok(outline)
}

/// Turn the skeleton into unit and lesson rows and persist them.
pub async fn persist_outline(
    store: &dyn ContentStore,
    path_id: Uuid,
    outline: &CourseOutline,
) -> Result<Vec<UnitHandle>, PipelineError> {
    let mut units = Vec::with_capacity(outline.units.len());
    let mut lessons = Vec::new();
    let mut handles = Vec::with_capacity(outline.units.len());

    for (unit_pos, outline_unit) in outline.units.iter().enumerate() {
        let unit_id = Uuid::new_v4();
        let first_unit = unit_pos == 0;

        units.push(Unit {
            id: unit_id,
            path_id,
            title: outline_unit.title.clone(),
            description: outline_unit.description.clone(),
            order_index: unit_pos as u32 + 1,
            status: if first_unit { UnitStatus::Active } else { UnitStatus::Locked },
            progress: 0,
        });

        for (lesson_pos, stub) in outline_unit.lessons.iter().enumerate() {
            let status = if first_unit && lesson_pos == 0 {
                LessonStatus::Current
            } else if first_unit {
                LessonStatus::Available
            } else {
                LessonStatus::Locked
            };

            lessons.push(Lesson {
                id: Uuid::new_v4(),
                unit_id,
                title: stub.title.clone(),
                subtitle: stub.subtitle.clone(),
                lesson_type: stub.lesson_type.clone(),
                order_index: lesson_pos as u32 + 1,
                status,
                progress: 0,
                content: None,
            });
        }

        handles.push(UnitHandle {
            unit_id,
            title: outline_unit.title.clone(),
            lessons: outline_unit.lessons.clone(),
        });
    }

    store.insert_units(&units).await?;
    store.insert_lessons(&lessons).await?;
    Ok(handles)
}

fn outline_schema() -> OutputSchema {
    OutputSchema::new(
        "course_outline",
        "Course skeleton: units, each with lesson stubs",
        json!({
            "type": "object",
            "properties": {
                "units": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "description": {"type": "string"},
                            "lessons": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "title": {"type": "string"},
                                        "subtitle": {"type": "string"},
                                        "type": {"type": "string", "enum": LESSON_TYPES}
                                    },
                                    "required": ["title", "subtitle", "type"],
                                    "additionalProperties": false
                                }
                            }
                        },
                        "required": ["title", "description", "lessons"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["units"],
            "additionalProperties": false
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockProvider;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn outline_with(units: usize, lessons_each: usize) -> CourseOutline {
        CourseOutline {
            units: (1..=units)
                .map(|u| OutlineUnit {
                    title: format!("Unit {u}"),
                    description: format!("About topic {u}"),
                    lessons: (1..=lessons_each)
                        .map(|l| OutlineLesson {
                            title: format!("Unit {u} Lesson {l}"),
                            subtitle: format!("Subtitle {u}.{l}"),
                            lesson_type: "grammar".to_string(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn params() -> GenerationParams {
        GenerationParams {
            level: crate::model::CefrLevel::B1,
            goal: "travel".to_string(),
            focus_areas: vec![],
            native_language_name: "Polish".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_outline_counts_as_no_output() {
        let provider = MockProvider::new();
        provider.enqueue(json!({"units": []}));

        let result =
            generate_course_outline(&provider, &params(), &PipelineConfig::default()).await;
        assert!(matches!(
            result,
            Err(PipelineError::Generation {
                stage: Stage::Outline,
                source: ProviderError::Empty { .. }
            })
        ));
    }

    #[tokio::test]
    async fn test_outline_parses_from_wire_shape() {
        let provider = MockProvider::new();
        provider.enqueue(json!({
            "units": [{
                "title": "Airport English",
                "description": "Getting through an airport",
                "lessons": [
                    {"title": "Check-in", "subtitle": "Bags and boarding passes", "type": "speaking"}
                ]
            }]
        }));

        let outline =
            generate_course_outline(&provider, &params(), &PipelineConfig::default()).await.unwrap();
        assert_eq!(outline.units.len(), 1);
        assert_eq!(outline.units[0].lessons[0].lesson_type, "speaking");
    }

    #[tokio::test]
    async fn test_persist_assigns_statuses_and_order() {
        let store = MemoryStore::new();
        let path_id = Uuid::new_v4();
        let outline = outline_with(3, 4);

        let handles = persist_outline(&store, path_id, &outline).await.unwrap();
        assert_eq!(handles.len(), 3);
        assert_eq!(handles[0].lessons.len(), 4);

        let units = store.units_for_path(path_id).await.unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].status, UnitStatus::Active);
        assert_eq!(units[1].status, UnitStatus::Locked);
        assert_eq!(units[2].status, UnitStatus::Locked);
        assert_eq!(units[0].order_index, 1);
        assert_eq!(units[2].order_index, 3);

        let first_unit_lessons = store.lessons_for_unit(units[0].id).await.unwrap();
        assert_eq!(first_unit_lessons[0].status, LessonStatus::Current);
        assert_eq!(first_unit_lessons[1].status, LessonStatus::Available);
        assert_eq!(first_unit_lessons[3].status, LessonStatus::Available);

        let second_unit_lessons = store.lessons_for_unit(units[1].id).await.unwrap();
        assert!(second_unit_lessons.iter().all(|l| l.status == LessonStatus::Locked));
        assert!(second_unit_lessons.iter().all(|l| l.content.is_none()));
    }

    #[test]
    fn test_schema_constrains_lesson_types() {
        let schema = outline_schema();
        assert_eq!(schema.name, "course_outline");
        let types = &schema.schema["properties"]["units"]["items"]["properties"]["lessons"]
            ["items"]["properties"]["type"]["enum"];
        assert_eq!(types.as_array().map(|a| a.len()), Some(6));
    }
}
