//! Domain model for learning paths, lessons and vocabulary collections.
//!
//! These are the rows the content store keeps. Wire names follow the JSON the
//! store and the generation schemas exchange: status enums serialize as
//! lowercase strings, CEFR levels as their standard labels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// CEFR proficiency band used to pin the difficulty of generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// All bands in ascending order.
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a learning path.
///
/// A user has at most one non-failed path at a time; a failed path stays
/// around until it is explicitly deleted and replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStatus {
    Generating,
    Ready,
    Failed,
}

impl PathStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathStatus::Generating => "generating",
            PathStatus::Ready => "ready",
            PathStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PathStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    Active,
    Locked,
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnitStatus::Active => "active",
            UnitStatus::Locked => "locked",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    Current,
    Available,
    Locked,
}

impl fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LessonStatus::Current => "current",
            LessonStatus::Available => "available",
            LessonStatus::Locked => "locked",
        })
    }
}

/// Mastery progression for vocabulary words and phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mastery {
    New,
    Learning,
    Mastered,
}

/// Where a vocabulary entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Generated,
    UserAdded,
}

/// Learner profile the pipeline derives its generation parameters from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    /// Self-reported proficiency label ("beginner", "intermediate", ...).
    pub proficiency: String,
    /// Goal category ("career", "travel", "exams", ...).
    pub goal: String,
    pub focus_areas: Vec<String>,
    /// ISO 639-1 language code ("uk", "pl", ...).
    pub native_language: String,
}

/// One personalized course, the root of the unit/lesson tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub id: Uuid,
    pub user_id: Uuid,
    pub level: CefrLevel,
    pub goal: String,
    pub focus_areas: Vec<String>,
    pub status: PathStatus,
    pub created_at: DateTime<Utc>,
    /// Set once, when the path flips to ready.
    pub generated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: Uuid,
    pub path_id: Uuid,
    pub title: String,
    pub description: String,
    /// 1-based position within the path.
    pub order_index: u32,
    pub status: UnitStatus,
    /// Completion percentage, 0-100.
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub title: String,
    pub subtitle: String,
    /// One of the closed lesson type tags ("grammar", "listening", ...).
    pub lesson_type: String,
    /// 1-based position within the unit.
    pub order_index: u32,
    pub status: LessonStatus,
    pub progress: u8,
    /// Absent until the lesson-content stage fills it in.
    pub content: Option<LessonContent>,
}

/// Full teaching payload of one lesson.
///
/// `word_count` and `grammar_count` always equal the lengths of
/// `words_to_learn` and `grammar_points`; [`LessonContent::new`] enforces
/// that regardless of what a provider claimed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonContent {
    pub description: String,
    pub word_count: u32,
    pub grammar_count: u32,
    pub exercise_types: Vec<String>,
    pub grammar_points: Vec<GrammarPoint>,
    pub words_to_learn: Vec<WordPair>,
}

impl LessonContent {
    /// Build content with the counters derived from the list lengths.
    pub fn new(
        description: String,
        exercise_types: Vec<String>,
        grammar_points: Vec<GrammarPoint>,
        words_to_learn: Vec<WordPair>,
    ) -> Self {
        Self {
            description,
            word_count: words_to_learn.len() as u32,
            grammar_count: grammar_points.len() as u32,
            exercise_types,
            grammar_points,
            words_to_learn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarPoint {
    pub title: String,
    pub description: String,
}

/// English word plus its translation into the learner's native language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordPair {
    pub word: String,
    pub translation: String,
}

/// One entry of a user's vocabulary collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyWord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub word: String,
    pub translation: String,
    pub definition: String,
    pub level: CefrLevel,
    pub category: String,
    pub tags: Vec<String>,
    pub mastery: Mastery,
    pub source: ContentSource,
    pub created_at: DateTime<Utc>,
}

/// One entry of a user's phrase collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyPhrase {
    pub id: Uuid,
    pub user_id: Uuid,
    pub phrase: String,
    pub meaning: String,
    pub example_usage: String,
    pub category: String,
    pub level: CefrLevel,
    pub literal_translation: String,
    pub tags: Vec<String>,
    pub mastery: Mastery,
    pub source: ContentSource,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names_are_lowercase() {
        assert_eq!(
            serde_json::to_string(&PathStatus::Generating).unwrap(),
            "\"generating\""
        );
        assert_eq!(serde_json::to_string(&UnitStatus::Locked).unwrap(), "\"locked\"");
        assert_eq!(
            serde_json::to_string(&LessonStatus::Available).unwrap(),
            "\"available\""
        );
        assert_eq!(serde_json::to_string(&Mastery::New).unwrap(), "\"new\"");
        assert_eq!(
            serde_json::to_string(&ContentSource::UserAdded).unwrap(),
            "\"user_added\""
        );
    }

    #[test]
    fn test_cefr_levels_keep_standard_labels() {
        assert_eq!(serde_json::to_string(&CefrLevel::B2).unwrap(), "\"B2\"");
        let parsed: CefrLevel = serde_json::from_str("\"A1\"").unwrap();
        assert_eq!(parsed, CefrLevel::A1);
        assert_eq!(CefrLevel::C1.to_string(), "C1");
        assert_eq!(CefrLevel::ALL.len(), 6);
    }

    #[test]
    fn test_lesson_content_counts_follow_list_lengths() {
        let content = LessonContent::new(
            "Greetings and introductions".to_string(),
            vec!["flashcards".to_string(), "multiple-choice".to_string()],
            vec![GrammarPoint {
                title: "Present simple".to_string(),
                description: "Use for routines".to_string(),
            }],
            vec![
                WordPair { word: "hello".to_string(), translation: "привіт".to_string() },
                WordPair { word: "goodbye".to_string(), translation: "бувай".to_string() },
                WordPair { word: "please".to_string(), translation: "будь ласка".to_string() },
            ],
        );
        assert_eq!(content.word_count, 3);
        assert_eq!(content.grammar_count, 1);
    }

    #[test]
    fn test_learning_path_round_trips_through_json() {
        let path = LearningPath {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            level: CefrLevel::B1,
            goal: "career".to_string(),
            focus_areas: vec!["grammar".to_string()],
            status: PathStatus::Ready,
            created_at: Utc::now(),
            generated_at: Some(Utc::now()),
        };
        let json = serde_json::to_string(&path).unwrap();
        assert!(json.contains("\"ready\""));
        let back: LearningPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
