//! Persistence port for learning-path content
//!
//! [`ContentStore`] is the only storage surface the pipeline knows about.
//! [`MemoryStore`] backs tests and embedded use; [`FileStore`] adds JSON-file
//! durability for the CLI.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::model::{
    LearningPath, Lesson, LessonContent, PathStatus, Unit, UserProfile, VocabularyPhrase,
    VocabularyWord,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The user already has a path that is generating or ready
    #[error("a learning path already exists with status '{status}'")]
    PathExists { status: PathStatus },

    /// A row the operation needs is missing
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage surface for profiles, learning paths and vocabulary collections.
///
/// Write methods persist whole batches; callers decide batch sizes. Reads
/// return owned rows.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn user_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError>;

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), StoreError>;

    /// The user's current path: the non-failed one when present, otherwise
    /// the most recent failed one.
    async fn learning_path_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<LearningPath>, StoreError>;

    /// Insert a new path, atomically refusing when the user already has one
    /// that is not failed. The existence check and the insert happen under a
    /// single lock so two concurrent generations cannot both pass it.
    async fn create_learning_path(&self, path: &LearningPath) -> Result<(), StoreError>;

    /// Update a path's status and, when given, its generation timestamp.
    async fn update_path_status(
        &self,
        path_id: Uuid,
        status: PathStatus,
        generated_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError>;

    /// Delete a path along with its units and lessons. Vocabulary words and
    /// phrases belong to the user, not the path, and are never cascaded.
    async fn delete_learning_path(&self, path_id: Uuid) -> Result<(), StoreError>;

    async fn insert_units(&self, units: &[Unit]) -> Result<(), StoreError>;

    /// Units of a path ordered by `order_index`.
    async fn units_for_path(&self, path_id: Uuid) -> Result<Vec<Unit>, StoreError>;

    async fn insert_lessons(&self, lessons: &[Lesson]) -> Result<(), StoreError>;

    /// Lessons of a unit ordered by `order_index`.
    async fn lessons_for_unit(&self, unit_id: Uuid) -> Result<Vec<Lesson>, StoreError>;

    async fn set_lesson_content(
        &self,
        lesson_id: Uuid,
        content: &LessonContent,
    ) -> Result<(), StoreError>;

    async fn insert_vocabulary_words(&self, words: &[VocabularyWord]) -> Result<(), StoreError>;

    async fn insert_vocabulary_phrases(
        &self,
        phrases: &[VocabularyPhrase],
    ) -> Result<(), StoreError>;
}
