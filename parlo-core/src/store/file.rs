//! JSON-file content store
//!
//! Wraps a [`MemoryStore`] and writes the whole state to one pretty-printed
//! JSON file after every mutation. Good enough for a single-user CLI; a
//! multi-writer deployment would put a real database behind the trait
//! instead.

use super::memory::MemoryStore;
use super::{ContentStore, StoreError};
use crate::model::{
    LearningPath, Lesson, LessonContent, PathStatus, Unit, UserProfile, VocabularyPhrase,
    VocabularyWord,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const STORE_FILE: &str = "parlo-store.json";

/// File-backed implementation of [`ContentStore`].
pub struct FileStore {
    inner: MemoryStore,
    path: PathBuf,
}

impl FileStore {
    /// Open the store under `data_dir`, loading existing state if the file
    /// is already there.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(STORE_FILE);

        let inner = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            MemoryStore::from_state(serde_json::from_str(&content)?)
        } else {
            MemoryStore::new()
        };

        debug!(path = %path.display(), "opened content store");
        Ok(Self { inner, path })
    }

    /// Where the store file lives.
    pub fn file_path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let state = self.inner.snapshot().await;
        let content = serde_json::to_string_pretty(&state)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[async_trait]
impl ContentStore for FileStore {
    async fn user_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        self.inner.user_profile(user_id).await
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.inner.upsert_profile(profile).await?;
        self.persist().await
    }

    async fn learning_path_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<LearningPath>, StoreError> {
        self.inner.learning_path_for_user(user_id).await
    }

    async fn create_learning_path(&self, path: &LearningPath) -> Result<(), StoreError> {
        self.inner.create_learning_path(path).await?;
        self.persist().await
    }

    async fn update_path_status(
        &self,
        path_id: Uuid,
        status: PathStatus,
        generated_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        self.inner.update_path_status(path_id, status, generated_at).await?;
        self.persist().await
    }

    async fn delete_learning_path(&self, path_id: Uuid) -> Result<(), StoreError> {
        self.inner.delete_learning_path(path_id).await?;
        self.persist().await
    }

    async fn insert_units(&self, units: &[Unit]) -> Result<(), StoreError> {
        self.inner.insert_units(units).await?;
        self.persist().await
    }

    async fn units_for_path(&self, path_id: Uuid) -> Result<Vec<Unit>, StoreError> {
        self.inner.units_for_path(path_id).await
    }

    async fn insert_lessons(&self, lessons: &[Lesson]) -> Result<(), StoreError> {
        self.inner.insert_lessons(lessons).await?;
        self.persist().await
    }

    async fn lessons_for_unit(&self, unit_id: Uuid) -> Result<Vec<Lesson>, StoreError> {
        self.inner.lessons_for_unit(unit_id).await
    }

    async fn set_lesson_content(
        &self,
        lesson_id: Uuid,
        content: &LessonContent,
    ) -> Result<(), StoreError> {
        self.inner.set_lesson_content(lesson_id, content).await?;
        self.persist().await
    }

    async fn insert_vocabulary_words(&self, words: &[VocabularyWord]) -> Result<(), StoreError> {
        self.inner.insert_vocabulary_words(words).await?;
        self.persist().await
    }

    async fn insert_vocabulary_phrases(
        &self,
        phrases: &[VocabularyPhrase],
    ) -> Result<(), StoreError> {
        self.inner.insert_vocabulary_phrases(phrases).await?;
        self.persist().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CefrLevel;
    use tempfile::TempDir;

    fn profile(user_id: Uuid) -> UserProfile {
        UserProfile {
            user_id,
            proficiency: "intermediate".to_string(),
            goal: "travel".to_string(),
            focus_areas: vec!["speaking".to_string()],
            native_language: "pl".to_string(),
        }
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let user = Uuid::new_v4();
        let path_id;

        {
            let store = FileStore::open(dir.path()).unwrap();
            store.upsert_profile(&profile(user)).await.unwrap();

            let path = LearningPath {
                id: Uuid::new_v4(),
                user_id: user,
                level: CefrLevel::B1,
                goal: "travel".to_string(),
                focus_areas: vec![],
                status: PathStatus::Ready,
                created_at: Utc::now(),
                generated_at: Some(Utc::now()),
            };
            path_id = path.id;
            store.create_learning_path(&path).await.unwrap();
        }

        let reopened = FileStore::open(dir.path()).unwrap();
        let loaded = reopened.user_profile(user).await.unwrap().unwrap();
        assert_eq!(loaded.goal, "travel");

        let path = reopened.learning_path_for_user(user).await.unwrap().unwrap();
        assert_eq!(path.id, path_id);
        assert_eq!(path.status, PathStatus::Ready);
    }

    #[tokio::test]
    async fn test_open_creates_the_data_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("deep").join("down");

        let store = FileStore::open(&nested).unwrap();
        store.upsert_profile(&profile(Uuid::new_v4())).await.unwrap();

        assert!(store.file_path().exists());
        assert!(store.file_path().starts_with(&nested));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(STORE_FILE), "{ not json").unwrap();

        let result = FileStore::open(dir.path());
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}
