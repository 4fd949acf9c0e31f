//! In-memory content store
//!
//! Single-process implementation backed by one `RwLock`. The write lock is
//! what makes [`ContentStore::create_learning_path`] atomic: the existence
//! check and the insert cannot interleave with another writer.

use super::{ContentStore, StoreError};
use crate::model::{
    LearningPath, Lesson, LessonContent, PathStatus, Unit, UserProfile, VocabularyPhrase,
    VocabularyWord,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Everything the store holds, in one serializable bundle.
///
/// Batch-size telemetry is runtime-only and stays out of serialized state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreState {
    profiles: HashMap<Uuid, UserProfile>,
    paths: HashMap<Uuid, LearningPath>,
    units: HashMap<Uuid, Unit>,
    lessons: HashMap<Uuid, Lesson>,
    words: Vec<VocabularyWord>,
    phrases: Vec<VocabularyPhrase>,
    #[serde(skip)]
    vocab_batch_sizes: Vec<usize>,
    #[serde(skip)]
    phrase_batch_sizes: Vec<usize>,
}

/// In-memory implementation of [`ContentStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_state(state: StoreState) -> Self {
        Self { state: RwLock::new(state) }
    }

    pub(crate) async fn snapshot(&self) -> StoreState {
        self.state.read().await.clone()
    }

    pub async fn path_count(&self) -> usize {
        self.state.read().await.paths.len()
    }

    pub async fn unit_count(&self) -> usize {
        self.state.read().await.units.len()
    }

    pub async fn lesson_count(&self) -> usize {
        self.state.read().await.lessons.len()
    }

    pub async fn word_count(&self) -> usize {
        self.state.read().await.words.len()
    }

    pub async fn phrase_count(&self) -> usize {
        self.state.read().await.phrases.len()
    }

    /// Sizes of the word batches inserted so far, in order.
    pub async fn vocab_batch_sizes(&self) -> Vec<usize> {
        self.state.read().await.vocab_batch_sizes.clone()
    }

    /// Sizes of the phrase batches inserted so far, in order.
    pub async fn phrase_batch_sizes(&self) -> Vec<usize> {
        self.state.read().await.phrase_batch_sizes.clone()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn user_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.state.read().await.profiles.get(&user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.state.write().await.profiles.insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn learning_path_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<LearningPath>, StoreError> {
        let state = self.state.read().await;
        let mut candidates: Vec<&LearningPath> =
            state.paths.values().filter(|path| path.user_id == user_id).collect();
        candidates.sort_by_key(|path| path.created_at);

        let chosen = candidates
            .iter()
            .rev()
            .find(|path| path.status != PathStatus::Failed)
            .copied()
            .or_else(|| candidates.last().copied());
        Ok(chosen.cloned())
    }

    async fn create_learning_path(&self, path: &LearningPath) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .paths
            .values()
            .find(|p| p.user_id == path.user_id && p.status != PathStatus::Failed)
        {
            return Err(StoreError::PathExists { status: existing.status });
        }
        state.paths.insert(path.id, path.clone());
        Ok(())
    }

    async fn update_path_status(
        &self,
        path_id: Uuid,
        status: PathStatus,
        generated_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let path = state
            .paths
            .get_mut(&path_id)
            .ok_or(StoreError::NotFound { entity: "learning path", id: path_id })?;
        path.status = status;
        if let Some(timestamp) = generated_at {
            path.generated_at = Some(timestamp);
        }
        Ok(())
    }

    async fn delete_learning_path(&self, path_id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.paths.remove(&path_id).is_none() {
            return Err(StoreError::NotFound { entity: "learning path", id: path_id });
        }

        let removed_units: HashSet<Uuid> = state
            .units
            .values()
            .filter(|unit| unit.path_id == path_id)
            .map(|unit| unit.id)
            .collect();
        state.units.retain(|_, unit| unit.path_id != path_id);
        state.lessons.retain(|_, lesson| !removed_units.contains(&lesson.unit_id));
        Ok(())
    }

    async fn insert_units(&self, units: &[Unit]) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        for unit in units {
            state.units.insert(unit.id, unit.clone());
        }
        Ok(())
    }

    async fn units_for_path(&self, path_id: Uuid) -> Result<Vec<Unit>, StoreError> {
        let state = self.state.read().await;
        let mut units: Vec<Unit> =
            state.units.values().filter(|unit| unit.path_id == path_id).cloned().collect();
        units.sort_by_key(|unit| unit.order_index);
        Ok(units)
    }

    async fn insert_lessons(&self, lessons: &[Lesson]) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        for lesson in lessons {
            state.lessons.insert(lesson.id, lesson.clone());
        }
        Ok(())
    }

    async fn lessons_for_unit(&self, unit_id: Uuid) -> Result<Vec<Lesson>, StoreError> {
        let state = self.state.read().await;
        let mut lessons: Vec<Lesson> =
            state.lessons.values().filter(|lesson| lesson.unit_id == unit_id).cloned().collect();
        lessons.sort_by_key(|lesson| lesson.order_index);
        Ok(lessons)
    }

    async fn set_lesson_content(
        &self,
        lesson_id: Uuid,
        content: &LessonContent,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let lesson = state
            .lessons
            .get_mut(&lesson_id)
            .ok_or(StoreError::NotFound { entity: "lesson", id: lesson_id })?;
        lesson.content = Some(content.clone());
        Ok(())
    }

    async fn insert_vocabulary_words(&self, words: &[VocabularyWord]) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.words.extend_from_slice(words);
        state.vocab_batch_sizes.push(words.len());
        Ok(())
    }

    async fn insert_vocabulary_phrases(
        &self,
        phrases: &[VocabularyPhrase],
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.phrases.extend_from_slice(phrases);
        state.phrase_batch_sizes.push(phrases.len());
        Ok(())
    }
}
