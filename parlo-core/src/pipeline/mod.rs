//! Learning-path generation pipeline
//!
//! [`PathGenerator`] drives four stages in a fixed order: course outline,
//! per-unit lesson content, vocabulary, phrases. Stages run sequentially,
//! each under the configured deadline, with a progress checkpoint emitted
//! after each one completes. There are no internal retries: the first error
//! aborts the run, the path is best-effort marked failed, and the caller
//! decides whether to delete it and try again.

pub mod lessons;
pub mod outline;
pub mod params;
pub mod phrases;
pub mod progress;
pub mod prompts;
pub mod vocabulary;


pub use params::GenerationParams;
pub use progress::{ChannelObserver, NoopObserver, ProgressEvent, ProgressObserver, ProgressStep};

use crate::config::PipelineConfig;
use crate::llm::{GenerationProvider, ProviderError};
use crate::model::{LearningPath, PathStatus};
use crate::store::{ContentStore, StoreError};
use chrono::Utc;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

/// One step of the generation pipeline, used to tag errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Outline,
    Lessons,
    Vocabulary,
    Phrases,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Outline => "outline",
            Stage::Lessons => "lessons",
            Stage::Vocabulary => "vocabulary",
            Stage::Phrases => "phrases",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error type for pipeline runs.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The user has no profile to derive generation parameters from
    #[error("no profile found for user '{user_id}'")]
    ProfileNotFound { user_id: Uuid },

    /// The user already has a path that is generating or ready
    #[error("a learning path already exists with status '{status}'")]
    PathAlreadyExists { status: PathStatus },

    /// A provider call produced an error or unusable output
    #[error("{stage} stage failed: {source}")]
    Generation {
        stage: Stage,
        #[source]
        source: ProviderError,
    },

    /// A stage ran past its deadline
    #[error("{stage} stage timed out after {timeout:?}")]
    StageTimeout { stage: Stage, timeout: Duration },

    /// The store failed while persisting or reading content
    #[error("storage failure: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PathExists { status } => Self::PathAlreadyExists { status },
            other => Self::Store(other),
        }
    }
}

/// Orchestrates the four-stage learning-path generation workflow.
pub struct PathGenerator {
    provider: Arc<dyn GenerationProvider>,
    store: Arc<dyn ContentStore>,
    observer: Arc<dyn ProgressObserver>,
    config: PipelineConfig,
}

impl PathGenerator {
    pub fn new(
        provider: Arc<dyn GenerationProvider>,
        store: Arc<dyn ContentStore>,
        config: PipelineConfig,
    ) -> Self {
        Self { provider, store, observer: Arc::new(NoopObserver), config }
    }

    /// Replace the default no-op observer.
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Generate a complete learning path for the user and return its id.
    ///
    /// On failure the already-created path row is marked failed on a best
    /// effort basis; a failure of that status write is logged and swallowed
    /// so the stage error is what the caller sees. Nothing is written at all
    /// when the profile is missing or the user already has a non-failed
    /// path.
    pub async fn generate(&self, user_id: Uuid) -> Result<Uuid, PipelineError> {
        let profile = self
            .store
            .user_profile(user_id)
            .await?
            .ok_or(PipelineError::ProfileNotFound { user_id })?;
        let params = GenerationParams::from_profile(&profile);

        info!(
            user = %user_id,
            level = %params.level,
            goal = %params.goal,
            "starting learning path generation"
        );

        let path = LearningPath {
            id: Uuid::new_v4(),
            user_id,
            level: params.level,
            goal: params.goal.clone(),
            focus_areas: params.focus_areas.clone(),
            status: PathStatus::Generating,
            created_at: Utc::now(),
            generated_at: None,
        };
        self.store.create_learning_path(&path).await?;

        match self.run_stages(&path, &params).await {
            Ok(()) => {
                info!(path = %path.id, "learning path ready");
                Ok(path.id)
            }
            Err(err) => {
                error!(path = %path.id, error = %err, "learning path generation failed");
                self.mark_failed(path.id).await;
                Err(err)
            }
        }
    }

    async fn run_stages(
        &self,
        path: &LearningPath,
        params: &GenerationParams,
    ) -> Result<(), PipelineError> {
        let units = self
            .bounded(Stage::Outline, async {
                let outline =
                    outline::generate_course_outline(self.provider.as_ref(), params, &self.config)
                        .await?;
                outline::persist_outline(self.store.as_ref(), path.id, &outline).await
            })
            .await?;
        self.emit(ProgressStep::Outline, 25, "Course outline created");

        self.bounded(
            Stage::Lessons,
            lessons::generate_and_save_lesson_content(
                self.provider.as_ref(),
                self.store.as_ref(),
                &units,
                params,
            ),
        )
        .await?;
        self.emit(ProgressStep::Lessons, 50, "Lesson content generated");

        self.bounded(
            Stage::Vocabulary,
            vocabulary::generate_and_save_vocabulary(
                self.provider.as_ref(),
                self.store.as_ref(),
                path.user_id,
                params,
                &self.config,
            ),
        )
        .await?;
        self.emit(ProgressStep::Vocabulary, 75, "Vocabulary collection ready");

        self.bounded(
            Stage::Phrases,
            phrases::generate_and_save_phrases(
                self.provider.as_ref(),
                self.store.as_ref(),
                path.user_id,
                params,
                &self.config,
            ),
        )
        .await?;

        self.store.update_path_status(path.id, PathStatus::Ready, Some(Utc::now())).await?;
        self.emit(ProgressStep::Complete, 100, "Learning path ready");
        Ok(())
    }

    /// Run one stage under the configured deadline.
    async fn bounded<T>(
        &self,
        stage: Stage,
        work: impl Future<Output = Result<T, PipelineError>>,
    ) -> Result<T, PipelineError> {
        let timeout = self.config.stage_timeout();
        match tokio::time::timeout(timeout, work).await {
            Ok(result) => result,
            Err(_) => Err(PipelineError::StageTimeout { stage, timeout }),
        }
    }

    fn emit(&self, step: ProgressStep, progress: u8, message: &str) {
        self.observer.on_progress(&ProgressEvent::new(step, progress, message));
    }

    async fn mark_failed(&self, path_id: Uuid) {
        if let Err(err) = self.store.update_path_status(path_id, PathStatus::Failed, None).await {
            // Never mask the stage error with a status-write error.
            error!(path = %path_id, error = %err, "could not mark learning path as failed");
        }
    }
}
