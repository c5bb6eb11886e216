//! Lesson Progression Controller
//!
//! This module implements the state machine that advances the curriculum.
//! Each run selects the minimum-`day` pending lesson, generates its
//! content, delivers it, and only then commits the pending→complete
//! transition:
//!
//! ```text
//! pending --[generate ok, deliver ok, commit ok]--> complete   (terminal)
//! pending --[any step fails]--> pending                         (unchanged)
//! ```
//!
//! There is no persisted in-progress state and no automatic retry; a
//! failed run leaves the record pending, so re-invocation retries the
//! same lesson by construction. The one exception is a failed commit
//! after a successful delivery, which leaves a delivered-but-pending
//! record: the next run will regenerate and resend that lesson.

use crate::generator::LessonGenerator;
use crate::prompt;
use crate::sink::MessageSink;
use crate::store::CurriculumStore;
use std::sync::Arc;
use tracing::{error, info};

/// The result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A lesson was generated, delivered, and marked complete.
    LessonDelivered { day: u32, topic: String },
    /// No pending lessons remain; the completion notice was delivered.
    NoPendingLesson,
}

/// The ways a run can fail.
///
/// Every variant leaves the selected record's status untouched except
/// `CommitFailed`, where the lesson was already delivered and only the
/// status write was lost. Re-running after `CommitFailed` sends the
/// same lesson again.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The curriculum query itself failed; no record was selected.
    #[error("curriculum query failed: {source}")]
    Store {
        #[source]
        source: anyhow::Error,
    },
    /// The generator returned an error or unusable content.
    #[error("lesson generation failed for day {day}: {source}")]
    GenerationFailed {
        day: u32,
        #[source]
        source: anyhow::Error,
    },
    /// The message sink did not confirm delivery.
    #[error("delivery to the message sink failed: {source}")]
    DeliveryFailed {
        #[source]
        source: anyhow::Error,
    },
    /// Delivery succeeded but the status write did not.
    #[error("lesson for day {day} was delivered but could not be marked complete: {source}")]
    CommitFailed {
        day: u32,
        #[source]
        source: anyhow::Error,
    },
}

/// Owns one pass over the curriculum.
///
/// Collaborators are injected as trait objects so runs can be driven
/// against any store, generator, or sink implementation. The controller
/// assumes it is the only instance running against a given store;
/// callers serialize invocations externally.
pub struct LessonProgressionController {
    store: Arc<dyn CurriculumStore>,
    generator: Arc<dyn LessonGenerator>,
    sink: Arc<dyn MessageSink>,
}

impl LessonProgressionController {
    pub fn new(
        store: Arc<dyn CurriculumStore>,
        generator: Arc<dyn LessonGenerator>,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        Self {
            store,
            generator,
            sink,
        }
    }

    /// Runs the progression state machine once.
    ///
    /// At most one store mutation happens per run, and only after the
    /// sink has confirmed delivery.
    pub async fn run_once(&self) -> Result<RunOutcome, RunError> {
        let lesson = self
            .store
            .next_pending()
            .await
            .map_err(|source| RunError::Store { source })?;

        let Some(lesson) = lesson else {
            info!("No pending lessons remain; sending completion notice");
            self.sink
                .send(prompt::CURRICULUM_COMPLETE_NOTICE)
                .await
                .map_err(|source| RunError::DeliveryFailed { source })?;
            return Ok(RunOutcome::NoPendingLesson);
        };

        info!(day = lesson.day, topic = %lesson.topic, "Selected next pending lesson");

        let text = self
            .generator
            .generate_lesson(&lesson.topic)
            .await
            .map_err(|source| RunError::GenerationFailed {
                day: lesson.day,
                source,
            })?;

        self.sink
            .send(&text)
            .await
            .map_err(|source| RunError::DeliveryFailed { source })?;

        if let Err(source) = self.store.mark_complete(&lesson.id).await {
            // Delivered-but-pending: the next run will resend this lesson.
            error!(
                day = lesson.day,
                topic = %lesson.topic,
                "Lesson was delivered but the status write failed; re-running will send a duplicate"
            );
            return Err(RunError::CommitFailed {
                day: lesson.day,
                source,
            });
        }

        info!(day = lesson.day, topic = %lesson.topic, "Lesson delivered and marked complete");
        Ok(RunOutcome::LessonDelivered {
            day: lesson.day,
            topic: lesson.topic,
        })
    }
}
