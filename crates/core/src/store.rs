//! Curriculum Store Contract
//!
//! This module defines the interface the controller uses to read and
//! advance the curriculum, plus an in-memory implementation for
//! development and testing.

use crate::lesson::{LessonRecord, LessonStatus};
use anyhow::{Result, bail};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Defines the contract for any store that holds the curriculum.
///
/// Implementations may delegate ordering to a server-side query (as the
/// Firestore store does) or scan in memory, but the contract is the
/// same either way: `next_pending` must return the pending lesson with
/// the strictly minimum `day`, or `None` when the curriculum is
/// exhausted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CurriculumStore: Send + Sync {
    /// Returns the minimum-`day` pending lesson, if any.
    async fn next_pending(&self) -> Result<Option<LessonRecord>>;

    /// Marks the lesson with the given ID as complete.
    ///
    /// The transition is monotonic; implementations never move a lesson
    /// back to pending.
    async fn mark_complete(&self, id: &str) -> Result<()>;
}

/// An in-memory `CurriculumStore` for development and testing.
///
/// Provides the same ordering contract as the real store without any
/// external dependency, so the controller's selection behavior can be
/// verified against a plain `Vec` of lessons.
pub struct MemoryCurriculumStore {
    lessons: Mutex<Vec<LessonRecord>>,
}

impl MemoryCurriculumStore {
    pub fn new(lessons: Vec<LessonRecord>) -> Self {
        Self {
            lessons: Mutex::new(lessons),
        }
    }
}

#[async_trait]
impl CurriculumStore for MemoryCurriculumStore {
    async fn next_pending(&self) -> Result<Option<LessonRecord>> {
        let lessons = self.lessons.lock().await;
        Ok(lessons
            .iter()
            .filter(|lesson| lesson.is_pending())
            .min_by_key(|lesson| lesson.day)
            .cloned())
    }

    async fn mark_complete(&self, id: &str) -> Result<()> {
        let mut lessons = self.lessons.lock().await;
        match lessons.iter_mut().find(|lesson| lesson.id == id) {
            Some(lesson) => {
                lesson.status = LessonStatus::Complete;
                Ok(())
            }
            None => bail!("no lesson with id '{}' in store", id),
        }
    }
}
