//! Lesson Data Model
//!
//! This module defines the lesson record as it lives in the curriculum
//! store, together with its two-state status lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The delivery status of a lesson.
///
/// A lesson starts `Pending` and moves to `Complete` exactly once, after
/// its content has been delivered. `Complete` is terminal; no code path
/// ever moves a lesson back to `Pending`.
///
/// Serialized lowercase (`"pending"` / `"complete"`) to match the store
/// encoding.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    Pending,
    Complete,
}

impl fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LessonStatus::Pending => write!(f, "pending"),
            LessonStatus::Complete => write!(f, "complete"),
        }
    }
}

impl FromStr for LessonStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(LessonStatus::Pending),
            "complete" => Ok(LessonStatus::Complete),
            other => Err(anyhow::anyhow!("unknown lesson status: '{}'", other)),
        }
    }
}

/// A single lesson in the curriculum.
///
/// The set of `Pending` lessons forms a queue totally ordered by `day`;
/// the controller always takes the minimum-`day` pending lesson next.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LessonRecord {
    /// Opaque identifier assigned by the store (the seeder uses the day
    /// number as the document ID).
    pub id: String,
    /// Position in the curriculum. Assumed unique per curriculum.
    pub day: u32,
    /// The subject this lesson teaches (e.g., "Gradient Descent").
    pub topic: String,
    pub status: LessonStatus,
}

impl LessonRecord {
    pub fn is_pending(&self) -> bool {
        self.status == LessonStatus::Pending
    }
}
