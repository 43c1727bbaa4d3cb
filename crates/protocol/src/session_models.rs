//! Runtime session models.
//!
//! A session is one mount of a task widget. Nothing in it outlives the mount:
//! opening the same task again starts from an empty session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Where a session stands relative to submission.
///
/// The phase progresses through these states during normal use:
/// Collecting <-> EligibleForSubmit -> Submitted
///
/// `Closed` marks a session that was unmounted before submitting.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    /// The completion predicate does not hold yet.
    Collecting,

    /// The completion predicate holds; submit is enabled.
    ///
    /// A session can fall back to Collecting (undo, reset, clear).
    EligibleForSubmit,

    /// The result was emitted. Terminal.
    Submitted,

    /// The widget was unmounted without submitting. Terminal.
    Closed,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Submitted | SessionPhase::Closed)
    }
}

/// Snapshot of a task session.
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct TaskSession {
    #[ts(type = "string")]
    pub id: Uuid,

    /// Identifier of the task definition this session completes.
    pub task_id: String,

    pub phase: SessionPhase,

    /// Last reported progress, 0 to 100.
    pub progress: f64,

    #[ts(type = "string")]
    pub started_at: DateTime<Utc>,

    #[ts(type = "string | null")]
    pub finished_at: Option<DateTime<Utc>>,
}
