//! Messages exchanged between a front-end and a running task session.
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: user input sent from the front-end to a session
//! - `Event`: state updates sent from sessions to the front-end
//!
//! Both are tagged for TypeScript compatibility:
//! ```json
//! { "type": "pointerDown", "payload": { "x": 120.0, "y": 48.5 } }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::session_models::SessionPhase;
use crate::task_models::{TaskKind, TaskResult};
use crate::view_models::WidgetView;

/// Input operations for a task session.
///
/// Each widget understands its own subset; `Submit` and `Close` apply to all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Choose the label for boxes drawn from now on.
    SelectLabel { label: String },

    /// Pointer pressed on the annotation canvas.
    PointerDown { x: f64, y: f64 },

    /// Pointer moved while pressed.
    PointerMove { x: f64, y: f64 },

    /// Pointer released.
    PointerUp,

    /// Pointer left the canvas; treated like a release.
    PointerLeave,

    /// Remove the most recently added box of the current image.
    Undo,

    /// Remove every box of the current image.
    Clear,

    PreviousImage,
    NextImage,

    /// Request the microphone and begin a take.
    StartRecording,

    /// Finish the current take.
    StopRecording,

    /// Discard the captured take.
    ResetRecording,

    /// Answer the current question.
    SelectOption { option: String },

    PreviousQuestion,
    NextQuestion,
    JumpToQuestion { index: usize },

    /// Emit the result if the completion predicate holds.
    Submit,

    /// Unmount the widget and release its resources.
    Close,
}

impl Op {
    /// Short name used in logs and rejection messages.
    pub fn name(&self) -> &'static str {
        match self {
            Op::SelectLabel { .. } => "selectLabel",
            Op::PointerDown { .. } => "pointerDown",
            Op::PointerMove { .. } => "pointerMove",
            Op::PointerUp => "pointerUp",
            Op::PointerLeave => "pointerLeave",
            Op::Undo => "undo",
            Op::Clear => "clear",
            Op::PreviousImage => "previousImage",
            Op::NextImage => "nextImage",
            Op::StartRecording => "startRecording",
            Op::StopRecording => "stopRecording",
            Op::ResetRecording => "resetRecording",
            Op::SelectOption { .. } => "selectOption",
            Op::PreviousQuestion => "previousQuestion",
            Op::NextQuestion => "nextQuestion",
            Op::JumpToQuestion { .. } => "jumpToQuestion",
            Op::Submit => "submit",
            Op::Close => "close",
        }
    }
}

/// Events sent from task sessions to the front-end.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A widget was mounted for a task.
    SessionStarted {
        #[ts(type = "string")]
        session_id: Uuid,
        task_id: String,
        kind: TaskKind,
    },

    /// Progress after a state-affecting change, 0 to 100.
    ProgressChanged {
        #[ts(type = "string")]
        session_id: Uuid,
        percent: f64,
    },

    /// The session moved to another phase (e.g. submit became enabled).
    PhaseChanged {
        #[ts(type = "string")]
        session_id: Uuid,
        phase: SessionPhase,
    },

    /// Fresh render snapshot of the widget.
    WidgetUpdated {
        #[ts(type = "string")]
        session_id: Uuid,
        view: WidgetView,
    },

    /// An operation was ignored; the session state is unchanged.
    OpRejected {
        #[ts(type = "string")]
        session_id: Uuid,
        reason: String,
    },

    /// The widget emitted its result. Sent at most once per session.
    Completed {
        #[ts(type = "string")]
        session_id: Uuid,
        result: TaskResult,
    },

    /// Reward credited for a completed task.
    Rewarded {
        #[ts(type = "string")]
        session_id: Uuid,
        reward: f64,
        xp: u32,
    },

    /// The widget was unmounted and its resources released.
    SessionClosed {
        #[ts(type = "string")]
        session_id: Uuid,
    },
}

impl Event {
    pub fn session_id(&self) -> Uuid {
        match self {
            Event::SessionStarted { session_id, .. }
            | Event::ProgressChanged { session_id, .. }
            | Event::PhaseChanged { session_id, .. }
            | Event::WidgetUpdated { session_id, .. }
            | Event::OpRejected { session_id, .. }
            | Event::Completed { session_id, .. }
            | Event::Rewarded { session_id, .. }
            | Event::SessionClosed { session_id } => *session_id,
        }
    }
}
