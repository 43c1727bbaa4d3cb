//! Session snapshot transitions.
//!
//! Each function updates a `TaskSession` and emits the matching event, so the
//! snapshot and the event stream never disagree.

use chrono::Utc;
use lp_protocol::ipc::Event;
use lp_protocol::session_models::{SessionPhase, TaskSession};
use lp_protocol::task_models::{TaskDefinition, TaskResult};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Create a new session in the Collecting phase.
///
/// # Arguments
///
/// * `task_id` - Identifier of the task being completed
pub fn create_session(task_id: String) -> TaskSession {
    TaskSession {
        id: Uuid::new_v4(),
        task_id,
        phase: SessionPhase::Collecting,
        progress: 0.0,
        started_at: Utc::now(),
        finished_at: None,
    }
}

/// Record the latest progress and emit `ProgressChanged`.
pub fn report_progress(session: &mut TaskSession, events_tx: &UnboundedSender<Event>, percent: f64) {
    session.progress = percent;
    let _ = events_tx.send(Event::ProgressChanged {
        session_id: session.id,
        percent,
    });
}

/// Move to `phase`, emitting `PhaseChanged` only when it differs.
///
/// Terminal phases are never left.
///
/// # Returns
///
/// `true` if the phase changed.
pub fn advance_phase(
    session: &mut TaskSession,
    events_tx: &UnboundedSender<Event>,
    phase: SessionPhase,
) -> bool {
    if session.phase == phase || session.phase.is_terminal() {
        return false;
    }
    session.phase = phase;
    let _ = events_tx.send(Event::PhaseChanged {
        session_id: session.id,
        phase,
    });
    true
}

/// Mark the session as submitted and emit `Completed` followed by `Rewarded`.
///
/// # Arguments
///
/// * `session` - The session that produced `result`
/// * `events_tx` - Channel to send completion events
/// * `task` - The task definition, for the reward
/// * `result` - The payload emitted by the widget
pub fn complete_session(
    session: &mut TaskSession,
    events_tx: &UnboundedSender<Event>,
    task: &TaskDefinition,
    result: TaskResult,
) {
    advance_phase(session, events_tx, SessionPhase::Submitted);
    session.finished_at = Some(Utc::now());
    let _ = events_tx.send(Event::Completed {
        session_id: session.id,
        result,
    });
    let _ = events_tx.send(Event::Rewarded {
        session_id: session.id,
        reward: task.reward,
        xp: task.xp,
    });
}

/// Mark the session as unmounted and emit `SessionClosed`.
///
/// A submitted session keeps its Submitted phase.
pub fn close_session(session: &mut TaskSession, events_tx: &UnboundedSender<Event>) {
    advance_phase(session, events_tx, SessionPhase::Closed);
    if session.finished_at.is_none() {
        session.finished_at = Some(Utc::now());
    }
    let _ = events_tx.send(Event::SessionClosed {
        session_id: session.id,
    });
}
