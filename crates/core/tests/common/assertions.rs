//! Event helpers for integration tests.

use lp_protocol::ipc::Event;
use lp_protocol::session_models::SessionPhase;
use lp_protocol::view_models::WidgetView;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

/// Take every event currently queued.
#[allow(dead_code)]
pub fn drain(rx: &mut UnboundedReceiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Reported progress values, with consecutive repeats collapsed.
#[allow(dead_code)]
pub fn progress_values(events: &[Event]) -> Vec<f64> {
    let mut values: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            Event::ProgressChanged { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect();
    values.dedup();
    values
}

#[allow(dead_code)]
pub fn phases(events: &[Event]) -> Vec<SessionPhase> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::PhaseChanged { phase, .. } => Some(*phase),
            _ => None,
        })
        .collect()
}

#[allow(dead_code)]
pub fn rejections(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::OpRejected { reason, .. } => Some(reason.clone()),
            _ => None,
        })
        .collect()
}

#[allow(dead_code)]
pub fn last_view(events: &[Event]) -> Option<&WidgetView> {
    events.iter().rev().find_map(|e| match e {
        Event::WidgetUpdated { view, .. } => Some(view),
        _ => None,
    })
}

#[allow(dead_code)]
pub fn count_completed(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::Completed { .. }))
        .count()
}

/// Events that belong to one session.
#[allow(dead_code)]
pub fn for_session(events: &[Event], session_id: Uuid) -> Vec<Event> {
    events
        .iter()
        .filter(|e| e.session_id() == session_id)
        .cloned()
        .collect()
}

/// Assert that a session ended by submitting: the result, then the reward,
/// then the close notification.
#[allow(dead_code)]
pub fn assert_completion_sequence(events: &[Event]) {
    let tail: Vec<&Event> = events.iter().rev().take(3).collect();
    assert!(
        matches!(tail.as_slice(), [Event::SessionClosed { .. }, Event::Rewarded { .. }, Event::Completed { .. }]),
        "Expected Completed, Rewarded, SessionClosed at the end, got: {:?}",
        tail
    );
    assert_eq!(count_completed(events), 1, "Completed must be sent once");
}
