//! Event handling utilities for the TUI.
//!
//! This module provides functions for handling different types of events:
//! - Core events (from a running task session)
//! - Keyboard events (task list navigation and widget shortcuts)
//! - Mouse events (drawing boxes on the annotation canvas)

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use lp_protocol::audio_models::RecordingState;
use lp_protocol::ipc::{Event, Op};
use lp_protocol::task_models::TaskDefinition;
use lp_protocol::view_models::WidgetView;
use uuid::Uuid;

use crate::app::{ActiveSession, Wallet};
use crate::widgets::annotation_canvas::cell_to_canvas;

/// What the app should do in response to an input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Quit,
    /// Open a session for the task with this id.
    Open(String),
    /// Forward an operation to the active session.
    Send(Op),
    /// Unmount the active session without submitting.
    Close,
}

/// Apply an event received from a task session.
///
/// Returns the id of the active session once it has closed, so the caller
/// can reap it from the session manager.
pub fn handle_core_event(
    active: &mut Option<ActiveSession>,
    wallet: &mut Wallet,
    event: Event,
) -> Option<Uuid> {
    if let Event::Rewarded { reward, xp, .. } = &event {
        wallet.balance += reward;
        wallet.xp += xp;
    }

    let session = active.as_mut().filter(|s| s.session_id == event.session_id())?;

    match event {
        Event::SessionStarted { .. } => {}
        Event::ProgressChanged { percent, .. } => {
            session.progress = percent;
        }
        Event::PhaseChanged { phase, .. } => {
            session.phase = phase;
        }
        Event::WidgetUpdated { view, .. } => {
            session.view = Some(view);
            session.notice = None;
        }
        Event::OpRejected { reason, .. } => {
            session.notice = Some(reason);
        }
        Event::Completed { .. } => {
            session.completed = true;
        }
        Event::Rewarded { .. } => {
            if !wallet.completed.contains(&session.task.id) {
                wallet.completed.push(session.task.id.clone());
            }
        }
        Event::SessionClosed { session_id } => {
            *active = None;
            return Some(session_id);
        }
    }
    None
}

/// Handle a keyboard event from the user.
pub fn handle_keyboard_event(
    key_event: KeyEvent,
    tasks: &[TaskDefinition],
    selected_index: &mut usize,
    active: Option<&ActiveSession>,
) -> Action {
    if key_event.kind != KeyEventKind::Press {
        return Action::None;
    }
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Action::Quit;
    }

    let Some(session) = active else {
        return handle_task_list_key(key_event.code, tasks, selected_index);
    };

    match key_event.code {
        KeyCode::Esc => return Action::Close,
        KeyCode::Char('s') => return Action::Send(Op::Submit),
        _ => {}
    }

    let op = match &session.view {
        Some(WidgetView::ImageAnnotation(view)) => match key_event.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                nth_by_digit(&view.labels, c).map(|label| Op::SelectLabel { label })
            }
            KeyCode::Tab => {
                let current = view.labels.iter().position(|l| *l == view.selected_label);
                let next = current.map_or(0, |i| (i + 1) % view.labels.len().max(1));
                view.labels
                    .get(next)
                    .cloned()
                    .map(|label| Op::SelectLabel { label })
            }
            KeyCode::Char('u') => Some(Op::Undo),
            KeyCode::Char('c') => Some(Op::Clear),
            KeyCode::Left | KeyCode::Char('h') => Some(Op::PreviousImage),
            KeyCode::Right | KeyCode::Char('l') => Some(Op::NextImage),
            _ => None,
        },
        Some(WidgetView::AudioRecording(view)) => match key_event.code {
            KeyCode::Char(' ') | KeyCode::Char('r') => match view.state {
                RecordingState::Idle => Some(Op::StartRecording),
                RecordingState::Recording => Some(Op::StopRecording),
                RecordingState::Recorded => None,
            },
            KeyCode::Char('x') => Some(Op::ResetRecording),
            _ => None,
        },
        Some(WidgetView::TextClassification(view)) => match key_event.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                nth_by_digit(&view.question.options, c).map(|option| Op::SelectOption { option })
            }
            KeyCode::Left | KeyCode::Char('h') => Some(Op::PreviousQuestion),
            KeyCode::Right | KeyCode::Char('l') => Some(Op::NextQuestion),
            KeyCode::Home => Some(Op::JumpToQuestion { index: 0 }),
            KeyCode::End => Some(Op::JumpToQuestion {
                index: view.question_count.saturating_sub(1),
            }),
            KeyCode::Char('n') => view
                .answered
                .iter()
                .position(|answered| !answered)
                .map(|index| Op::JumpToQuestion { index }),
            _ => None,
        },
        None => None,
    };

    op.map_or(Action::None, Action::Send)
}

fn handle_task_list_key(
    code: KeyCode,
    tasks: &[TaskDefinition],
    selected_index: &mut usize,
) -> Action {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Up | KeyCode::Char('k') => {
            *selected_index = selected_index.saturating_sub(1);
            Action::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if *selected_index < tasks.len().saturating_sub(1) {
                *selected_index += 1;
            }
            Action::None
        }
        KeyCode::Enter => tasks
            .get(*selected_index)
            .map_or(Action::None, |task| Action::Open(task.id.clone())),
        _ => Action::None,
    }
}

/// `'1'` picks the first item, `'9'` the ninth; `'0'` picks nothing.
fn nth_by_digit(items: &[String], digit: char) -> Option<String> {
    let n = digit.to_digit(10)? as usize;
    items.get(n.checked_sub(1)?).cloned()
}

/// Translate mouse input over the annotation canvas into pointer ops.
///
/// A drag that leaves the canvas ends the draw with `PointerLeave`.
pub fn handle_mouse_event(mouse_event: MouseEvent, session: &mut ActiveSession) -> Option<Op> {
    let Some(WidgetView::ImageAnnotation(view)) = &session.view else {
        return None;
    };
    let inner = session.canvas_area?;
    let point = cell_to_canvas(
        inner,
        view.canvas_width,
        view.canvas_height,
        mouse_event.column,
        mouse_event.row,
    );

    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let (x, y) = point?;
            session.pointer_down = true;
            Some(Op::PointerDown { x, y })
        }
        MouseEventKind::Drag(MouseButton::Left) if session.pointer_down => match point {
            Some((x, y)) => Some(Op::PointerMove { x, y }),
            None => {
                session.pointer_down = false;
                Some(Op::PointerLeave)
            }
        },
        MouseEventKind::Up(MouseButton::Left) if session.pointer_down => {
            session.pointer_down = false;
            Some(Op::PointerUp)
        }
        _ => None,
    }
}
