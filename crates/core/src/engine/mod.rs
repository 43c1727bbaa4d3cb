//! Task runner.
//!
//! The TaskRunner hosts one mounted widget for the lifetime of a session. It
//! consumes `Op`s from a channel, drives the recording tick while the widget
//! is recording, and reports every state change as `Event`s.

use crate::capture::MicrophoneCapture;
use crate::state::session::{
    advance_phase, close_session, complete_session, create_session, report_progress,
};
use crate::widgets::{Applied, Change, TaskWidget, Widget, WidgetResult};
use lp_protocol::config_models::GlobalConfig;
use lp_protocol::ipc::{Event, Op};
use lp_protocol::session_models::TaskSession;
use lp_protocol::task_models::TaskDefinition;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

/// Whether the runner keeps going after handling an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Unmount,
}

/// Hosts one widget session.
pub struct TaskRunner {
    task: TaskDefinition,
    widget: Widget,
    session_id: Uuid,

    /// Shared snapshot, read by the SessionManager.
    session: Arc<Mutex<TaskSession>>,

    tick_interval: Duration,
    events_tx: UnboundedSender<Event>,
}

impl TaskRunner {
    /// Mount the widget for `task`.
    ///
    /// # Arguments
    ///
    /// * `task` - The task to complete
    /// * `settings` - Global settings (tick interval, box size, colors)
    /// * `capture` - Opens a microphone; only called for audio tasks
    /// * `events_tx` - Channel for sending events to the front-end
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::InvalidConfig` if the widget configuration is
    /// unusable.
    pub fn mount<F>(
        task: TaskDefinition,
        settings: &GlobalConfig,
        capture: F,
        events_tx: UnboundedSender<Event>,
    ) -> WidgetResult<Self>
    where
        F: FnOnce() -> Box<dyn MicrophoneCapture>,
    {
        let widget = Widget::from_config(&task.widget, settings, capture)?;
        let session = create_session(task.id.clone());

        Ok(Self {
            session_id: session.id,
            session: Arc::new(Mutex::new(session)),
            tick_interval: Duration::from_millis(settings.tick_interval_ms.max(1)),
            task,
            widget,
            events_tx,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Handle to the live session snapshot.
    pub fn snapshot(&self) -> Arc<Mutex<TaskSession>> {
        Arc::clone(&self.session)
    }

    /// Run until the widget submits, `Op::Close` arrives or the op channel
    /// closes. Returns the final snapshot.
    ///
    /// The widget, and with it any microphone it holds, is dropped before
    /// `SessionClosed` is sent.
    pub async fn run(self, mut ops_rx: UnboundedReceiver<Op>) -> TaskSession {
        let TaskRunner {
            task,
            mut widget,
            session_id,
            session,
            tick_interval,
            events_tx,
        } = self;

        info!(%session_id, task_id = %task.id, kind = %widget.kind(), "Session started");
        let _ = events_tx.send(Event::SessionStarted {
            session_id,
            task_id: task.id.clone(),
            kind: widget.kind(),
        });

        let mut host = Host {
            task: &task,
            session: &session,
            events_tx: &events_tx,
        };
        host.report(&widget, Change::State);

        let mut ticker = interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let recording = widget.is_recording();
            let flow = tokio::select! {
                op = ops_rx.recv() => match op {
                    None | Some(Op::Close) => Flow::Unmount,
                    Some(Op::StartRecording) => {
                        let flow = host.start_recording(&mut widget, &mut ops_rx).await;
                        ticker.reset();
                        flow
                    }
                    Some(op) => host.dispatch(&mut widget, op).await,
                },
                _ = ticker.tick(), if recording => {
                    let change = widget.tick();
                    host.report(&widget, change);
                    Flow::Continue
                }
            };

            if flow == Flow::Unmount || widget.is_submitted() {
                break;
            }
        }

        drop(widget);

        let mut snapshot = lock(&session);
        close_session(&mut snapshot, &events_tx);
        info!(%session_id, phase = ?snapshot.phase, "Session closed");
        snapshot.clone()
    }
}

/// Lock a session snapshot. A poisoned snapshot is still readable.
pub(crate) fn lock(session: &Mutex<TaskSession>) -> MutexGuard<'_, TaskSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Borrowed session context used while the widget is mounted.
struct Host<'a> {
    task: &'a TaskDefinition,
    session: &'a Arc<Mutex<TaskSession>>,
    events_tx: &'a UnboundedSender<Event>,
}

impl Host<'_> {
    /// Apply one op and report its outcome.
    async fn dispatch(&mut self, widget: &mut Widget, op: Op) -> Flow {
        let outcome = widget.apply(&op).await;
        self.handle(widget, &op, outcome);
        Flow::Continue
    }

    /// Start recording while still listening for ops.
    ///
    /// Acquiring the microphone may take a while. Closing the session in the
    /// meantime cancels the acquisition; other ops are queued and applied
    /// once it settles.
    async fn start_recording(
        &mut self,
        widget: &mut Widget,
        ops_rx: &mut UnboundedReceiver<Op>,
    ) -> Flow {
        let start = Op::StartRecording;
        let mut queued = VecDeque::new();
        let outcome = {
            let acquire = widget.apply(&start);
            tokio::pin!(acquire);
            loop {
                tokio::select! {
                    outcome = &mut acquire => break Some(outcome),
                    op = ops_rx.recv() => match op {
                        None | Some(Op::Close) => break None,
                        Some(op) => queued.push_back(op),
                    },
                }
            }
        };

        let Some(outcome) = outcome else {
            debug!("Session closed while acquiring the microphone");
            return Flow::Unmount;
        };
        self.handle(widget, &start, outcome);

        for op in queued {
            if widget.is_submitted() {
                break;
            }
            self.dispatch(widget, op).await;
        }
        Flow::Continue
    }

    fn handle(&mut self, widget: &Widget, op: &Op, outcome: WidgetResult<Applied>) {
        match outcome {
            Ok(applied) => {
                self.report(widget, applied.change);
                if let Some(result) = applied.result {
                    let mut session = lock(self.session);
                    info!(session_id = %session.id, kind = %result.kind(), "Task submitted");
                    complete_session(&mut session, self.events_tx, self.task, result);
                }
            }
            Err(error) => {
                let session_id = lock(self.session).id;
                debug!(%session_id, op = op.name(), %error, "Operation rejected");
                let _ = self.events_tx.send(Event::OpRejected {
                    session_id,
                    reason: error.to_string(),
                });
            }
        }
    }

    /// Emit the events that follow a change.
    ///
    /// `ProgressChanged` only follows state changes; every change refreshes
    /// the view and may move the phase.
    fn report(&mut self, widget: &Widget, change: Change) {
        if change.is_none() {
            return;
        }

        let mut session = lock(self.session);
        if change == Change::State {
            report_progress(&mut session, self.events_tx, widget.progress());
        }
        let _ = self.events_tx.send(Event::WidgetUpdated {
            session_id: session.id,
            view: widget.view(),
        });
        advance_phase(&mut session, self.events_tx, widget.phase());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SimulatedMicrophone;
    use lp_protocol::session_models::SessionPhase;
    use lp_protocol::task_models::{ImageAnnotationConfig, WidgetConfig};
    use tokio::sync::mpsc::unbounded_channel;

    fn image_task() -> TaskDefinition {
        TaskDefinition {
            id: "street-scene".to_string(),
            title: "Label Objects in Street Scene".to_string(),
            description: String::new(),
            reward: 0.45,
            xp: 8,
            widget: WidgetConfig::ImageAnnotation(ImageAnnotationConfig {
                image_urls: vec!["/street.png".to_string()],
                objects_to_label: vec!["Car".to_string()],
            }),
        }
    }

    fn mic() -> Box<dyn MicrophoneCapture> {
        Box::new(SimulatedMicrophone::granted())
    }

    #[tokio::test]
    async fn test_runner_mount_creates_collecting_session() {
        let (tx, _rx) = unbounded_channel();
        let runner = TaskRunner::mount(image_task(), &GlobalConfig::default(), mic, tx).unwrap();

        let snapshot = runner.snapshot();
        let session = snapshot.lock().unwrap();
        assert_eq!(session.id, runner.session_id());
        assert_eq!(session.task_id, "street-scene");
        assert_eq!(session.phase, SessionPhase::Collecting);
    }

    #[tokio::test]
    async fn test_runner_closes_when_channel_drops() {
        let (events_tx, mut events_rx) = unbounded_channel();
        let (ops_tx, ops_rx) = unbounded_channel();
        let runner =
            TaskRunner::mount(image_task(), &GlobalConfig::default(), mic, events_tx).unwrap();

        drop(ops_tx);
        let session = runner.run(ops_rx).await;
        assert_eq!(session.phase, SessionPhase::Closed);

        let mut events = Vec::new();
        while let Ok(event) = events_rx.try_recv() {
            events.push(event);
        }
        assert!(matches!(events.first(), Some(Event::SessionStarted { .. })));
        assert!(matches!(events.last(), Some(Event::SessionClosed { .. })));
    }

    #[tokio::test]
    async fn test_runner_rejects_unsupported_op() {
        let (events_tx, mut events_rx) = unbounded_channel();
        let (ops_tx, ops_rx) = unbounded_channel();
        let runner =
            TaskRunner::mount(image_task(), &GlobalConfig::default(), mic, events_tx).unwrap();

        ops_tx.send(Op::NextQuestion).unwrap();
        ops_tx.send(Op::Close).unwrap();
        runner.run(ops_rx).await;

        let mut rejected = Vec::new();
        while let Ok(event) = events_rx.try_recv() {
            if let Event::OpRejected { reason, .. } = event {
                rejected.push(reason);
            }
        }
        assert_eq!(rejected.len(), 1);
        assert!(rejected[0].contains("nextQuestion"));
    }
}
