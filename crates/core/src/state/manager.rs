//! Session manager for coordinating concurrent task sessions.
//!
//! The SessionManager opens a TaskRunner per session, routes operations to it
//! and keeps the session snapshots queryable. Sessions share nothing but the
//! event channel.

use crate::capture::{MicrophoneCapture, SimulatedMicrophone};
use crate::config::models::AppConfig;
use crate::engine::{lock, TaskRunner};
use crate::widgets::WidgetError;
use lp_protocol::ipc::{Event, Op};
use lp_protocol::session_models::TaskSession;
use lp_protocol::task_models::TaskDefinition;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as SnapshotMutex};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::warn;
use uuid::Uuid;

/// Opens a microphone for a new audio session.
pub type CaptureFactory = Arc<dyn Fn() -> Box<dyn MicrophoneCapture> + Send + Sync>;

/// Errors returned by the SessionManager.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    /// The session finished and no longer accepts operations.
    #[error("Session {0} has ended")]
    SessionEnded(Uuid),

    #[error(transparent)]
    Widget(#[from] WidgetError),

    #[error("Session task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type SessionResult<T> = Result<T, SessionError>;

struct SessionEntry {
    snapshot: Arc<SnapshotMutex<TaskSession>>,
    ops_tx: UnboundedSender<Op>,
    handle: JoinHandle<TaskSession>,
}

/// Manages all open task sessions.
///
/// The SessionManager provides a centralized interface for:
/// - Opening a session for a task from the catalog
/// - Sending operations to a session
/// - Closing sessions
/// - Querying session snapshots
pub struct SessionManager {
    config: AppConfig,
    capture: CaptureFactory,

    /// Registry of open sessions, indexed by their UUID.
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,

    /// Channel for sending events to the front-end.
    events_tx: UnboundedSender<Event>,
}

impl SessionManager {
    /// Create a SessionManager whose audio sessions use a simulated
    /// microphone.
    pub fn new(config: AppConfig, events_tx: UnboundedSender<Event>) -> Self {
        let capture: CaptureFactory =
            Arc::new(|| Box::new(SimulatedMicrophone::granted()) as Box<dyn MicrophoneCapture>);
        Self::with_capture(config, capture, events_tx)
    }

    /// Create a SessionManager with a custom microphone factory.
    pub fn with_capture(
        config: AppConfig,
        capture: CaptureFactory,
        events_tx: UnboundedSender<Event>,
    ) -> Self {
        Self {
            config,
            capture,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            events_tx,
        }
    }

    /// The task catalog.
    pub fn tasks(&self) -> &[TaskDefinition] {
        &self.config.tasks
    }

    /// Mount the widget for `task_id` and start its runner in the background.
    ///
    /// # Returns
    ///
    /// The UUID of the new session.
    ///
    /// # Errors
    ///
    /// Returns `TaskNotFound` for an unknown task id, or `Widget` if the task's
    /// widget configuration is unusable.
    pub async fn open_task(&self, task_id: &str) -> SessionResult<Uuid> {
        let task = self
            .config
            .find_task(task_id)
            .cloned()
            .ok_or_else(|| SessionError::TaskNotFound(task_id.to_string()))?;

        let capture = Arc::clone(&self.capture);
        let runner = TaskRunner::mount(
            task,
            &self.config.global,
            move || capture(),
            self.events_tx.clone(),
        )?;

        let session_id = runner.session_id();
        let snapshot = runner.snapshot();
        let (ops_tx, ops_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(runner.run(ops_rx));

        let mut sessions = self.sessions.lock().await;
        sessions.insert(
            session_id,
            SessionEntry {
                snapshot,
                ops_tx,
                handle,
            },
        );
        Ok(session_id)
    }

    /// Send an operation to a session.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` for an unknown session, or `SessionEnded` if
    /// the session already submitted or closed.
    pub async fn send_op(&self, session_id: Uuid, op: Op) -> SessionResult<()> {
        let sessions = self.sessions.lock().await;
        let entry = sessions
            .get(&session_id)
            .ok_or(SessionError::SessionNotFound(session_id))?;
        entry
            .ops_tx
            .send(op)
            .map_err(|_| SessionError::SessionEnded(session_id))
    }

    /// Unmount a session and wait for its runner to release its resources.
    ///
    /// # Returns
    ///
    /// The final session snapshot.
    pub async fn close_session(&self, session_id: Uuid) -> SessionResult<TaskSession> {
        let entry = {
            let mut sessions = self.sessions.lock().await;
            sessions
                .remove(&session_id)
                .ok_or(SessionError::SessionNotFound(session_id))?
        };

        // The runner may already have finished after a submit.
        let _ = entry.ops_tx.send(Op::Close);
        drop(entry.ops_tx);

        match entry.handle.await {
            Ok(session) => Ok(session),
            Err(e) => {
                warn!(%session_id, error = %e, "Session runner failed");
                Err(SessionError::Join(e))
            }
        }
    }

    /// Get the current snapshot of a session.
    pub async fn get_session(&self, session_id: Uuid) -> Option<TaskSession> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(&session_id)
            .map(|entry| lock(&entry.snapshot).clone())
    }

    /// Get snapshots of all open sessions, oldest first.
    pub async fn sessions(&self) -> Vec<TaskSession> {
        let sessions = self.sessions.lock().await;
        let mut result: Vec<TaskSession> = sessions
            .values()
            .map(|entry| lock(&entry.snapshot).clone())
            .collect();
        result.sort_by_key(|session| session.started_at);
        result
    }

    /// Get the number of open sessions.
    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.lock().await;
        sessions.len()
    }

    /// Close every open session.
    pub async fn shutdown(&self) {
        let ids: Vec<Uuid> = self.sessions.lock().await.keys().copied().collect();
        for session_id in ids {
            let _ = self.close_session(session_id).await;
        }
    }
}
