//! TUI application state and event loop.
//!
//! `App` owns the `SessionManager` and at most one active session. Input is
//! turned into `Op`s for that session; its events come back on `event_rx`
//! and update the view state, which is redrawn on the next frame.

use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use lp_core::state::manager::SessionManager;
use lp_protocol::ipc::{Event, Op};
use lp_protocol::session_models::SessionPhase;
use lp_protocol::task_models::TaskDefinition;
use lp_protocol::view_models::WidgetView;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::select;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_stream::StreamExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::event_handler::{self, Action};
use crate::tui::{Tui, TuiEvent};
use crate::widgets::{render_task_list, render_task_view};

/// Earnings of this run.
#[derive(Debug, Clone, Default)]
pub struct Wallet {
    /// POOL credited so far.
    pub balance: f64,
    pub xp: u32,
    /// Ids of tasks submitted, in completion order.
    pub completed: Vec<String>,
}

/// Front-end state of the mounted task session.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub session_id: Uuid,
    pub task: TaskDefinition,
    /// Last snapshot sent by the widget; `None` until the first update.
    pub view: Option<WidgetView>,
    pub progress: f64,
    pub phase: SessionPhase,
    /// Reason of the last rejected op, cleared by the next update.
    pub notice: Option<String>,
    pub completed: bool,
    /// Inner area of the annotation canvas in the last frame.
    pub canvas_area: Option<Rect>,
    /// A left-button draw is in progress on the canvas.
    pub pointer_down: bool,
}

impl ActiveSession {
    pub fn new(session_id: Uuid, task: TaskDefinition) -> Self {
        Self {
            session_id,
            task,
            view: None,
            progress: 0.0,
            phase: SessionPhase::Collecting,
            notice: None,
            completed: false,
            canvas_area: None,
            pointer_down: false,
        }
    }
}

pub struct App {
    pub manager: SessionManager,
    pub event_rx: UnboundedReceiver<Event>,
    /// Highlighted row of the task list.
    pub selected_index: usize,
    pub active: Option<ActiveSession>,
    pub wallet: Wallet,
    /// One-line message for the status bar.
    pub status: Option<String>,
    pub should_exit: bool,
}

impl App {
    pub fn new(manager: SessionManager, event_rx: UnboundedReceiver<Event>) -> Self {
        Self {
            manager,
            event_rx,
            selected_index: 0,
            active: None,
            wallet: Wallet::default(),
            status: None,
            should_exit: false,
        }
    }

    /// Main event loop.
    ///
    /// Uses `tokio::select!` to handle terminal input and session events
    /// concurrently. Open sessions are closed before returning.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut tui_events = tui.event_stream();
        let frames = tui.frame_requester();

        frames.schedule_frame();

        while !self.should_exit {
            select! {
                Some(event) = self.event_rx.recv() => {
                    self.handle_core_event(event).await;
                    frames.schedule_frame();
                }
                Some(tui_event) = tui_events.next() => {
                    match tui_event {
                        TuiEvent::Key(key_event) => {
                            self.handle_key_event(key_event).await;
                            frames.schedule_frame();
                        }
                        TuiEvent::Mouse(mouse_event) => {
                            self.handle_mouse_event(mouse_event).await;
                        }
                        TuiEvent::Draw => {
                            tui.draw(|frame| self.render(frame))?;
                        }
                    }
                }
                else => break,
            }
        }

        self.manager.shutdown().await;
        Ok(())
    }

    /// Apply a session event; reap the session once it has closed.
    async fn handle_core_event(&mut self, event: Event) {
        // Completed always precedes SessionClosed, so the flag is final here.
        let ending = self.active.as_ref().map(|s| {
            if s.completed {
                format!(
                    "Submitted \"{}\": +{:.2} POOL, +{} XP",
                    s.task.title, s.task.reward, s.task.xp
                )
            } else {
                format!("Closed \"{}\"", s.task.title)
            }
        });

        let Some(session_id) =
            event_handler::handle_core_event(&mut self.active, &mut self.wallet, event)
        else {
            return;
        };

        if let Err(e) = self.manager.close_session(session_id).await {
            debug!(%session_id, error = %e, "Session already reaped");
        }
        self.status = ending;
    }

    async fn handle_key_event(&mut self, key_event: KeyEvent) {
        let action = event_handler::handle_keyboard_event(
            key_event,
            self.manager.tasks(),
            &mut self.selected_index,
            self.active.as_ref(),
        );
        self.dispatch(action).await;
    }

    async fn handle_mouse_event(&mut self, mouse_event: MouseEvent) {
        let Some(session) = self.active.as_mut() else {
            return;
        };
        if let Some(op) = event_handler::handle_mouse_event(mouse_event, session) {
            let session_id = session.session_id;
            self.send(session_id, op).await;
        }
    }

    async fn dispatch(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Quit => {
                self.should_exit = true;
            }
            Action::Open(task_id) => self.open(&task_id).await,
            Action::Send(op) => {
                if let Some(session_id) = self.active.as_ref().map(|s| s.session_id) {
                    self.send(session_id, op).await;
                }
            }
            Action::Close => {
                let Some(session) = self.active.take() else {
                    return;
                };
                if let Err(e) = self.manager.close_session(session.session_id).await {
                    warn!(session_id = %session.session_id, error = %e, "Failed to close session");
                }
                self.status = Some(format!("Closed \"{}\"", session.task.title));
            }
        }
    }

    async fn open(&mut self, task_id: &str) {
        if self.active.is_some() {
            return;
        }
        let Some(task) = self.manager.tasks().iter().find(|t| t.id == task_id).cloned() else {
            return;
        };
        match self.manager.open_task(task_id).await {
            Ok(session_id) => {
                self.active = Some(ActiveSession::new(session_id, task));
                self.status = None;
            }
            Err(e) => {
                warn!(task_id, error = %e, "Failed to open task");
                self.status = Some(format!("Could not open \"{}\": {e}", task.title));
            }
        }
    }

    async fn send(&mut self, session_id: Uuid, op: Op) {
        if let Err(e) = self.manager.send_op(session_id, op).await {
            debug!(%session_id, error = %e, "Op not delivered");
            self.status = Some(e.to_string());
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(0),    // Task list or task view
            ])
            .split(frame.area());

        self.render_status_bar(frame, chunks[0]);

        match self.active.as_mut() {
            Some(session) => render_task_view(frame, chunks[1], session),
            None => render_task_list(
                frame,
                chunks[1],
                self.manager.tasks(),
                &self.wallet.completed,
                self.selected_index,
            ),
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                format!("{:.2} POOL", self.wallet.balance),
                Style::default().fg(Color::Green),
            ),
            Span::raw(" | "),
            Span::styled(
                format!("{} XP", self.wallet.xp),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(format!(" | {} completed", self.wallet.completed.len())),
        ];
        if let Some(status) = &self.status {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(status.as_str(), Style::default().fg(Color::Yellow)));
        }

        let bar = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("labelpool"));
        frame.render_widget(bar, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use lp_core::config::models::AppConfig;
    use lp_protocol::task_models::{TextClassificationConfig, WidgetConfig};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;
    use tokio::sync::mpsc::unbounded_channel;

    fn test_app() -> App {
        let config = AppConfig {
            tasks: vec![TaskDefinition {
                id: "single-review".to_string(),
                title: "Classify one review".to_string(),
                description: String::new(),
                reward: 0.1,
                xp: 2,
                widget: WidgetConfig::TextClassification(TextClassificationConfig {
                    text: Some("Works fine.".to_string()),
                    options: vec!["Positive".to_string(), "Negative".to_string()],
                    ..Default::default()
                }),
            }],
            ..Default::default()
        };
        let (event_tx, event_rx) = unbounded_channel();
        App::new(SessionManager::new(config, event_tx), event_rx)
    }

    /// Feed session events to the app until `done` holds.
    async fn pump_until(app: &mut App, done: impl Fn(&App) -> bool) {
        while !done(app) {
            let event = tokio::time::timeout(Duration::from_secs(2), app.event_rx.recv())
                .await
                .expect("timed out waiting for a session event")
                .expect("event channel closed");
            app.handle_core_event(event).await;
        }
    }

    fn screen(app: &mut App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_app_renders_task_list() {
        let mut app = test_app();
        let content = screen(&mut app);

        assert!(content.contains("labelpool"));
        assert!(content.contains("0.00 POOL"));
        assert!(content.contains("Classify one review"));
    }

    #[tokio::test]
    async fn test_app_quit_on_q() {
        let mut app = test_app();
        assert!(!app.should_exit);

        app.handle_key_event(KeyEvent::from(KeyCode::Char('q'))).await;
        assert!(app.should_exit);
    }

    #[tokio::test]
    async fn test_complete_text_task_end_to_end() {
        let mut app = test_app();

        app.handle_key_event(KeyEvent::from(KeyCode::Enter)).await;
        assert!(app.active.is_some());
        pump_until(&mut app, |app| {
            app.active.as_ref().is_some_and(|s| s.view.is_some())
        })
        .await;
        assert!(screen(&mut app).contains("Works fine."));

        app.handle_key_event(KeyEvent::from(KeyCode::Char('1'))).await;
        pump_until(&mut app, |app| {
            app.active
                .as_ref()
                .is_some_and(|s| s.phase == SessionPhase::EligibleForSubmit)
        })
        .await;
        assert_eq!(app.active.as_ref().unwrap().progress, 100.0);

        app.handle_key_event(KeyEvent::from(KeyCode::Char('s'))).await;
        pump_until(&mut app, |app| app.active.is_none()).await;

        assert_eq!(app.wallet.balance, 0.1);
        assert_eq!(app.wallet.xp, 2);
        assert_eq!(app.wallet.completed, vec!["single-review".to_string()]);
        assert!(app.status.as_deref().unwrap_or_default().starts_with("Submitted"));
        assert_eq!(app.manager.session_count().await, 0);

        let content = screen(&mut app);
        assert!(content.contains("Done"));
    }

    #[tokio::test]
    async fn test_escape_closes_session() {
        let mut app = test_app();

        app.handle_key_event(KeyEvent::from(KeyCode::Enter)).await;
        assert_eq!(app.manager.session_count().await, 1);

        app.handle_key_event(KeyEvent::from(KeyCode::Esc)).await;
        assert!(app.active.is_none());
        assert_eq!(app.manager.session_count().await, 0);
        assert_eq!(app.status.as_deref(), Some("Closed \"Classify one review\""));
        assert!(app.wallet.completed.is_empty());
    }
}
