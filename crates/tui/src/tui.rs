//! Terminal setup and the input/draw event stream.
//!
//! `Tui` owns the ratatui terminal: raw mode, alternate screen and mouse
//! capture are enabled on init and undone on drop (or panic). Draw requests
//! are batched by a scheduler task so bursts of core events produce one
//! frame.

use anyhow::Result;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event;
use crossterm::event::KeyEvent;
use crossterm::event::MouseEvent;
use crossterm::execute;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::stdout;
use std::io::Stdout;
use std::pin::Pin;
use std::time::Duration;
use tokio::select;
use tokio::sync::broadcast;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_stream::Stream;
use tokio_stream::StreamExt;

pub type TerminalBackend = CrosstermBackend<Stdout>;

/// Requests arriving within this window share one frame.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Input or redraw notification produced by [`Tui::event_stream`].
#[derive(Debug)]
pub enum TuiEvent {
    Key(KeyEvent),
    /// Mouse press, drag or release (used by the annotation canvas).
    Mouse(MouseEvent),
    /// A scheduled frame is due, or the terminal was resized.
    Draw,
}

pub struct Tui {
    terminal: Terminal<TerminalBackend>,
    frame_schedule_tx: UnboundedSender<()>,
    draw_tx: broadcast::Sender<()>,
}

impl Tui {
    /// Put the terminal in raw mode with mouse capture on the alternate screen.
    pub fn init() -> Result<Self> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

        set_panic_hook();

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        let (frame_schedule_tx, frame_schedule_rx) = unbounded_channel();
        let (draw_tx, _) = broadcast::channel(1);
        tokio::spawn(run_frame_scheduler(frame_schedule_rx, draw_tx.clone()));

        Ok(Self {
            terminal,
            frame_schedule_tx,
            draw_tx,
        })
    }

    pub fn restore(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        Ok(())
    }

    pub fn frame_requester(&self) -> FrameRequester {
        FrameRequester {
            frame_schedule_tx: self.frame_schedule_tx.clone(),
        }
    }

    /// Merge crossterm input with scheduled draws into one stream.
    pub fn event_stream(&self) -> Pin<Box<dyn Stream<Item = TuiEvent> + Send + 'static>> {
        let mut crossterm_events = crossterm::event::EventStream::new();
        let mut draw_rx = self.draw_tx.subscribe();

        let event_stream = async_stream::stream! {
            loop {
                select! {
                    Some(Ok(event)) = crossterm_events.next() => {
                        match event {
                            Event::Key(key_event) => {
                                yield TuiEvent::Key(key_event);
                            }
                            Event::Mouse(mouse_event) => {
                                yield TuiEvent::Mouse(mouse_event);
                            }
                            Event::Resize(_, _) => {
                                yield TuiEvent::Draw;
                            }
                            _ => {}
                        }
                    }
                    result = draw_rx.recv() => {
                        match result {
                            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                                yield TuiEvent::Draw;
                            }
                            Err(broadcast::error::RecvError::Closed) => {
                                break;
                            }
                        }
                    }
                }
            }
        };

        Box::pin(event_stream)
    }

    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Handle for scheduling frame redraws.
#[derive(Clone, Debug)]
pub struct FrameRequester {
    frame_schedule_tx: UnboundedSender<()>,
}

impl FrameRequester {
    pub fn schedule_frame(&self) {
        let _ = self.frame_schedule_tx.send(());
    }
}

/// Turn bursts of frame requests into single draw notifications.
///
/// Exits once every `FrameRequester` (and the `Tui`) is gone.
async fn run_frame_scheduler(mut requests: UnboundedReceiver<()>, draw_tx: broadcast::Sender<()>) {
    while requests.recv().await.is_some() {
        tokio::time::sleep(FRAME_INTERVAL).await;
        while requests.try_recv().is_ok() {}
        let _ = draw_tx.send(());
    }
}

fn set_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}
