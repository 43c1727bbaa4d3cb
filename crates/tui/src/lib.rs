//! # lp-tui
//!
//! Terminal front-end for labelpool.
//!
//! This crate renders the task catalog and the active task session, and maps
//! keyboard and mouse input to the `Op`s understood by `lp-core`. Session
//! updates arrive as `Event`s from the `SessionManager`.

pub mod app;
pub mod event_handler;
pub mod tui;
pub mod widgets;

pub use app::App;
pub use tui::Tui;

use anyhow::Result;
use lp_core::config::models::AppConfig;
use lp_core::state::manager::SessionManager;

/// Take over the terminal and run the app until the user quits.
pub async fn run_app(config: AppConfig) -> Result<()> {
    let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();
    let manager = SessionManager::new(config, event_tx);
    let mut app = App::new(manager, event_rx);

    let mut tui = Tui::init()?;
    let result = app.run(&mut tui).await;
    tui.restore()?;
    result
}
