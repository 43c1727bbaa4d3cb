//! Standalone entry point for the labelpool TUI.
//!
//! Loads `.labelpool/` from the current directory; use the `labelpool`
//! binary for `init` and logging setup.

use anyhow::Result;
use lp_core::config::loader::load_config;
use lp_tui::run_app;

#[tokio::main]
async fn main() -> Result<()> {
    let root = std::env::current_dir()?;
    let config = load_config(&root).await?;
    run_app(config).await
}
