//! Configuration models that aggregate all settings.
//!
//! This module provides the unified `AppConfig` structure that combines
//! global settings and the task catalog into a single configuration object.

use lp_protocol::config_models::GlobalConfig;
use lp_protocol::task_models::TaskDefinition;

/// Unified application configuration loaded from the `.labelpool/` directory.
///
/// This structure aggregates all configuration sources:
/// - `config.toml`: Global settings
/// - `tasks/*.md` and `tasks/*.yaml`: Task definitions
///
/// # Example
///
/// ```rust,no_run
/// use lp_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} tasks", config.tasks.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Global settings from `config.toml`.
    pub global: GlobalConfig,

    /// Task catalog, ordered by file name.
    pub tasks: Vec<TaskDefinition>,
}

impl AppConfig {
    /// Look up a task by id.
    pub fn find_task(&self, id: &str) -> Option<&TaskDefinition> {
        self.tasks.iter().find(|task| task.id == id)
    }
}
