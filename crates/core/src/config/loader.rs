//! Configuration file loader for the `.labelpool/` directory structure.
//!
//! This module provides functionality to load and parse all configuration files
//! from the `.labelpool/` directory, including:
//! - `config.toml`: Global settings
//! - `tasks/*.md`: Task definitions with YAML front matter
//! - `tasks/*.yaml`: Task definitions as plain YAML

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use crate::config::CONFIG_DIR;
use crate::widgets::validate_config;
use gray_matter::engine::YAML;
use gray_matter::Matter;
use lp_protocol::config_models::GlobalConfig;
use lp_protocol::task_models::TaskDefinition;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Loads all configuration from the `.labelpool/` directory.
///
/// # Arguments
///
/// * `root` - Root directory containing the `.labelpool/` folder
///
/// # Returns
///
/// An `AppConfig` containing all loaded configuration. If directories or files
/// are missing (but the root exists), returns an empty/default configuration
/// rather than an error.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid syntax (TOML, YAML, or Markdown front matter)
/// - A task's widget configuration is unusable
/// - Two tasks share an id
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let lp_dir = root.join(CONFIG_DIR);

    // If .labelpool doesn't exist, return default config
    if !lp_dir.exists() {
        return Ok(AppConfig::default());
    }

    let global = load_global_config(&lp_dir)?;
    let tasks = load_tasks(&lp_dir)?;
    debug!(dir = %lp_dir.display(), tasks = tasks.len(), "Configuration loaded");

    Ok(AppConfig { global, tasks })
}

/// Largest accepted canvas side, in pixels.
const MAX_CANVAS_SIZE: f64 = 10_000.0;

/// Loads global configuration from `config.toml`.
fn load_global_config(lp_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = lp_dir.join("config.toml");

    // If config.toml doesn't exist, return default
    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path.clone(),
            source,
        })?;

    if config.tick_interval_ms == 0 {
        return Err(ConfigError::InvalidSettings {
            path: config_path,
            reason: "tick-interval-ms must be positive".to_string(),
        });
    }
    if !(config.min_box_size.is_finite() && config.min_box_size >= 0.0) {
        return Err(ConfigError::InvalidSettings {
            path: config_path,
            reason: "min-box-size must be a non-negative number".to_string(),
        });
    }
    if !(0.0..=100.0).contains(&config.recorded_progress) {
        return Err(ConfigError::InvalidSettings {
            path: config_path,
            reason: "recorded-progress must be between 0 and 100".to_string(),
        });
    }
    for (key, value) in [
        ("canvas-width", config.canvas_width),
        ("canvas-height", config.canvas_height),
    ] {
        if !(value.is_finite() && value > 0.0 && value <= MAX_CANVAS_SIZE) {
            return Err(ConfigError::InvalidSettings {
                path: config_path.clone(),
                reason: format!("{key} must be in (0, {MAX_CANVAS_SIZE}]"),
            });
        }
    }

    Ok(config)
}

/// Loads all task definitions from `tasks/`.
fn load_tasks(lp_dir: &Path) -> ConfigResult<Vec<TaskDefinition>> {
    let tasks_dir = lp_dir.join("tasks");

    // If tasks directory doesn't exist, return empty vector
    if !tasks_dir.exists() {
        return Ok(Vec::new());
    }

    let mut tasks = Vec::new();
    let mut ids = HashSet::new();

    for entry in WalkDir::new(&tasks_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: tasks_dir.clone(),
            source,
        })?;

        let path = entry.path();
        let task = match path.extension().and_then(|s| s.to_str()) {
            Some("md") => parse_markdown_task(path)?,
            Some("yaml") | Some("yml") => parse_yaml_task(path)?,
            _ => continue,
        };

        validate_config(&task.widget).map_err(|e| ConfigError::InvalidTask {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if !ids.insert(task.id.clone()) {
            return Err(ConfigError::DuplicateTask {
                id: task.id,
                path: path.to_path_buf(),
            });
        }

        tasks.push(task);
    }

    Ok(tasks)
}

/// Parses a Markdown task: YAML front matter plus a description body.
fn parse_markdown_task(path: &Path) -> ConfigResult<TaskDefinition> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let matter = Matter::<YAML>::new();
    let result = matter.parse(&content);

    let mut task: TaskDefinition = result
        .data
        .ok_or_else(|| ConfigError::MarkdownParse {
            path: path.to_path_buf(),
            reason: "Missing YAML front matter".to_string(),
        })?
        .deserialize()
        .map_err(|e| ConfigError::MarkdownParse {
            path: path.to_path_buf(),
            reason: format!("Failed to deserialize front matter: {}", e),
        })?;

    let body = result.content.trim();
    if !body.is_empty() {
        task.description = body.to_string();
    }

    Ok(task)
}

fn parse_yaml_task(path: &Path) -> ConfigResult<TaskDefinition> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
        path: path.to_path_buf(),
        source,
    })
}
