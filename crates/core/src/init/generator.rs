//! Directory structure and file generation for `.labelpool` initialization.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use crate::config::CONFIG_DIR;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Task written by `--minimal`.
const MINIMAL_TASK: &str = "tasks/street-scene.md";

/// Options for initializing a `.labelpool` directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Target directory where `.labelpool` will be created.
    pub target_dir: PathBuf,

    /// Overwrite an existing `.labelpool` directory.
    pub force: bool,

    /// Only write the configuration and one sample task.
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate a `.labelpool` directory structure from the embedded templates.
///
/// ```text
/// .labelpool/
/// ├── config.toml
/// └── tasks/
///     ├── review-sentiment.yaml (unless minimal)
///     ├── street-scene.md
///     └── voice-command.md (unless minimal)
/// ```
///
/// With `force`, the existing `tasks/` directory is replaced so that stale
/// tasks do not linger in the catalog.
///
/// # Returns
///
/// The paths of all written files.
pub async fn generate_labelpool_structure(options: InitOptions) -> InitResult<Vec<PathBuf>> {
    let lp_dir = options.target_dir.join(CONFIG_DIR);

    if lp_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(lp_dir));
    }

    let tasks_dir = lp_dir.join("tasks");
    if tasks_dir.exists() {
        fs::remove_dir_all(&tasks_dir).map_err(|source| InitError::Remove {
            path: tasks_dir.clone(),
            source,
        })?;
    }
    fs::create_dir_all(&tasks_dir).map_err(|source| InitError::DirectoryCreate {
        path: tasks_dir.clone(),
        source,
    })?;

    let mut templates = vec!["config.toml".to_string()];
    if options.minimal {
        templates.push(MINIMAL_TASK.to_string());
    } else {
        templates.extend(list_templates("tasks/"));
    }

    let mut written = Vec::with_capacity(templates.len());
    for template in &templates {
        written.push(write_template_file(&lp_dir, template)?);
    }

    info!(dir = %lp_dir.display(), files = written.len(), "Initialized labelpool directory");
    Ok(written)
}

/// Write one template below `lp_dir`, returning the written path.
fn write_template_file(lp_dir: &Path, template_path: &str) -> InitResult<PathBuf> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = lp_dir.join(template_path);

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path.clone(),
        source,
    })?;

    Ok(target_path)
}
