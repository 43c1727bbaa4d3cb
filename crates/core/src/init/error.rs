//! Failures of `labelpool init`.

use std::path::PathBuf;
use thiserror::Error;

pub type InitResult<T> = Result<T, InitError>;

#[derive(Debug, Error)]
pub enum InitError {
    /// A project is already scaffolded here; rerun with `--force` to replace
    /// its config and sample tasks.
    #[error("{0:?} already holds a labelpool project. Use --force to overwrite.")]
    DirectoryExists(PathBuf),

    /// A sample task or config listed for scaffolding is not embedded in the
    /// binary.
    #[error("Missing embedded template: {0}")]
    TemplateNotFound(String),

    /// `.labelpool/` or `.labelpool/tasks/` could not be created.
    #[error("Cannot create {path:?}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `--force` could not clear the previous `tasks/` directory.
    #[error("Cannot remove old tasks directory {path:?}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config or a sample task could not be written.
    #[error("Cannot write {path:?}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
