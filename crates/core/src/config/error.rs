//! Errors raised while loading `.labelpool/`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `config.toml` is not valid TOML or has wrongly typed values.
    #[error("Invalid settings file {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid YAML task file {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Missing or malformed front matter in a Markdown task file.
    #[error("Invalid task front matter in {path}: {reason}")]
    MarkdownParse { path: PathBuf, reason: String },

    #[error("Failed to scan task directory {path}: {source}")]
    DirectoryWalk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// A setting in `config.toml` is out of range.
    #[error("Invalid setting in {path}: {reason}")]
    InvalidSettings { path: PathBuf, reason: String },

    /// A task parsed but its widget configuration is unusable.
    #[error("Invalid task in {path}: {reason}")]
    InvalidTask { path: PathBuf, reason: String },

    /// Two task files declare the same task id.
    #[error("Duplicate task id {id:?} in {path}")]
    DuplicateTask { id: String, path: PathBuf },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
