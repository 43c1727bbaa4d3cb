//! Configuration loading and management.
//!
//! This module provides functionality to load and parse all configuration files
//! from the `.labelpool/` directory structure.

pub mod error;
pub mod loader;
pub mod models;

/// Name of the configuration directory under a project root.
pub const CONFIG_DIR: &str = ".labelpool";
