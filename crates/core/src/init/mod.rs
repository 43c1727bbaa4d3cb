//! Initialization module for creating `.labelpool` directory structures.
//!
//! This module provides functionality to initialize a new labelpool project
//! by generating a `.labelpool/` directory with pre-configured templates for:
//! - Global configuration (`config.toml`)
//! - Sample tasks (`tasks/*`)
//!
//! # Example
//!
//! ```no_run
//! use lp_core::init::{InitOptions, generate_labelpool_structure};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     minimal: false,
//! };
//!
//! let written = generate_labelpool_structure(options).await?;
//! println!("Wrote {} files", written.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_labelpool_structure, InitOptions};
pub use templates::{get_template, list_templates};
