//! # lp-protocol
//!
//! Shared data models for labelpool.
//!
//! This crate defines all data structures that cross crate boundaries:
//! - Task definitions parsed from `.labelpool/tasks/*`
//! - Widget payloads (boxes, audio clips, answers)
//! - Session snapshots and render-ready widget views
//! - Operations and Events between a front-end and running sessions
//!
//! ## Modules
//!
//! - [`annotation_models`]: Geometry and annotation boxes
//! - [`audio_models`]: Recording state and captured clips
//! - [`classification_models`]: Questions and answer maps
//! - [`config_models`]: Global configuration from config.toml
//! - [`task_models`]: Task definitions, widget configs and results
//! - [`session_models`]: Session phase and snapshot
//! - [`view_models`]: Widget render snapshots
//! - [`ipc`]: Operations and Events
//!
//! ## Design Principles
//!
//! - Minimal dependencies: serde, ts-rs, uuid and chrono
//! - TypeScript generation: all types derive `TS` for web client compatibility
//! - Independent compilation: no dependencies on other labelpool crates

pub mod annotation_models;
pub mod audio_models;
pub mod classification_models;
pub mod config_models;
pub mod ipc;
pub mod session_models;
pub mod task_models;
pub mod view_models;

// Re-export all public types for convenience
pub use annotation_models::*;
pub use audio_models::*;
pub use classification_models::*;
pub use config_models::*;
pub use ipc::*;
pub use session_models::*;
pub use task_models::*;
pub use view_models::*;
