//! # lp-core
//!
//! Task completion widgets and their runtime for labelpool.
//!
//! This crate provides:
//! - The three task widgets (image annotation, audio recording, text
//!   classification) as state machines independent of any UI toolkit
//! - Capability traits for the canvas and the microphone
//! - The task runner that hosts a widget for one session
//! - Session state management
//! - Configuration loading from the `.labelpool/` directory
//!
//! ## Modules
//!
//! - [`widgets`]: Widget state machines
//! - [`capture`]: Microphone capability and a simulated device
//! - [`surface`]: Canvas capability and the annotation renderer
//! - [`engine`]: Task runner driving one widget session
//! - [`state`]: Session snapshots and the session manager
//! - [`config`]: Configuration loading and management
//! - [`init`]: `.labelpool/` scaffolding from embedded templates

pub mod capture;
pub mod config;
pub mod engine;
pub mod init;
pub mod state;
pub mod surface;
pub mod widgets;
