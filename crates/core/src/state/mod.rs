//! State management for task sessions.
//!
//! This module provides:
//! - Session snapshot transitions
//! - SessionManager for coordinating concurrent sessions

pub mod manager;
pub mod session;
