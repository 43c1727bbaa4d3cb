//! Common test utilities shared by the integration tests.
//!
//! This module provides:
//! - Test fixtures (task definitions, microphones, project directories)
//! - Event assertions

pub mod assertions;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
