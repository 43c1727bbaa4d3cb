//! Microphone capability.
//!
//! This module provides the `MicrophoneCapture` trait the audio recording
//! widget records through, and `SimulatedMicrophone`, a device that emits
//! silence and can be told to refuse access.

pub mod base;
pub mod simulated;

pub use base::{AudioChunk, CaptureError, ChunkSink, MicrophoneCapture};
pub use simulated::{CaptureProbe, SimulatedMicrophone};
