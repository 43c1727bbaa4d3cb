//! Base MicrophoneCapture trait and supporting types.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

/// Raw encoded bytes delivered by a capture device.
pub type AudioChunk = Vec<u8>;

/// Where a device delivers chunks while it is recording.
pub type ChunkSink = UnboundedSender<AudioChunk>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Microphone permission denied")]
    PermissionDenied,
    #[error("Microphone unavailable: {0}")]
    DeviceUnavailable(String),
}

/// A microphone the audio widget can record from.
///
/// Lifecycle: `start` acquires the device and begins delivering chunks to the
/// sink; `stop` ends the take and flushes any buffered data to the sink
/// before returning; `release` gives the device back. `release` must be safe
/// to call more than once and on a device that never started.
#[async_trait]
pub trait MicrophoneCapture: Send {
    /// Acquire the device and start recording.
    async fn start(&mut self, sink: ChunkSink) -> Result<(), CaptureError>;

    /// Stop recording and flush pending chunks.
    fn stop(&mut self);

    /// Release the device and drop the sink.
    fn release(&mut self);

    /// Container type of the delivered chunks, e.g. `audio/webm`.
    fn mime_type(&self) -> &str;
}
