//! Simulated microphone.
//!
//! Emits frames of silence instead of touching real hardware. Used by the
//! terminal front-end, which has no audio input, and by tests.

use crate::capture::base::{AudioChunk, CaptureError, ChunkSink, MicrophoneCapture};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const SILENCE_FRAME_BYTES: usize = 320;

/// Counters shared with a `SimulatedMicrophone`, for checking that the
/// device was released.
#[derive(Debug, Default)]
pub struct CaptureProbe {
    starts: AtomicUsize,
    stops: AtomicUsize,
    releases: AtomicUsize,
    open: AtomicUsize,
}

impl CaptureProbe {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Whether the device is currently held.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst) > 0
    }
}

pub struct SimulatedMicrophone {
    granted: bool,
    sink: Option<ChunkSink>,
    probe: Arc<CaptureProbe>,
}

impl SimulatedMicrophone {
    /// A microphone that grants access.
    pub fn granted() -> Self {
        Self {
            granted: true,
            sink: None,
            probe: Arc::new(CaptureProbe::default()),
        }
    }

    /// A microphone whose permission prompt is always refused.
    pub fn denied() -> Self {
        Self {
            granted: false,
            ..Self::granted()
        }
    }

    pub fn probe(&self) -> Arc<CaptureProbe> {
        Arc::clone(&self.probe)
    }

    fn emit(&self, chunk: AudioChunk) {
        if let Some(sink) = &self.sink {
            let _ = sink.send(chunk);
        }
    }
}

#[async_trait]
impl MicrophoneCapture for SimulatedMicrophone {
    async fn start(&mut self, sink: ChunkSink) -> Result<(), CaptureError> {
        if !self.granted {
            return Err(CaptureError::PermissionDenied);
        }
        if self.sink.is_some() {
            return Err(CaptureError::DeviceUnavailable(
                "device is already recording".to_string(),
            ));
        }

        self.sink = Some(sink);
        self.probe.starts.fetch_add(1, Ordering::SeqCst);
        self.probe.open.store(1, Ordering::SeqCst);
        self.emit(vec![0; SILENCE_FRAME_BYTES]);
        Ok(())
    }

    fn stop(&mut self) {
        if self.sink.is_none() {
            return;
        }
        self.probe.stops.fetch_add(1, Ordering::SeqCst);
        self.emit(vec![0; SILENCE_FRAME_BYTES]);
    }

    fn release(&mut self) {
        self.sink = None;
        self.probe.releases.fetch_add(1, Ordering::SeqCst);
        self.probe.open.store(0, Ordering::SeqCst);
    }

    fn mime_type(&self) -> &str {
        "audio/webm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test]
    async fn test_granted_microphone_delivers_chunks() {
        let mut mic = SimulatedMicrophone::granted();
        let probe = mic.probe();
        let (tx, mut rx) = unbounded_channel();

        mic.start(tx).await.unwrap();
        assert!(probe.is_open());
        mic.stop();
        mic.release();

        let mut total = 0;
        while let Ok(chunk) = rx.try_recv() {
            total += chunk.len();
        }
        assert_eq!(total, 2 * SILENCE_FRAME_BYTES);
        assert_eq!(probe.starts(), 1);
        assert_eq!(probe.stops(), 1);
        assert!(!probe.is_open());
    }

    #[tokio::test]
    async fn test_denied_microphone_refuses_start() {
        let mut mic = SimulatedMicrophone::denied();
        let probe = mic.probe();
        let (tx, _rx) = unbounded_channel();

        let result = mic.start(tx).await;
        assert_eq!(result, Err(CaptureError::PermissionDenied));
        assert_eq!(probe.starts(), 0);
        assert!(!probe.is_open());
    }

    #[tokio::test]
    async fn test_double_start_is_rejected() {
        let mut mic = SimulatedMicrophone::granted();
        let (tx, _rx) = unbounded_channel();
        mic.start(tx.clone()).await.unwrap();

        let result = mic.start(tx).await;
        assert!(matches!(result, Err(CaptureError::DeviceUnavailable(_))));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut mic = SimulatedMicrophone::granted();
        let probe = mic.probe();
        mic.release();
        mic.release();
        assert_eq!(probe.releases(), 2);
        assert!(!probe.is_open());
    }
}
