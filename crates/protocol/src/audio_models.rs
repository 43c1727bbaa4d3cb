//! Audio recording models.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lifecycle of the audio recording widget.
///
/// Idle -> Recording -> Recorded, and back to Idle on reset.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordingState {
    /// Nothing captured yet (or the previous take was discarded).
    #[default]
    Idle,

    /// The microphone is open and the tick is advancing elapsed time.
    Recording,

    /// A take has been captured and is waiting for review or submission.
    Recorded,
}

/// A captured take: the concatenated chunks delivered by the microphone.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct AudioClip {
    /// Container type reported by the capture device, e.g. `audio/webm`.
    pub mime_type: String,

    pub data: Vec<u8>,

    /// Recorded length in seconds, as measured by the recording tick.
    pub duration_secs: f64,
}

impl AudioClip {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Payload emitted when an audio recording task is submitted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct AudioRecordingResult {
    pub audio_blob: AudioClip,
}
