//! Audio recording widget.
//!
//! One take at a time: Idle -> Recording -> Recorded, back to Idle on reset.
//! Elapsed time is counted in whole recording ticks rather than read from a
//! wall clock, so the widget is deterministic under test. The host is
//! responsible for calling `tick` at the configured interval while the widget
//! is recording.

use crate::capture::{AudioChunk, MicrophoneCapture};
use crate::widgets::{Change, TaskWidget, WidgetError, WidgetResult};
use lp_protocol::audio_models::{AudioClip, AudioRecordingResult, RecordingState};
use lp_protocol::config_models::GlobalConfig;
use lp_protocol::task_models::AudioRecordingConfig;
use lp_protocol::view_models::{AudioRecordingView, WidgetView};
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{debug, warn};

pub struct AudioRecordingWidget {
    phrase: String,
    min_duration: Duration,
    max_duration: Duration,
    tick_interval: Duration,
    recorded_progress: f64,

    state: RecordingState,
    elapsed: Duration,
    capture: Box<dyn MicrophoneCapture>,
    chunks: Option<UnboundedReceiver<AudioChunk>>,
    buffer: Vec<u8>,
    level: f64,
    clip: Option<AudioClip>,
    submitted: bool,
}

/// Mean amplitude of a chunk of signed 8-bit samples, scaled to 0.0..=1.0.
pub fn chunk_level(chunk: &[u8]) -> f64 {
    if chunk.is_empty() {
        return 0.0;
    }
    let sum: u64 = chunk
        .iter()
        .map(|&b| u64::from((b as i8).unsigned_abs()))
        .sum();
    (sum as f64 / chunk.len() as f64 / 128.0).min(1.0)
}

fn seconds(value: f64, name: &str) -> WidgetResult<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| WidgetError::InvalidConfig(format!("invalid {name} {value}: {e}")))
}

impl AudioRecordingWidget {
    pub fn new(
        config: &AudioRecordingConfig,
        settings: &GlobalConfig,
        capture: Box<dyn MicrophoneCapture>,
    ) -> WidgetResult<Self> {
        let min_duration = seconds(config.min_duration, "min-duration")?;
        let max_duration = seconds(config.max_duration, "max-duration")?;
        if max_duration.is_zero() || min_duration > max_duration {
            return Err(WidgetError::InvalidConfig(format!(
                "min-duration {} must not exceed a positive max-duration {}",
                config.min_duration, config.max_duration
            )));
        }
        if settings.tick_interval_ms == 0 {
            return Err(WidgetError::InvalidConfig(
                "tick-interval-ms must be positive".to_string(),
            ));
        }

        Ok(Self {
            phrase: config.phrase_to_record.clone(),
            min_duration,
            max_duration,
            tick_interval: Duration::from_millis(settings.tick_interval_ms),
            recorded_progress: settings.recorded_progress,
            state: RecordingState::Idle,
            elapsed: Duration::ZERO,
            capture,
            chunks: None,
            buffer: Vec::new(),
            level: 0.0,
            clip: None,
            submitted: false,
        })
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn clip(&self) -> Option<&AudioClip> {
        self.clip.as_ref()
    }

    /// Acquire the microphone and begin a take.
    ///
    /// A refused or failed acquisition is logged and leaves the widget Idle;
    /// it is not an error for the caller.
    pub async fn start_recording(&mut self) -> WidgetResult<Change> {
        if self.state != RecordingState::Idle {
            return Err(WidgetError::InvalidRecordingState {
                action: "start recording",
                state: self.state,
            });
        }

        let (sink, chunks) = unbounded_channel();
        if let Err(error) = self.capture.start(sink).await {
            warn!(%error, "Error accessing microphone");
            self.capture.release();
            return Ok(Change::None);
        }

        debug!(phrase = %self.phrase, "Recording started");
        self.state = RecordingState::Recording;
        self.elapsed = Duration::ZERO;
        self.buffer.clear();
        self.chunks = Some(chunks);
        Ok(Change::State)
    }

    /// Advance the recording clock by one tick, stopping at the maximum.
    pub fn tick(&mut self) -> Change {
        if self.state != RecordingState::Recording {
            return Change::None;
        }
        self.drain_chunks();
        self.elapsed += self.tick_interval;
        if self.elapsed >= self.max_duration {
            self.elapsed = self.max_duration;
            debug!("Maximum duration reached, stopping");
            self.finish_take();
        }
        Change::State
    }

    pub fn stop_recording(&mut self) -> WidgetResult<Change> {
        if self.state != RecordingState::Recording {
            return Err(WidgetError::InvalidRecordingState {
                action: "stop recording",
                state: self.state,
            });
        }
        self.finish_take();
        Ok(Change::State)
    }

    /// Discard the captured take and return to Idle.
    pub fn reset(&mut self) -> Change {
        if self.state == RecordingState::Idle && self.clip.is_none() {
            return Change::None;
        }
        if self.state == RecordingState::Recording {
            self.capture.stop();
        }
        self.capture.release();
        self.chunks = None;
        self.buffer.clear();
        self.level = 0.0;
        self.clip = None;
        self.elapsed = Duration::ZERO;
        self.state = RecordingState::Idle;
        Change::State
    }

    pub fn submit(&mut self) -> WidgetResult<AudioRecordingResult> {
        if self.submitted {
            return Err(WidgetError::AlreadySubmitted);
        }
        if !self.can_submit() {
            return Err(WidgetError::NotEligible);
        }
        let Some(clip) = self.clip.clone() else {
            return Err(WidgetError::NotEligible);
        };
        self.submitted = true;
        Ok(AudioRecordingResult { audio_blob: clip })
    }

    fn drain_chunks(&mut self) {
        if let Some(chunks) = self.chunks.as_mut() {
            while let Ok(chunk) = chunks.try_recv() {
                self.level = chunk_level(&chunk);
                self.buffer.extend_from_slice(&chunk);
            }
        }
    }

    /// Stop the device, collect the remaining chunks and seal the clip.
    fn finish_take(&mut self) {
        self.capture.stop();
        self.drain_chunks();
        self.capture.release();
        self.chunks = None;
        self.level = 0.0;

        self.clip = Some(AudioClip {
            mime_type: self.capture.mime_type().to_string(),
            data: std::mem::take(&mut self.buffer),
            duration_secs: self.elapsed.as_secs_f64(),
        });
        self.state = RecordingState::Recorded;
    }
}

impl TaskWidget for AudioRecordingWidget {
    fn progress(&self) -> f64 {
        match self.state {
            RecordingState::Idle => 0.0,
            RecordingState::Recording => {
                let ratio = self.elapsed.as_secs_f64() / self.max_duration.as_secs_f64();
                ratio.min(1.0) * 100.0
            }
            RecordingState::Recorded => self.recorded_progress,
        }
    }

    fn can_submit(&self) -> bool {
        self.state == RecordingState::Recorded
            && self.clip.is_some()
            && self.elapsed >= self.min_duration
    }

    fn is_submitted(&self) -> bool {
        self.submitted
    }

    fn view(&self) -> WidgetView {
        WidgetView::AudioRecording(AudioRecordingView {
            phrase: self.phrase.clone(),
            state: self.state,
            elapsed_secs: self.elapsed.as_secs_f64(),
            min_duration: self.min_duration.as_secs_f64(),
            max_duration: self.max_duration.as_secs_f64(),
            clip_bytes: self.clip.as_ref().map(|clip| clip.data.len()),
            input_level: self.level,
        })
    }
}

impl Drop for AudioRecordingWidget {
    fn drop(&mut self) {
        if self.state == RecordingState::Recording {
            self.capture.stop();
        }
        self.capture.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureError, CaptureProbe, ChunkSink, SimulatedMicrophone};
    use std::sync::Arc;

    fn widget_with(mic: SimulatedMicrophone, min: f64, max: f64) -> AudioRecordingWidget {
        let config = AudioRecordingConfig {
            phrase_to_record: "Set an alarm for seven thirty tomorrow morning".to_string(),
            min_duration: min,
            max_duration: max,
        };
        AudioRecordingWidget::new(&config, &GlobalConfig::default(), Box::new(mic)).unwrap()
    }

    fn widget(min: f64, max: f64) -> (AudioRecordingWidget, Arc<CaptureProbe>) {
        let mic = SimulatedMicrophone::granted();
        let probe = mic.probe();
        (widget_with(mic, min, max), probe)
    }

    fn ticks(w: &mut AudioRecordingWidget, n: usize) {
        for _ in 0..n {
            w.tick();
        }
    }

    /// Delivers one half-scale chunk as soon as it starts.
    struct HumMicrophone;

    #[async_trait::async_trait]
    impl MicrophoneCapture for HumMicrophone {
        async fn start(&mut self, sink: ChunkSink) -> Result<(), CaptureError> {
            let _ = sink.send(vec![(-64i8) as u8; 256]);
            Ok(())
        }
        fn stop(&mut self) {}
        fn release(&mut self) {}
        fn mime_type(&self) -> &str {
            "audio/webm"
        }
    }

    fn input_level(w: &AudioRecordingWidget) -> f64 {
        match w.view() {
            WidgetView::AudioRecording(view) => view.input_level,
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_chunk_level() {
        assert_eq!(chunk_level(&[]), 0.0);
        assert_eq!(chunk_level(&[0; 32]), 0.0);
        assert_eq!(chunk_level(&[64, (-64i8) as u8]), 0.5);
        assert_eq!(chunk_level(&[(-128i8) as u8; 4]), 1.0);
    }

    #[tokio::test]
    async fn test_input_level_follows_latest_chunk() {
        let config = AudioRecordingConfig {
            phrase_to_record: "Turn on the lights".to_string(),
            min_duration: 0.1,
            max_duration: 5.0,
        };
        let mut w =
            AudioRecordingWidget::new(&config, &GlobalConfig::default(), Box::new(HumMicrophone))
                .unwrap();

        w.start_recording().await.unwrap();
        ticks(&mut w, 1);
        assert_eq!(input_level(&w), 0.5);

        w.stop_recording().unwrap();
        assert_eq!(input_level(&w), 0.0);
        assert_eq!(w.clip().map(|clip| clip.data.len()), Some(256));
    }

    #[tokio::test]
    async fn test_start_moves_to_recording() {
        let (mut w, probe) = widget(2.0, 5.0);
        assert_eq!(w.start_recording().await, Ok(Change::State));
        assert_eq!(w.state(), RecordingState::Recording);
        assert!(probe.is_open());
        assert_eq!(w.progress(), 0.0);
    }

    #[tokio::test]
    async fn test_denied_microphone_stays_idle() {
        let mic = SimulatedMicrophone::denied();
        let probe = mic.probe();
        let mut w = widget_with(mic, 2.0, 5.0);

        assert_eq!(w.start_recording().await, Ok(Change::None));
        assert_eq!(w.state(), RecordingState::Idle);
        assert!(!probe.is_open());
        assert_eq!(w.tick(), Change::None);
        assert_eq!(w.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_progress_tracks_elapsed_over_max() {
        let (mut w, _probe) = widget(2.0, 5.0);
        w.start_recording().await.unwrap();

        ticks(&mut w, 10);
        assert_eq!(w.elapsed(), Duration::from_secs(1));
        assert!((w.progress() - 20.0).abs() < 1e-9);

        ticks(&mut w, 15);
        assert!((w.progress() - 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_stop_before_min_keeps_submit_disabled() {
        let (mut w, probe) = widget(2.0, 5.0);
        w.start_recording().await.unwrap();
        ticks(&mut w, 15);

        assert_eq!(w.stop_recording(), Ok(Change::State));
        assert_eq!(w.state(), RecordingState::Recorded);
        assert_eq!(w.elapsed(), Duration::from_millis(1500));
        assert_eq!(w.progress(), 80.0);
        assert!(!w.can_submit());
        assert_eq!(w.submit(), Err(WidgetError::NotEligible));
        assert!(!probe.is_open());
    }

    #[tokio::test]
    async fn test_stop_after_min_enables_submit() {
        let (mut w, _probe) = widget(2.0, 5.0);
        w.start_recording().await.unwrap();
        ticks(&mut w, 30);
        w.stop_recording().unwrap();

        assert!(w.can_submit());
        let result = w.submit().unwrap();
        assert!(!result.audio_blob.is_empty());
        assert_eq!(result.audio_blob.mime_type, "audio/webm");
        assert!((result.audio_blob.duration_secs - 3.0).abs() < 1e-9);
        assert_eq!(w.submit(), Err(WidgetError::AlreadySubmitted));
    }

    #[tokio::test]
    async fn test_auto_stop_at_max_duration() {
        let (mut w, probe) = widget(2.0, 5.0);
        w.start_recording().await.unwrap();

        ticks(&mut w, 49);
        assert_eq!(w.state(), RecordingState::Recording);

        w.tick();
        assert_eq!(w.state(), RecordingState::Recorded);
        assert_eq!(w.elapsed(), Duration::from_secs(5));
        assert!(w.can_submit());
        assert_eq!(probe.stops(), 1);

        // Further ticks do nothing once recorded
        assert_eq!(w.tick(), Change::None);
        assert_eq!(w.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_max_not_multiple_of_tick_is_clamped() {
        let (mut w, _probe) = widget(0.1, 0.25);
        w.start_recording().await.unwrap();

        ticks(&mut w, 3);
        assert_eq!(w.state(), RecordingState::Recorded);
        assert_eq!(w.elapsed(), Duration::from_millis(250));
        assert!((w.clip().unwrap().duration_secs - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_min_above_max_is_invalid() {
        let config = AudioRecordingConfig {
            phrase_to_record: "Hello".to_string(),
            min_duration: 6.0,
            max_duration: 5.0,
        };
        let result = AudioRecordingWidget::new(
            &config,
            &GlobalConfig::default(),
            Box::new(SimulatedMicrophone::granted()),
        );
        assert!(matches!(result, Err(WidgetError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_reset_discards_take() {
        let (mut w, probe) = widget(2.0, 5.0);
        w.start_recording().await.unwrap();
        ticks(&mut w, 30);
        w.stop_recording().unwrap();

        assert_eq!(w.reset(), Change::State);
        assert_eq!(w.state(), RecordingState::Idle);
        assert_eq!(w.progress(), 0.0);
        assert!(w.clip().is_none());
        assert!(!w.can_submit());
        assert_eq!(w.reset(), Change::None);

        // A new take can start after reset
        w.start_recording().await.unwrap();
        assert_eq!(probe.starts(), 2);
    }

    #[tokio::test]
    async fn test_reset_while_recording_releases_device() {
        let (mut w, probe) = widget(2.0, 5.0);
        w.start_recording().await.unwrap();
        ticks(&mut w, 5);

        w.reset();
        assert!(!probe.is_open());
        assert_eq!(w.state(), RecordingState::Idle);
    }

    #[tokio::test]
    async fn test_start_while_recorded_is_rejected() {
        let (mut w, _probe) = widget(2.0, 5.0);
        w.start_recording().await.unwrap();
        w.stop_recording().unwrap();

        assert_eq!(
            w.start_recording().await,
            Err(WidgetError::InvalidRecordingState {
                action: "start recording",
                state: RecordingState::Recorded
            })
        );
    }

    #[test]
    fn test_stop_while_idle_is_rejected() {
        let (mut w, _probe) = widget(2.0, 5.0);
        assert!(matches!(
            w.stop_recording(),
            Err(WidgetError::InvalidRecordingState { .. })
        ));
    }

    #[tokio::test]
    async fn test_drop_releases_device() {
        let (mut w, probe) = widget(2.0, 5.0);
        w.start_recording().await.unwrap();
        assert!(probe.is_open());

        drop(w);
        assert!(!probe.is_open());
    }
}
