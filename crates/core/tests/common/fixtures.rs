//! Test fixtures for creating sample tasks, microphones and projects.

use async_trait::async_trait;
use lp_core::capture::{CaptureError, ChunkSink, MicrophoneCapture};
use lp_core::init::{generate_labelpool_structure, InitOptions};
use lp_protocol::classification_models::Question;
use lp_protocol::task_models::{
    AudioRecordingConfig, ImageAnnotationConfig, TaskDefinition, TextClassificationConfig,
    WidgetConfig,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Image annotation task over `images` images.
#[allow(dead_code)]
pub fn image_task(images: usize) -> TaskDefinition {
    TaskDefinition {
        id: "street-scene".to_string(),
        title: "Label Objects in Street Scene".to_string(),
        description: String::new(),
        reward: 0.45,
        xp: 8,
        widget: WidgetConfig::ImageAnnotation(ImageAnnotationConfig {
            image_urls: (1..=images).map(|i| format!("/street-{i}.png")).collect(),
            objects_to_label: vec![
                "Car".to_string(),
                "Pedestrian".to_string(),
                "Traffic Sign".to_string(),
                "Bicycle".to_string(),
            ],
        }),
    }
}

#[allow(dead_code)]
pub fn audio_task(min_duration: f64, max_duration: f64) -> TaskDefinition {
    TaskDefinition {
        id: "voice-command".to_string(),
        title: "Record Voice Command".to_string(),
        description: String::new(),
        reward: 0.3,
        xp: 10,
        widget: WidgetConfig::AudioRecording(AudioRecordingConfig {
            phrase_to_record: "Set an alarm for seven thirty tomorrow morning".to_string(),
            min_duration,
            max_duration,
        }),
    }
}

/// Text classification task with `questions` sentiment questions.
#[allow(dead_code)]
pub fn text_task(questions: u32) -> TaskDefinition {
    let options: Vec<String> = ["Positive", "Negative", "Neutral", "Mixed"]
        .iter()
        .map(|o| o.to_string())
        .collect();
    TaskDefinition {
        id: "review-sentiment".to_string(),
        title: "Classify Product Review Sentiment".to_string(),
        description: String::new(),
        reward: 0.5,
        xp: 12,
        widget: WidgetConfig::TextClassification(TextClassificationConfig {
            questions: (1..=questions)
                .map(|id| Question {
                    id,
                    text: format!("Review #{id}"),
                    options: options.clone(),
                })
                .collect(),
            ..Default::default()
        }),
    }
}

/// A microphone whose permission prompt takes `delay` to resolve.
#[allow(dead_code)]
pub struct SlowMicrophone {
    delay: Duration,
    started: Arc<AtomicBool>,
    released: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl SlowMicrophone {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: Arc::new(AtomicBool::new(false)),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flags: (started, released).
    pub fn flags(&self) -> (Arc<AtomicBool>, Arc<AtomicBool>) {
        (Arc::clone(&self.started), Arc::clone(&self.released))
    }
}

#[async_trait]
impl MicrophoneCapture for SlowMicrophone {
    async fn start(&mut self, sink: ChunkSink) -> Result<(), CaptureError> {
        tokio::time::sleep(self.delay).await;
        self.started.store(true, Ordering::SeqCst);
        let _ = sink.send(vec![1; 64]);
        Ok(())
    }

    fn stop(&mut self) {}

    fn release(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }

    fn mime_type(&self) -> &str {
        "audio/webm"
    }
}

/// Create a temporary project initialized from the bundled templates.
///
/// Returns a TempDir that must be kept alive for the test duration.
#[allow(dead_code)]
pub async fn create_test_project() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    generate_labelpool_structure(InitOptions {
        target_dir: dir.path().to_path_buf(),
        force: false,
        minimal: false,
    })
    .await
    .expect("Failed to initialize project");
    dir
}
