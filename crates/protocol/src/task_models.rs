//! Task definitions for `.labelpool/tasks/*`.
//!
//! A task couples marketplace metadata (title, reward) with the configuration
//! of the widget a contributor uses to complete it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::annotation_models::ImageAnnotationResult;
use crate::audio_models::AudioRecordingResult;
use crate::classification_models::{ClassificationResult, Question};

/// The kind of labeling work a task asks for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
pub enum TaskKind {
    Image,
    Audio,
    Text,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TaskKind::Image => "Image",
            TaskKind::Audio => "Audio",
            TaskKind::Text => "Text",
        };
        f.write_str(name)
    }
}

/// Inputs of the image annotation widget.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct ImageAnnotationConfig {
    /// Images to annotate, in the order they are presented.
    pub image_urls: Vec<String>,

    /// Labels the contributor may attach to a box.
    pub objects_to_label: Vec<String>,
}

/// Inputs of the audio recording widget.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct AudioRecordingConfig {
    pub phrase_to_record: String,

    /// Shortest accepted take, in seconds.
    pub min_duration: f64,

    /// Recording stops automatically after this many seconds.
    pub max_duration: f64,
}

/// Inputs of the text classification widget.
///
/// Either list the questions explicitly, or use the single-question shorthand
/// (`text` plus `options`). When both are present the explicit list wins.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, TS)]
#[serde(rename_all = "kebab-case")]
pub struct TextClassificationConfig {
    #[serde(default)]
    pub questions: Vec<Question>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl TextClassificationConfig {
    /// The question set this configuration describes.
    pub fn resolved_questions(&self) -> Vec<Question> {
        if !self.questions.is_empty() {
            return self.questions.clone();
        }
        match &self.text {
            Some(text) => vec![Question {
                id: 1,
                text: text.clone(),
                options: self.options.clone(),
            }],
            None => Vec::new(),
        }
    }
}

/// Widget configuration, tagged by `type`.
///
/// ```yaml
/// widget:
///   type: audio-recording
///   phrase-to-record: "Set an alarm for seven thirty tomorrow morning"
///   min-duration: 2
///   max-duration: 5
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WidgetConfig {
    ImageAnnotation(ImageAnnotationConfig),
    AudioRecording(AudioRecordingConfig),
    TextClassification(TextClassificationConfig),
}

impl WidgetConfig {
    pub fn kind(&self) -> TaskKind {
        match self {
            WidgetConfig::ImageAnnotation(_) => TaskKind::Image,
            WidgetConfig::AudioRecording(_) => TaskKind::Audio,
            WidgetConfig::TextClassification(_) => TaskKind::Text,
        }
    }
}

/// A task contributors can pick up from the catalog.
///
/// Task files are Markdown with YAML front matter; the Markdown body becomes
/// the `description`.
///
/// ```markdown
/// ---
/// id: image-task-1
/// title: Label Objects in Street Scene
/// reward: 0.45
/// xp: 8
/// widget:
///   type: image-annotation
///   image-urls: ["/bustling-cityscape.png"]
///   objects-to-label: [Car, Pedestrian, Traffic Sign, Bicycle]
/// ---
///
/// Draw bounding boxes around vehicles, pedestrians, and traffic signs.
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct TaskDefinition {
    /// Unique task identifier, used to open the task.
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Reward paid on completion, in POOL.
    pub reward: f64,

    /// Experience points granted on completion.
    #[serde(default)]
    pub xp: u32,

    pub widget: WidgetConfig,
}

impl TaskDefinition {
    pub fn kind(&self) -> TaskKind {
        self.widget.kind()
    }
}

/// The payload a widget emits on submission.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum TaskResult {
    ImageAnnotation(ImageAnnotationResult),
    AudioRecording(AudioRecordingResult),
    TextClassification(ClassificationResult),
}

impl TaskResult {
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskResult::ImageAnnotation(_) => TaskKind::Image,
            TaskResult::AudioRecording(_) => TaskKind::Audio,
            TaskResult::TextClassification(_) => TaskKind::Text,
        }
    }
}
