//! Render-ready widget snapshots.
//!
//! The core sends one of these after every state change so a front-end can
//! draw the widget without reaching into its state machine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::annotation_models::{AnnotationBox, Rect};
use crate::audio_models::RecordingState;
use crate::classification_models::Question;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnnotationView {
    pub image_index: usize,
    pub image_count: usize,
    pub image_url: String,
    pub labels: Vec<String>,
    pub selected_label: String,

    /// Color boxes drawn with the selected label will get.
    pub selected_color: String,

    /// Boxes of the current image, bottom-most first.
    pub boxes: Vec<AnnotationBox>,

    /// The rectangle being dragged out, if a draw is in progress.
    pub draft: Option<Rect>,

    /// For each image, whether it has at least one box.
    pub annotated: Vec<bool>,

    pub canvas_width: f64,
    pub canvas_height: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct AudioRecordingView {
    pub phrase: String,
    pub state: RecordingState,
    pub elapsed_secs: f64,
    pub min_duration: f64,
    pub max_duration: f64,

    /// Size of the captured take in bytes, once recorded.
    pub clip_bytes: Option<usize>,

    /// Loudness of the latest captured chunk, 0.0 to 1.0. Zero unless
    /// recording.
    pub input_level: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct TextClassificationView {
    pub question_index: usize,
    pub question_count: usize,
    pub question: Question,

    /// Answer recorded for the current question.
    pub selected: Option<String>,

    /// For each question, whether it has been answered.
    pub answered: Vec<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum WidgetView {
    ImageAnnotation(ImageAnnotationView),
    AudioRecording(AudioRecordingView),
    TextClassification(TextClassificationView),
}
