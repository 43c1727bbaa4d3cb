//! Task completion widgets.
//!
//! Each widget is a self-contained state machine that collects input,
//! derives its progress from its own state, gates submission on a completion
//! predicate, and produces a result payload exactly once.
//!
//! `Widget` wraps the three variants so a runner can dispatch `Op`s without
//! knowing which one it hosts.

pub mod audio_recording;
pub mod image_annotation;
pub mod text_classification;

pub use audio_recording::AudioRecordingWidget;
pub use image_annotation::ImageAnnotationWidget;
pub use text_classification::TextClassificationWidget;

use crate::capture::MicrophoneCapture;
use lp_protocol::audio_models::RecordingState;
use lp_protocol::config_models::GlobalConfig;
use lp_protocol::ipc::Op;
use lp_protocol::session_models::SessionPhase;
use lp_protocol::task_models::{TaskKind, TaskResult, WidgetConfig};
use lp_protocol::view_models::WidgetView;
use std::collections::HashSet;
use thiserror::Error;

/// Why a widget refused an operation. The widget state is unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WidgetError {
    #[error("Invalid widget configuration: {0}")]
    InvalidConfig(String),

    #[error("Submit is not available until the task is complete")]
    NotEligible,

    #[error("Task was already submitted")]
    AlreadySubmitted,

    #[error("Operation {op} is not supported by the {kind} widget")]
    UnsupportedOp { op: &'static str, kind: TaskKind },

    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Option {option:?} is not offered for question {question_id}")]
    UnknownOption { question_id: u32, option: String },

    #[error("Question index {index} is out of range (0..{count})")]
    QuestionOutOfRange { index: usize, count: usize },

    #[error("Cannot {action} while {state:?}")]
    InvalidRecordingState {
        action: &'static str,
        state: RecordingState,
    },
}

pub type WidgetResult<T> = Result<T, WidgetError>;

/// How much of a widget an operation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Change {
    /// Nothing changed.
    None,

    /// Only transient presentation state changed (drag preview, navigation).
    View,

    /// Session state changed; progress must be reported again.
    State,
}

impl Change {
    pub fn is_none(&self) -> bool {
        *self == Change::None
    }
}

/// Outcome of applying an `Op`.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub change: Change,

    /// Set when the operation was a successful submit.
    pub result: Option<TaskResult>,
}

impl Applied {
    fn changed(change: Change) -> Self {
        Self {
            change,
            result: None,
        }
    }

    fn submitted(result: TaskResult) -> Self {
        Self {
            change: Change::State,
            result: Some(result),
        }
    }
}

/// Behaviour shared by all widgets.
pub trait TaskWidget {
    /// Progress from 0 to 100, derived from the current state.
    fn progress(&self) -> f64;

    /// Whether the completion predicate holds.
    fn can_submit(&self) -> bool;

    fn is_submitted(&self) -> bool;

    /// Render snapshot of the current state.
    fn view(&self) -> WidgetView;

    fn phase(&self) -> SessionPhase {
        if self.is_submitted() {
            SessionPhase::Submitted
        } else if self.can_submit() {
            SessionPhase::EligibleForSubmit
        } else {
            SessionPhase::Collecting
        }
    }
}

/// Check a widget configuration before mounting it.
pub fn validate_config(config: &WidgetConfig) -> WidgetResult<()> {
    match config {
        WidgetConfig::ImageAnnotation(image) => {
            if image.image_urls.is_empty() {
                return Err(WidgetError::InvalidConfig(
                    "image annotation needs at least one image".to_string(),
                ));
            }
        }
        WidgetConfig::AudioRecording(audio) => {
            let valid = |secs: f64| secs.is_finite() && secs > 0.0;
            if !valid(audio.min_duration) || !valid(audio.max_duration) {
                return Err(WidgetError::InvalidConfig(
                    "recording durations must be positive".to_string(),
                ));
            }
            if audio.min_duration > audio.max_duration {
                return Err(WidgetError::InvalidConfig(format!(
                    "min-duration {} exceeds max-duration {}",
                    audio.min_duration, audio.max_duration
                )));
            }
        }
        WidgetConfig::TextClassification(text) => {
            let questions = text.resolved_questions();
            if questions.is_empty() {
                return Err(WidgetError::InvalidConfig(
                    "text classification needs at least one question".to_string(),
                ));
            }
            let mut seen = HashSet::new();
            for question in &questions {
                if !seen.insert(question.id) {
                    return Err(WidgetError::InvalidConfig(format!(
                        "duplicate question id {}",
                        question.id
                    )));
                }
                if question.options.is_empty() {
                    return Err(WidgetError::InvalidConfig(format!(
                        "question {} has no options",
                        question.id
                    )));
                }
            }
        }
    }
    Ok(())
}

/// A mounted widget of any kind.
pub enum Widget {
    ImageAnnotation(ImageAnnotationWidget),
    AudioRecording(AudioRecordingWidget),
    TextClassification(TextClassificationWidget),
}

impl Widget {
    /// Mount the widget described by `config`.
    ///
    /// `capture` is only called for audio widgets.
    pub fn from_config<F>(
        config: &WidgetConfig,
        settings: &GlobalConfig,
        capture: F,
    ) -> WidgetResult<Self>
    where
        F: FnOnce() -> Box<dyn MicrophoneCapture>,
    {
        validate_config(config)?;
        let widget = match config {
            WidgetConfig::ImageAnnotation(image) => {
                Widget::ImageAnnotation(ImageAnnotationWidget::new(image, settings)?)
            }
            WidgetConfig::AudioRecording(audio) => {
                Widget::AudioRecording(AudioRecordingWidget::new(audio, settings, capture())?)
            }
            WidgetConfig::TextClassification(text) => Widget::TextClassification(
                TextClassificationWidget::new(text.resolved_questions())?,
            ),
        };
        Ok(widget)
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Widget::ImageAnnotation(_) => TaskKind::Image,
            Widget::AudioRecording(_) => TaskKind::Audio,
            Widget::TextClassification(_) => TaskKind::Text,
        }
    }

    fn as_task_widget(&self) -> &dyn TaskWidget {
        match self {
            Widget::ImageAnnotation(w) => w,
            Widget::AudioRecording(w) => w,
            Widget::TextClassification(w) => w,
        }
    }

    /// Whether the recording tick should be running.
    pub fn is_recording(&self) -> bool {
        matches!(self, Widget::AudioRecording(w) if w.state() == RecordingState::Recording)
    }

    /// Advance the recording clock by one tick. No-op for other widgets.
    pub fn tick(&mut self) -> Change {
        match self {
            Widget::AudioRecording(w) => w.tick(),
            _ => Change::None,
        }
    }

    /// Apply one user operation.
    ///
    /// `Op::Close` is handled by whoever hosts the widget and is rejected
    /// here like any other unsupported operation.
    pub async fn apply(&mut self, op: &Op) -> WidgetResult<Applied> {
        if self.is_submitted() {
            return Err(WidgetError::AlreadySubmitted);
        }

        let kind = self.kind();
        let unsupported = || WidgetError::UnsupportedOp {
            op: op.name(),
            kind,
        };

        match self {
            Widget::ImageAnnotation(w) => {
                let change = match op {
                    Op::SelectLabel { label } => w.select_label(label)?,
                    Op::PointerDown { x, y } => w.pointer_down(*x, *y),
                    Op::PointerMove { x, y } => w.pointer_move(*x, *y),
                    Op::PointerUp | Op::PointerLeave => w.pointer_up(),
                    Op::Undo => w.undo(),
                    Op::Clear => w.clear(),
                    Op::PreviousImage => w.previous_image(),
                    Op::NextImage => w.next_image(),
                    Op::Submit => {
                        let result = w.submit()?;
                        return Ok(Applied::submitted(TaskResult::ImageAnnotation(result)));
                    }
                    _ => return Err(unsupported()),
                };
                Ok(Applied::changed(change))
            }
            Widget::AudioRecording(w) => {
                let change = match op {
                    Op::StartRecording => w.start_recording().await?,
                    Op::StopRecording => w.stop_recording()?,
                    Op::ResetRecording => w.reset(),
                    Op::Submit => {
                        let result = w.submit()?;
                        return Ok(Applied::submitted(TaskResult::AudioRecording(result)));
                    }
                    _ => return Err(unsupported()),
                };
                Ok(Applied::changed(change))
            }
            Widget::TextClassification(w) => {
                let change = match op {
                    Op::SelectOption { option } => w.select_option(option)?,
                    Op::PreviousQuestion => w.previous_question(),
                    Op::NextQuestion => w.next_question(),
                    Op::JumpToQuestion { index } => w.jump_to(*index)?,
                    Op::Submit => {
                        let result = w.submit()?;
                        return Ok(Applied::submitted(TaskResult::TextClassification(result)));
                    }
                    _ => return Err(unsupported()),
                };
                Ok(Applied::changed(change))
            }
        }
    }
}

impl TaskWidget for Widget {
    fn progress(&self) -> f64 {
        self.as_task_widget().progress()
    }

    fn can_submit(&self) -> bool {
        self.as_task_widget().can_submit()
    }

    fn is_submitted(&self) -> bool {
        self.as_task_widget().is_submitted()
    }

    fn view(&self) -> WidgetView {
        self.as_task_widget().view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SimulatedMicrophone;
    use lp_protocol::classification_models::Question;
    use lp_protocol::task_models::{
        AudioRecordingConfig, ImageAnnotationConfig, TextClassificationConfig,
    };

    fn mic() -> Box<dyn MicrophoneCapture> {
        Box::new(SimulatedMicrophone::granted())
    }

    fn image_config(images: usize) -> WidgetConfig {
        WidgetConfig::ImageAnnotation(ImageAnnotationConfig {
            image_urls: (0..images).map(|i| format!("/img-{i}.png")).collect(),
            objects_to_label: vec!["Car".to_string(), "Pedestrian".to_string()],
        })
    }

    #[test]
    fn test_validate_rejects_empty_image_set() {
        let result = validate_config(&image_config(0));
        assert!(matches!(result, Err(WidgetError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_durations() {
        let config = WidgetConfig::AudioRecording(AudioRecordingConfig {
            phrase_to_record: "hello".to_string(),
            min_duration: 6.0,
            max_duration: 5.0,
        });
        assert!(matches!(
            validate_config(&config),
            Err(WidgetError::InvalidConfig(reason)) if reason.contains("exceeds")
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_question_ids() {
        let question = Question {
            id: 7,
            text: "x".to_string(),
            options: vec!["a".to_string()],
        };
        let config = WidgetConfig::TextClassification(TextClassificationConfig {
            questions: vec![question.clone(), question],
            ..Default::default()
        });
        assert!(matches!(
            validate_config(&config),
            Err(WidgetError::InvalidConfig(reason)) if reason.contains("duplicate")
        ));
    }

    #[test]
    fn test_validate_accepts_single_question_shorthand() {
        let config = WidgetConfig::TextClassification(TextClassificationConfig {
            text: Some("Great product".to_string()),
            options: vec!["Positive".to_string(), "Negative".to_string()],
            ..Default::default()
        });
        assert!(validate_config(&config).is_ok());
    }

    #[tokio::test]
    async fn test_unsupported_op_is_rejected() {
        let mut widget =
            Widget::from_config(&image_config(1), &GlobalConfig::default(), mic).unwrap();

        let result = widget.apply(&Op::StartRecording).await;
        assert_eq!(
            result,
            Err(WidgetError::UnsupportedOp {
                op: "startRecording",
                kind: TaskKind::Image
            })
        );
    }

    #[tokio::test]
    async fn test_ops_after_submit_are_rejected() {
        let mut widget =
            Widget::from_config(&image_config(1), &GlobalConfig::default(), mic).unwrap();

        widget.apply(&Op::PointerDown { x: 10.0, y: 10.0 }).await.unwrap();
        widget.apply(&Op::PointerMove { x: 60.0, y: 60.0 }).await.unwrap();
        widget.apply(&Op::PointerUp).await.unwrap();
        assert_eq!(widget.phase(), SessionPhase::EligibleForSubmit);

        let applied = widget.apply(&Op::Submit).await.unwrap();
        assert!(matches!(applied.result, Some(TaskResult::ImageAnnotation(_))));
        assert_eq!(widget.phase(), SessionPhase::Submitted);

        assert_eq!(
            widget.apply(&Op::Submit).await,
            Err(WidgetError::AlreadySubmitted)
        );
        assert_eq!(widget.apply(&Op::Undo).await, Err(WidgetError::AlreadySubmitted));
    }

    #[tokio::test]
    async fn test_submit_before_complete_is_not_eligible() {
        let mut widget =
            Widget::from_config(&image_config(2), &GlobalConfig::default(), mic).unwrap();
        assert_eq!(widget.apply(&Op::Submit).await, Err(WidgetError::NotEligible));
        assert_eq!(widget.phase(), SessionPhase::Collecting);
    }

    #[tokio::test]
    async fn test_pointer_leave_commits_drawn_box() {
        let mut widget =
            Widget::from_config(&image_config(1), &GlobalConfig::default(), mic).unwrap();

        widget.apply(&Op::PointerDown { x: 0.0, y: 0.0 }).await.unwrap();
        widget.apply(&Op::PointerMove { x: 30.0, y: 30.0 }).await.unwrap();
        widget.apply(&Op::PointerLeave).await.unwrap();

        assert_eq!(widget.progress(), 100.0);
        assert_eq!(widget.phase(), SessionPhase::EligibleForSubmit);
        let WidgetView::ImageAnnotation(view) = widget.view() else {
            panic!("expected an image view");
        };
        assert_eq!(view.boxes.len(), 1);
        assert_eq!(view.boxes[0].width, 30.0);
        assert!(view.draft.is_none());

        // Leaving again with no drag in progress is harmless.
        widget.apply(&Op::PointerLeave).await.unwrap();
        assert_eq!(widget.progress(), 100.0);
    }

    #[tokio::test]
    async fn test_pointer_leave_discards_tiny_drag() {
        let mut widget =
            Widget::from_config(&image_config(1), &GlobalConfig::default(), mic).unwrap();

        widget.apply(&Op::PointerDown { x: 10.0, y: 10.0 }).await.unwrap();
        widget.apply(&Op::PointerMove { x: 14.0, y: 40.0 }).await.unwrap();
        widget.apply(&Op::PointerLeave).await.unwrap();

        assert_eq!(widget.progress(), 0.0);
        assert_eq!(widget.phase(), SessionPhase::Collecting);
        let WidgetView::ImageAnnotation(view) = widget.view() else {
            panic!("expected an image view");
        };
        assert!(view.boxes.is_empty());
        assert!(view.draft.is_none());
    }

    #[test]
    fn test_capture_factory_only_called_for_audio() {
        let result = Widget::from_config(&image_config(1), &GlobalConfig::default(), || {
            panic!("image widgets must not open a microphone")
        });
        assert!(result.is_ok());
    }
}
