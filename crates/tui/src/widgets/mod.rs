//! TUI widgets module.
//!
//! Rendering for the task list, the active session view and the three task
//! widget panels.

pub mod annotation_canvas;
pub mod classification_panel;
pub mod recording_panel;
pub mod task_list;
pub mod task_view;

pub use annotation_canvas::AnnotationCanvas;
pub use task_list::render_task_list;
pub use task_view::render_task_view;
