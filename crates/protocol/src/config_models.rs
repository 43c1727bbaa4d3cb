//! Global configuration models for `.labelpool/config.toml`.
//!
//! Every field has a default, so an empty or missing file is valid.

use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

/// Progress reported once a take is recorded but not yet submitted.
///
/// Submission accounts for the remaining share. This is a fixed convention
/// of the recording widget, not a computed value.
pub const DEFAULT_RECORDED_PROGRESS: f64 = 80.0;

/// Drags must exceed this many pixels on both axes to create a box.
pub const DEFAULT_MIN_BOX_SIZE: f64 = 5.0;

/// Period of the recording tick.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Represents global settings from `.labelpool/config.toml`.
///
/// # Example
///
/// ```toml
/// # .labelpool/config.toml
/// min-box-size = 5.0
/// tick-interval-ms = 100
/// recorded-progress = 80.0
///
/// [label-colors]
/// Car = "#FF44A4"
/// Pedestrian = "#44FFD2"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "kebab-case", default)]
pub struct GlobalConfig {
    /// Minimum drag extent, in canvas pixels, on each axis.
    pub min_box_size: f64,

    /// Period of the recording tick in milliseconds.
    #[ts(type = "number")]
    pub tick_interval_ms: u64,

    /// Progress shown after a take is recorded.
    pub recorded_progress: f64,

    /// Size of the annotation canvas in pixels.
    pub canvas_width: f64,
    pub canvas_height: f64,

    /// Label selected when a task lists no labels.
    pub default_label: String,

    /// Box color per label.
    pub label_colors: BTreeMap<String, String>,

    /// Box color for labels missing from `label-colors`.
    pub default_label_color: String,
}

impl GlobalConfig {
    /// Display color for boxes carrying `label`.
    pub fn color_for(&self, label: &str) -> &str {
        self.label_colors
            .get(label)
            .map(String::as_str)
            .unwrap_or(&self.default_label_color)
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        let label_colors = [
            ("Car", "#FF44A4"),
            ("Pedestrian", "#44FFD2"),
            ("Traffic Sign", "#7F5AF0"),
            ("Bicycle", "#FFD700"),
        ]
        .into_iter()
        .map(|(label, color)| (label.to_string(), color.to_string()))
        .collect();

        Self {
            min_box_size: DEFAULT_MIN_BOX_SIZE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            recorded_progress: DEFAULT_RECORDED_PROGRESS,
            canvas_width: 600.0,
            canvas_height: 360.0,
            default_label: "Object".to_string(),
            label_colors,
            default_label_color: "#FF6B6B".to_string(),
        }
    }
}
