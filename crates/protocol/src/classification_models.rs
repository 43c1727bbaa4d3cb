//! Text classification models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// One multiple-choice question shown by the text classification widget.
///
/// # Example
///
/// ```yaml
/// id: 1
/// text: "The battery life is impressive but the UI is confusing."
/// options: [Positive, Negative, Neutral, Mixed]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct Question {
    /// Stable identifier used as the key of the answer map.
    pub id: u32,

    /// The passage to classify.
    pub text: String,

    /// Allowed answers, in display order.
    pub options: Vec<String>,
}

/// Payload emitted when a text classification task is submitted.
///
/// Maps question id to the option chosen for it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub selected_options: BTreeMap<u32, String>,
}
