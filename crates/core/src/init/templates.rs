//! Embedded template files for `.labelpool` initialization.
//!
//! Templates live in the workspace `templates/` directory and are compiled
//! into the binary with `rust-embed`, so `labelpool init` works without any
//! files on disk.

use rust_embed::RustEmbed;

/// Embedded template files from the `templates/` directory.
///
/// The path is relative to the crate root:
/// - `CARGO_MANIFEST_DIR` = `crates/core`
/// - `../../templates` = workspace `templates/`
///
/// With the `debug-embed` feature, debug builds embed the files as well.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path, e.g. `"tasks/street-scene.md"`.
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// List template files under `prefix`, sorted by path.
pub fn list_templates(prefix: &str) -> Vec<String> {
    let mut paths: Vec<String> = TemplateAssets::iter()
        .filter(|path| path.starts_with(prefix))
        .map(|path| path.to_string())
        .collect();
    paths.sort();
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use lp_protocol::config_models::GlobalConfig;
    use lp_protocol::task_models::{TaskDefinition, WidgetConfig};

    #[test]
    fn test_config_template_matches_defaults() {
        let content = get_template("config.toml").expect("config.toml should be embedded");
        let parsed: GlobalConfig = toml::from_str(&content).expect("config.toml should parse");
        assert_eq!(parsed, GlobalConfig::default());
    }

    #[test]
    fn test_list_task_templates() {
        let tasks = list_templates("tasks/");
        assert_eq!(
            tasks,
            vec![
                "tasks/review-sentiment.yaml".to_string(),
                "tasks/street-scene.md".to_string(),
                "tasks/voice-command.md".to_string(),
            ]
        );
    }

    #[test]
    fn test_sentiment_template_has_five_questions() {
        let content =
            get_template("tasks/review-sentiment.yaml").expect("sentiment task should be embedded");
        let task: TaskDefinition = serde_yaml::from_str(&content).expect("task should parse");

        match task.widget {
            WidgetConfig::TextClassification(config) => {
                assert_eq!(config.questions.len(), 5);
                assert!(config.questions.iter().all(|q| q.options.len() == 4));
            }
            other => panic!("Expected text classification, got {:?}", other),
        }
    }

    #[test]
    fn test_get_nonexistent_template() {
        assert!(get_template("nonexistent.txt").is_none());
    }
}
