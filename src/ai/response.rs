use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Component, Path};

/// One file of an AI-generated project scaffold.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ScaffoldFile {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ScaffoldPlan {
    pub files: Vec<ScaffoldFile>,
    pub instructions: Vec<String>,
}

impl ScaffoldPlan {
    /// Parses the scaffold payload the model was asked to produce. Models
    /// sometimes wrap the JSON in a markdown fence despite instructions, so
    /// a fenced body is unwrapped before parsing.
    pub fn parse(response: &str) -> Result<Self> {
        let body = strip_code_fences(response);
        let plan: ScaffoldPlan =
            serde_json::from_str(body).context("AI response was not the expected JSON scaffold")?;

        for file in &plan.files {
            if !is_safe_relative_path(&file.path) {
                return Err(anyhow::anyhow!(
                    "Scaffold contains an unsafe path: {}",
                    file.path
                ));
            }
        }

        Ok(plan)
    }
}

/// Unwraps a ```lang ... ``` fenced block; anything else passes through.
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        if let Some(end) = rest.rfind("```") {
            let inner = &rest[..end];
            // drop the language tag on the opening fence, if any
            return match inner.split_once('\n') {
                Some((first_line, body)) if !first_line.contains(' ') => body.trim(),
                _ => inner.trim(),
            };
        }
    }
    trimmed
}

fn is_safe_relative_path(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    Path::new(path)
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json_payload() {
        let plan = ScaffoldPlan::parse(
            r#"{"files": [{"path": "src/app.py", "content": "pass"}], "instructions": ["run it"]}"#,
        )
        .unwrap();
        assert_eq!(plan.files.len(), 1);
        assert_eq!(plan.files[0].path, "src/app.py");
        assert_eq!(plan.instructions, vec!["run it"]);
    }

    #[test]
    fn unwraps_markdown_fenced_payload() {
        let response = "```json\n{\"files\": [], \"instructions\": []}\n```";
        let plan = ScaffoldPlan::parse(response).unwrap();
        assert!(plan.files.is_empty());
    }

    #[test]
    fn rejects_escaping_and_absolute_paths() {
        for path in ["../evil", "/etc/passwd", ""] {
            let response = format!(r#"{{"files": [{{"path": "{path}", "content": ""}}]}}"#);
            assert!(ScaffoldPlan::parse(&response).is_err(), "{path} accepted");
        }
    }

    #[test]
    fn non_json_payload_is_an_error() {
        assert!(ScaffoldPlan::parse("Here is your project!").is_err());
    }

    #[test]
    fn strip_code_fences_passes_plain_text_through() {
        assert_eq!(strip_code_fences("  hello  "), "hello");
    }
}
