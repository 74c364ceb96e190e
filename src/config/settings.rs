use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Which completion model prompts are routed to by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelChoice {
    /// Pick per prompt: coding prompts go to the code model
    Auto,
    /// Always use the general reasoning model
    Mistral,
    /// Prefer the code-specialized model
    Codestral,
}

impl ModelChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelChoice::Auto => "auto",
            ModelChoice::Mistral => "mistral",
            ModelChoice::Codestral => "codestral",
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective configuration, merged from built-in defaults, the user layer
/// (`~/.termforge/config.json`) and the project layer
/// (`./.termforge/config.json`). Rebuilt from disk on every invocation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub ai: AiConfig,
    pub system: SystemConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    pub model: ModelChoice,
    pub mistral_api_key: String,
    pub codestral_api_key: String,
    pub endpoint: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SystemConfig {
    pub confirm_dangerous: bool,
    pub verbose: bool,
}

impl Settings {
    /// Loads the effective configuration for the current invocation.
    ///
    /// Missing layer files are not errors; malformed JSON in an existing
    /// layer is fatal for the invocation.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::user_config_path()?, &Self::project_config_path())
    }

    pub fn load_from(user_path: &Path, project_path: &Path) -> Result<Self> {
        let mut merged = serde_json::to_value(Settings::default())?;

        for path in [user_path, project_path] {
            if !path.exists() {
                continue;
            }
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let layer: Value = serde_json::from_str(&content)
                .with_context(|| format!("Malformed JSON in {}", path.display()))?;
            deep_merge(&mut merged, layer);
        }

        let settings = serde_json::from_value(merged)
            .context("Configuration does not match the expected schema")?;
        Ok(settings)
    }

    /// Persists this configuration to the user layer only. The project
    /// layer is never written by the tool.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::user_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn user_config_path() -> Result<PathBuf> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home_dir.join(".termforge").join("config.json"))
    }

    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".termforge").join("config.json")
    }
}

/// Recursive key-by-key merge. For a key present on both sides the overlay
/// wins; two mappings merge recursively, anything else is replaced
/// wholesale (arrays included). Keys only present in `base` survive.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value);
                    }
                    _ => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, overlay) => *slot = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_keeps_default_keys_absent_from_override() {
        let mut base = json!({"ai": {"model": "auto", "key": "x"}});
        deep_merge(&mut base, json!({"ai": {"model": "mistral"}}));
        assert_eq!(base, json!({"ai": {"model": "mistral", "key": "x"}}));
    }

    #[test]
    fn merge_replaces_non_mapping_values_wholesale() {
        let mut base = json!({"list": [1, 2, 3], "nested": {"a": 1}});
        deep_merge(&mut base, json!({"list": [9], "nested": "flat"}));
        assert_eq!(base, json!({"list": [9], "nested": "flat"}));
    }

    #[test]
    fn merge_allows_mapping_to_replace_scalar() {
        let mut base = json!({"value": 1});
        deep_merge(&mut base, json!({"value": {"inner": true}}));
        assert_eq!(base, json!({"value": {"inner": true}}));
    }

    #[test]
    fn load_without_layer_files_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(
            &dir.path().join("missing-user.json"),
            &dir.path().join("missing-project.json"),
        )
        .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn project_layer_overrides_user_layer() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.json");
        let project = dir.path().join("project.json");
        std::fs::write(
            &user,
            r#"{"ai": {"model": "mistral", "mistral_api_key": "from-user"}}"#,
        )
        .unwrap();
        std::fs::write(&project, r#"{"ai": {"model": "codestral"}}"#).unwrap();

        let settings = Settings::load_from(&user, &project).unwrap();
        assert_eq!(settings.ai.model, ModelChoice::Codestral);
        assert_eq!(settings.ai.mistral_api_key, "from-user");
        // untouched default keys survive both layers
        assert!(settings.system.confirm_dangerous);
    }

    #[test]
    fn malformed_layer_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.json");
        std::fs::write(&user, "{not json").unwrap();
        let result = Settings::load_from(&user, &dir.path().join("missing.json"));
        assert!(result.is_err());
    }

    #[test]
    fn save_writes_only_the_given_path_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("deep").join("config.json");

        let mut settings = Settings::default();
        settings.ai.model = ModelChoice::Codestral;
        settings.save_to(&user).unwrap();

        let reloaded = Settings::load_from(&user, &dir.path().join("missing.json")).unwrap();
        assert_eq!(reloaded.ai.model, ModelChoice::Codestral);
        assert_eq!(
            std::fs::read_dir(dir.path()).unwrap().count(),
            1,
            "no project file should appear"
        );
    }
}
