use crate::config::settings::{AiConfig, ModelChoice, Settings, SystemConfig};

pub const DEFAULT_ENDPOINT: &str = "https://api.mistral.ai/v1/chat/completions";

impl Default for Settings {
    fn default() -> Self {
        Self {
            ai: AiConfig::default(),
            system: SystemConfig::default(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: ModelChoice::Auto,
            mistral_api_key: String::new(),
            codestral_api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            confirm_dangerous: true,
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_schema() {
        let settings = Settings::default();
        assert_eq!(settings.ai.model, ModelChoice::Auto);
        assert!(settings.ai.mistral_api_key.is_empty());
        assert!(settings.ai.codestral_api_key.is_empty());
        assert_eq!(settings.ai.endpoint, DEFAULT_ENDPOINT);
        assert!(settings.system.confirm_dangerous);
        assert!(!settings.system.verbose);
    }
}
