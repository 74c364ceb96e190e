use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{ModelChoice, Settings};

pub const REASONING_MODEL: &str = "mistral-large-latest";
pub const CODING_MODEL: &str = "codestral-latest";

/// What kind of answer the prompt expects, used to pick the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMode {
    Reasoning,
    Coding,
}

// ============================================================================
// Chat Completions API Structures
// ============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<RequestMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct RequestMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Coding prompts go to the code-specialized model unless the user pinned
/// the general model explicitly; everything else uses the reasoning model.
pub fn select_model(configured: ModelChoice, mode: RouteMode) -> &'static str {
    if mode == RouteMode::Coding && configured != ModelChoice::Mistral {
        CODING_MODEL
    } else {
        REASONING_MODEL
    }
}

pub struct AiRouter {
    client: Client,
    endpoint: Url,
    model: ModelChoice,
    mistral_api_key: String,
    codestral_api_key: String,
}

impl AiRouter {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        let endpoint = Url::parse(&settings.ai.endpoint).context("Invalid AI endpoint URL")?;

        Ok(Self {
            client,
            endpoint,
            model: settings.ai.model,
            mistral_api_key: settings.ai.mistral_api_key.clone(),
            codestral_api_key: settings.ai.codestral_api_key.clone(),
        })
    }

    pub fn select_model(&self, mode: RouteMode) -> &'static str {
        select_model(self.model, mode)
    }

    fn api_key_for(&self, model: &str) -> &str {
        if model == CODING_MODEL && !self.codestral_api_key.is_empty() {
            &self.codestral_api_key
        } else {
            &self.mistral_api_key
        }
    }

    /// Sends one blocking completion request. Network, auth and response
    /// shape failures surface as errors; callers decide how to render them.
    pub async fn route(&self, prompt: &str, mode: RouteMode) -> Result<String> {
        let model = self.select_model(mode);
        debug!("Routing prompt to {model}, prompt length: {}", prompt.len());

        let request = CompletionRequest {
            model: model.to_string(),
            messages: vec![RequestMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.2,
            max_tokens: 2000,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key_for(model))
            .json(&request)
            .send()
            .await
            .context("Failed to reach AI endpoint")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "AI endpoint returned {}",
                response.status()
            ));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse AI response")?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("AI response contained no choices"))?;

        info!("Received {} chars from {model}", content.len());
        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coding_mode_prefers_code_model_unless_pinned_to_mistral() {
        assert_eq!(select_model(ModelChoice::Auto, RouteMode::Coding), CODING_MODEL);
        assert_eq!(
            select_model(ModelChoice::Codestral, RouteMode::Coding),
            CODING_MODEL
        );
        assert_eq!(
            select_model(ModelChoice::Mistral, RouteMode::Coding),
            REASONING_MODEL
        );
    }

    #[test]
    fn reasoning_mode_always_uses_general_model() {
        for configured in [ModelChoice::Auto, ModelChoice::Mistral, ModelChoice::Codestral] {
            assert_eq!(select_model(configured, RouteMode::Reasoning), REASONING_MODEL);
        }
    }
}
