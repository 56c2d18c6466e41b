//! OpenAI-compatible chat completions backend.

use serde::Deserialize;
use serde_json::json;

use super::{non_empty_text, send_json, ContentProvider, ProviderSettings};
use crate::error::ProviderError;
use crate::prompt::Prompt;

pub struct OpenAiProvider {
    settings: ProviderSettings,
    agent: ureq::Agent,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(settings: ProviderSettings, agent: ureq::Agent) -> Self {
        Self { settings, agent }
    }

    fn body(&self, prompt: &Prompt) -> serde_json::Value {
        json!({
            "model": self.settings.model,
            "max_tokens": self.settings.max_tokens,
            "temperature": 0.7,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user },
            ],
        })
    }
}

fn extract_text(response: &ChatResponse) -> Result<String, ProviderError> {
    non_empty_text(
        response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref()),
    )
}

impl ContentProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.settings.name
    }

    fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let request = self
            .agent
            .post(&format!("{}/v1/chat/completions", self.settings.base_url))
            .set(
                "Authorization",
                &format!("Bearer {}", self.settings.api_key),
            );
        let response: ChatResponse = send_json(request, self.body(prompt))?;
        extract_text(&response)
    }
}
