//! Anthropic Messages API backend.

use serde::Deserialize;
use serde_json::json;

use super::{non_empty_text, send_json, ContentProvider, ProviderSettings};
use crate::error::ProviderError;
use crate::prompt::Prompt;

const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    settings: ProviderSettings,
    agent: ureq::Agent,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicProvider {
    pub fn new(settings: ProviderSettings, agent: ureq::Agent) -> Self {
        Self { settings, agent }
    }

    fn body(&self, prompt: &Prompt) -> serde_json::Value {
        json!({
            "model": self.settings.model,
            "max_tokens": self.settings.max_tokens,
            "system": prompt.system,
            "messages": [{ "role": "user", "content": prompt.user }],
        })
    }
}

fn extract_text(response: &MessagesResponse) -> Result<String, ProviderError> {
    non_empty_text(
        response
            .content
            .iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text.as_deref()),
    )
}

impl ContentProvider for AnthropicProvider {
    fn name(&self) -> &str {
        &self.settings.name
    }

    fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let request = self
            .agent
            .post(&format!("{}/v1/messages", self.settings.base_url))
            .set("x-api-key", &self.settings.api_key)
            .set("anthropic-version", API_VERSION)
            .set("content-type", "application/json");
        let response: MessagesResponse = send_json(request, self.body(prompt))?;
        extract_text(&response)
    }
}
