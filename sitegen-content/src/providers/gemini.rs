//! Google Gemini `generateContent` backend.

use serde::Deserialize;
use serde_json::json;

use super::{non_empty_text, send_json, ContentProvider, ProviderSettings};
use crate::error::ProviderError;
use crate::prompt::Prompt;

pub struct GeminiProvider {
    settings: ProviderSettings,
    agent: ureq::Agent,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiProvider {
    pub fn new(settings: ProviderSettings, agent: ureq::Agent) -> Self {
        Self { settings, agent }
    }

    fn body(&self, prompt: &Prompt) -> serde_json::Value {
        json!({
            "systemInstruction": { "parts": [{ "text": prompt.system }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt.user }] }],
            "generationConfig": {
                "maxOutputTokens": self.settings.max_tokens,
                "responseMimeType": "application/json",
            },
        })
    }
}

fn extract_text(response: &GenerateResponse) -> Result<String, ProviderError> {
    non_empty_text(
        response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .into_iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref()),
    )
}

impl ContentProvider for GeminiProvider {
    fn name(&self) -> &str {
        &self.settings.name
    }

    fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url, self.settings.model
        );
        let request = self
            .agent
            .post(&url)
            .query("key", &self.settings.api_key);
        let response: GenerateResponse = send_json(request, self.body(prompt))?;
        extract_text(&response)
    }
}
