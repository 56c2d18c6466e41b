//! Language-model backends.
//!
//! Every backend implements [`ContentProvider`]; the generator walks an
//! ordered list of them and never cares which protocol sits behind one.

mod anthropic;
mod gemini;
mod openai;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::prompt::Prompt;

/// Longest error body kept in [`ProviderError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// A backend able to turn a prompt into raw text.
pub trait ContentProvider: Send + Sync {
    /// Stable name used for logging, preference matching and provenance.
    fn name(&self) -> &str;

    /// Run one completion. Blocking; bounded by the backend's own timeout.
    fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError>;
}

/// Resolved settings shared by the HTTP backends.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub name: String,
    pub model: String,
    pub api_key: String,
    /// Without trailing slash.
    pub base_url: String,
    pub max_tokens: u32,
}

/// Send a prepared request with a JSON body and decode the JSON reply.
pub(crate) fn send_json<T: DeserializeOwned>(
    request: ureq::Request,
    body: serde_json::Value,
) -> Result<T, ProviderError> {
    match request.send_json(body) {
        Ok(response) => response
            .into_json::<T>()
            .map_err(|e| ProviderError::Decode(e.to_string())),
        Err(ureq::Error::Status(code, response)) => {
            let mut body = response.into_string().unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            Err(ProviderError::Status { code, body })
        }
        Err(ureq::Error::Transport(transport)) => {
            Err(ProviderError::Transport(transport.to_string()))
        }
    }
}

/// Join text fragments, rejecting an all-blank result.
pub(crate) fn non_empty_text<'a>(
    parts: impl IntoIterator<Item = &'a str>,
) -> Result<String, ProviderError> {
    let text: String = parts.into_iter().collect();
    if text.trim().is_empty() {
        Err(ProviderError::EmptyResponse)
    } else {
        Ok(text)
    }
}
