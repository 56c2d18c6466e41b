//! Content generator configuration.
//!
//! Passed explicitly into [`crate::ContentGenerator::from_config`]; nothing in
//! this crate reads the environment.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::providers::{AnthropicProvider, ContentProvider, GeminiProvider, OpenAiProvider};

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Which wire protocol a provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    /// Any OpenAI-compatible chat completions endpoint.
    Openai,
    Gemini,
}

impl ProviderKind {
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "claude-sonnet-4-20250514",
            ProviderKind::Openai => "gpt-4o-mini",
            ProviderKind::Gemini => "gemini-1.5-flash",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "https://api.anthropic.com",
            ProviderKind::Openai => "https://api.openai.com",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::Openai => write!(f, "openai"),
            ProviderKind::Gemini => write!(f, "gemini"),
        }
    }
}

/// One entry in the provider priority chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Display name; defaults to the kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            name: None,
            model: None,
            api_key: None,
            base_url: None,
        }
    }

    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.kind.to_string())
    }
}

/// Settings for the content stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Priority-ordered provider chain.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    /// Provider name tried first when the caller does not pick one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_provider: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            preferred_provider: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ContentConfig {
    /// Instantiate every provider that has an API key, in chain order.
    ///
    /// Entries without a key are skipped with a warning; an empty chain is
    /// valid and means every generation uses synthesized content.
    pub fn build_providers(&self) -> Vec<Box<dyn ContentProvider>> {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build();

        let mut providers: Vec<Box<dyn ContentProvider>> = Vec::new();
        for entry in &self.providers {
            let Some(api_key) = entry.api_key.clone().filter(|k| !k.trim().is_empty()) else {
                tracing::warn!(provider = %entry.display_name(), "no API key configured; skipping provider");
                continue;
            };
            let settings = crate::providers::ProviderSettings {
                name: entry.display_name(),
                model: entry
                    .model
                    .clone()
                    .unwrap_or_else(|| entry.kind.default_model().to_string()),
                api_key,
                base_url: entry
                    .base_url
                    .clone()
                    .unwrap_or_else(|| entry.kind.default_base_url().to_string())
                    .trim_end_matches('/')
                    .to_string(),
                max_tokens: self.max_tokens,
            };
            let provider: Box<dyn ContentProvider> = match entry.kind {
                ProviderKind::Anthropic => Box::new(AnthropicProvider::new(settings, agent.clone())),
                ProviderKind::Openai => Box::new(OpenAiProvider::new(settings, agent.clone())),
                ProviderKind::Gemini => Box::new(GeminiProvider::new(settings, agent.clone())),
            };
            providers.push(provider);
        }
        providers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_defaults_apply() {
        let cfg: ContentConfig = serde_yaml::from_str(
            "providers:\n  - kind: anthropic\n    api_key: k1\n  - kind: gemini\n",
        )
        .unwrap();
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.providers.len(), 2);
        assert_eq!(cfg.providers[1].kind, ProviderKind::Gemini);
    }

    #[test]
    fn providers_without_keys_are_skipped() {
        let mut keyed = ProviderConfig::new(ProviderKind::Openai);
        keyed.api_key = Some("sk-test".to_string());
        keyed.name = Some("primary".to_string());
        let cfg = ContentConfig {
            providers: vec![ProviderConfig::new(ProviderKind::Anthropic), keyed],
            ..Default::default()
        };
        let built = cfg.build_providers();
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].name(), "primary");
    }
}
