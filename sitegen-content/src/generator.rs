//! The provider fallback chain.

use sitegen_core::{ContentSource, GeneratedContent, ProfileInput};

use crate::config::ContentConfig;
use crate::error::{ContentError, ProviderError};
use crate::fallback;
use crate::parse::parse_content;
use crate::prompt::build_prompt;
use crate::providers::ContentProvider;

/// One failed provider attempt, kept for logging and diagnostics.
#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: ProviderError,
}

/// Result of [`ContentGenerator::generate`].
#[derive(Debug)]
pub struct GenerationOutcome {
    pub content: GeneratedContent,
    pub source: ContentSource,
    pub failures: Vec<ProviderFailure>,
}

/// Produces website copy from a profile, trying providers in priority order
/// and falling back to synthesized copy.
pub struct ContentGenerator {
    providers: Vec<Box<dyn ContentProvider>>,
    preferred: Option<String>,
}

impl ContentGenerator {
    /// A generator over an explicit, priority-ordered provider list.
    pub fn new(providers: Vec<Box<dyn ContentProvider>>) -> Self {
        Self {
            providers,
            preferred: None,
        }
    }

    pub fn from_config(config: &ContentConfig) -> Self {
        Self {
            providers: config.build_providers(),
            preferred: config.preferred_provider.clone(),
        }
    }

    /// Provider tried first when the caller names none.
    pub fn with_preferred(mut self, name: impl Into<String>) -> Self {
        self.preferred = Some(name.into());
        self
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Generate content for `profile`.
    ///
    /// Fails only on an invalid profile. Every provider problem is absorbed:
    /// the next provider is tried, and when the chain is exhausted the copy
    /// is synthesized from the profile.
    pub fn generate(
        &self,
        profile: &ProfileInput,
        preferred: Option<&str>,
    ) -> Result<GenerationOutcome, ContentError> {
        profile.validate()?;
        let prompt = build_prompt(profile);
        let mut failures = Vec::new();

        for provider in self.attempt_order(preferred.or(self.preferred.as_deref())) {
            let name = provider.name().to_string();
            tracing::debug!(provider = %name, "requesting content");
            let attempt = provider
                .complete(&prompt)
                .and_then(|text| parse_content(&text).map_err(ProviderError::from));
            match attempt {
                Ok(mut content) => {
                    finish(&mut content, profile);
                    tracing::info!(provider = %name, failed_attempts = failures.len(), "content generated");
                    return Ok(GenerationOutcome {
                        content,
                        source: ContentSource::Provider(name),
                        failures,
                    });
                }
                Err(error) => {
                    tracing::warn!(provider = %name, error = %error, "provider failed; trying next");
                    failures.push(ProviderFailure {
                        provider: name,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            failed_attempts = failures.len(),
            "all providers exhausted; synthesizing fallback content"
        );
        let mut content = fallback::synthesize(profile);
        finish(&mut content, profile);
        Ok(GenerationOutcome {
            content,
            source: ContentSource::Fallback,
            failures,
        })
    }

    /// Preferred provider first, then the rest of the chain in order; each
    /// provider at most once.
    fn attempt_order(&self, preferred: Option<&str>) -> Vec<&dyn ContentProvider> {
        let mut order: Vec<&dyn ContentProvider> = Vec::with_capacity(self.providers.len());
        if let Some(wanted) = preferred {
            match self.providers.iter().find(|p| p.name() == wanted) {
                Some(p) => order.push(p.as_ref()),
                None => tracing::warn!(provider = %wanted, "preferred provider is not configured"),
            }
        }
        for provider in &self.providers {
            if order.iter().all(|p| p.name() != provider.name()) {
                order.push(provider.as_ref());
            }
        }
        order
    }
}

/// Post-processing applied to every accepted payload.
fn finish(content: &mut GeneratedContent, profile: &ProfileInput) {
    let mut seen = Vec::<String>::new();
    content.seo.keywords.retain(|k| {
        let key = k.trim().to_lowercase();
        if key.is_empty() || seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });
    for keyword in &mut content.seo.keywords {
        *keyword = keyword.trim().to_string();
    }
    content.ensure_keyword(&profile.profession);
}
