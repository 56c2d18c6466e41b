//! Root directory and `config.yaml` loading.
//!
//! The only place that reads the environment. API keys may come from
//! `SITEGEN_ANTHROPIC_API_KEY`, `SITEGEN_OPENAI_API_KEY` and
//! `SITEGEN_GEMINI_API_KEY`; a key from the environment fills every chain
//! entry of that kind that has none, or adds an entry when the chain has
//! none of that kind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use sitegen_content::{ProviderConfig, ProviderKind};
use sitegen_core::paths;
use sitegen_pipeline::PipelineSettings;

const KEY_VARS: [(ProviderKind, &str); 3] = [
    (ProviderKind::Anthropic, "SITEGEN_ANTHROPIC_API_KEY"),
    (ProviderKind::Openai, "SITEGEN_OPENAI_API_KEY"),
    (ProviderKind::Gemini, "SITEGEN_GEMINI_API_KEY"),
];

pub fn resolve_root(flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag {
        Some(root) => Ok(root),
        None => paths::default_root().context("cannot choose a data directory; pass --root"),
    }
}

/// `<root>/config.yaml` (defaults when absent) with environment keys applied.
pub fn load_settings(root: &Path) -> Result<PipelineSettings> {
    let mut settings = read_config_file(&paths::config_path(root))?;
    apply_env_keys(&mut settings, |var| std::env::var(var).ok());
    Ok(settings)
}

fn read_config_file(path: &Path) -> Result<PipelineSettings> {
    if !path.exists() {
        return Ok(PipelineSettings::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(PipelineSettings::default());
    }
    serde_yaml::from_str(&raw).with_context(|| format!("invalid config at {}", path.display()))
}

fn apply_env_keys(settings: &mut PipelineSettings, lookup: impl Fn(&str) -> Option<String>) {
    for (kind, var) in KEY_VARS {
        let Some(key) = lookup(var).map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
        else {
            continue;
        };
        let providers = &mut settings.content.providers;
        let mut has_kind = false;
        for entry in providers.iter_mut().filter(|p| p.kind == kind) {
            has_kind = true;
            if entry.api_key.is_none() {
                entry.api_key = Some(key.clone());
            }
        }
        if !has_kind {
            providers.push(ProviderConfig {
                api_key: Some(key),
                ..ProviderConfig::new(kind)
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = read_config_file(&tmp.path().join("config.yaml")).unwrap();
        assert_eq!(settings, PipelineSettings::default());
    }

    #[test]
    fn malformed_file_names_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "content: [unclosed").unwrap();
        let err = read_config_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.yaml"));
    }

    #[test]
    fn env_key_fills_configured_entry_and_keeps_file_key() {
        let mut settings: PipelineSettings = serde_yaml::from_str(
            r#"
content:
  providers:
    - kind: openai
      api_key: from-file
    - kind: anthropic
"#,
        )
        .unwrap();
        apply_env_keys(
            &mut settings,
            env(&[
                ("SITEGEN_ANTHROPIC_API_KEY", "from-env"),
                ("SITEGEN_OPENAI_API_KEY", "ignored"),
            ]),
        );
        let providers = &settings.content.providers;
        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0].api_key.as_deref(), Some("from-file"));
        assert_eq!(providers[1].api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn env_key_adds_missing_kind_in_fixed_order() {
        let mut settings = PipelineSettings::default();
        apply_env_keys(
            &mut settings,
            env(&[
                ("SITEGEN_GEMINI_API_KEY", "g"),
                ("SITEGEN_ANTHROPIC_API_KEY", "a"),
                ("SITEGEN_OPENAI_API_KEY", "  "),
            ]),
        );
        let kinds: Vec<_> = settings.content.providers.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![ProviderKind::Anthropic, ProviderKind::Gemini]);
    }
}
