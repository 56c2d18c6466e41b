//! Everything [`crate::Orchestrator::open_at`] needs besides the root path.
//!
//! Deserialized from `config.yaml` by the CLI; this crate never reads files
//! or the environment to build it.

use serde::{Deserialize, Serialize};

use sitegen_content::ContentConfig;

pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSettings {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub deploy: DeploySettings,
    #[serde(default)]
    pub notify: NotifySettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploySettings {
    /// Serve URLs as `<public_base_url>/<domain>` instead of `https://<domain>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifySettings {
    /// When set, outcomes are also POSTed here as JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default = "default_webhook_timeout")]
    pub timeout_secs: u64,
}

fn default_webhook_timeout() -> u64 {
    DEFAULT_WEBHOOK_TIMEOUT_SECS
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: DEFAULT_WEBHOOK_TIMEOUT_SECS,
        }
    }
}
