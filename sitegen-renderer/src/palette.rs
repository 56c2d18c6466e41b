//! Color palettes and their CSS custom properties.

use serde::{Deserialize, Serialize};

/// Scheme looked up when the requested one does not exist.
pub const DEFAULT_SCHEME: &str = "default";

/// A named set of CSS colors used to theme a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<String>,
}

impl Palette {
    /// Built-in neutral palette used when a template defines no `default`.
    pub fn neutral() -> Self {
        Self {
            primary: "#2d3748".to_string(),
            secondary: "#4a5568".to_string(),
            accent: "#3182ce".to_string(),
            background: "#ffffff".to_string(),
            text: "#1a202c".to_string(),
            muted: Some("#718096".to_string()),
        }
    }

    /// `--color-*` declarations, one per line, for a `:root` block.
    pub fn css_properties(&self) -> String {
        let muted = self.muted.as_deref().unwrap_or(&self.secondary);
        [
            ("primary", self.primary.as_str()),
            ("secondary", self.secondary.as_str()),
            ("accent", self.accent.as_str()),
            ("background", self.background.as_str()),
            ("text", self.text.as_str()),
            ("muted", muted),
        ]
        .iter()
        .map(|(name, value)| format!("  --color-{name}: {};\n", css_value(value)))
        .collect()
    }
}

/// Keep a configured color from escaping its declaration.
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>'))
        .collect::<String>()
        .trim()
        .to_string()
}
