//! Error types for sitegen-content.

use thiserror::Error;

use sitegen_core::{IncompleteContent, ProfileError};

/// Hard failures of the content stage.
///
/// Provider problems never appear here: they are absorbed by the fallback
/// chain. Only input that no provider (nor the synthesizer) can work with is
/// reported.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),
}

/// Why a single provider attempt failed.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, DNS, TLS, or timeout failure.
    #[error("provider unavailable: {0}")]
    Transport(String),

    /// Non-2xx response.
    #[error("provider returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// The response envelope could not be decoded.
    #[error("could not decode provider response: {0}")]
    Decode(String),

    /// The envelope decoded but carried no text.
    #[error("provider response contained no text")]
    EmptyResponse,

    /// The text was not usable website content.
    #[error("malformed content: {0}")]
    Malformed(#[from] ParseError),
}

/// Why model output could not be turned into [`sitegen_core::GeneratedContent`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response is empty")]
    Empty,

    #[error("response is not valid content JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Incomplete(#[from] IncompleteContent),
}
