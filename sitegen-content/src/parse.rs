//! Turning raw model output into validated [`GeneratedContent`].
//!
//! Models wrap JSON in markdown fences or surround it with chatter. Parsing
//! tries, in order: the fence-stripped text, the first fenced block found
//! anywhere in the reply, and the outermost `{…}` span. The first candidate
//! that decodes and validates wins; otherwise the error from the primary
//! candidate is reported.

use sitegen_core::GeneratedContent;

use crate::error::ParseError;

pub fn parse_content(raw: &str) -> Result<GeneratedContent, ParseError> {
    let primary = strip_code_fence(raw);
    if primary.is_empty() {
        return Err(ParseError::Empty);
    }

    let first_err = match decode(primary) {
        Ok(content) => return Ok(content),
        Err(err) => err,
    };

    let fallbacks = [fenced_block(raw), outermost_object(raw)];
    for candidate in fallbacks.into_iter().flatten() {
        if candidate == primary {
            continue;
        }
        if let Ok(content) = decode(candidate) {
            tracing::debug!("content recovered by secondary extraction");
            return Ok(content);
        }
    }
    Err(first_err)
}

fn decode(text: &str) -> Result<GeneratedContent, ParseError> {
    let content: GeneratedContent = serde_json::from_str(text)?;
    content.validate()?;
    Ok(content)
}

/// Remove a surrounding ```` ```lang … ``` ```` wrapper, if the whole reply is one.
pub(crate) fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Body of the first fenced block anywhere in `raw`.
pub(crate) fn fenced_block(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let after_open = &raw[start + 3..];
    let body_start = after_open.find('\n')? + 1;
    let body = &after_open[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Span from the first `{` to the last `}`.
pub(crate) fn outermost_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}
