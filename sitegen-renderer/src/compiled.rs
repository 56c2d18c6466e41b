//! Placeholder templating for HTML skeletons.
//!
//! A skeleton is parsed once into segments: literal text, `{{token}}`
//! placeholders and non-nested `{{#if field}}…{{else}}…{{/if}}` blocks.
//! Rendering is a single pass: each conditional picks its branch first, then
//! the surviving tokens are looked up in a [`Values`] map. Tokens inside a
//! discarded branch never need a value.

use std::collections::{BTreeSet, HashMap};

use crate::error::RenderError;

/// Placeholders that render as an empty string when they have no value.
pub const ALLOWED_EMPTY: &[&str] = &["logo_url", "photo_url"];

/// HTML-escape `text` and break up `{{` / `}}` so substituted copy can never
/// read as a placeholder in the output.
pub fn escape_text(text: &str) -> String {
    neutralize_braces(&tera::escape_html(text))
}

fn neutralize_braces(text: &str) -> String {
    text.replace("{{", "&#123;&#123;").replace("}}", "&#125;&#125;")
}

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Plain text; HTML-escaped on substitution.
    Text(String),
    /// Markup assembled by the renderer from already-escaped parts.
    Markup(String),
}

impl Value {
    fn as_str(&self) -> &str {
        match self {
            Value::Text(s) | Value::Markup(s) => s,
        }
    }
}

/// Placeholder name → value.
#[derive(Debug, Clone, Default)]
pub struct Values {
    map: HashMap<String, Value>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.map.insert(key.to_string(), Value::Text(value.into()));
        self
    }

    /// Bind `value` only when present.
    pub fn opt_text(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.text(key, value);
        }
        self
    }

    pub fn markup(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.map.insert(key.to_string(), Value::Markup(value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// Absent or whitespace-only values are false.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.non_blank(key).is_some()
    }

    fn non_blank(&self, key: &str) -> Option<&Value> {
        self.map.get(key).filter(|v| !v.as_str().trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Token(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Piece(Piece),
    Conditional {
        field: String,
        then: Vec<Piece>,
        otherwise: Vec<Piece>,
    },
}

/// A parsed skeleton, ready to render any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    segments: Vec<Segment>,
}

/// Parser state for the conditional currently open, if any.
struct OpenBlock {
    field: String,
    then: Vec<Piece>,
    otherwise: Option<Vec<Piece>>,
}

impl OpenBlock {
    fn push(&mut self, piece: Piece) {
        match &mut self.otherwise {
            Some(branch) => branch.push(piece),
            None => self.then.push(piece),
        }
    }
}

impl CompiledTemplate {
    /// Parse `source`. The error is a human-readable description of the
    /// first syntax problem.
    pub fn compile(source: &str) -> Result<Self, String> {
        let mut segments = Vec::new();
        let mut open: Option<OpenBlock> = None;
        let mut rest = source;
        let mut offset = 0;

        let push = |open: &mut Option<OpenBlock>, segments: &mut Vec<Segment>, piece: Piece| {
            match open {
                Some(block) => block.push(piece),
                None => segments.push(Segment::Piece(piece)),
            }
        };

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                push(&mut open, &mut segments, Piece::Literal(rest[..start].to_string()));
            }
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or_else(|| format!("unclosed '{{{{' at byte {}", offset + start))?;
            let tag = after[..end].trim();

            if let Some(field) = tag.strip_prefix("#if ") {
                let field = field.trim();
                check_name(field, tag)?;
                if let Some(block) = &open {
                    return Err(format!(
                        "nested {{{{#if {field}}}}} inside {{{{#if {}}}}}",
                        block.field
                    ));
                }
                open = Some(OpenBlock {
                    field: field.to_string(),
                    then: Vec::new(),
                    otherwise: None,
                });
            } else if tag == "else" {
                match &mut open {
                    Some(block) if block.otherwise.is_none() => block.otherwise = Some(Vec::new()),
                    Some(block) => return Err(format!("second {{{{else}}}} in {{{{#if {}}}}}", block.field)),
                    None => return Err("{{else}} outside {{#if}}".to_string()),
                }
            } else if tag == "/if" {
                let block = open.take().ok_or("{{/if}} without {{#if}}")?;
                segments.push(Segment::Conditional {
                    field: block.field,
                    then: block.then,
                    otherwise: block.otherwise.unwrap_or_default(),
                });
            } else {
                check_name(tag, tag)?;
                push(&mut open, &mut segments, Piece::Token(tag.to_string()));
            }

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }

        if let Some(block) = open {
            return Err(format!("unterminated {{{{#if {}}}}}", block.field));
        }
        if !rest.is_empty() {
            segments.push(Segment::Piece(Piece::Literal(rest.to_string())));
        }
        Ok(Self { segments })
    }

    /// Every placeholder name referenced anywhere, including conditions.
    pub fn tokens(&self) -> BTreeSet<&str> {
        fn add<'a>(out: &mut BTreeSet<&'a str>, pieces: &'a [Piece]) {
            for piece in pieces {
                if let Piece::Token(name) = piece {
                    out.insert(name.as_str());
                }
            }
        }

        let mut out = BTreeSet::new();
        for segment in &self.segments {
            match segment {
                Segment::Piece(piece) => add(&mut out, std::slice::from_ref(piece)),
                Segment::Conditional {
                    field,
                    then,
                    otherwise,
                } => {
                    out.insert(field.as_str());
                    add(&mut out, then);
                    add(&mut out, otherwise);
                }
            }
        }
        out
    }

    /// Render with `values`.
    ///
    /// Fails with [`RenderError::SubstitutionIncomplete`] naming every
    /// surviving token that has no non-blank value and is not in
    /// [`ALLOWED_EMPTY`].
    pub fn render(&self, values: &Values) -> Result<String, RenderError> {
        let mut out = String::new();
        let mut missing = BTreeSet::new();

        for segment in &self.segments {
            let pieces = match segment {
                Segment::Piece(piece) => std::slice::from_ref(piece),
                Segment::Conditional {
                    field,
                    then,
                    otherwise,
                } => {
                    if values.is_truthy(field) {
                        then.as_slice()
                    } else {
                        otherwise.as_slice()
                    }
                }
            };
            for piece in pieces {
                match piece {
                    Piece::Literal(text) => out.push_str(text),
                    Piece::Token(name) => match values.non_blank(name) {
                        Some(Value::Text(text)) => out.push_str(&escape_text(text)),
                        Some(Value::Markup(markup)) => out.push_str(&neutralize_braces(markup)),
                        None if ALLOWED_EMPTY.contains(&name.as_str()) => {}
                        None => {
                            missing.insert(name.clone());
                        }
                    },
                }
            }
        }

        if missing.is_empty() {
            Ok(out)
        } else {
            Err(RenderError::SubstitutionIncomplete {
                tokens: missing.into_iter().collect(),
            })
        }
    }
}

fn check_name(name: &str, tag: &str) -> Result<(), String> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(format!("invalid placeholder '{{{{{tag}}}}}'"))
    }
}
