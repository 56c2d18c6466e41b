//! Domain types for the generation pipeline.
//!
//! All types are serializable via serde + serde_yaml; records are stored one
//! per file by [`crate::file_store`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, IncompleteContent, ProfileError, TransitionError};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque, time-ordered identifier of a [`GenerationRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Identifier of the client who owns a site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for OwnerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A validated, lowercase DNS name.
///
/// Validation also guarantees the name is safe to use as a single path
/// component (no separators, no `..`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Domain(String);

impl Domain {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let domain = raw.trim().trim_end_matches('.').to_ascii_lowercase();
        if domain.is_empty() {
            return Err(DomainError::Empty);
        }
        if domain.len() > 253 {
            return Err(DomainError::TooLong(domain));
        }
        for label in domain.split('.') {
            let valid = !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
            if !valid {
                return Err(DomainError::InvalidLabel {
                    domain: domain.clone(),
                    label: label.to_string(),
                });
            }
        }
        Ok(Self(domain))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for Domain {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Domain::parse(&value)
    }
}

impl From<Domain> for String {
    fn from(d: Domain) -> Self {
        d.0
    }
}

// ---------------------------------------------------------------------------
// Status state machine
// ---------------------------------------------------------------------------

/// Lifecycle status of a generation record.
///
/// ```text
/// PENDING → GENERATING_CONTENT → RENDERING → DEPLOYING → LIVE
///     └──────────────┴────────────────┴──────────┴──→ ERROR
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationStatus {
    #[default]
    Pending,
    GeneratingContent,
    Rendering,
    Deploying,
    Live,
    Error,
}

impl GenerationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, GenerationStatus::Live | GenerationStatus::Error)
    }

    /// Whether the forward pipeline may move from `self` to `next`.
    pub fn can_advance_to(self, next: GenerationStatus) -> bool {
        use GenerationStatus::*;
        match (self, next) {
            (from, Error) => !from.is_terminal(),
            (Pending, GeneratingContent)
            | (GeneratingContent, Rendering)
            | (Rendering, Deploying)
            | (Deploying, Live) => true,
            _ => false,
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GenerationStatus::Pending => "PENDING",
            GenerationStatus::GeneratingContent => "GENERATING_CONTENT",
            GenerationStatus::Rendering => "RENDERING",
            GenerationStatus::Deploying => "DEPLOYING",
            GenerationStatus::Live => "LIVE",
            GenerationStatus::Error => "ERROR",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Profile input
// ---------------------------------------------------------------------------

/// Facts about the client, supplied by the caller for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProfileInput {
    pub name: String,
    pub profession: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl ProfileInput {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::BlankField("name"));
        }
        if self.profession.trim().is_empty() {
            return Err(ProfileError::BlankField("profession"));
        }
        Ok(())
    }

    /// Best contact handle for notifications: email, else phone.
    pub fn contact(&self) -> Option<&str> {
        fn non_blank(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|c| !c.trim().is_empty())
        }
        non_blank(&self.email).or_else(|| non_blank(&self.phone))
    }
}

// ---------------------------------------------------------------------------
// Generated content
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomepageSection {
    pub headline: String,
    pub subheadline: String,
    pub hero_text: String,
    pub cta_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutSection {
    pub title: String,
    pub content: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    pub name: String,
    pub description: String,
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesSection {
    pub title: String,
    pub intro: String,
    pub services: Vec<ServiceItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSection {
    pub title: String,
    pub content: String,
    pub cta_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoSection {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
}

/// Structured website copy. All five sections are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub homepage: HomepageSection,
    pub about: AboutSection,
    pub services: ServicesSection,
    pub contact: ContactSection,
    pub seo: SeoSection,
}

impl GeneratedContent {
    /// Check every required field is non-blank.
    ///
    /// Serde already rejects absent fields; this catches present-but-empty ones.
    pub fn validate(&self) -> Result<(), IncompleteContent> {
        let mut missing = Vec::new();
        let mut text = |field: &str, value: &str| {
            if value.trim().is_empty() {
                missing.push(field.to_string());
            }
        };

        text("homepage.headline", &self.homepage.headline);
        text("homepage.subheadline", &self.homepage.subheadline);
        text("homepage.heroText", &self.homepage.hero_text);
        text("homepage.ctaText", &self.homepage.cta_text);
        text("about.title", &self.about.title);
        text("about.content", &self.about.content);
        text("services.title", &self.services.title);
        text("services.intro", &self.services.intro);
        text("contact.title", &self.contact.title);
        text("contact.content", &self.contact.content);
        text("contact.ctaText", &self.contact.cta_text);
        text("seo.title", &self.seo.title);
        text("seo.description", &self.seo.description);
        for (i, item) in self.services.services.iter().enumerate() {
            text(&format!("services.services[{i}].name"), &item.name);
            text(&format!("services.services[{i}].description"), &item.description);
        }

        if self.about.highlights.iter().all(|h| h.trim().is_empty()) {
            missing.push("about.highlights".to_string());
        }
        if self.services.services.is_empty() {
            missing.push("services.services".to_string());
        }
        for (i, item) in self.services.services.iter().enumerate() {
            if item.benefits.iter().all(|b| b.trim().is_empty()) {
                missing.push(format!("services.services[{i}].benefits"));
            }
        }
        if self.seo.keywords.iter().all(|k| k.trim().is_empty()) {
            missing.push("seo.keywords".to_string());
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(IncompleteContent { missing })
        }
    }

    /// Append `keyword` to the SEO keywords unless already present (case-insensitive).
    pub fn ensure_keyword(&mut self, keyword: &str) {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return;
        }
        let present = self
            .seo
            .keywords
            .iter()
            .any(|k| k.trim().eq_ignore_ascii_case(keyword));
        if !present {
            self.seo.keywords.push(keyword.to_string());
        }
    }
}

/// Where a record's content came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "name")]
pub enum ContentSource {
    /// A language-model provider, by configured name.
    Provider(String),
    /// Deterministic copy synthesized from the profile.
    Fallback,
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::Provider(name) => write!(f, "provider:{name}"),
            ContentSource::Fallback => f.write_str("fallback"),
        }
    }
}

// ---------------------------------------------------------------------------
// Generation record
// ---------------------------------------------------------------------------

/// Caller-supplied inputs for a new generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub owner_id: OwnerId,
    pub domain: Domain,
    pub profile: ProfileInput,
    pub template_id: String,
    pub color_scheme_id: String,
}

/// The unit of work tracked through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub domain: Domain,
    pub template_id: String,
    pub color_scheme_id: String,
    pub status: GenerationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<GeneratedContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_source: Option<ContentSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub generation_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl GenerationRecord {
    /// A fresh `PENDING` record for `request`.
    pub fn new(request: &GenerationRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::new(),
            owner_id: request.owner_id.clone(),
            domain: request.domain.clone(),
            template_id: request.template_id.clone(),
            color_scheme_id: request.color_scheme_id.clone(),
            status: GenerationStatus::Pending,
            content: None,
            content_source: None,
            presentation_scheme: None,
            deployment_url: None,
            error_message: None,
            generation_count: 1,
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }

    /// Move forward one stage (or into `ERROR` via [`Self::fail`]).
    pub fn advance(
        &mut self,
        next: GenerationStatus,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if next == GenerationStatus::Live {
            return Err(TransitionError::LiveInvariant(
                "use mark_live to publish a deployment URL",
            ));
        }
        self.transition(next)?;
        self.updated_at = now;
        Ok(())
    }

    /// `DEPLOYING → LIVE`, recording the URL and publish time.
    pub fn mark_live(&mut self, url: String, now: DateTime<Utc>) -> Result<(), TransitionError> {
        if self.content.is_none() {
            return Err(TransitionError::LiveInvariant("content is missing"));
        }
        if url.trim().is_empty() {
            return Err(TransitionError::LiveInvariant("deployment URL is empty"));
        }
        self.transition(GenerationStatus::Live)?;
        self.deployment_url = Some(url);
        self.published_at = Some(now.max(self.created_at));
        self.updated_at = now;
        Ok(())
    }

    /// Any non-terminal state → `ERROR` with a non-empty message.
    pub fn fail(&mut self, message: &str, now: DateTime<Utc>) -> Result<(), TransitionError> {
        self.transition(GenerationStatus::Error)?;
        let message = message.trim();
        self.error_message = Some(if message.is_empty() {
            "generation failed without a message".to_string()
        } else {
            message.to_string()
        });
        self.updated_at = now;
        Ok(())
    }

    /// `LIVE`/`ERROR` → `GENERATING_CONTENT` for a regeneration run.
    ///
    /// The URL and publish time are cleared: they describe the run that is
    /// being replaced.
    pub fn restart(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        if !self.status.is_terminal() {
            return Err(TransitionError::Invalid {
                from: self.status,
                to: GenerationStatus::GeneratingContent,
            });
        }
        self.status = GenerationStatus::GeneratingContent;
        self.error_message = None;
        self.deployment_url = None;
        self.published_at = None;
        self.generation_count = self.generation_count.saturating_add(1);
        self.updated_at = now;
        Ok(())
    }

    /// `LIVE` → `RENDERING` after the serving location was torn down.
    pub fn revert_to_rendered(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        if self.status != GenerationStatus::Live {
            return Err(TransitionError::Invalid {
                from: self.status,
                to: GenerationStatus::Rendering,
            });
        }
        self.status = GenerationStatus::Rendering;
        self.deployment_url = None;
        self.published_at = None;
        self.updated_at = now;
        Ok(())
    }

    fn transition(&mut self, next: GenerationStatus) -> Result<(), TransitionError> {
        if !self.status.can_advance_to(next) {
            return Err(TransitionError::Invalid {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    fn request() -> GenerationRequest {
        GenerationRequest {
            owner_id: OwnerId::from("owner-1"),
            domain: Domain::parse("ada-lane.com").unwrap(),
            profile: ProfileInput {
                name: "Ada Lane".to_string(),
                profession: "Photographer".to_string(),
                ..Default::default()
            },
            template_id: "professional".to_string(),
            color_scheme_id: "default".to_string(),
        }
    }

    fn content() -> GeneratedContent {
        GeneratedContent {
            homepage: HomepageSection {
                headline: "h".into(),
                subheadline: "s".into(),
                hero_text: "t".into(),
                cta_text: "c".into(),
            },
            about: AboutSection {
                title: "About".into(),
                content: "text".into(),
                highlights: vec!["one".into()],
            },
            services: ServicesSection {
                title: "Services".into(),
                intro: "intro".into(),
                services: vec![ServiceItem {
                    name: "Portraits".into(),
                    description: "d".into(),
                    benefits: vec!["b".into()],
                }],
            },
            contact: ContactSection {
                title: "Contact".into(),
                content: "c".into(),
                cta_text: "Call".into(),
            },
            seo: SeoSection {
                title: "t".into(),
                description: "d".into(),
                keywords: vec!["photography".into()],
            },
        }
    }

    #[rstest]
    #[case("Example.COM", "example.com")]
    #[case("shop.example.com.", "shop.example.com")]
    #[case("a-b.io", "a-b.io")]
    fn domain_parse_normalizes(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Domain::parse(raw).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("../etc")]
    #[case("a/b.com")]
    #[case("-bad.com")]
    #[case("double..dot")]
    fn domain_parse_rejects(#[case] raw: &str) {
        assert!(Domain::parse(raw).is_err(), "{raw} should be rejected");
    }

    #[test]
    fn forward_transitions_only() {
        use GenerationStatus::*;
        assert!(Pending.can_advance_to(GeneratingContent));
        assert!(Deploying.can_advance_to(Live));
        assert!(!Pending.can_advance_to(Rendering));
        assert!(!Rendering.can_advance_to(GeneratingContent));
        assert!(Pending.can_advance_to(Error));
        assert!(Deploying.can_advance_to(Error));
        assert!(!Live.can_advance_to(Error));
        assert!(!Error.can_advance_to(Pending));
    }

    #[test]
    fn mark_live_requires_content_and_url() {
        let now = Utc::now();
        let mut record = GenerationRecord::new(&request(), now);
        record.advance(GenerationStatus::GeneratingContent, now).unwrap();
        record.advance(GenerationStatus::Rendering, now).unwrap();
        record.advance(GenerationStatus::Deploying, now).unwrap();
        assert!(matches!(
            record.mark_live("https://x".into(), now),
            Err(TransitionError::LiveInvariant(_))
        ));
        record.content = Some(content());
        assert!(record.mark_live(" ".into(), now).is_err());
        record
            .mark_live("https://ada-lane.com".into(), now + Duration::seconds(2))
            .unwrap();
        assert_eq!(record.status, GenerationStatus::Live);
        assert!(record.published_at.unwrap() >= record.created_at);
    }

    #[test]
    fn fail_always_records_a_message() {
        let now = Utc::now();
        let mut record = GenerationRecord::new(&request(), now);
        record.fail("   ", now).unwrap();
        assert_eq!(record.status, GenerationStatus::Error);
        assert!(!record.error_message.as_deref().unwrap().is_empty());
        assert!(record.fail("again", now).is_err(), "ERROR is terminal");
    }

    #[test]
    fn restart_only_from_terminal_states() {
        let now = Utc::now();
        let mut record = GenerationRecord::new(&request(), now);
        assert!(record.restart(now).is_err());
        record.fail("boom", now).unwrap();
        record.restart(now).unwrap();
        assert_eq!(record.status, GenerationStatus::GeneratingContent);
        assert!(record.error_message.is_none());
        assert_eq!(record.generation_count, 2);
    }

    #[test]
    fn content_validation_reports_blank_fields() {
        let mut c = content();
        assert!(c.validate().is_ok());
        c.homepage.headline = " ".into();
        c.services.services.clear();
        let err = c.validate().unwrap_err();
        assert!(err.missing.contains(&"homepage.headline".to_string()));
        assert!(err.missing.contains(&"services.services".to_string()));
    }

    #[test]
    fn ensure_keyword_is_case_insensitive() {
        let mut c = content();
        c.ensure_keyword("Photography");
        assert_eq!(c.seo.keywords.len(), 1);
        c.ensure_keyword("Photographer");
        assert_eq!(c.seo.keywords.last().unwrap(), "Photographer");
    }

    #[test]
    fn status_serializes_screaming_snake() {
        let yaml = serde_yaml::to_string(&GenerationStatus::GeneratingContent).unwrap();
        assert_eq!(yaml.trim(), "GENERATING_CONTENT");
        assert_eq!(GenerationStatus::Live.to_string(), "LIVE");
    }

    #[test]
    fn profile_contact_prefers_email() {
        let mut p = request().profile;
        assert!(p.contact().is_none());
        p.phone = Some("555".into());
        assert_eq!(p.contact(), Some("555"));
        p.email = Some("ada@example.com".into());
        assert_eq!(p.contact(), Some("ada@example.com"));
    }
}
