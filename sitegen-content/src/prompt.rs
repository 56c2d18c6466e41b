//! Prompt construction.
//!
//! One request covers every section of the site, so a successful provider
//! call is always a single round trip.

use sitegen_core::{ProfessionCategory, ProfileInput};

/// System + user message pair sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const SYSTEM: &str = "You are an expert website copywriter for small businesses and \
independent professionals. You reply with a single JSON object and nothing else: no \
markdown, no commentary.";

const SHAPE: &str = r#"{
  "homepage": {
    "headline": "short, benefit-driven headline (max 10 words)",
    "subheadline": "one supporting sentence",
    "heroText": "2-3 sentences introducing the business",
    "ctaText": "call-to-action button label (2-4 words)"
  },
  "about": {
    "title": "section title",
    "content": "2 short paragraphs about the professional",
    "highlights": ["3-4 short credibility highlights"]
  },
  "services": {
    "title": "section title",
    "intro": "one sentence introducing the services",
    "services": [
      {
        "name": "service name",
        "description": "1-2 sentences",
        "benefits": ["2-3 concrete client benefits"]
      }
    ]
  },
  "contact": {
    "title": "section title",
    "content": "1-2 inviting sentences",
    "ctaText": "contact button label"
  },
  "seo": {
    "title": "page title under 60 characters",
    "description": "meta description under 160 characters",
    "keywords": ["6-10 search keywords"]
  }
}"#;

/// Build the generation prompt for `profile`.
pub fn build_prompt(profile: &ProfileInput) -> Prompt {
    let category = ProfessionCategory::classify(&profile.profession);
    let mut facts = vec![
        format!("Name: {}", profile.name.trim()),
        format!("Profession: {}", profile.profession.trim()),
    ];
    push_fact(&mut facts, "Bio", profile.bio.as_deref());
    push_fact(&mut facts, "Location", profile.location.as_deref());
    push_fact(&mut facts, "Phone", profile.phone.as_deref());
    push_fact(&mut facts, "Email", profile.email.as_deref());
    if !profile.services.is_empty() {
        facts.push(format!("Services offered: {}", profile.services.join(", ")));
    }

    let services_rule = if profile.services.is_empty() {
        "Propose 3 services typical for this profession.".to_string()
    } else {
        format!(
            "Describe exactly these services, in this order: {}.",
            profile.services.join(", ")
        )
    };

    let user = format!(
        "Write the copy for a one-page website.\n\n\
         CLIENT\n{facts}\n\n\
         TONE\n{tone}\n\n\
         REQUIREMENTS\n\
         - {services_rule}\n\
         - The SEO keywords must include \"{profession}\"{location_rule}.\n\
         - Never invent credentials, prices, awards or testimonials.\n\
         - Every field is required and must be non-empty.\n\n\
         Reply with JSON in exactly this shape:\n{SHAPE}",
        facts = facts.join("\n"),
        tone = category.tone(),
        profession = profile.profession.trim(),
        location_rule = profile
            .location
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .map(|l| format!(" and \"{}\"", l.trim()))
            .unwrap_or_default(),
    );

    Prompt {
        system: SYSTEM.to_string(),
        user,
    }
}

fn push_fact(facts: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        facts.push(format!("{label}: {value}"));
    }
}
