//! Deterministic copy synthesized from the profile alone.
//!
//! Used when every provider failed. The same profile always yields the same
//! content, and the result always passes [`GeneratedContent::validate`].

use sitegen_core::{
    AboutSection, ContactSection, GeneratedContent, HomepageSection, ProfileInput, SeoSection,
    ServiceItem, ServicesSection,
};

pub fn synthesize(profile: &ProfileInput) -> GeneratedContent {
    let name = profile.name.trim();
    let profession = profile.profession.trim();
    let location = non_blank(profile.location.as_deref());
    let bio = non_blank(profile.bio.as_deref());
    let where_clause = location
        .map(|l| format!(" in {l}"))
        .unwrap_or_default();

    let homepage = HomepageSection {
        headline: format!("{name} | {profession}{where_clause}"),
        subheadline: format!("Trusted {} services tailored to you.", profession.to_lowercase()),
        hero_text: bio.map(str::to_string).unwrap_or_else(|| {
            format!(
                "{name} is a dedicated {} helping clients{where_clause} with care, \
                 experience and attention to detail.",
                profession.to_lowercase()
            )
        }),
        cta_text: "Get in touch".to_string(),
    };

    let mut about_content = format!(
        "{name} is a {}{where_clause} committed to delivering outstanding results for every client.",
        profession.to_lowercase()
    );
    if let Some(bio) = bio {
        about_content.push_str("\n\n");
        about_content.push_str(bio);
    }
    let mut highlights = vec![
        format!("Experienced {}", profession.to_lowercase()),
        "Personal, one-on-one service".to_string(),
        "Clear communication from start to finish".to_string(),
    ];
    if let Some(location) = location {
        highlights.push(format!("Proudly serving {location}"));
    }

    let service_names: Vec<String> = if profile.services.iter().any(|s| !s.trim().is_empty()) {
        profile
            .services
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        vec![
            "Consultation".to_string(),
            format!("{profession} Services"),
            "Ongoing Support".to_string(),
        ]
    };
    let services = service_names
        .into_iter()
        .map(|service| ServiceItem {
            description: format!("Professional {} delivered by {name}.", service.to_lowercase()),
            benefits: vec![
                "Tailored to your needs".to_string(),
                "Reliable and on time".to_string(),
            ],
            name: service,
        })
        .collect();

    let reach = match (non_blank(profile.email.as_deref()), non_blank(profile.phone.as_deref())) {
        (Some(email), Some(phone)) => format!(" Email {email} or call {phone}."),
        (Some(email), None) => format!(" Email {email}."),
        (None, Some(phone)) => format!(" Call {phone}."),
        (None, None) => String::new(),
    };

    let mut keywords = vec![profession.to_string(), name.to_string()];
    if let Some(location) = location {
        keywords.push(format!("{profession} {location}"));
        keywords.push(location.to_string());
    }

    GeneratedContent {
        homepage,
        about: AboutSection {
            title: format!("About {name}"),
            content: about_content,
            highlights,
        },
        services: ServicesSection {
            title: "Services".to_string(),
            intro: format!("How {name} can help you."),
            services,
        },
        contact: ContactSection {
            title: "Contact".to_string(),
            content: format!("Ready to get started? Reach out to {name} today.{reach}"),
            cta_text: "Contact me".to_string(),
        },
        seo: SeoSection {
            title: format!("{name} - {profession}{where_clause}"),
            description: format!(
                "{name} is a professional {}{where_clause}. Get in touch to learn more.",
                profession.to_lowercase()
            ),
            keywords,
        },
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
