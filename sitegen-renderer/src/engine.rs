//! Turning a [`Template`], content and profile into a finished page.

use rand::Rng;

use sitegen_core::{GeneratedContent, ProfessionCategory, ProfileInput};

use crate::compiled::{escape_text, Values};
use crate::error::RenderError;
use crate::scheme::PresentationScheme;
use crate::seo::{head_tags, insert_into_head, strip_title, SocialMeta};
use crate::template::Template;

/// A rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSite {
    /// Self-contained document with the stylesheet inlined.
    pub html: String,
    /// Override block followed by the template's base CSS.
    pub css: String,
    /// Color scheme actually applied after fallback.
    pub palette: String,
    pub scheme: &'static str,
}

/// Render with a presentation scheme drawn from `rng`.
pub fn render<R: Rng + ?Sized>(
    template: &Template,
    color_scheme_id: &str,
    content: &GeneratedContent,
    profile: &ProfileInput,
    rng: &mut R,
) -> Result<RenderedSite, RenderError> {
    let scheme = PresentationScheme::choose(rng);
    render_with_scheme(template, color_scheme_id, content, profile, scheme)
}

/// Render with an explicit presentation scheme. Deterministic.
pub fn render_with_scheme(
    template: &Template,
    color_scheme_id: &str,
    content: &GeneratedContent,
    profile: &ProfileInput,
    scheme: &'static PresentationScheme,
) -> Result<RenderedSite, RenderError> {
    let (palette_name, palette) = template.palette(color_scheme_id);
    let stock_image = ProfessionCategory::classify(&profile.profession).stock_image();

    let css = format!(
        "/* palette: {palette_name}, motion: {scheme} */\n:root {{\n{props}  --hero-image: url(\"{stock_image}\");\n}}\n\n{keyframes}\n{base}",
        scheme = scheme.name,
        props = palette.css_properties(),
        keyframes = scheme.css,
        base = template.css_base,
    );

    let values = bind_values(content, profile, scheme);
    let body = template.html_skeleton.render(&values)?;

    let photo = non_blank(profile.photo_url.as_deref());
    let head = format!(
        "{}\n  <style>\n{css}  </style>",
        head_tags(
            &content.seo,
            &SocialMeta {
                site_name: profile.name.trim(),
                image: Some(photo.unwrap_or(stock_image)),
            },
        )
    );
    let html = insert_into_head(&strip_title(&body), &head);

    tracing::debug!(
        template = %template.id,
        palette = %palette_name,
        scheme = scheme.name,
        bytes = html.len(),
        "page rendered"
    );

    Ok(RenderedSite {
        html,
        css,
        palette: palette_name.to_string(),
        scheme: scheme.name,
    })
}

/// Every placeholder value a built-in template can reference.
fn bind_values(
    content: &GeneratedContent,
    profile: &ProfileInput,
    scheme: &PresentationScheme,
) -> Values {
    let mut v = Values::new();

    v.text("name", profile.name.trim())
        .text("profession", profile.profession.trim())
        .text("initials", initials(&profile.name))
        .opt_text("bio", profile.bio.as_deref())
        .opt_text("location", profile.location.as_deref())
        .opt_text("phone", profile.phone.as_deref())
        .opt_text("email", profile.email.as_deref())
        .opt_text("logo_url", profile.logo_url.as_deref())
        .opt_text("photo_url", profile.photo_url.as_deref())
        .opt_text("contact", profile.contact());
    if let Some(href) = contact_href(profile) {
        v.text("contact_href", href);
    }

    let c = content;
    v.text("headline", &c.homepage.headline)
        .text("subheadline", &c.homepage.subheadline)
        .text("hero_text", &c.homepage.hero_text)
        .text("hero_cta", &c.homepage.cta_text)
        .text("about_title", &c.about.title)
        .markup("about_content", paragraphs(&c.about.content))
        .markup("about_highlights", list_items(&c.about.highlights))
        .text("services_title", &c.services.title)
        .text("services_intro", &c.services.intro)
        .markup("services", service_cards(c, scheme.card))
        .text("contact_title", &c.contact.title)
        .text("contact_content", &c.contact.content)
        .text("contact_cta", &c.contact.cta_text)
        .text("seo_title", &c.seo.title)
        .text("seo_description", &c.seo.description);

    for (token, class) in scheme.bindings() {
        v.text(token, class);
    }
    v
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn contact_href(profile: &ProfileInput) -> Option<String> {
    if let Some(email) = non_blank(profile.email.as_deref()) {
        return Some(format!("mailto:{email}"));
    }
    non_blank(profile.phone.as_deref()).map(|phone| {
        let dial: String = phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        format!("tel:{dial}")
    })
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Blank-line separated paragraphs as `<p>` elements.
fn paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", escape_text(p)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| format!("<li>{}</li>", escape_text(item)))
        .collect::<Vec<_>>()
        .join("")
}

fn service_cards(content: &GeneratedContent, card_class: &str) -> String {
    content
        .services
        .services
        .iter()
        .map(|service| {
            let benefits = list_items(&service.benefits);
            let benefits = if benefits.is_empty() {
                String::new()
            } else {
                format!("<ul>{benefits}</ul>")
            };
            format!(
                "<article class=\"service-card {card_class}\"><h3>{}</h3><p>{}</p>{benefits}</article>",
                escape_text(service.name.trim()),
                escape_text(service.description.trim()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_take_two_words() {
        assert_eq!(initials("ada lane"), "AL");
        assert_eq!(initials("Cher"), "C");
        assert_eq!(initials("Ana Maria Silva"), "AM");
    }

    #[test]
    fn phone_href_keeps_digits() {
        let profile = ProfileInput {
            phone: Some("+1 (555) 010-0200".into()),
            ..Default::default()
        };
        assert_eq!(contact_href(&profile).as_deref(), Some("tel:+15550100200"));
    }

    #[test]
    fn paragraphs_are_escaped() {
        assert_eq!(
            paragraphs("One <b>\n\n\nTwo"),
            "<p>One &lt;b&gt;</p>\n<p>Two</p>"
        );
    }
}
