use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::rstest;
use sitegen_core::{
    AboutSection, ContactSection, GeneratedContent, HomepageSection, ProfileInput, SeoSection,
    ServiceItem, ServicesSection,
};
use sitegen_renderer::{
    render, render_with_scheme, DirTemplateStore, Palette, PresentationScheme, RenderError,
    Template, TemplateMeta, TemplateStore, SCHEMES,
};

fn ada() -> ProfileInput {
    ProfileInput {
        name: "Ada Lane".into(),
        profession: "Photographer".into(),
        bio: Some("Weddings and portraits.".into()),
        ..Default::default()
    }
}

fn content() -> GeneratedContent {
    GeneratedContent {
        homepage: HomepageSection {
            headline: "Moments, kept".into(),
            subheadline: "Wedding & portrait photography".into(),
            hero_text: "Ada photographs weddings and people.".into(),
            cta_text: "Book a shoot".into(),
        },
        about: AboutSection {
            title: "About Ada".into(),
            content: "Ten years behind the lens.\n\nBased wherever you are.".into(),
            highlights: vec!["Natural light".into(), "Small teams".into()],
        },
        services: ServicesSection {
            title: "Services".into(),
            intro: "What Ada does.".into(),
            services: vec![
                ServiceItem {
                    name: "Weddings".into(),
                    description: "Full-day coverage.".into(),
                    benefits: vec!["Calm direction".into()],
                },
                ServiceItem {
                    name: "Portraits".into(),
                    description: "Studio or outdoors.".into(),
                    benefits: vec![],
                },
            ],
        },
        contact: ContactSection {
            title: "Contact".into(),
            content: "Tell me about your day.".into(),
            cta_text: "Write to Ada".into(),
        },
        seo: SeoSection {
            title: "Ada Lane Photography".into(),
            description: "Wedding and portrait photographer.".into(),
            keywords: vec!["Photographer".into(), "weddings".into()],
        },
    }
}

fn load(id: &str) -> Template {
    DirTemplateStore::builtin_only().load(id).unwrap()
}

/// Remove everything a presentation scheme contributes.
fn without_motion(html: &str, scheme: &PresentationScheme) -> String {
    let style_start = html.find("<style>").unwrap();
    let style_end = html.find("</style>").unwrap() + "</style>".len();
    let mut out = format!("{}{}", &html[..style_start], &html[style_end..]);
    let mut classes: Vec<_> = scheme.bindings().iter().map(|(_, c)| *c).collect();
    classes.sort_by_key(|c| std::cmp::Reverse(c.len()));
    for class in classes {
        out = out.replace(class, "MOTION");
    }
    out
}

#[test]
fn ada_lane_renders_with_professional_default() {
    let site = render(
        &load("professional"),
        "default",
        &content(),
        &ada(),
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap();

    assert!(site.html.contains("Ada Lane"));
    assert!(!site.html.contains("{{name}}"));
    assert!(!site.html.contains("{{"));
    assert_eq!(site.palette, "default");
    assert!(site.html.contains("<title>Ada Lane Photography</title>"));
    assert_eq!(site.html.matches("<title>").count(), 1);
    assert!(site.html.contains("Wedding &amp; portrait photography"));
    assert!(site.html.contains(site.css.trim_end()));
}

#[rstest]
fn builtins_render_minimal_profiles_with_every_scheme(
    #[values("professional", "creative")] template_id: &str,
    #[values(0, 1, 2, 3)] scheme_index: usize,
) {
    let profile = ProfileInput {
        name: "Bo".into(),
        profession: "Baker".into(),
        ..Default::default()
    };
    let scheme = &SCHEMES[scheme_index];
    let site =
        render_with_scheme(&load(template_id), "default", &content(), &profile, scheme).unwrap();
    assert!(!site.html.contains("{{"), "{template_id}/{}", scheme.name);
    assert!(site.html.contains(scheme.hero));
    assert!(site.css.contains(scheme.css.trim()));
}

#[test]
fn schemes_change_only_motion() {
    let template = load("creative");
    let renders: Vec<_> = SCHEMES
        .iter()
        .map(|scheme| {
            let site =
                render_with_scheme(&template, "default", &content(), &ada(), scheme).unwrap();
            without_motion(&site.html, scheme)
        })
        .collect();
    for other in &renders[1..] {
        assert_eq!(&renders[0], other);
    }
}

#[test]
fn seeded_rng_reproduces_render() {
    let template = load("professional");
    let a = render(&template, "default", &content(), &ada(), &mut StdRng::seed_from_u64(42)).unwrap();
    let b = render(&template, "default", &content(), &ada(), &mut StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn new_color_scheme_replaces_palette_in_override_block() {
    let template = load("professional");
    let scheme = &SCHEMES[0];
    let default = render_with_scheme(&template, "default", &content(), &ada(), scheme).unwrap();
    let forest = render_with_scheme(&template, "forest", &content(), &ada(), scheme).unwrap();

    let old = &template.meta.color_schemes["default"];
    let new = &template.meta.color_schemes["forest"];
    assert!(default.css.contains(&old.primary));
    assert!(forest.css.contains(&new.primary));
    assert!(!forest.css.contains(&old.primary));
    assert_eq!(forest.palette, "forest");
}

#[test]
fn unknown_color_scheme_uses_default() {
    let site = render_with_scheme(
        &load("creative"),
        "chartreuse",
        &content(),
        &ada(),
        &SCHEMES[1],
    )
    .unwrap();
    assert_eq!(site.palette, "default");
}

#[test]
fn optional_profile_fields_appear_when_present() {
    let mut profile = ada();
    profile.email = Some("ada@example.com".into());
    profile.location = Some("Portland".into());
    profile.logo_url = Some("https://cdn.example/logo.png".into());
    let site = render_with_scheme(&load("professional"), "default", &content(), &profile, &SCHEMES[2])
        .unwrap();
    assert!(site.html.contains("ada@example.com"));
    assert!(site.html.contains("Portland"));
    assert!(site.html.contains("class=\"logo\""));
    assert!(!site.html.contains("class=\"wordmark\""));
}

#[test]
fn template_token_without_value_fails_render() {
    let template = Template::from_parts(
        "custom",
        "<html><head></head><body>{{name}} {{testimonial}} {{logo_url}}</body></html>",
        "",
        TemplateMeta {
            name: "Custom".into(),
            description: String::new(),
            color_schemes: BTreeMap::from([("default".to_string(), Palette::neutral())]),
        },
    )
    .unwrap();
    match render_with_scheme(&template, "default", &content(), &ada(), &SCHEMES[0]) {
        Err(RenderError::SubstitutionIncomplete { tokens }) => {
            assert_eq!(tokens, vec!["testimonial"])
        }
        other => panic!("expected SubstitutionIncomplete, got {other:?}"),
    }
}
