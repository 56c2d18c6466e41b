//! `<head>` rewriting: SEO and Open Graph tags plus the inlined stylesheet.

use sitegen_core::SeoSection;

use crate::compiled::escape_text;

/// Extra inputs for the Open Graph block.
#[derive(Debug, Clone, Default)]
pub struct SocialMeta<'a> {
    pub site_name: &'a str,
    pub image: Option<&'a str>,
}

/// Tags for `seo`, one per line, ready to sit inside `<head>`.
pub fn head_tags(seo: &SeoSection, social: &SocialMeta<'_>) -> String {
    let title = escape_text(seo.title.trim());
    let description = escape_text(seo.description.trim());
    let keywords = escape_text(&seo.keywords.join(", "));

    let mut tags = vec![
        format!("<title>{title}</title>"),
        format!(r#"<meta name="description" content="{description}">"#),
        format!(r#"<meta name="keywords" content="{keywords}">"#),
        r#"<meta property="og:type" content="website">"#.to_string(),
        format!(r#"<meta property="og:title" content="{title}">"#),
        format!(r#"<meta property="og:description" content="{description}">"#),
        format!(
            r#"<meta property="og:site_name" content="{}">"#,
            escape_text(social.site_name)
        ),
    ];
    if let Some(image) = social.image.filter(|i| !i.trim().is_empty()) {
        tags.push(format!(
            r#"<meta property="og:image" content="{}">"#,
            escape_text(image.trim())
        ));
        tags.push(r#"<meta name="twitter:card" content="summary_large_image">"#.to_string());
    } else {
        tags.push(r#"<meta name="twitter:card" content="summary">"#.to_string());
    }
    tags.join("\n  ")
}

/// Remove every `<title>…</title>` element (case-insensitive).
pub fn strip_title(html: &str) -> String {
    let mut out = html.to_string();
    loop {
        let lower = out.to_ascii_lowercase();
        let Some(start) = lower.find("<title") else {
            break;
        };
        let Some(close) = lower[start..].find("</title>") else {
            break;
        };
        let mut end = start + close + "</title>".len();
        // Swallow the newline and indentation the element sat on.
        while out[end..].starts_with([' ', '\t']) {
            end += 1;
        }
        if out[end..].starts_with('\n') {
            end += 1;
        }
        out.replace_range(start..end, "");
    }
    out
}

/// Insert `block` just before `</head>`, creating a head when the document
/// has none.
pub fn insert_into_head(html: &str, block: &str) -> String {
    let lower = html.to_ascii_lowercase();
    if let Some(pos) = lower.find("</head>") {
        return format!("{}  {block}\n{}", &html[..pos], &html[pos..]);
    }
    if let Some(open) = lower.find("<html") {
        if let Some(gt) = lower[open..].find('>') {
            let at = open + gt + 1;
            return format!("{}\n<head>\n  {block}\n</head>{}", &html[..at], &html[at..]);
        }
    }
    format!("<head>\n  {block}\n</head>\n{html}")
}
