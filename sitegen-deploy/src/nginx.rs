//! Reverse-proxy config for a serving location, rendered from an embedded
//! tera template.

use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};

use sitegen_core::{Domain, RecordId};

use crate::error::DeployError;

pub const NGINX_FILE: &str = "nginx.conf";

const TEMPLATE_NAME: &str = "nginx.conf";
const TEMPLATE: &str = include_str!("templates/nginx.conf.tera");

/// Static assets are cached for this many days.
const ASSET_CACHE_DAYS: u64 = 30;

/// Pages pull fonts and stock imagery from HTTPS origins and use inline styles.
const CSP: &str = "default-src 'self'; img-src 'self' https: data:; \
style-src 'self' 'unsafe-inline' https:; font-src 'self' https: data:; \
script-src 'self'; frame-ancestors 'self'";

#[derive(Debug, Serialize)]
struct NginxContext<'a> {
    domain: &'a str,
    record_id: String,
    root: String,
    csp: &'static str,
    asset_cache_days: u64,
    asset_cache_seconds: u64,
}

/// Render the server block serving `site_root` for `domain`.
pub fn render_config(
    domain: &Domain,
    record_id: &RecordId,
    site_root: &Path,
) -> Result<String, DeployError> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
    let ctx = Context::from_serialize(NginxContext {
        domain: domain.as_str(),
        record_id: record_id.to_string(),
        root: site_root.display().to_string(),
        csp: CSP,
        asset_cache_days: ASSET_CACHE_DAYS,
        asset_cache_seconds: ASSET_CACHE_DAYS * 24 * 60 * 60,
    })?;
    Ok(tera.render(TEMPLATE_NAME, &ctx)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn render() -> String {
        render_config(
            &Domain::parse("ada.example").unwrap(),
            &RecordId::new(),
            &PathBuf::from("/srv/sites/ada.example"),
        )
        .unwrap()
    }

    #[test]
    fn server_block_names_domain_and_root() {
        let conf = render();
        assert!(conf.contains("server_name ada.example;"));
        assert!(conf.contains("root /srv/sites/ada.example;"));
    }

    #[test]
    fn spa_fallback_and_caching_present() {
        let conf = render();
        assert!(conf.contains("try_files $uri $uri/ /index.html;"));
        assert!(conf.contains("max-age=2592000"));
        assert!(conf.contains("expires 30d;"));
    }

    #[test]
    fn security_headers_present() {
        let conf = render();
        for header in ["X-Frame-Options", "X-Content-Type-Options", "Content-Security-Policy"] {
            assert!(conf.contains(header), "{header} missing");
        }
        assert!(conf.contains("frame-ancestors 'self'"), "csp is not html-escaped");
    }
}
