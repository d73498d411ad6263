use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::{Extracted, FaultKind, FieldFault};

pub const SITE_ORIGIN: &str = "https://www.nowcoder.com";

static TRAILING_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/(\d+)/?$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLink {
    pub url: String,
    /// Trailing numeric path segment, empty when the path has none.
    pub external_id: String,
}

/// First non-empty hyperlink of the card, made absolute against the site.
pub fn extract(links: &[String]) -> Extracted<DetailLink> {
    let Some(href) = links.iter().map(|l| l.trim()).find(|l| !l.is_empty()) else {
        return Extracted::NoMatch;
    };
    match resolve(href) {
        Ok(url) => {
            let external_id = TRAILING_ID_RE
                .captures(url.path())
                .map(|caps| caps[1].to_string())
                .unwrap_or_default();
            Extracted::Found(DetailLink {
                url: url.to_string(),
                external_id,
            })
        }
        Err(err) => Extracted::Fault(FieldFault::new(
            "detail_url",
            FaultKind::Link {
                href: href.to_string(),
                reason: err.to_string(),
            },
        )),
    }
}

fn resolve(href: &str) -> Result<Url, url::ParseError> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Url::parse(href);
    }
    let base = Url::parse(SITE_ORIGIN)?;
    if href.starts_with('/') {
        base.join(href)
    } else {
        base.join(&format!("/{href}"))
    }
}
