use std::sync::LazyLock;

use regex::Regex;

use crate::record::UNKNOWN;

const PLACEHOLDER: &str = "为你推荐";

static PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[（(](.+?)[）)]").unwrap());
static BATCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\[|【)?(20\d\d|[23]\d)届(?:\]|】|校招|秋招)?").unwrap());

/// Candidates embedded in a title, e.g. `"Java开发（合肥）【26届】"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleCandidates {
    pub city: Option<String>,
    pub batch: Option<String>,
}

/// Clean a title and pull out its embedded city and graduating class.
///
/// Empty titles and "recommended for you" placeholders become [`UNKNOWN`].
pub fn normalize(raw: &str) -> (String, TitleCandidates) {
    if raw.contains(PLACEHOLDER) {
        return (UNKNOWN.to_string(), TitleCandidates::default());
    }
    let title = raw.trim();
    if title.is_empty() {
        return (UNKNOWN.to_string(), TitleCandidates::default());
    }

    let city = PAREN_RE
        .captures(title)
        .map(|caps| caps[1].to_string())
        .filter(|inner| {
            let len = inner.chars().count();
            (2..=5).contains(&len) && !inner.chars().any(|c| c.is_ascii_alphanumeric())
        });

    let batch = BATCH_RE.captures(title).map(|caps| {
        let year = &caps[1];
        if year.len() == 2 {
            format!("20{year}届")
        } else {
            format!("{year}届")
        }
    });

    (title.to_string(), TitleCandidates { city, batch })
}
