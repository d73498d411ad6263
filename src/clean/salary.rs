use std::sync::LazyLock;

use regex::Regex;

use crate::record::ParsedSalary;

const NEGOTIABLE: &str = "面议";

static RANGE_WITH_MONTHS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)-(\d+)K[·.](?:(\d+)薪)?").unwrap());
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)-(\d+)K").unwrap());

/// Parse `"15-25K·14薪"`, `"20-30k"`, `"面议"` and friends.
///
/// Never fails: anything unrecognised comes back with every number `None`.
/// `raw` always holds the input verbatim.
pub fn parse(raw: &str) -> ParsedSalary {
    let normalized = raw.replace('k', "K").replace(char::is_whitespace, "");
    let mut parsed = ParsedSalary {
        raw: raw.to_string(),
        ..Default::default()
    };

    if normalized.contains(NEGOTIABLE) {
        parsed.negotiable = true;
        return parsed;
    }

    let range = RANGE_WITH_MONTHS_RE
        .captures(&normalized)
        .and_then(|caps| {
            let months = match caps.get(3) {
                Some(m) => m.as_str().parse::<u32>().ok()?,
                None => 12,
            };
            Some((caps[1].parse::<u32>().ok()?, caps[2].parse::<u32>().ok()?, months))
        })
        .or_else(|| {
            let caps = RANGE_RE.captures(&normalized)?;
            Some((caps[1].parse::<u32>().ok()?, caps[2].parse::<u32>().ok()?, 12))
        });

    if let Some((a, b, months)) = range {
        let (lo, hi): (u32, u32) = if a <= b { (a, b) } else { (b, a) };
        parsed.min = Some(lo);
        parsed.max = Some(hi);
        parsed.months = Some(months);
    }
    parsed
}
