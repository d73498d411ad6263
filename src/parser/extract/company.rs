use std::sync::LazyLock;

use regex::Regex;

use super::attributes::{
    is_headcount_line, CITIES, DEGREES, DURATION_RE, GRADUATION_KEYWORDS, INDUSTRIES, WEEKLY_DAYS_RE,
};
use super::Extracted;
use crate::parser::lines::Lines;

const SUFFIX_KEYWORDS: &[&str] = &["公司", "科技", "有限", "股份", "集团", "企业", "网络", "信息"];

const NOT_COMPANY: &[&str] = &[
    "助力简历加分", "校招高薪榜", "高校必争榜", "必争榜", "HR刚处理简历", "HR今日在线", "投后必反馈",
    "直达官网",
];

const NON_NAME_MARKERS: &[&str] = &[
    "薪资", "面议", "元/天", "天/周", "个月", "简历", "榜", "HR", "届", "转正",
];

/// A number followed by a pay unit; a bare "万" or "K" can be part of a name.
static PAY_AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d\s*[Kk万]").unwrap());

/// Company names sit near the bottom of a card, so the scan runs upwards.
///
/// A line carrying a company suffix ("科技", "集团", ...) wins at once, with
/// the literal "公司" removed. Otherwise the topmost plausible line is used.
pub fn extract(lines: &mut Lines, title: &str) -> Extracted<String> {
    let mut generic: Option<(usize, String)> = None;
    let mut chosen: Option<(usize, String)> = None;

    for (idx, line) in lines.unclaimed().rev() {
        if !is_candidate(line, title) {
            continue;
        }
        if SUFFIX_KEYWORDS.iter().any(|kw| line.contains(kw)) {
            chosen = Some((idx, line.replace("公司", "").trim().to_string()));
            break;
        }
        generic = Some((idx, line.to_string()));
    }

    match chosen.or(generic) {
        Some((idx, name)) if !name.is_empty() => {
            lines.claim(idx);
            Extracted::Found(name)
        }
        _ => Extracted::NoMatch,
    }
}

fn is_candidate(line: &str, title: &str) -> bool {
    let len = line.chars().count();
    if !(2..=40).contains(&len) || line == title {
        return false;
    }
    if NOT_COMPANY.contains(&line)
        || CITIES.contains(&line)
        || line == "广东"
        || INDUSTRIES.contains(&line)
        || DEGREES.contains(&line)
        || GRADUATION_KEYWORDS.contains(&line)
    {
        return false;
    }
    if NON_NAME_MARKERS.iter().any(|m| line.contains(m)) || is_headcount_line(line) {
        return false;
    }
    !PAY_AMOUNT_RE.is_match(line) && !WEEKLY_DAYS_RE.is_match(line) && !DURATION_RE.is_match(line)
}
