use super::Extracted;
use crate::parser::lines::Lines;

const ROLE_KEYWORDS: &[&str] = &[
    "工程师", "开发", "算法", "产品", "运营", "设计", "经理", "专员", "助理", "分析师", "架构师", "测试",
    "运维", "前端", "后端", "全栈", "Java", "Python", "C++", "Go", "PHP", "实习",
];
const EXCLUDED: &[&str] = &["发布", "HR"];
const SCAN_DEPTH: usize = 10;
const MIN_CHARS: usize = 4;

/// First of the top lines that names a role; else the first line when it is
/// long enough.
pub fn extract(lines: &mut Lines) -> Extracted<String> {
    let hit = lines
        .unclaimed()
        .take_while(|(idx, _)| *idx < SCAN_DEPTH)
        .find(|(_, l)| is_title_like(l))
        .map(|(idx, l)| (idx, l.to_string()));

    let fallback = || {
        (!lines.is_claimed(0))
            .then(|| lines.get(0))
            .flatten()
            .filter(|l| l.chars().count() >= MIN_CHARS)
            .map(|l| (0, l.to_string()))
    };

    match hit.or_else(fallback) {
        Some((idx, title)) => {
            lines.claim(idx);
            Extracted::Found(title)
        }
        None => Extracted::NoMatch,
    }
}

fn is_title_like(line: &str) -> bool {
    ROLE_KEYWORDS.iter().any(|kw| line.contains(kw))
        && line.chars().count() >= MIN_CHARS
        && !EXCLUDED.iter().any(|kw| line.contains(kw))
}
