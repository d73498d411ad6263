use super::Extracted;
use crate::parser::lines::Lines;

/// Card chrome that never belongs to a posting's text.
const BOILERPLATE: &[&str] = &[
    "HR刚处理简历", "HR今日在线", "直达官网", "投后必反馈", "校招高薪榜", "高校必争榜",
];

/// Everything no other field claimed, newline-joined and untruncated.
pub fn extract(lines: &Lines) -> Extracted<String> {
    let text = lines
        .residual()
        .into_iter()
        .filter(|l| !BOILERPLATE.iter().any(|b| l.contains(b)))
        .collect::<Vec<_>>()
        .join("\n");
    if text.is_empty() {
        Extracted::NoMatch
    } else {
        Extracted::Found(text)
    }
}
