//! Multi-valued tags: every distinct hit across the card, comma-joined in
//! first-seen order.

use super::Extracted;
use crate::parser::lines::Lines;

const BENEFITS: &[&str] = &[
    "五险一金", "六险一金", "带薪年假", "年终奖", "餐补", "餐饮补贴", "交通补贴", "住房补贴", "加班补贴",
    "节日福利", "定期体检", "弹性工作", "免费班车", "股票期权", "员工旅游", "培训机会", "补充医疗",
    "商业保险", "零食下午茶", "健身房", "团建活动",
];

const SKILLS: &[&str] = &[
    "Java", "Python", "C++", "C#", "Go", "Golang", "PHP", "JavaScript", "TypeScript", "React", "Vue",
    "Angular", "Node.js", "Spring", "SpringBoot", "Django", "Flask", "MySQL", "PostgreSQL", "MongoDB",
    "Redis", "Kafka", "RabbitMQ", "Docker", "Kubernetes", "K8s", "Linux", "Git", "AWS", "Azure",
    "TensorFlow", "PyTorch", "机器学习", "深度学习", "NLP", "CV", "HTML", "CSS", "SQL", "Spark", "Hadoop",
    "Flink", "Elasticsearch",
];

pub fn benefits(lines: &mut Lines) -> Extracted<String> {
    collect(lines, "", BENEFITS, |line, kw| line.contains(kw))
}

/// Skill names match case-insensitively. Skills named in the title come
/// first; the title line itself is never claimed here.
pub fn skills(lines: &mut Lines, title: &str) -> Extracted<String> {
    collect(lines, title, SKILLS, |line, kw| {
        line.to_lowercase().contains(&kw.to_lowercase())
    })
}

/// A line is claimed only when it adds a tag not seen before.
fn collect<F>(lines: &mut Lines, seed: &str, table: &[&'static str], matches: F) -> Extracted<String>
where
    F: Fn(&str, &str) -> bool,
{
    let mut hits: Vec<&'static str> = table.iter().copied().filter(|kw| matches(seed, kw)).collect();
    let mut used = Vec::new();
    for (idx, line) in lines.unclaimed() {
        let mut added = false;
        for kw in table.iter().copied().filter(|kw| matches(line, kw)) {
            if !hits.contains(&kw) {
                hits.push(kw);
                added = true;
            }
        }
        if added {
            used.push(idx);
        }
    }
    for idx in used {
        lines.claim(idx);
    }
    let joined = hits.join(",");
    if joined.is_empty() {
        Extracted::NoMatch
    } else {
        Extracted::Found(joined)
    }
}
