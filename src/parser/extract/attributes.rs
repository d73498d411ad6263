//! Single-valued card attributes. Each scan is top to bottom over unclaimed
//! lines and claims the line it reads from.

use std::sync::LazyLock;

use regex::Regex;

use super::Extracted;
use crate::parser::lines::Lines;

pub(crate) const SALARY_MARKERS: &[&str] = &["薪资", "元/天", "K", "k", "万", "面议"];

pub(crate) const CITIES: &[&str] = &[
    "北京", "上海", "广州", "深圳", "杭州", "南京", "成都", "武汉", "西安", "苏州", "天津", "重庆",
];

pub(crate) const DEGREES: &[&str] = &["本科", "硕士", "博士", "专科", "不限"];

const JOB_TYPES: &[&str] = &[
    "产品经理", "后端开发", "前端开发", "客户端开发", "算法工程师", "数据开发", "测试工程师",
    "运维工程师", "运营", "视觉设计", "交互设计", "UI设计", "机器学习工程师", "深度学习工程师",
    "NLP工程师", "大数据工程师",
];

pub(crate) const INDUSTRIES: &[&str] = &[
    "企业服务", "游戏", "硬件", "互联网", "电商", "教育", "金融", "芯片", "人工智能", "音乐", "高新技术",
];

const OWNERSHIP_TYPES: &[&str] = &[
    "国企", "央企", "私企", "民企", "外企", "合资", "上市公司", "国有企业", "事业单位", "政府机关",
    "创业公司", "独角兽",
];

pub(crate) const GRADUATION_KEYWORDS: &[&str] = &["毕业不限", "不限年份", "应届生", "往届生"];

const CONVERSION_YES: &[&str] = &["有转正", "可转正", "转正机会", "优秀转正"];
const CONVERSION_NO: &[&str] = &["无转正", "不转正"];

static GRADUATION_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"20\d{2}届").unwrap());
pub(crate) static WEEKLY_DAYS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*天\s*/\s*周").unwrap());
pub(crate) static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(最少|最短|至少)?(\d+)\s*个月(以上)?").unwrap());

pub fn is_salary_line(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    SALARY_MARKERS.iter().any(|m| compact.contains(m))
}

pub fn is_headcount_line(line: &str) -> bool {
    line.contains('人') && (line.contains('-') || line.contains("以上"))
}

pub fn salary(lines: &mut Lines) -> Extracted<String> {
    lines.take_first_matching(is_salary_line).into()
}

pub fn city(lines: &mut Lines) -> Extracted<String> {
    lines.take_first_map(|l| first_keyword(l, CITIES)).into()
}

/// The hint is the text of the card element the renderer tagged as the
/// education level; it is read without claiming any line.
pub fn degree(lines: &mut Lines, hint: Option<&str>) -> Extracted<String> {
    if let Some(found) = hint.and_then(|h| first_keyword(h, DEGREES)) {
        return Extracted::Found(found);
    }
    lines.take_first_map(|l| first_keyword(l, DEGREES)).into()
}

/// Prefer the role named in the title; only then look at the lines.
pub fn job_type(lines: &mut Lines, title: &str) -> Extracted<String> {
    if let Some(found) = first_keyword(title, JOB_TYPES) {
        return Extracted::Found(found);
    }
    lines.take_first_map(|l| first_keyword(l, JOB_TYPES)).into()
}

pub fn industry(lines: &mut Lines) -> Extracted<String> {
    lines.take_first_map(|l| first_keyword(l, INDUSTRIES)).into()
}

pub fn headcount(lines: &mut Lines) -> Extracted<String> {
    lines.take_first_matching(is_headcount_line).into()
}

/// Lines first, then the title ("国企-校招java开发").
pub fn ownership(lines: &mut Lines, title: &str) -> Extracted<String> {
    lines
        .take_first_map(|l| first_keyword(l, OWNERSHIP_TYPES))
        .or_else(|| first_keyword(title, OWNERSHIP_TYPES))
        .into()
}

pub fn graduation(lines: &mut Lines) -> Extracted<String> {
    lines
        .take_first_map(|l| {
            first_keyword(l, GRADUATION_KEYWORDS)
                .or_else(|| GRADUATION_YEAR_RE.find(l).map(|m| m.as_str().to_string()))
        })
        .into()
}

/// Just the number of days, e.g. `"4"` for `"4天/周"`.
pub fn weekly_days(lines: &mut Lines) -> Extracted<String> {
    lines
        .take_first_map(|l| WEEKLY_DAYS_RE.captures(l).map(|caps| caps[1].to_string()))
        .into()
}

/// `"≥3个月"` when the line says at least/or more, else `"3个月"`.
pub fn internship_duration(lines: &mut Lines) -> Extracted<String> {
    lines
        .take_first_map(|l| {
            let caps = DURATION_RE.captures(l)?;
            let months = &caps[2];
            if caps.get(1).is_some() || caps.get(3).is_some() {
                Some(format!("≥{months}个月"))
            } else {
                Some(format!("{months}个月"))
            }
        })
        .into()
}

/// `"是"` / `"否"`, from the first line that mentions either.
pub fn conversion(lines: &mut Lines) -> Extracted<String> {
    lines
        .take_first_map(|l| {
            if CONVERSION_YES.iter().any(|kw| l.contains(kw)) {
                Some("是".to_string())
            } else if CONVERSION_NO.iter().any(|kw| l.contains(kw)) {
                Some("否".to_string())
            } else {
                None
            }
        })
        .into()
}

fn first_keyword(line: &str, table: &[&str]) -> Option<String> {
    table.iter().find(|kw| line.contains(**kw)).map(|kw| kw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(e: Extracted<String>) -> Option<String> {
        e.found()
    }

    #[test]
    fn salary_markers() {
        let mut lines = Lines::new(["前端开发", "北京", "200-300 元/天", "15-20k"]);
        assert_eq!(found(salary(&mut lines)).as_deref(), Some("200-300 元/天"));
        assert_eq!(found(salary(&mut lines)).as_deref(), Some("15-20k"));
        assert_eq!(salary(&mut lines), Extracted::NoMatch);
    }

    #[test]
    fn city_value_is_the_city_not_the_line() {
        let mut lines = Lines::new(["本科", "北京·海淀区"]);
        assert_eq!(found(city(&mut lines)).as_deref(), Some("北京"));
        assert!(lines.is_claimed(1));
    }

    #[test]
    fn degree_hint_beats_lines() {
        let mut lines = Lines::new(["本科"]);
        assert_eq!(found(degree(&mut lines, Some("硕士及以上"))).as_deref(), Some("硕士"));
        assert!(!lines.is_claimed(0));
        assert_eq!(found(degree(&mut lines, Some("学历"))).as_deref(), Some("本科"));
        assert!(lines.is_claimed(0));
    }

    #[test]
    fn job_type_from_title_first() {
        let mut lines = Lines::new(["数据开发"]);
        assert_eq!(found(job_type(&mut lines, "资深后端开发")).as_deref(), Some("后端开发"));
        assert!(!lines.is_claimed(0));
        assert_eq!(found(job_type(&mut lines, "工程师")).as_deref(), Some("数据开发"));
    }

    #[test]
    fn headcount_and_industry() {
        let mut lines = Lines::new(["游戏", "1000-9999人", "10000人以上"]);
        assert_eq!(found(industry(&mut lines)).as_deref(), Some("游戏"));
        assert_eq!(found(headcount(&mut lines)).as_deref(), Some("1000-9999人"));
    }

    #[test]
    fn ownership_falls_back_to_title() {
        let mut lines = Lines::new(["北京"]);
        assert_eq!(found(ownership(&mut lines, "国企-校招java开发")).as_deref(), Some("国企"));
        let mut lines = Lines::new(["上市公司"]);
        assert_eq!(found(ownership(&mut lines, "国企-校招java开发")).as_deref(), Some("上市公司"));
    }

    #[test]
    fn graduation_keyword_or_year() {
        let mut lines = Lines::new(["2026届", "毕业不限"]);
        assert_eq!(found(graduation(&mut lines)).as_deref(), Some("2026届"));
        let mut lines = Lines::new(["应届生优先"]);
        assert_eq!(found(graduation(&mut lines)).as_deref(), Some("应届生"));
    }

    #[test]
    fn days_duration_conversion() {
        let mut lines = Lines::new(["4 天 / 周", "实习6个月", "最少3个月", "可转正"]);
        assert_eq!(found(weekly_days(&mut lines)).as_deref(), Some("4"));
        assert_eq!(found(internship_duration(&mut lines)).as_deref(), Some("6个月"));
        assert_eq!(found(internship_duration(&mut lines)).as_deref(), Some("≥3个月"));
        assert_eq!(found(conversion(&mut lines)).as_deref(), Some("是"));

        let mut lines = Lines::new(["3个月以上", "不转正"]);
        assert_eq!(found(internship_duration(&mut lines)).as_deref(), Some("≥3个月"));
        assert_eq!(found(conversion(&mut lines)).as_deref(), Some("否"));
    }
}
