use thiserror::Error;

use crate::record::RawRecord;

const SITE_DOMAIN: &str = "nowcoder.com";

const PROMO_KEYWORDS: &[&str] = &[
    "发布职位", "邀约", "助力", "简历加分", "直达官网", "投后必反馈", "高薪榜", "必争榜",
];

const BARE_TOKENS: &[&str] = &[
    "北京", "上海", "广州", "深圳", "杭州", "南京", "成都", "武汉", "西安", "苏州", "天津", "重庆",
    "长沙", "郑州", "济南", "青岛", "大连", "厦门", "福州", "合肥", "昆明", "南昌", "太原", "石家庄",
    "本科", "硕士", "博士", "专科", "不限",
];

const SHORT_TITLES: &[&str] = &["UI", "UX", "AI", "IT"];

const SALARY_LIKE_COMPANIES: &[&str] = &["薪资面议", "200-300元/天", "120-400元/天"];

/// Why a card was not taken as a posting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("title missing or shorter than 3 characters")]
    TitleMissing,
    #[error("no detail link on nowcoder.com")]
    NoDetailLink,
    #[error("title is promotional chrome ({0})")]
    PromoTitle(&'static str),
    #[error("title is a bare city or degree ({0})")]
    BareToken(String),
    #[error("title {0:?} is too short")]
    TitleTooShort(String),
    #[error("company missing or shorter than 2 characters")]
    CompanyMissing,
    #[error("company {0:?} is a salary string")]
    CompanyIsSalary(String),
}

/// Accept or reject one extracted record. Rules run in order and the first
/// failing one is reported.
pub fn validate(record: &RawRecord) -> Result<(), Rejection> {
    let title = record.title.trim();
    let title_len = title.chars().count();
    if title_len < 3 {
        return Err(Rejection::TitleMissing);
    }
    if !record.detail_url.contains(SITE_DOMAIN) {
        return Err(Rejection::NoDetailLink);
    }
    if let Some(kw) = PROMO_KEYWORDS.iter().find(|kw| title.contains(**kw)) {
        return Err(Rejection::PromoTitle(kw));
    }
    if BARE_TOKENS.contains(&title) {
        return Err(Rejection::BareToken(title.to_string()));
    }
    if title_len < 4 && !SHORT_TITLES.contains(&title) {
        return Err(Rejection::TitleTooShort(title.to_string()));
    }

    let company = record.company.trim();
    if company.chars().count() < 2 {
        return Err(Rejection::CompanyMissing);
    }
    if SALARY_LIKE_COMPANIES.contains(&company) {
        return Err(Rejection::CompanyIsSalary(company.to_string()));
    }
    Ok(())
}
