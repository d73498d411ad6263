use std::collections::BTreeSet;

use crate::clean::report::Event;
use crate::clean::{description, salary, title};
use crate::record::{RawRecord, ResolvedRecord, ValueTag, UNKNOWN};

/// Collection count at which a posting is tagged high-collection.
pub const HIGH_COLLECTION_THRESHOLD: u32 = 10;

/// Values the crawler sometimes captures in the company slot that are
/// industry, funding, size, or perk labels rather than a name.
const COMPANY_TAGS: &[&str] = &[
    "体验很好", "独角兽企业", "股权激励", "待遇好", "工资高", "互联网综合", "通信电子", "信息安全",
    "平台大", "数据服务", "计算机软件", "游戏", "文娱内容", "硬件", "企业服务", "移动互联网", "电商",
    "教育", "金融", "医疗健康", "生活服务", "房产家居", "旅游", "社交网络", "分类信息", "物流运输",
    "其它", "高新技术", "上市公司", "外企", "国企", "事业单位", "创业公司", "融资", "天使轮", "A轮",
    "B轮", "C轮", "D轮及以上", "不需要融资", "少于15人", "15-50人", "50-150人", "150-500人",
    "500-2000人", "2000人以上", "交通便利", "同事nice", "年底双薪", "股票期权", "带薪年假", "绩效奖金",
    "定期体检",
];

const DEGREE_UNRESTRICTED: &str = "不限";

/// Result of reconciling one record: the resolved posting and every
/// overwrite that produced it.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub record: ResolvedRecord,
    pub events: Vec<Event>,
}

/// Pick the final value of each field from the raw record and the candidates
/// found in its title and description. Priorities are fixed.
pub fn reconcile(raw: &RawRecord) -> Resolution {
    let mut events = Vec::new();

    let raw_company = raw.company.trim();
    let raw_city = raw.city.trim();
    let raw_degree = raw.degree.trim();
    let raw_type = raw.job_type.trim();

    let (clean_title, from_title) = title::normalize(&raw.title);
    let from_desc = description::extract(raw.description.trim());

    let company = if COMPANY_TAGS.contains(&raw_company) || raw_company.chars().count() < 2 {
        match &from_desc.company {
            Some(candidate) => {
                events.push(Event::CompanyRestoredFromDesc);
                candidate.clone()
            }
            None => {
                events.push(Event::CompanyUnknown);
                UNKNOWN.to_string()
            }
        }
    } else {
        raw_company.to_string()
    };

    let city = if !raw_city.is_empty() {
        raw_city.to_string()
    } else if let Some(candidate) = &from_title.city {
        events.push(Event::CityRestoredFromTitle);
        candidate.clone()
    } else if let Some(candidate) = &from_desc.city {
        events.push(Event::CityRestoredFromDesc);
        candidate.clone()
    } else {
        String::new()
    };

    let degree = match &from_desc.degree {
        Some(candidate) if raw_degree.is_empty() || raw_degree == DEGREE_UNRESTRICTED => {
            events.push(Event::DegreeRestoredFromDesc);
            candidate.clone()
        }
        _ => raw_degree.to_string(),
    };

    let job_type = match &from_desc.job_type {
        Some(candidate) if raw_type.is_empty() => {
            events.push(Event::TypeRestoredFromDesc);
            candidate.clone()
        }
        _ => raw_type.to_string(),
    };

    let batch = from_title
        .batch
        .clone()
        .unwrap_or_else(|| raw.graduation_batch.trim().to_string());

    let mut value_tags = BTreeSet::new();
    if from_desc.collection_count >= HIGH_COLLECTION_THRESHOLD {
        value_tags.insert(ValueTag::HighCollection);
    }
    if !from_desc.activity_tags.is_empty() {
        value_tags.insert(ValueTag::Active);
    }

    let record = RawRecord {
        title: clean_title.clone(),
        company,
        city,
        degree,
        job_type,
        ..raw.clone()
    };

    Resolution {
        record: ResolvedRecord {
            is_valid: clean_title != UNKNOWN,
            parsed_salary: salary::parse(raw.salary.trim()),
            collection_count: from_desc.collection_count,
            activity_tags: from_desc.activity_tags,
            batch,
            value_tags,
            record,
        },
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str, company: &str, desc: &str) -> RawRecord {
        RawRecord {
            title: title.into(),
            company: company.into(),
            description: desc.into(),
            ..Default::default()
        }
    }

    #[test]
    fn tag_company_restored_from_description() {
        let mut input = raw("后端开发工程师", "硬件", "欢迎加入字节跳动\n5位牛友收藏");
        input.salary = "15-25K·14薪".into();
        let res = reconcile(&input);
        let r = &res.record;
        assert_eq!(r.record.company, "字节跳动");
        assert_eq!(r.collection_count, 5);
        assert_eq!(
            (r.parsed_salary.min, r.parsed_salary.max, r.parsed_salary.months, r.parsed_salary.negotiable),
            (Some(15), Some(25), Some(14), false)
        );
        assert!(res.events.contains(&Event::CompanyRestoredFromDesc));
        assert!(r.value_tags.is_empty());
    }

    #[test]
    fn short_company_without_candidate_is_unknown() {
        let res = reconcile(&raw("测试工程师", "A", "无"));
        assert_eq!(res.record.record.company, UNKNOWN);
        assert_eq!(res.events, vec![Event::CompanyUnknown]);
    }

    #[test]
    fn real_company_is_kept() {
        let res = reconcile(&raw("测试工程师", " 韶音科技 ", "腾讯"));
        assert_eq!(res.record.record.company, "韶音科技");
        assert!(res.events.is_empty());
    }

    #[test]
    fn city_prefers_title_over_description() {
        let res = reconcile(&raw("Java开发（合肥）", "某某科技", "北京总部"));
        assert_eq!(res.record.record.city, "合肥");
        assert!(res.events.contains(&Event::CityRestoredFromTitle));

        let res = reconcile(&raw("Java开发", "某某科技", "北京总部"));
        assert_eq!(res.record.record.city, "北京");
        assert!(res.events.contains(&Event::CityRestoredFromDesc));

        let mut kept = raw("Java开发（合肥）", "某某科技", "北京总部");
        kept.city = "上海".into();
        assert_eq!(reconcile(&kept).record.record.city, "上海");
    }

    #[test]
    fn unrestricted_degree_is_upgraded() {
        let mut input = raw("算法工程师", "某某科技", "硕士及以上学历");
        input.degree = "不限".into();
        let res = reconcile(&input);
        assert_eq!(res.record.record.degree, "硕士");
        assert!(res.events.contains(&Event::DegreeRestoredFromDesc));

        input.degree = "本科".into();
        assert_eq!(reconcile(&input).record.record.degree, "本科");

        input.degree = "不限".into();
        input.description = "无要求".into();
        assert_eq!(reconcile(&input).record.record.degree, "不限");
    }

    #[test]
    fn job_type_only_fills_blank() {
        let mut input = raw("工程师", "某某科技", "负责嵌入式软件");
        assert_eq!(reconcile(&input).record.record.job_type, "硬件");
        input.job_type = "测试工程师".into();
        assert_eq!(reconcile(&input).record.record.job_type, "测试工程师");
    }

    #[test]
    fn batch_from_title_then_raw() {
        let mut input = raw("【2026届】后端开发", "某某科技", "");
        input.graduation_batch = "毕业不限".into();
        assert_eq!(reconcile(&input).record.batch, "2026届");
        input.title = "后端开发".into();
        assert_eq!(reconcile(&input).record.batch, "毕业不限");
    }

    #[test]
    fn validity_tracks_title() {
        assert!(!reconcile(&raw("为你推荐", "某某科技", "")).record.is_valid);
        assert!(!reconcile(&raw("", "某某科技", "")).record.is_valid);
        assert!(reconcile(&raw("运维工程师", "某某科技", "")).record.is_valid);
    }

    #[test]
    fn value_tag_boundary() {
        let ten = reconcile(&raw("运维", "某某科技", "10位牛友收藏"));
        assert!(ten.record.value_tags.contains(&ValueTag::HighCollection));
        let nine = reconcile(&raw("运维", "某某科技", "9位牛友收藏"));
        assert!(nine.record.value_tags.is_empty());
        let active = reconcile(&raw("运维", "某某科技", "HR刚刚处理简历"));
        assert_eq!(
            active.record.value_tags.iter().copied().collect::<Vec<_>>(),
            vec![ValueTag::Active]
        );
        assert_eq!(active.record.activity_display(), "HR刚刚处理简历");
    }

    #[test]
    fn reconciling_resolved_output_changes_nothing() {
        let inputs = [
            raw("后端开发工程师", "硬件", "字节跳动 北京 硕士 Java 5位牛友收藏"),
            raw("Java开发（合肥）", "", ""),
            raw("为你推荐", "X", "不限"),
            raw("数据分析", "某某科技", "大数据 本科"),
        ];
        for input in inputs {
            let first = reconcile(&input).record;
            let second = reconcile(&first.record);
            assert!(second.events.is_empty(), "{:?}", second.events);
            assert_eq!(second.record.record, first.record);
        }
    }
}
