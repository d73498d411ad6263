use std::sync::LazyLock;

use regex::Regex;

static COLLECTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)位牛友收藏").unwrap());

const ACTIVITY_PHRASES: &[&str] = &["刚刚有人投递过", "HR近期来过", "HR刚刚处理简历"];

/// Scan order is match priority when several cities are mentioned.
const CITIES: &[&str] = &[
    "北京", "上海", "广州", "深圳", "杭州", "成都", "武汉", "南京", "西安", "郑州", "长沙", "苏州",
    "天津", "重庆", "合肥", "厦门", "珠海", "大连", "青岛", "石家庄", "宁波", "无锡", "福州", "济南",
    "沈阳", "哈尔滨", "长春", "昆明", "南宁", "贵阳", "南昌", "扬州", "东莞", "佛山",
];

/// Highest credential first.
const DEGREES: &[&str] = &["博士", "硕士", "本科", "专科"];

/// Row order decides the category; keyword order inside a row does not.
const JOB_TYPES: &[(&str, &[&str])] = &[
    (
        "AI",
        &["AI", "人工智能", "算法", "深度学习", "机器学习", "NLP", "CV", "机器视觉", "大模型", "SLAM", "机载"],
    ),
    (
        "后端开发",
        &["Java", "C++", "Python", "Go", "Golang", "PHP", "Node", "后端", "服务器", "高性能计算"],
    ),
    ("前端开发", &["前端", "JavaScript", "TypeScript", "Vue", "React", "Web"]),
    ("测试", &["测试", "QA"]),
    ("运维", &["运维", "SRE", "DevOps"]),
    ("数据", &["数据分析", "数据挖掘", "数据开发", "大数据", "ETL"]),
    ("硬件", &["硬件", "嵌入式", "芯片", "集成电路", "FPGA"]),
];

/// Known employers, first literal hit wins. Specific names sit ahead of the
/// generic fragments they contain ("招商" before "银行", "中科院" before
/// "研究所") so a bank or institute mention yields the employer.
const KNOWN_COMPANIES: &[&str] = &[
    "字节跳动", "腾讯", "阿里", "百度", "美团", "京东", "快手", "网易", "华为", "小米", "滴滴",
    "拼多多", "携程", "小红书", "bilibili", "哔哩哔哩", "得物", "去哪儿", "搜狐", "新浪", "360",
    "金山", "联想", "vivo", "oppo", "荣耀", "大疆", "海康威视", "科大讯飞", "商汤", "旷视", "蔚来",
    "理想", "小鹏", "特斯拉", "宁德时代", "比亚迪", "顺丰", "中国移动", "中国联通", "中国电信",
    "招商", "平安", "微众", "蚂蚁", "米哈游", "莉莉丝", "叠纸", "鹰角", "完美世界", "巨人网络",
    "吉比特", "游族", "数字马力", "神州泰岳", "海能达", "精智达", "群核科技", "同花顺", "深信服",
    "用友", "金蝶", "亚信", "中兴", "中科院", "银行", "研究所",
];

/// Candidate values pulled out of a free-text description.
///
/// `None`/empty means "no candidate", never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionCandidates {
    pub collection_count: u32,
    pub activity_tags: Vec<String>,
    pub city: Option<String>,
    pub degree: Option<String>,
    pub job_type: Option<String>,
    pub company: Option<String>,
}

pub fn extract(desc: &str) -> DescriptionCandidates {
    if desc.is_empty() {
        return DescriptionCandidates::default();
    }
    DescriptionCandidates {
        collection_count: collection_count(desc),
        activity_tags: activity_tags(desc),
        city: first_literal(desc, CITIES),
        degree: first_literal(desc, DEGREES),
        job_type: job_type(desc),
        company: first_literal(desc, KNOWN_COMPANIES),
    }
}

fn collection_count(desc: &str) -> u32 {
    COLLECTION_RE
        .captures(desc)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

fn activity_tags(desc: &str) -> Vec<String> {
    ACTIVITY_PHRASES
        .iter()
        .filter(|p| desc.contains(**p))
        .map(|p| p.to_string())
        .collect()
}

fn first_literal(desc: &str, table: &[&str]) -> Option<String> {
    table.iter().find(|t| desc.contains(**t)).map(|t| t.to_string())
}

fn job_type(desc: &str) -> Option<String> {
    let upper = desc.to_uppercase();
    JOB_TYPES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| upper.contains(&kw.to_uppercase())))
        .map(|(label, _)| label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_description_has_no_candidates() {
        assert_eq!(extract(""), DescriptionCandidates::default());
    }

    #[test]
    fn collection_count_and_activity() {
        let c = extract("HR近期来过\n12位牛友收藏\n刚刚有人投递过");
        assert_eq!(c.collection_count, 12);
        assert_eq!(c.activity_tags, vec!["刚刚有人投递过", "HR近期来过"]);
    }

    #[test]
    fn no_collection_phrase_is_zero() {
        assert_eq!(extract("五险一金").collection_count, 0);
    }

    #[test]
    fn city_follows_table_order() {
        // 深圳 appears first in the text but 上海 ranks higher in the table.
        assert_eq!(extract("深圳或上海办公").city.as_deref(), Some("上海"));
    }

    #[test]
    fn highest_degree_wins() {
        assert_eq!(extract("本科及以上，硕士优先").degree.as_deref(), Some("硕士"));
    }

    #[test]
    fn job_type_is_case_insensitive_and_row_ordered() {
        assert_eq!(extract("熟悉 golang 与 react").job_type.as_deref(), Some("后端开发"));
        assert_eq!(extract("负责前端与大数据平台").job_type.as_deref(), Some("前端开发"));
        assert_eq!(extract("负责nlp方向研发, 熟悉java").job_type.as_deref(), Some("AI"));
        assert_eq!(extract("吃饭睡觉").job_type, None);
    }

    #[test]
    fn specific_company_beats_generic_fragment() {
        assert_eq!(extract("招商银行信用卡中心").company.as_deref(), Some("招商"));
        assert_eq!(extract("中科院计算研究所").company.as_deref(), Some("中科院"));
        assert_eq!(extract("某城商银行").company.as_deref(), Some("银行"));
    }
}
