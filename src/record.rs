use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Stand-in for a title (or company) that could not be recovered.
pub const UNKNOWN: &str = "未知";

/// One posting as first captured from a rendered block or loaded from storage.
///
/// Keys are the English field names; the Chinese keys written by the crawler
/// are accepted as aliases so older dumps load unchanged. Every field is
/// lenient: missing, `null`, and numeric values all become strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, alias = "岗位名称", deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, alias = "公司名称", deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(default, alias = "薪资", deserialize_with = "lenient_string")]
    pub salary: String,
    #[serde(default, alias = "学历要求", deserialize_with = "lenient_string")]
    pub degree: String,
    #[serde(default, alias = "城市", deserialize_with = "lenient_string")]
    pub city: String,
    #[serde(default, alias = "职位类型", deserialize_with = "lenient_string")]
    pub job_type: String,
    #[serde(default, alias = "招聘人数", deserialize_with = "lenient_string")]
    pub headcount_range: String,
    #[serde(default, alias = "公司类型", deserialize_with = "lenient_string")]
    pub industry: String,
    #[serde(default, alias = "公司性质", deserialize_with = "lenient_string")]
    pub ownership_type: String,
    #[serde(default, alias = "毕业年份", deserialize_with = "lenient_string")]
    pub graduation_batch: String,
    #[serde(default, alias = "每周工作天数", deserialize_with = "lenient_string")]
    pub weekly_days: String,
    #[serde(default, alias = "实习时长", deserialize_with = "lenient_string")]
    pub internship_duration: String,
    #[serde(default, alias = "是否有转正", deserialize_with = "lenient_string")]
    pub conversion_status: String,
    #[serde(default, alias = "福利标签", deserialize_with = "lenient_string")]
    pub benefits_tag_list: String,
    #[serde(default, alias = "技能要求标签", deserialize_with = "lenient_string")]
    pub skill_tag_list: String,
    #[serde(default, alias = "职位描述", deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, alias = "职位链接", deserialize_with = "lenient_string")]
    pub detail_url: String,
    #[serde(default, alias = "job_id", deserialize_with = "lenient_string")]
    pub external_id: String,
    #[serde(default, alias = "招聘类型", deserialize_with = "lenient_string")]
    pub recruit_type: String,
    #[serde(default, alias = "careerJob", deserialize_with = "lenient_string")]
    pub career_job: String,
}

impl RawRecord {
    pub fn is_empty(&self) -> bool {
        *self == RawRecord::default()
    }

    /// Trimmed external id, empty when the posting carries none.
    pub fn id(&self) -> &str {
        self.external_id.trim()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    })
}

/// Structured salary range, in thousands per month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSalary {
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub months: Option<u32>,
    pub negotiable: bool,
    /// Input exactly as received, kept for audit.
    pub raw: String,
}

impl ParsedSalary {
    /// Midpoint of the range, when both ends are known.
    pub fn avg_monthly(&self) -> Option<f64> {
        match (self.min, self.max) {
            (Some(lo), Some(hi)) => Some((lo as f64 + hi as f64) / 2.0),
            _ => None,
        }
    }

    pub fn annual(&self) -> Option<f64> {
        Some(self.avg_monthly()? * self.months? as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValueTag {
    #[serde(rename = "high-collection")]
    HighCollection,
    #[serde(rename = "active")]
    Active,
}

/// A posting after reconciliation, carrying the derived fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRecord {
    #[serde(flatten)]
    pub record: RawRecord,
    pub is_valid: bool,
    pub parsed_salary: ParsedSalary,
    #[serde(default)]
    pub collection_count: u32,
    #[serde(default)]
    pub activity_tags: Vec<String>,
    #[serde(default)]
    pub batch: String,
    #[serde(default)]
    pub value_tags: BTreeSet<ValueTag>,
}

impl ResolvedRecord {
    /// Activity tags as shown to people: `"刚刚有人投递过|HR近期来过"`.
    pub fn activity_display(&self) -> String {
        self.activity_tags.join("|")
    }

    pub fn is_high_value(&self) -> bool {
        !self.value_tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chinese_keys_and_loose_types() {
        let json = r#"{
            "岗位名称": "后端开发工程师",
            "公司名称": null,
            "job_id": 1234567,
            "careerJob": 11002,
            "unrelated": "ignored"
        }"#;
        let rec: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.title, "后端开发工程师");
        assert_eq!(rec.company, "");
        assert_eq!(rec.external_id, "1234567");
        assert_eq!(rec.career_job, "11002");
        assert_eq!(rec.salary, "");
    }

    #[test]
    fn salary_midpoint_and_annual() {
        let s = ParsedSalary {
            min: Some(15),
            max: Some(25),
            months: Some(14),
            negotiable: false,
            raw: "15-25K·14薪".into(),
        };
        assert_eq!(s.avg_monthly(), Some(20.0));
        assert_eq!(s.annual(), Some(280.0));
        assert_eq!(ParsedSalary::default().avg_monthly(), None);
    }

    #[test]
    fn resolved_record_flattens_raw_fields() {
        let resolved = ResolvedRecord {
            record: RawRecord {
                title: "算法工程师".into(),
                ..Default::default()
            },
            is_valid: true,
            parsed_salary: ParsedSalary::default(),
            collection_count: 3,
            activity_tags: vec!["HR近期来过".into()],
            batch: String::new(),
            value_tags: [ValueTag::Active].into_iter().collect(),
        };
        let value = serde_json::to_value(&resolved).unwrap();
        assert_eq!(value["title"], "算法工程师");
        assert_eq!(value["value_tags"][0], "active");

        let back: ResolvedRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, resolved);
    }
}
