//! Dashboard aggregates over cleaned postings.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use crate::record::{ResolvedRecord, UNKNOWN};

/// Collections at or above this count make a posting "hot" on the dashboard.
pub const HOT_COLLECTIONS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityStats {
    pub city: String,
    pub jobs: usize,
    pub salary_samples: usize,
    pub mean_salary: Option<f64>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub negotiable: usize,
    pub negotiable_ratio: f64,
}

/// Job count plus mean average monthly salary for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSalary {
    pub key: String,
    pub jobs: usize,
    pub mean_salary: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillStats {
    pub skill: String,
    pub jobs: usize,
    pub mean_collections: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub total: usize,
    pub cities: Vec<CityStats>,
    pub degrees: Vec<GroupSalary>,
    pub skills: Vec<SkillStats>,
    pub ownership: Vec<Count>,
    pub recruit_types: Vec<Count>,
    pub internships: Vec<GroupSalary>,
    pub hot_by_city: Vec<Count>,
    pub active_by_city: Vec<GroupSalary>,
    pub activity_tags: Vec<GroupSalary>,
}

#[derive(Default)]
struct SalaryAcc {
    jobs: usize,
    samples: usize,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
    negotiable: usize,
}

impl SalaryAcc {
    fn add(&mut self, record: &ResolvedRecord) {
        self.jobs += 1;
        if record.parsed_salary.negotiable {
            self.negotiable += 1;
        }
        if let Some(avg) = record.parsed_salary.avg_monthly() {
            self.samples += 1;
            self.sum += avg;
            self.min = Some(self.min.map_or(avg, |m| m.min(avg)));
            self.max = Some(self.max.map_or(avg, |m| m.max(avg)));
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.samples > 0).then(|| self.sum / self.samples as f64)
    }
}

pub fn effective_city(record: &ResolvedRecord) -> &str {
    or_unknown(&record.record.city)
}

fn or_unknown(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        UNKNOWN
    } else {
        value
    }
}

fn is_internship(record: &ResolvedRecord) -> bool {
    record.record.recruit_type.trim() == "实习" || record.record.title.contains("实习")
}

pub fn compute(records: &[ResolvedRecord]) -> Analytics {
    let mut cities: BTreeMap<&str, SalaryAcc> = BTreeMap::new();
    let mut degrees: BTreeMap<&str, SalaryAcc> = BTreeMap::new();
    let mut internships: BTreeMap<&str, SalaryAcc> = BTreeMap::new();
    let mut active: BTreeMap<&str, SalaryAcc> = BTreeMap::new();
    let mut tags: BTreeMap<&str, SalaryAcc> = BTreeMap::new();
    let mut skills: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
    let mut ownership: BTreeMap<&str, usize> = BTreeMap::new();
    let mut recruit_types: BTreeMap<&str, usize> = BTreeMap::new();
    let mut hot: BTreeMap<&str, usize> = BTreeMap::new();

    for r in records {
        let city = effective_city(r);
        cities.entry(city).or_default().add(r);
        degrees.entry(or_unknown(&r.record.degree)).or_default().add(r);
        *ownership.entry(or_unknown(&r.record.ownership_type)).or_default() += 1;
        *recruit_types.entry(or_unknown(&r.record.recruit_type)).or_default() += 1;

        for skill in r.record.skill_tag_list.split(',').map(str::trim).filter(|s| !s.is_empty()).unique() {
            let entry = skills.entry(skill).or_default();
            entry.0 += 1;
            entry.1 += u64::from(r.collection_count);
        }
        if is_internship(r) {
            internships.entry(city).or_default().add(r);
        }
        if r.collection_count >= HOT_COLLECTIONS {
            *hot.entry(city).or_default() += 1;
        }
        if !r.activity_tags.is_empty() {
            active.entry(city).or_default().add(r);
        }
        for tag in &r.activity_tags {
            tags.entry(tag.as_str()).or_default().add(r);
        }
    }

    Analytics {
        total: records.len(),
        cities: cities
            .into_iter()
            .map(|(city, acc)| CityStats {
                city: city.to_string(),
                jobs: acc.jobs,
                salary_samples: acc.samples,
                mean_salary: acc.mean(),
                min_salary: acc.min,
                max_salary: acc.max,
                negotiable: acc.negotiable,
                negotiable_ratio: acc.negotiable as f64 / acc.jobs as f64,
            })
            .sorted_by(|a, b| b.jobs.cmp(&a.jobs).then_with(|| a.city.cmp(&b.city)))
            .collect(),
        degrees: group_salaries(degrees),
        skills: skills
            .into_iter()
            .map(|(skill, (jobs, collections))| SkillStats {
                skill: skill.to_string(),
                jobs,
                mean_collections: collections as f64 / jobs as f64,
            })
            .sorted_by(|a, b| b.jobs.cmp(&a.jobs).then_with(|| a.skill.cmp(&b.skill)))
            .collect(),
        ownership: counts(ownership),
        recruit_types: counts(recruit_types),
        internships: group_salaries(internships),
        hot_by_city: counts(hot),
        active_by_city: group_salaries(active),
        activity_tags: group_salaries(tags),
    }
}

fn group_salaries(groups: BTreeMap<&str, SalaryAcc>) -> Vec<GroupSalary> {
    groups
        .into_iter()
        .map(|(key, acc)| GroupSalary {
            key: key.to_string(),
            jobs: acc.jobs,
            mean_salary: acc.mean(),
        })
        .sorted_by(|a, b| b.jobs.cmp(&a.jobs).then_with(|| a.key.cmp(&b.key)))
        .collect()
}

fn counts(groups: BTreeMap<&str, usize>) -> Vec<Count> {
    groups
        .into_iter()
        .map(|(key, count)| Count {
            key: key.to_string(),
            count,
        })
        .sorted_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)))
        .collect()
}

fn salary(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}K"))
}

pub fn render_markdown(a: &Analytics) -> String {
    let mut out = String::new();
    out.push_str("## Job Stats\n");
    out.push_str(&format!("- Total postings: {}\n", a.total));

    out.push_str("\n### Cities\n");
    for c in &a.cities {
        out.push_str(&format!(
            "- {}: {} jobs, avg {} (min {}, max {}, {} samples), negotiable {} ({:.1}%)\n",
            c.city,
            c.jobs,
            salary(c.mean_salary),
            salary(c.min_salary),
            salary(c.max_salary),
            c.salary_samples,
            c.negotiable,
            c.negotiable_ratio * 100.0
        ));
    }

    out.push_str("\n### Degrees\n");
    for g in &a.degrees {
        out.push_str(&format!("- {}: {} jobs, avg {}\n", g.key, g.jobs, salary(g.mean_salary)));
    }

    out.push_str("\n### Skills\n");
    for s in &a.skills {
        out.push_str(&format!(
            "- {}: {} jobs, {:.1} collections on average\n",
            s.skill, s.jobs, s.mean_collections
        ));
    }

    out.push_str("\n### Ownership\n");
    for c in &a.ownership {
        out.push_str(&format!("- {}: {}\n", c.key, c.count));
    }

    out.push_str("\n### Recruit types\n");
    for c in &a.recruit_types {
        out.push_str(&format!("- {}: {}\n", c.key, c.count));
    }

    out.push_str("\n### Internships by city\n");
    for g in &a.internships {
        out.push_str(&format!("- {}: {} jobs, avg {}\n", g.key, g.jobs, salary(g.mean_salary)));
    }

    out.push_str(&format!("\n### Hot postings ({HOT_COLLECTIONS}+ collections) by city\n"));
    for c in &a.hot_by_city {
        out.push_str(&format!("- {}: {}\n", c.key, c.count));
    }

    out.push_str("\n### Active postings by city\n");
    for g in &a.active_by_city {
        out.push_str(&format!("- {}: {} jobs, avg {}\n", g.key, g.jobs, salary(g.mean_salary)));
    }

    out.push_str("\n### Activity tags\n");
    for g in &a.activity_tags {
        out.push_str(&format!("- {}: {} jobs, avg {}\n", g.key, g.jobs, salary(g.mean_salary)));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::salary;
    use crate::record::RawRecord;

    fn posting(city: &str, salary_text: &str, collections: u32) -> ResolvedRecord {
        ResolvedRecord {
            record: RawRecord {
                title: "后端开发工程师".into(),
                city: city.into(),
                degree: "本科".into(),
                skill_tag_list: "Java,Redis".into(),
                recruit_type: "校招".into(),
                ..Default::default()
            },
            is_valid: true,
            parsed_salary: salary::parse(salary_text),
            collection_count: collections,
            activity_tags: Vec::new(),
            batch: String::new(),
            value_tags: Default::default(),
        }
    }

    #[test]
    fn city_salary_aggregates() {
        let records = vec![
            posting("北京", "20-30K", 0),
            posting("北京", "10-20K", 0),
            posting("北京", "薪资面议", 0),
            posting("", "15-25K", 0),
        ];
        let a = compute(&records);
        assert_eq!(a.total, 4);

        let bj = &a.cities[0];
        assert_eq!(bj.city, "北京");
        assert_eq!(bj.jobs, 3);
        assert_eq!(bj.salary_samples, 2);
        assert_eq!(bj.mean_salary, Some(20.0));
        assert_eq!(bj.min_salary, Some(15.0));
        assert_eq!(bj.max_salary, Some(25.0));
        assert_eq!(bj.negotiable, 1);
        assert!((bj.negotiable_ratio - 1.0 / 3.0).abs() < 1e-9);

        assert_eq!(a.cities[1].city, UNKNOWN);
    }

    #[test]
    fn internships_hot_and_active() {
        let mut intern = posting("上海", "4-6K", 60);
        intern.record.recruit_type = "实习".into();
        intern.activity_tags = vec!["HR近期来过".into()];
        let mut titled = posting("上海", "", 49);
        titled.record.title = "数据分析实习生".into();
        let regular = posting("深圳", "20-30K", 50);

        let a = compute(&[intern, titled, regular]);
        assert_eq!(a.internships.len(), 1);
        assert_eq!(a.internships[0].key, "上海");
        assert_eq!(a.internships[0].jobs, 2);
        assert_eq!(a.internships[0].mean_salary, Some(5.0));

        assert_eq!(
            a.hot_by_city,
            vec![
                Count { key: "上海".into(), count: 1 },
                Count { key: "深圳".into(), count: 1 },
            ]
        );
        assert_eq!(a.active_by_city.len(), 1);
        assert_eq!(a.activity_tags[0].key, "HR近期来过");
        assert_eq!(
            a.recruit_types,
            vec![Count { key: "校招".into(), count: 2 }, Count { key: "实习".into(), count: 1 }]
        );
    }

    #[test]
    fn skills_count_and_collections() {
        let mut a = posting("北京", "", 10);
        a.record.skill_tag_list = "Java, Redis,Java".into();
        let b = posting("北京", "", 20);
        let stats = compute(&[a, b]);
        assert_eq!(stats.skills[0].skill, "Java");
        assert_eq!(stats.skills[0].jobs, 2);
        assert_eq!(stats.skills[0].mean_collections, 15.0);
        assert_eq!(stats.skills.len(), 2);
    }

    #[test]
    fn markdown_has_every_section() {
        let md = render_markdown(&compute(&[posting("北京", "20-30K", 3)]));
        assert!(md.starts_with("## Job Stats\n"));
        assert!(md.contains("- 北京: 1 jobs, avg 25.0K (min 25.0K, max 25.0K, 1 samples), negotiable 0 (0.0%)"));
        assert!(md.contains("### Activity tags"));
    }
}
