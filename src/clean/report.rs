use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Something the cleaning run wants counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Event {
    TotalProcessed,
    DuplicateId,
    DuplicateContentWarning,
    CompanyRestoredFromDesc,
    CompanyUnknown,
    CityRestoredFromTitle,
    CityRestoredFromDesc,
    DegreeRestoredFromDesc,
    TypeRestoredFromDesc,
}

impl Event {
    pub fn name(self) -> &'static str {
        match self {
            Event::TotalProcessed => "total_processed",
            Event::DuplicateId => "duplicate_id",
            Event::DuplicateContentWarning => "duplicate_content_warning",
            Event::CompanyRestoredFromDesc => "company_restored_from_desc",
            Event::CompanyUnknown => "company_unknown",
            Event::CityRestoredFromTitle => "city_restored_from_title",
            Event::CityRestoredFromDesc => "city_restored_from_desc",
            Event::DegreeRestoredFromDesc => "degree_restored_from_desc",
            Event::TypeRestoredFromDesc => "type_restored_from_desc",
        }
    }
}

/// Per-run event counters.
#[derive(Debug, Clone, Default)]
pub struct Counters {
    counts: BTreeMap<Event, u64>,
}

impl Counters {
    pub fn bump(&mut self, event: Event) {
        *self.counts.entry(event).or_default() += 1;
    }

    pub fn get(&self, event: Event) -> u64 {
        self.counts.get(&event).copied().unwrap_or(0)
    }

    pub fn merge(&mut self, other: &Counters) {
        for (event, n) in &other.counts {
            *self.counts.entry(*event).or_default() += n;
        }
    }

    fn by_name(&self) -> BTreeMap<String, u64> {
        self.counts
            .iter()
            .map(|(e, n)| (e.name().to_string(), *n))
            .collect()
    }
}

/// Summary written at the end of a cleaning run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub input_count: usize,
    pub output_count: usize,
    pub high_value_count: usize,
    pub stats: BTreeMap<String, u64>,
}

impl Report {
    pub fn new(input_count: usize, output_count: usize, high_value_count: usize, counters: &Counters) -> Self {
        let generated_at = Utc::now();
        Report {
            run_id: format!("run-{}", generated_at.timestamp()),
            generated_at,
            input_count,
            output_count,
            high_value_count,
            stats: counters.by_name(),
        }
    }

    pub fn stat(&self, event: Event) -> u64 {
        self.stats.get(event.name()).copied().unwrap_or(0)
    }

    pub fn print(&self) {
        println!("==============================");
        println!("Cleaning summary ({})", self.run_id);
        println!("  input:             {}", self.input_count);
        println!("  output:            {}", self.output_count);
        println!("  high value:        {}", self.high_value_count);
        println!("  company restored:  {}", self.stat(Event::CompanyRestoredFromDesc));
        println!("  company unknown:   {}", self.stat(Event::CompanyUnknown));
        println!(
            "  city restored:     {}",
            self.stat(Event::CityRestoredFromDesc) + self.stat(Event::CityRestoredFromTitle)
        );
        println!("  duplicate ids:     {}", self.stat(Event::DuplicateId));
        println!("==============================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_and_serialize() {
        let mut a = Counters::default();
        a.bump(Event::DuplicateId);
        let mut b = Counters::default();
        b.bump(Event::DuplicateId);
        b.bump(Event::CompanyUnknown);
        a.merge(&b);
        assert_eq!(a.get(Event::DuplicateId), 2);
        assert_eq!(a.get(Event::CityRestoredFromDesc), 0);

        let report = Report::new(3, 1, 0, &a);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stats"]["duplicate_id"], 2);
        assert_eq!(json["stats"]["company_unknown"], 1);
        assert_eq!(json["input_count"], 3);
        assert!(json["stats"].get("city_restored_from_desc").is_none());
    }
}
