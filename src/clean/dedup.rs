use std::collections::HashSet;

use crate::record::ResolvedRecord;

/// Run-scoped identity tracking.
///
/// External ids drop repeats outright. The (company, title, city) composite
/// only raises a warning: one employer can post many openings that share it.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen_ids: HashSet<String>,
    seen_content: HashSet<String>,
}

impl Deduplicator {
    /// `false` when `id` is non-empty and was admitted before. Empty ids are
    /// always admitted.
    pub fn admit_id(&mut self, id: &str) -> bool {
        let id = id.trim();
        if id.is_empty() {
            return true;
        }
        self.seen_ids.insert(id.to_string())
    }

    /// Records the content hash; `true` when an earlier record shared it.
    pub fn content_seen(&mut self, record: &ResolvedRecord) -> bool {
        let key = content_hash(record);
        !self.seen_content.insert(key)
    }
}

pub fn content_hash(record: &ResolvedRecord) -> String {
    format!(
        "{}_{}_{}",
        record.record.company, record.record.title, record.record.city
    )
}
