//! Page-level driver: cards → raw records, the way the crawler walks a
//! category's listing pages.

use std::collections::HashSet;
use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::parser::{self, validate, TextBlock};
use crate::record::RawRecord;

/// Consecutive pages without a single valid posting that end a category.
const EMPTY_PAGE_LIMIT: usize = 2;

static DETAIL_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/jobs/detail/(\d+)").unwrap());

/// One rendered listing page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    /// Listing category, stamped onto each record as `career_job`.
    #[serde(default, alias = "careerJob")]
    pub category: Option<i64>,
    #[serde(default, alias = "招聘类型")]
    pub recruit_type: String,
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HarvestSummary {
    pub pages_seen: usize,
    pub pages_skipped: usize,
    pub blocks_seen: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub faulted: usize,
    pub duplicates: usize,
}

impl HarvestSummary {
    pub fn print(&self) {
        println!(
            "Harvested {} postings from {} pages ({} skipped): {} cards, {} rejected, {} faulted, {} duplicates.",
            self.accepted,
            self.pages_seen,
            self.pages_skipped,
            self.blocks_seen,
            self.rejected,
            self.faulted,
            self.duplicates,
        );
    }
}

pub struct Harvest {
    pub records: Vec<RawRecord>,
    pub summary: HarvestSummary,
}

pub fn harvest(pages: &[Page]) -> Harvest {
    harvest_with(pages, || {})
}

/// Walk `pages` in order, calling `on_page` once per page (skipped or not).
pub fn harvest_with<F>(pages: &[Page], mut on_page: F) -> Harvest
where
    F: FnMut(),
{
    let mut summary = HarvestSummary::default();
    let mut records = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    let mut current: Option<Option<i64>> = None;
    let mut empty_run = 0;

    for page in pages {
        on_page();
        if current != Some(page.category) {
            current = Some(page.category);
            empty_run = 0;
        }
        if empty_run >= EMPTY_PAGE_LIMIT {
            summary.pages_skipped += 1;
            continue;
        }
        summary.pages_seen += 1;
        summary.blocks_seen += page.blocks.len();

        let extracted: Vec<_> = page.blocks.par_iter().map(parser::extract_block).collect();

        let mut valid_here = 0;
        let mut accepted_here = 0;
        for out in extracted {
            if !out.faults.is_empty() {
                summary.faulted += 1;
                continue;
            }
            let mut record = out.record;
            if let Err(reason) = validate::validate(&record) {
                debug!(title = %record.title, %reason, "card rejected");
                summary.rejected += 1;
                continue;
            }
            valid_here += 1;
            if record.external_id.is_empty() {
                if let Some(caps) = DETAIL_ID_RE.captures(&record.detail_url) {
                    record.external_id = caps[1].to_string();
                }
            }
            if !record.external_id.is_empty() && !seen_ids.insert(record.external_id.clone()) {
                summary.duplicates += 1;
                continue;
            }
            if let Some(category) = page.category {
                record.career_job = category.to_string();
            }
            record.recruit_type = page.recruit_type.clone();
            records.push(record);
            accepted_here += 1;
        }

        // Already harvested postings still mean the listing has content.
        if valid_here == 0 {
            empty_run += 1;
            if empty_run == EMPTY_PAGE_LIMIT {
                info!(category = ?page.category, "two empty pages in a row, category finished");
            }
        } else {
            empty_run = 0;
        }
        summary.accepted += accepted_here;
    }

    info!(
        pages = summary.pages_seen,
        accepted = summary.accepted,
        rejected = summary.rejected,
        faulted = summary.faulted,
        "harvest finished"
    );
    Harvest { records, summary }
}
