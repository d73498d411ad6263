//! Cleaning pipeline: id dedup → reconciliation → content warning → report.
//!
//! Reconciliation is pure, so surviving records are resolved in parallel
//! chunks and the per-record events are merged back in input order. Output
//! is identical to a sequential run.

pub mod dedup;
pub mod description;
pub mod reconcile;
pub mod report;
pub mod salary;
pub mod title;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::record::{RawRecord, ResolvedRecord};
use dedup::Deduplicator;
use reconcile::Resolution;
use report::{Counters, Event, Report};

pub const DEFAULT_CHUNK_SIZE: usize = 500;

pub struct CleanOutput {
    /// Every surviving record, in input order.
    pub records: Vec<ResolvedRecord>,
    pub report: Report,
}

impl CleanOutput {
    pub fn high_value(&self) -> Vec<&ResolvedRecord> {
        self.records.iter().filter(|r| r.is_high_value()).collect()
    }
}

/// Clean `input` with the default chunking and no progress reporting.
pub fn clean(input: &[RawRecord]) -> CleanOutput {
    clean_with(input, DEFAULT_CHUNK_SIZE, |_| {})
}

/// Clean `input`, calling `on_chunk` with the number of input records each
/// step finishes: the dropped id duplicates first, then every chunk. The
/// reported sizes add up to `input.len()`.
pub fn clean_with<F>(input: &[RawRecord], chunk_size: usize, mut on_chunk: F) -> CleanOutput
where
    F: FnMut(usize),
{
    let mut counters = Counters::default();
    let mut dedup = Deduplicator::default();

    let mut survivors = Vec::with_capacity(input.len());
    for raw in input {
        counters.bump(Event::TotalProcessed);
        if !dedup.admit_id(raw.id()) {
            debug!(external_id = raw.id(), "duplicate id dropped");
            counters.bump(Event::DuplicateId);
            continue;
        }
        survivors.push(raw);
    }
    let dropped = input.len() - survivors.len();
    if dropped > 0 {
        on_chunk(dropped);
    }

    let mut records = Vec::with_capacity(survivors.len());
    for chunk in survivors.chunks(chunk_size.max(1)) {
        let resolved: Vec<Resolution> = chunk.par_iter().map(|r| reconcile::reconcile(r)).collect();
        for resolution in resolved {
            for event in &resolution.events {
                counters.bump(*event);
            }
            if dedup.content_seen(&resolution.record) {
                counters.bump(Event::DuplicateContentWarning);
            }
            records.push(resolution.record);
        }
        on_chunk(chunk.len());
    }

    let high_value = records.iter().filter(|r| r.is_high_value()).count();
    let report = Report::new(input.len(), records.len(), high_value, &counters);
    info!(
        input = report.input_count,
        output = report.output_count,
        high_value = report.high_value_count,
        "cleaning finished"
    );
    CleanOutput { records, report }
}
