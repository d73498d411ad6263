pub mod attributes;
pub mod company;
pub mod description;
pub mod link;
pub mod tags;
pub mod title;

use thiserror::Error;
use tracing::warn;

use super::lines::Lines;
use crate::record::RawRecord;

/// Outcome of one field extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    Found(T),
    NoMatch,
    Fault(FieldFault),
}

impl<T> Extracted<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Extracted::Found(v) => Some(v),
            _ => None,
        }
    }

    /// The value if any; a fault is moved into `faults`.
    fn settle(self, faults: &mut Vec<FieldFault>) -> Option<T> {
        match self {
            Extracted::Found(v) => Some(v),
            Extracted::NoMatch => None,
            Extracted::Fault(fault) => {
                faults.push(fault);
                None
            }
        }
    }
}

impl<T> From<Option<T>> for Extracted<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Extracted::NoMatch, Extracted::Found)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {kind}")]
pub struct FieldFault {
    pub field: &'static str,
    pub kind: FaultKind,
}

impl FieldFault {
    pub fn new(field: &'static str, kind: FaultKind) -> Self {
        FieldFault { field, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaultKind {
    #[error("cannot resolve link {href:?}: {reason}")]
    Link { href: String, reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct BlockExtraction {
    /// Empty when any field faulted.
    pub record: RawRecord,
    pub faults: Vec<FieldFault>,
}

/// Run every field extractor over one card, in a fixed order.
///
/// Claims are first come, first served in this order. A fault in one field
/// does not stop the others, but the card then yields an empty record and
/// the faults are logged and handed back.
pub fn extract_all(lines: &mut Lines, links: &[String], degree_hint: Option<&str>) -> BlockExtraction {
    let mut faults = Vec::new();

    let title = title::extract(lines).settle(&mut faults).unwrap_or_default();
    let company = company::extract(lines, &title).settle(&mut faults).unwrap_or_default();
    let salary = attributes::salary(lines).settle(&mut faults).unwrap_or_default();
    let city = attributes::city(lines).settle(&mut faults).unwrap_or_default();
    let degree = attributes::degree(lines, degree_hint)
        .settle(&mut faults)
        .unwrap_or_default();
    let job_type = attributes::job_type(lines, &title)
        .settle(&mut faults)
        .unwrap_or_default();
    let industry = attributes::industry(lines).settle(&mut faults).unwrap_or_default();
    let headcount_range = attributes::headcount(lines).settle(&mut faults).unwrap_or_default();
    let ownership_type = attributes::ownership(lines, &title)
        .settle(&mut faults)
        .unwrap_or_default();
    let graduation_batch = attributes::graduation(lines).settle(&mut faults).unwrap_or_default();
    let weekly_days = attributes::weekly_days(lines).settle(&mut faults).unwrap_or_default();
    let internship_duration = attributes::internship_duration(lines)
        .settle(&mut faults)
        .unwrap_or_default();
    let conversion_status = attributes::conversion(lines).settle(&mut faults).unwrap_or_default();
    let benefits_tag_list = tags::benefits(lines).settle(&mut faults).unwrap_or_default();
    let skill_tag_list = tags::skills(lines, &title)
        .settle(&mut faults)
        .unwrap_or_default();
    let link = link::extract(links).settle(&mut faults);
    let description = description::extract(lines).settle(&mut faults).unwrap_or_default();

    if !faults.is_empty() {
        for fault in &faults {
            warn!(field = fault.field, error = %fault, "field extractor fault, card dropped");
        }
        return BlockExtraction {
            record: RawRecord::default(),
            faults,
        };
    }

    let (detail_url, external_id) = link.map(|l| (l.url, l.external_id)).unwrap_or_default();
    BlockExtraction {
        record: RawRecord {
            title,
            company,
            salary,
            degree,
            city,
            job_type,
            headcount_range,
            industry,
            ownership_type,
            graduation_batch,
            weekly_days,
            internship_duration,
            conversion_status,
            benefits_tag_list,
            skill_tag_list,
            description,
            detail_url,
            external_id,
            ..RawRecord::default()
        },
        faults,
    }
}
