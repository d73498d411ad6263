//! Keyed message codec for handing records to a queue.
//!
//! Messages are written as JSON lines, `{"key": .., "partition": .., "value": {..}}`.
//! The key is the posting's external id so every update to one posting lands
//! on the same partition.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::record::{RawRecord, ResolvedRecord};

pub const DEFAULT_PARTITIONS: u32 = 3;

/// Records that carry a partitioning key.
pub trait Keyed {
    fn key(&self) -> Option<&str>;
}

impl Keyed for RawRecord {
    fn key(&self) -> Option<&str> {
        Some(self.id()).filter(|id| !id.is_empty())
    }
}

impl Keyed for ResolvedRecord {
    fn key(&self) -> Option<&str> {
        self.record.key()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub partition: u32,
    pub value: Value,
}

/// Keyed messages hash to a fixed partition; keyless ones go round-robin.
#[derive(Debug, Clone)]
pub struct Partitioner {
    partitions: u32,
    next: u32,
}

impl Partitioner {
    pub fn new(partitions: u32) -> Self {
        Partitioner {
            partitions: partitions.max(1),
            next: 0,
        }
    }

    pub fn assign(&mut self, key: Option<&str>) -> u32 {
        match key {
            Some(k) => (murmur2(k.as_bytes()) & 0x7fff_ffff) % self.partitions,
            None => {
                let p = self.next;
                self.next = (self.next + 1) % self.partitions;
                p
            }
        }
    }
}

/// 32-bit murmur2 with the seed queue clients use for key hashing.
fn murmur2(data: &[u8]) -> u32 {
    const SEED: u32 = 0x9747_b28c;
    const M: u32 = 0x5bd1_e995;
    const R: u32 = 24;

    let mut h = SEED ^ data.len() as u32;
    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h = h.wrapping_mul(M);
        h ^= k;
    }
    let tail = chunks.remainder();
    if tail.len() >= 3 {
        h ^= u32::from(tail[2]) << 16;
    }
    if tail.len() >= 2 {
        h ^= u32::from(tail[1]) << 8;
    }
    if !tail.is_empty() {
        h ^= u32::from(tail[0]);
        h = h.wrapping_mul(M);
    }
    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^= h >> 15;
    h
}

pub fn encode<T>(records: &[T], partitions: u32) -> Result<Vec<Message>>
where
    T: Serialize + Keyed,
{
    let mut partitioner = Partitioner::new(partitions);
    records
        .iter()
        .map(|r| {
            let key = r.key().map(str::to_string);
            let partition = partitioner.assign(key.as_deref());
            let value = serde_json::to_value(r).context("serialize record")?;
            Ok(Message { key, partition, value })
        })
        .collect()
}

/// A line of an outbox that could not be read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadLine {
    /// 1-based.
    pub line: usize,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct Decoded {
    pub messages: Vec<Message>,
    pub bad_lines: Vec<BadLine>,
}

/// Parse an outbox body. Blank lines are ignored; broken lines are logged,
/// collected and skipped.
pub fn decode(text: &str) -> Decoded {
    let mut out = Decoded::default();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Message>(line) {
            Ok(msg) => out.messages.push(msg),
            Err(e) => {
                warn!(line = idx + 1, error = %e, "skipping undecodable message");
                out.bad_lines.push(BadLine {
                    line: idx + 1,
                    error: e.to_string(),
                });
            }
        }
    }
    out
}

pub fn write_outbox(path: &Path, messages: &[Message]) -> Result<()> {
    let mut body = String::new();
    for msg in messages {
        body.push_str(&serde_json::to_string(msg)?);
        body.push('\n');
    }
    fs::write(path, body).with_context(|| format!("write outbox {}", path.display()))
}

pub fn read_outbox(path: &Path) -> Result<Decoded> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read outbox {}", path.display()))?;
    Ok(decode(&text))
}
