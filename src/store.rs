use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::harvest::Page;
use crate::record::{RawRecord, ResolvedRecord};

/// Read a JSON array. Missing, unreadable, malformed, or empty input is an error.
pub fn load_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let items: Vec<T> =
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    if items.is_empty() {
        bail!("{} holds no records", path.display());
    }
    Ok(items)
}

pub fn load_raw(path: &Path) -> Result<Vec<RawRecord>> {
    load_array(path)
}

pub fn load_resolved(path: &Path) -> Result<Vec<ResolvedRecord>> {
    load_array(path)
}

pub fn load_pages(path: &Path) -> Result<Vec<Page>> {
    load_array(path)
}

/// Pretty-printed JSON, creating the parent directory when needed.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).with_context(|| format!("write {}", path.display()))
}
