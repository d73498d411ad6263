use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Looked up in the working directory when no `--config` is given.
const DEFAULT_FILE: &str = "jobs_pipeline";

/// Run settings: defaults, then the config file, then `JOBS_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Raw records to clean.
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub raw_file: String,
    pub cleaned_file: String,
    pub high_value_file: String,
    pub report_file: String,
    pub log_filter: String,
    /// Records per parallel reconciliation chunk.
    pub chunk_size: usize,
    pub progress: bool,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("input", "nowcoder_jobs_edge.json")?
            .set_default("output_dir", ".")?
            .set_default("raw_file", "nowcoder_jobs_edge.json")?
            .set_default("cleaned_file", "nowcoder_jobs_cleaned.json")?
            .set_default("high_value_file", "nowcoder_jobs_high_value.json")?
            .set_default("report_file", "cleaning_report.json")?
            .set_default("log_filter", "info")?
            .set_default("chunk_size", 500_i64)?
            .set_default("progress", true)?;

        builder = match path {
            Some(p) => builder.add_source(File::from(p)),
            None => builder.add_source(File::with_name(DEFAULT_FILE).required(false)),
        };

        let settings: Settings = builder
            .add_source(Environment::with_prefix("JOBS").try_parsing(true))
            .build()
            .context("load settings")?
            .try_deserialize()
            .context("invalid settings")?;
        Ok(Settings {
            chunk_size: settings.chunk_size.max(1),
            ..settings
        })
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}
