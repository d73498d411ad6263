use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use jobs_pipeline::clean::{self, CleanOutput};
use jobs_pipeline::harvest::{self, Harvest};
use jobs_pipeline::record::RawRecord;
use jobs_pipeline::settings::Settings;
use jobs_pipeline::transport::{self, DEFAULT_PARTITIONS};
use jobs_pipeline::{analytics, store};

const ERROR_LOG: &str = "error.log";

#[derive(Parser)]
#[command(name = "jobs_pipeline", about = "Extract, clean and analyse nowcoder job postings")]
struct Cli {
    /// Settings file (default: ./jobs_pipeline.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn rendered listing pages into raw records
    Extract {
        /// JSON array of pages with their text blocks
        #[arg(long)]
        pages: PathBuf,
    },
    /// Reconcile, dedup and tag raw records
    Clean {
        /// Raw records (default: `input` from settings)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Extract + clean in one go
    Run {
        #[arg(long)]
        pages: PathBuf,
    },
    /// Dashboard aggregates over cleaned records (markdown)
    Stats {
        /// Cleaned records (default: the cleaned output file)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Write records as keyed JSON-lines messages
    Encode {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = DEFAULT_PARTITIONS)]
        partitions: u32,
    },
    /// Read a JSON-lines outbox back
    Decode {
        #[arg(long)]
        input: PathBuf,
        /// Write the message values here as a JSON array
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(s) => s,
        Err(err) => {
            write_error_log(Path::new(ERROR_LOG), &err);
            return Err(err);
        }
    };
    init_tracing(&settings.log_filter);
    info!(settings = ?settings, "starting jobs pipeline");

    let t0 = Instant::now();
    let result = dispatch(cli.command, &settings);
    if let Err(err) = &result {
        write_error_log(&settings.output(ERROR_LOG), err);
        println!("Run failed, see {}", settings.output(ERROR_LOG).display());
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }
    result
}

fn dispatch(command: Commands, settings: &Settings) -> Result<()> {
    match command {
        Commands::Extract { pages } => {
            let harvest = extract(&pages, settings)?;
            harvest.summary.print();
            Ok(())
        }
        Commands::Clean { input } => {
            let input = input.unwrap_or_else(|| settings.input.clone());
            let raw = store::load_raw(&input)?;
            println!("Loaded {} raw records from {}", raw.len(), input.display());
            let out = clean_and_save(&raw, settings)?;
            out.report.print();
            Ok(())
        }
        Commands::Run { pages } => {
            let harvest = extract(&pages, settings)?;
            harvest.summary.print();
            if harvest.records.is_empty() {
                println!("Nothing harvested; skipping cleaning.");
                return Ok(());
            }
            let out = clean_and_save(&harvest.records, settings)?;
            out.report.print();
            Ok(())
        }
        Commands::Stats { input } => {
            let input = input.unwrap_or_else(|| settings.output(&settings.cleaned_file));
            let records = store::load_resolved(&input)?;
            let stats = analytics::compute(&records);
            println!("{}", analytics::render_markdown(&stats));
            Ok(())
        }
        Commands::Encode {
            input,
            out,
            partitions,
        } => {
            let messages = match store::load_resolved(&input) {
                Ok(records) => transport::encode(&records, partitions)?,
                Err(err) => {
                    debug!(error = %err, "not cleaned records, encoding as raw");
                    transport::encode(&store::load_raw(&input)?, partitions)?
                }
            };
            transport::write_outbox(&out, &messages)?;
            println!("Encoded {} messages to {}", messages.len(), out.display());
            print_partitions(messages.iter().map(|m| m.partition));
            Ok(())
        }
        Commands::Decode { input, out } => {
            let decoded = transport::read_outbox(&input)?;
            println!(
                "Decoded {} messages ({} bad lines)",
                decoded.messages.len(),
                decoded.bad_lines.len()
            );
            for bad in &decoded.bad_lines {
                println!("  line {}: {}", bad.line, bad.error);
            }
            print_partitions(decoded.messages.iter().map(|m| m.partition));
            if let Some(out) = out {
                let values: Vec<_> = decoded.messages.into_iter().map(|m| m.value).collect();
                store::save_json(&out, &values)?;
                println!("Wrote {} records to {}", values.len(), out.display());
            }
            Ok(())
        }
    }
}

fn progress_bar(len: usize, enabled: bool) -> Result<ProgressBar> {
    if !enabled {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn extract(pages_path: &Path, settings: &Settings) -> Result<Harvest> {
    let pages = store::load_pages(pages_path)?;
    println!("Extracting {} pages...", pages.len());
    let pb = progress_bar(pages.len(), settings.progress)?;
    let harvest = harvest::harvest_with(&pages, || pb.inc(1));
    pb.finish_and_clear();

    let raw_path = settings.output(&settings.raw_file);
    store::save_json(&raw_path, &harvest.records)?;
    println!("Saved {} raw records to {}", harvest.records.len(), raw_path.display());
    Ok(harvest)
}

fn clean_and_save(raw: &[RawRecord], settings: &Settings) -> Result<CleanOutput> {
    println!("Cleaning {} records...", raw.len());
    let pb = progress_bar(raw.len(), settings.progress)?;
    let out = clean::clean_with(raw, settings.chunk_size, |n| pb.inc(n as u64));
    pb.finish_and_clear();

    let cleaned = settings.output(&settings.cleaned_file);
    let high_value = settings.output(&settings.high_value_file);
    let report = settings.output(&settings.report_file);
    store::save_json(&cleaned, &out.records)?;
    store::save_json(&high_value, &out.high_value())?;
    store::save_json(&report, &out.report)?;
    println!(
        "Saved {} cleaned, {} high-value records and the report to {}",
        out.records.len(),
        out.report.high_value_count,
        settings.output_dir.display()
    );
    Ok(out)
}

fn print_partitions(partitions: impl Iterator<Item = u32>) {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for p in partitions {
        *counts.entry(p).or_default() += 1;
    }
    for (p, n) in counts {
        println!("  partition {p}: {n}");
    }
}

/// Full error chain, the way a traceback would be dumped.
fn write_error_log(path: &Path, err: &anyhow::Error) {
    let body = format!("{}\n\n{err:?}\n", chrono::Utc::now().to_rfc3339());
    if let Err(e) = std::fs::write(path, body).context("write error log") {
        eprintln!("{e:?}");
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
