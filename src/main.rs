// src/main.rs

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use lead_quality_lib::models::core::{HistoricalRecord, LeadRecord};
use lead_quality_lib::models::scoring::ScoringContext;
use lead_quality_lib::pipeline::{run_pipeline, PipelineConfig};

/// Run the lead data-quality pass over a JSON batch: dedup, cross-campaign
/// exclusion, and scoring. Results go to stdout or --output as JSON.
#[derive(Parser, Debug)]
#[command(name = "lead_quality", version)]
struct Args {
    /// JSON array of lead records for the current batch
    #[arg(long)]
    leads: PathBuf,

    /// JSON array of historical identity records (prior campaigns,
    /// suppression list)
    #[arg(long)]
    history: Option<PathBuf>,

    /// Scoring context JSON (target titles, seniority, industry fit table,
    /// size buckets, personas)
    #[arg(long)]
    context: Option<PathBuf>,

    /// Pipeline configuration JSON; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the outcome here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf, what: &str) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening {} file {:?}", what, path))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {} file {:?}", what, path))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let batch: Vec<LeadRecord> = read_json(&args.leads, "leads")?;
    let history: Vec<HistoricalRecord> = match &args.history {
        Some(path) => read_json(path, "history")?,
        None => Vec::new(),
    };
    let context: ScoringContext = match &args.context {
        Some(path) => read_json(path, "context")?,
        None => ScoringContext::default(),
    };
    let config: PipelineConfig = match &args.config {
        Some(path) => read_json(path, "config")?,
        None => PipelineConfig::default(),
    };

    info!(
        "Loaded {} leads, {} historical records",
        batch.len(),
        history.len()
    );

    let outcome = run_pipeline(&batch, &history, &context, &config)?;

    match &args.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating output file {:?}", path))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &outcome).context("writing outcome")?;
            writer.flush()?;
            info!("Outcome written to {:?}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            serde_json::to_writer_pretty(&mut writer, &outcome).context("writing outcome")?;
            writer.flush()?;
        }
    }

    Ok(())
}
