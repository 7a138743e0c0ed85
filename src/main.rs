//! Pricematch CLI - price an inquiry list against a pricelist.
//!
//! Reads both lists as JSON row arrays, runs the matching pipeline and
//! writes one JSON row per inquiry (to stdout or `--output`).

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use pricematch::{
    load_inquiries, load_references, JsonReportFile, JsonReportWriter, MatcherConfig, Pipeline,
    PricematchConfig, ReconciliationWriter, TracingProgress,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pricematch")]
#[command(about = "Fill inquiry rates from the most similar pricelist entries")]
#[command(version)]
#[command(after_help = "\
Examples:
  pricematch --pricelist pricelist.json --inquiry boq.json
  pricematch --pricelist pricelist.json --inquiry boq.json --stub --top-k 3
  PRICEMATCH_API_KEY=... pricematch -p pricelist.json -i boq.json -c pricematch.yaml -o out.json")]
struct Cli {
    /// Pricelist rows (JSON array with description, rate, code, unit)
    #[arg(long, short = 'p')]
    pricelist: PathBuf,

    /// Inquiry rows (JSON array with description, quantity, rate, target)
    #[arg(long, short = 'i')]
    inquiry: PathBuf,

    /// YAML configuration file
    #[arg(long, short = 'c', env = "PRICEMATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Use offline deterministic embeddings (no API key, no network)
    #[arg(long)]
    stub: bool,

    /// Attach this many ranked candidates per inquiry
    #[arg(long)]
    top_k: Option<usize>,

    /// Embed pricelist and inquiry concurrently
    #[arg(long)]
    concurrent: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut cfg = match &cli.config {
        Some(path) => PricematchConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PricematchConfig::default(),
    };
    cfg.apply_env();
    if cli.stub {
        cfg.use_stub_provider();
    }
    if let Some(top_k) = cli.top_k {
        cfg.matcher = MatcherConfig { top_k };
    }
    if cli.concurrent {
        cfg.pipeline.concurrent_roles = true;
    }
    cfg.validate()?;
    if cfg.missing_api_key() {
        bail!("no API key: set PRICEMATCH_API_KEY (or COHERE_API_KEY), or pass --stub");
    }

    let references = load_references(&cli.pricelist)?;
    let inquiries = load_inquiries(&cli.inquiry)?;
    tracing::info!(
        references = references.len(),
        inquiries = inquiries.len(),
        "inputs loaded"
    );

    let pipeline = Pipeline::from_config(&cfg)?;

    // Nothing is written to the destination until the run has succeeded.
    let mut writer: Box<dyn ReconciliationWriter> = match &cli.output {
        Some(path) => Box::new(JsonReportFile::new(path).pretty(cli.pretty)),
        None => Box::new(JsonReportWriter::new(io::stdout().lock()).pretty(cli.pretty)),
    };

    let summary = pipeline
        .run(references, inquiries, writer.as_mut(), &TracingProgress)
        .await?;

    if !summary.degenerate_inquiries.is_empty() || !summary.degenerate_references.is_empty() {
        tracing::warn!(
            inquiries = ?summary.degenerate_inquiries,
            references = ?summary.degenerate_references,
            "some embeddings had zero norm and were scored 0"
        );
    }
    Ok(())
}
