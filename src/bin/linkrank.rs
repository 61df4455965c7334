use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use linkrank::pagerank::{IterationReport, RankObserver};
use linkrank::{report, EdgeListFormat, PageRankConfig, StandardPageRank, WebGraph};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "linkrank", version, about = "PageRank for web link graphs")]
struct Cli {
    /// Edge-list file, one record per line
    graph: PathBuf,

    /// Record layout: out-links (source then targets) or in-links (page then linkers)
    #[arg(long, default_value = "out-links")]
    format: EdgeListFormat,

    /// JSON file with PageRank settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write "<page> <rank>" lines
    #[arg(long, default_value = "page_rank.txt")]
    output: PathBuf,

    /// Where to write the perplexity of every iteration
    #[arg(long)]
    perplexity: Option<PathBuf>,

    /// Also list the top N pages by rank and by in-link count
    #[arg(long)]
    top: Option<usize>,

    /// Directory for the top-N listings
    #[arg(long, default_value = ".")]
    top_dir: PathBuf,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

/// Logs per-iteration progress at debug level
struct ProgressLog;

impl RankObserver for ProgressLog {
    fn on_start(&mut self, pages: usize, initial_perplexity: f64) {
        tracing::debug!(pages, initial_perplexity, "starting power iteration");
    }

    fn on_iteration(&mut self, report: &IterationReport) {
        tracing::debug!(
            iteration = report.iteration,
            sink_mass = report.sink_mass,
            elapsed_us = report.elapsed.as_micros() as u64,
            "iteration done"
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PageRankConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PageRankConfig::default(),
    };

    let graph = WebGraph::from_path(&cli.graph, cli.format)
        .with_context(|| format!("building graph from {}", cli.graph.display()))?;

    let ranking = StandardPageRank::with_config(config)
        .run_with_observer(&graph, &mut ProgressLog)
        .context("ranking pages")?;

    report::write_ranks(&ranking, create(&cli.output)?)?;

    if let Some(path) = &cli.perplexity {
        report::write_perplexity(ranking.perplexity_trace(), create(path)?)?;
    }

    if let Some(n) = cli.top {
        let top_file = |name: &str| create(&cli.top_dir.join(format!("top_{n}_{name}.txt")));
        report::write_top_ranks(&ranking, n, top_file("page_rank")?)?;
        report::write_top_in_links(&graph, n, top_file("inlink")?)?;
        report::write_top_in_links_with_links(&graph, n, top_file("inlink_links")?)?;
        report::write_top_with_links(&ranking, n, top_file("page_rank_links")?)?;
    }

    report::write_summary(&ranking.summary(), cli.json, io::stdout().lock())?;

    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}
