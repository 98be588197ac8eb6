use anyhow::{bail, Context, Result};
use clap::Parser;
use engine::eval::{self, TopicMeasures};
use engine::persist::{load_metadata, IndexPaths};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "eval")]
#[command(about = "Score a TREC run file against qrels", long_about = None)]
struct Cli {
    /// Index directory produced by the indexer
    index_dir: PathBuf,
    /// Qrels file: `topicId iter docno judgment` lines
    qrels_file: PathBuf,
    /// Run file to score
    result_file: PathBuf,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    if !cli.index_dir.exists() {
        bail!("directory '{}' does not exist", cli.index_dir.display());
    }
    if !cli.qrels_file.exists() {
        bail!("file '{}' does not exist", cli.qrels_file.display());
    }
    if !cli.result_file.exists() {
        bail!("file '{}' does not exist", cli.result_file.display());
    }

    let metadata =
        load_metadata(&IndexPaths::new(&cli.index_dir)).context("loading document metadata")?;
    let qrels = eval::read_qrels(&cli.qrels_file).context("reading qrels")?;
    let run = eval::read_run(&cli.result_file).context("reading run file")?;

    let measures = eval::evaluate(&metadata, &qrels, &run).context("scoring run")?;

    println!(
        "{:<10}{:<20}{:<10}{:<10}{:<15}{:<10}",
        "Topic ID", "Average Precision", "P@10", "NDCG@10", "NDCG@1000", "TBG"
    );
    for topic_id in eval::report_topics() {
        let m = measures.get(&topic_id).copied().unwrap_or(TopicMeasures::default());
        println!(
            "{:<10}{:<20.6}{:<10.6}{:<10.6}{:<15.6}{:<10.6}",
            topic_id,
            m.average_precision,
            m.precision_at_10,
            m.ndcg_at_10,
            m.ndcg_at_1000,
            m.time_biased_gain
        );
    }
    Ok(())
}
