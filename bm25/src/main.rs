use anyhow::{bail, Context, Result};
use clap::Parser;
use engine::bm25::{self, Bm25Params};
use engine::persist::{load_index, IndexPaths};
use engine::run::{ResultLine, BM25_RUN_TAG};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "bm25")]
#[command(about = "BM25 ranked retrieval over a built index", long_about = None)]
struct Cli {
    /// Index directory produced by the indexer
    index_dir: PathBuf,
    /// Topics file: alternating topic-id and query lines
    queries_file: PathBuf,
    /// Run file to write; must not already exist
    output_file: PathBuf,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    if !cli.index_dir.exists() {
        bail!("directory '{}' does not exist", cli.index_dir.display());
    }
    if !cli.queries_file.exists() {
        bail!("file '{}' does not exist", cli.queries_file.display());
    }
    if cli.output_file.exists() {
        bail!(
            "file '{}' already exists; provide a file which does not",
            cli.output_file.display()
        );
    }

    let index = load_index(&IndexPaths::new(&cli.index_dir)).context("loading index")?;
    tracing::info!(num_docs = index.num_docs(), "index loaded");

    let topics = engine::run::read_topics(&cli.queries_file).context("reading topics")?;

    let mut out = BufWriter::new(
        File::create(&cli.output_file)
            .with_context(|| format!("creating '{}'", cli.output_file.display()))?,
    );
    for topic in &topics {
        let ranked = bm25::retrieve(&index, &topic.query, Bm25Params::default());
        for (i, result) in ranked.iter().enumerate() {
            let line = ResultLine {
                topic_id: topic.id,
                docno: index.meta(result.doc_id).docno.clone(),
                rank: i as u32 + 1,
                score: result.score,
                run_tag: BM25_RUN_TAG.to_owned(),
            };
            writeln!(out, "{line}")?;
        }
    }
    out.flush()?;
    tracing::info!(
        num_topics = topics.len(),
        output = %cli.output_file.display(),
        "results written"
    );
    Ok(())
}
