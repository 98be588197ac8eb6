use anyhow::{bail, Context, Result};
use clap::Parser;
use engine::persist::{load_index, IndexPaths};
use engine::run::{ResultLine, Topic, BOOLEAN_AND_RUN_TAG};
use engine::{booland, Index};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "booland")]
#[command(about = "Boolean conjunction retrieval over a built index", long_about = None)]
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
        write_topic_results(&mut out, &index, topic)?;
    }
    out.flush()?;
    tracing::info!(
        num_topics = topics.len(),
        output = %cli.output_file.display(),
        "results written"
    );
    Ok(())
}

/// Matches carry a descending integer pseudo-score so the file still reads
/// like a ranked run even though conjunction does not rank.
fn write_topic_results(out: &mut impl Write, index: &Index, topic: &Topic) -> Result<()> {
    let matched = booland::retrieve(index, &topic.query);
    let total = matched.len();
    for (i, doc_id) in matched.into_iter().enumerate() {
        let line = ResultLine {
            topic_id: topic.id,
            docno: index.meta(doc_id).docno.clone(),
            rank: i as u32 + 1,
            score: (total - i) as f64,
            run_tag: BOOLEAN_AND_RUN_TAG.to_owned(),
        };
        writeln!(out, "{line}")?;
    }
    Ok(())
}
