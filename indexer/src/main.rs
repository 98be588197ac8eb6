use anyhow::{bail, Context, Result};
use clap::Parser;
use engine::builder::IndexBuilder;
use engine::persist::IndexPaths;
use engine::sgml::RecordReader;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Index a gzipped LATimes collection into a new directory", long_about = None)]
struct Cli {
    /// Path to the gzipped collection (latimes.gz)
    collection: PathBuf,
    /// Index directory to create; must not already exist
    index_dir: PathBuf,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    if !cli.collection.exists() {
        bail!("file '{}' does not exist", cli.collection.display());
    }
    if cli.index_dir.exists() {
        bail!(
            "directory '{}' already exists; provide a directory which does not",
            cli.index_dir.display()
        );
    }

    let file = File::open(&cli.collection)
        .with_context(|| format!("opening '{}'", cli.collection.display()))?;
    let records = RecordReader::new(BufReader::new(GzDecoder::new(file)));

    let mut builder = IndexBuilder::create(IndexPaths::new(&cli.index_dir))?;
    for record in records {
        let record = record.context("reading collection stream")?;
        builder
            .push_record(&record)
            .with_context(|| format!("indexing document {}", builder.num_docs()))?;
    }
    tracing::info!(
        num_docs = builder.num_docs(),
        num_terms = builder.num_terms(),
        "ingested documents"
    );

    builder.finish().context("serializing index maps")?;
    tracing::info!(index_dir = %cli.index_dir.display(), "index build complete");
    Ok(())
}
