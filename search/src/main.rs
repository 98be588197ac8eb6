//! Interactive search session: prompt, BM25 top 10, query-biased snippets,
//! then an inner prompt to view a stored document, issue a new query or quit.

use anyhow::{bail, Context, Result};
use clap::Parser;
use engine::bm25::{self, Bm25Params};
use engine::persist::{self, IndexPaths};
use engine::{sgml, snippet, text};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

const SERP_SIZE: usize = 10;
const HEADLINE_FALLBACK_CHARS: usize = 50;

#[derive(Parser)]
#[command(name = "search")]
#[command(about = "Interactive BM25 search over a built index", long_about = None)]
struct Cli {
    /// Index directory produced by the indexer
    index_dir: PathBuf,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    if !cli.index_dir.exists() {
        bail!("directory '{}' does not exist", cli.index_dir.display());
    }

    let paths = IndexPaths::new(&cli.index_dir);
    let index = persist::load_index(&paths).context("loading index")?;
    tracing::info!(num_docs = index.num_docs(), "index loaded");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        let Some(raw_query) = prompt(&mut input, "Please enter a query: ")? else {
            return Ok(());
        };
        println!();
        let raw_query = raw_query.trim().to_owned();
        if raw_query.is_empty() {
            no_results();
            continue;
        }

        let started = Instant::now();
        let stemmed = text::analyze(&raw_query);
        if stemmed.is_empty() || index.query_term_counts(&stemmed).is_empty() {
            no_results();
            continue;
        }

        let ranked = bm25::score_terms(&index, &stemmed, Bm25Params::default());
        let mut docs_by_rank: HashMap<usize, String> = HashMap::new();
        for (i, result) in ranked.iter().take(SERP_SIZE).enumerate() {
            let rank = i + 1;
            let meta = index.meta(result.doc_id);
            let record = persist::load_document(&paths, &meta.date, &meta.docno)
                .with_context(|| format!("fetching stored document {}", meta.docno))?;

            let doc_text = sgml::document_text(&record);
            let doc_snippet = snippet::query_biased_snippet(&doc_text, &stemmed);
            let heading = if meta.headline.is_empty() {
                truncate(&doc_snippet, HEADLINE_FALLBACK_CHARS)
            } else {
                meta.headline.clone()
            };

            println!(
                "{rank}. {} ({})",
                flatten(&heading),
                text::format_date(&meta.date)
            );
            println!("{} ({})", flatten(&doc_snippet), meta.docno);
            println!();

            docs_by_rank.insert(rank, record);
        }
        println!(
            "Retrieval took {} seconds.",
            started.elapsed().as_secs_f32()
        );
        println!();

        if !view_documents(&mut input, &docs_by_rank)? {
            return Ok(());
        }
        println!();
    }
}

/// Inner prompt loop. Returns false when the user quits the program.
fn view_documents(input: &mut impl BufRead, docs_by_rank: &HashMap<usize, String>) -> Result<bool> {
    loop {
        let Some(action) = prompt(
            input,
            "Enter 1-10 to view a ranked document, n/N to execute new query or q/Q to quit: ",
        )?
        else {
            return Ok(false);
        };
        match action.trim() {
            "n" | "N" => return Ok(true),
            "q" | "Q" => return Ok(false),
            other => match other.parse::<usize>() {
                Ok(rank) if (1..=SERP_SIZE).contains(&rank) => match docs_by_rank.get(&rank) {
                    Some(document) => {
                        println!("{document}");
                        println!();
                    }
                    None => println!("Invalid input"),
                },
                Ok(_) => println!("Rank must be between 1-10"),
                Err(_) => println!("Invalid input"),
            },
        }
    }
}

/// Print `message` without a newline and read one line; None on end of input.
fn prompt(input: &mut impl BufRead, message: &str) -> Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn no_results() {
    println!("No results found");
    println!();
}

/// Collapse a multi-line field onto one SERP line.
fn flatten(s: &str) -> String {
    s.trim().replace("\r\n", " ").replace('\n', " ")
}

/// First `limit` chars with an ellipsis when the text is longer.
fn truncate(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        s.to_owned()
    } else {
        let mut cut: String = s.chars().take(limit).collect();
        cut.push_str("...");
        cut
    }
}
