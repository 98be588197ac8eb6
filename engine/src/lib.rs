//! Full-text retrieval over the TREC LATimes 1989-1990 newswire collection.
//!
//! The library is split the way the data flows:
//! - `sgml` slices the gzipped collection into `<DOC>` records and extracts
//!   the tagged text regions.
//! - `text` turns text into lower-cased, stemmed tokens.
//! - `builder` consumes parsed records and grows the lexicon, postings and
//!   metadata; `persist` writes and reloads them.
//! - `booland` and `bm25` answer queries over a loaded [`Index`].
//! - `snippet` produces query-biased two-sentence summaries for the SERP.
//! - `run` models TREC run files and topic files; `eval` scores runs against
//!   qrels (AP, P@10, NDCG, TBG).
//!
//! Binaries own all CLI and terminal concerns; everything here is plain
//! synchronous library code over an immutable, fully in-memory index.

pub mod bm25;
pub mod booland;
pub mod builder;
pub mod eval;
pub mod index;
pub mod persist;
pub mod run;
pub mod sgml;
pub mod snippet;
pub mod text;

pub use error::Error;
pub use index::{DocId, DocMeta, Index, Lexicon, Posting, TermId};

/// Library-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

mod error {
    /// Errors for indexing, retrieval and evaluation.
    ///
    /// Every phase is all-or-nothing: callers treat any of these as fatal for
    /// the phase that produced it. Out-of-vocabulary query terms and empty
    /// result sets are not errors and never surface here.
    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        /// Underlying file or stream failure.
        #[error("i/o error: {0}")]
        Io(#[from] std::io::Error),
        /// A `<DOC>` record that cannot be indexed.
        #[error("malformed record: {0}")]
        MalformedRecord(String),
        /// A run-file line violating the `topicId Q0 docno rank score tag` format.
        #[error("malformed result line: {0}")]
        MalformedResultLine(String),
        /// A qrels line violating the `topicId iter docno judgment` format.
        #[error("malformed qrel: {0}")]
        MalformedQrel(String),
        /// A topic file without alternating id and query lines.
        #[error("malformed queries file: {0}")]
        MalformedQueries(String),
        /// A persisted map that cannot be decoded (or encoded) as written.
        #[error("corrupt index file '{file}': {source}")]
        Corrupt {
            file: String,
            source: bincode::Error,
        },
        /// A run-file docno absent from the indexed collection.
        #[error("docno '{0}' is not in the index")]
        UnknownDocno(String),
    }
}
