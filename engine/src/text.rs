//! Tokenization and stemming shared by indexing, querying and snippets.

use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"[a-z0-9]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// Split `text` into tokens: ASCII-lowercase, then take maximal runs of
/// ASCII letters and digits. Everything else, including non-ASCII letters,
/// is a separator and is discarded.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_ascii_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// Stem one already lower-cased token.
pub fn stem(token: &str) -> String {
    STEMMER.stem(token).into_owned()
}

/// Tokenize then stem: the analysis applied to document text and queries.
pub fn analyze(text: &str) -> Vec<String> {
    tokenize(text).iter().map(|t| stem(t)).collect()
}

/// Render a compact `MMDDYY` date as `MM/DD/YY`.
pub fn format_date(raw: &str) -> String {
    format!("{}/{}/{}", &raw[0..2], &raw[2..4], &raw[4..6])
}
