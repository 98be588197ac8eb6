//! Okapi BM25 with a per-query accumulator, scored term-at-a-time.

use crate::index::{DocId, Index};
use crate::text;
use std::collections::HashMap;

/// How many results a ranked list is truncated to.
pub const MAX_RESULTS: usize = 1000;

/// BM25 parameters.
#[derive(Debug, Clone, Copy)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Document-length normalization.
    pub b: f64,
    /// Query-term-frequency saturation.
    pub k2: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: 1.2,
            b: 0.75,
            k2: 7.0,
        }
    }
}

/// One scored document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedDoc {
    pub doc_id: DocId,
    pub score: f64,
}

/// Tokenize, stem and score `query`, returning at most [`MAX_RESULTS`]
/// documents in descending score order.
pub fn retrieve(index: &Index, query: &str, params: Bm25Params) -> Vec<RankedDoc> {
    score_terms(index, &text::analyze(query), params)
}

/// Score already-analyzed query tokens.
///
/// Terms are processed one at a time: each term walks its postings list and
/// adds its contribution into a docid-keyed accumulator, so a document's
/// final score is the sum over the distinct query terms it contains. The
/// ranking sorts by score descending with ascending doc id as the tie-break,
/// which keeps the output byte-stable across runs.
pub fn score_terms(index: &Index, stemmed_tokens: &[String], params: Bm25Params) -> Vec<RankedDoc> {
    let query_counts = index.query_term_counts(stemmed_tokens);
    let term_ids = index.query_term_ids(stemmed_tokens);

    let num_docs = index.num_docs();
    let avg_doc_length = index.avg_doc_length();

    let mut accumulator: HashMap<DocId, f64> = HashMap::new();
    for term_id in term_ids {
        let query_frequency = query_counts[&term_id];
        let postings = index.postings(term_id);
        let containing_docs = postings.len() as f64;
        for posting in postings {
            let contribution = score_one(
                posting.count,
                f64::from(index.doc_length(posting.doc_id)),
                query_frequency,
                containing_docs,
                avg_doc_length,
                num_docs,
                params,
            );
            *accumulator.entry(posting.doc_id).or_insert(0.0) += contribution;
        }
    }

    let mut ranked: Vec<RankedDoc> = accumulator
        .into_iter()
        .map(|(doc_id, score)| RankedDoc { doc_id, score })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
    ranked.truncate(MAX_RESULTS);
    ranked
}

/// One (term, document) contribution. The idf factor goes negative for terms
/// in more than half the collection; that is part of the model and is not
/// clipped.
fn score_one(
    frequency_in_doc: u32,
    doc_length: f64,
    frequency_in_query: u32,
    containing_docs: f64,
    avg_doc_length: f64,
    num_docs: u32,
    params: Bm25Params,
) -> f64 {
    let k = params.k1 * ((1.0 - params.b) + params.b * (doc_length / avg_doc_length));
    let tf = ((params.k1 + 1.0) * f64::from(frequency_in_doc)) / (k + f64::from(frequency_in_doc));
    let qtf = ((params.k2 + 1.0) * f64::from(frequency_in_query))
        / (params.k2 + f64::from(frequency_in_query));
    let idf = ((f64::from(num_docs) - containing_docs + 0.5) / (containing_docs + 0.5)).ln();
    tf * qtf * idf
}
