//! Unranked Boolean conjunction over ascending postings.

use crate::index::{DocId, Index, Posting};
use crate::text;

/// Documents containing every in-lexicon stemmed term of `query`, in
/// ascending internal-id order. Out-of-vocabulary terms are dropped before
/// intersecting, so they never force an empty result on their own.
pub fn retrieve(index: &Index, query: &str) -> Vec<DocId> {
    let stemmed = text::analyze(query);
    let term_ids = index.query_term_ids(&stemmed);

    let Some((&first, rest)) = term_ids.split_first() else {
        return Vec::new();
    };
    let mut matched: Vec<DocId> = index.postings(first).iter().map(|p| p.doc_id).collect();
    for &term_id in rest {
        matched = intersect(&matched, index.postings(term_id));
        if matched.is_empty() {
            break;
        }
    }
    matched
}

/// Two-pointer march over two ascending id sequences.
fn intersect(matched: &[DocId], postings: &[Posting]) -> Vec<DocId> {
    let mut out = Vec::new();
    let mut i = 0;
    let mut j = 0;
    while i < matched.len() && j < postings.len() {
        let a = matched[i];
        let b = postings[j].doc_id;
        if a == b {
            out.push(a);
            i += 1;
            j += 1;
        } else if a < b {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}
