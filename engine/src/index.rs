//! The in-memory index: three dense containers plus lookups derived on load.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dense document number assigned in collection order, starting at 0.
pub type DocId = u32;
/// Dense token id assigned in first-seen order, starting at 0.
pub type TermId = u32;

/// Mapping from a stemmed, lower-cased token to its id.
pub type Lexicon = HashMap<String, TermId>;

/// Per-document metadata, keyed positionally by [`DocId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMeta {
    /// TREC document identifier, 13 chars, date embedded at `[2..8]`.
    pub docno: String,
    /// Display headline, possibly empty.
    pub headline: String,
    /// `MMDDYY`, copied out of the docno.
    pub date: String,
    /// Token count of the document's extracted text.
    pub length: u32,
}

/// One postings entry: a document and the term's frequency within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub count: u32,
}

/// A term's postings, strictly ascending by `doc_id`.
pub type PostingsList = Vec<Posting>;

/// A loaded, immutable index. Retrieval engines borrow it read-only.
pub struct Index {
    metadata: Vec<DocMeta>,
    lexicon: Lexicon,
    postings: Vec<PostingsList>,
    docno_to_id: HashMap<String, DocId>,
    avg_doc_length: f64,
}

impl Index {
    /// Assemble an index from its three persisted containers, deriving the
    /// docno lookup and the collection's average document length.
    pub fn new(metadata: Vec<DocMeta>, lexicon: Lexicon, postings: Vec<PostingsList>) -> Self {
        let docno_to_id = metadata
            .iter()
            .enumerate()
            .map(|(id, meta)| (meta.docno.clone(), id as DocId))
            .collect();
        let avg_doc_length = if metadata.is_empty() {
            0.0
        } else {
            metadata.iter().map(|m| f64::from(m.length)).sum::<f64>() / metadata.len() as f64
        };
        Self {
            metadata,
            lexicon,
            postings,
            docno_to_id,
            avg_doc_length,
        }
    }

    pub fn num_docs(&self) -> u32 {
        self.metadata.len() as u32
    }

    pub fn num_terms(&self) -> u32 {
        self.lexicon.len() as u32
    }

    pub fn avg_doc_length(&self) -> f64 {
        self.avg_doc_length
    }

    pub fn meta(&self, doc_id: DocId) -> &DocMeta {
        &self.metadata[doc_id as usize]
    }

    pub fn doc_length(&self, doc_id: DocId) -> u32 {
        self.metadata[doc_id as usize].length
    }

    pub fn doc_id(&self, docno: &str) -> Option<DocId> {
        self.docno_to_id.get(docno).copied()
    }

    pub fn term_id(&self, token: &str) -> Option<TermId> {
        self.lexicon.get(token).copied()
    }

    pub fn postings(&self, term_id: TermId) -> &[Posting] {
        &self.postings[term_id as usize]
    }

    /// Distinct query term ids in first-appearance order. Tokens absent from
    /// the lexicon are dropped, not treated as matches-nothing.
    pub fn query_term_ids(&self, stemmed_tokens: &[String]) -> Vec<TermId> {
        let mut ids = Vec::new();
        for token in stemmed_tokens {
            if let Some(id) = self.term_id(token) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    /// In-lexicon query term frequencies.
    pub fn query_term_counts(&self, stemmed_tokens: &[String]) -> HashMap<TermId, u32> {
        let mut counts = HashMap::new();
        for token in stemmed_tokens {
            if let Some(id) = self.term_id(token) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(docno: &str, length: u32) -> DocMeta {
        DocMeta {
            docno: docno.to_owned(),
            headline: String::new(),
            date: docno[2..8].to_owned(),
            length,
        }
    }

    fn tiny_index() -> Index {
        let lexicon: Lexicon = [("fox".to_owned(), 0), ("dog".to_owned(), 1)].into();
        let postings = vec![
            vec![Posting { doc_id: 0, count: 2 }],
            vec![
                Posting { doc_id: 0, count: 1 },
                Posting { doc_id: 1, count: 3 },
            ],
        ];
        Index::new(
            vec![meta("LA010189-0001", 10), meta("LA010289-0001", 30)],
            lexicon,
            postings,
        )
    }

    #[test]
    fn derives_average_length_and_docno_lookup() {
        let index = tiny_index();
        assert_eq!(index.num_docs(), 2);
        assert!((index.avg_doc_length() - 20.0).abs() < f64::EPSILON);
        assert_eq!(index.doc_id("LA010289-0001"), Some(1));
        assert_eq!(index.doc_id("LA999999-9999"), None);
    }

    #[test]
    fn query_lookups_drop_oov_and_deduplicate() {
        let index = tiny_index();
        let tokens: Vec<String> = ["fox", "unicorn", "dog", "fox"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(index.query_term_ids(&tokens), vec![0, 1]);
        let counts = index.query_term_counts(&tokens);
        assert_eq!(counts[&0], 2);
        assert_eq!(counts[&1], 1);
        assert_eq!(counts.len(), 2);
    }
}
