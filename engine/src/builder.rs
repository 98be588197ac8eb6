//! Whole-corpus index construction.

use crate::index::{DocId, DocMeta, Lexicon, Posting, PostingsList, TermId};
use crate::persist::{self, IndexPaths};
use crate::{sgml, text, Error, Result};
use std::collections::HashMap;
use std::fs;

/// Owns the growing maps for one build and the index directory they are
/// serialized into. Created at phase start, consumed by [`finish`].
///
/// Records must be pushed in collection order: internal ids are assigned
/// densely as records arrive, which is what keeps every postings list
/// ascending without a sort.
///
/// [`finish`]: IndexBuilder::finish
pub struct IndexBuilder {
    paths: IndexPaths,
    metadata: Vec<DocMeta>,
    lexicon: Lexicon,
    postings: Vec<PostingsList>,
}

impl IndexBuilder {
    /// Create the index directory and an empty builder. The directory must
    /// not already exist; a stale index is never overwritten in place.
    pub fn create(paths: IndexPaths) -> Result<Self> {
        if paths.root.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("index directory '{}' already exists", paths.root.display()),
            )));
        }
        fs::create_dir_all(&paths.root)?;
        Ok(Self {
            paths,
            metadata: Vec::new(),
            lexicon: Lexicon::new(),
            postings: Vec::new(),
        })
    }

    /// Index one raw record: parse, tokenize, stem, grow the lexicon and
    /// postings, store the raw bytes, record the metadata.
    pub fn push_record(&mut self, record: &str) -> Result<DocId> {
        let doc = sgml::parse_record(record)?;
        let internal_id = self.metadata.len() as DocId;

        let tokens = text::analyze(&doc.text);
        let length = tokens.len() as u32;

        let mut counts: HashMap<TermId, u32> = HashMap::new();
        for token in tokens {
            let next = self.lexicon.len() as TermId;
            let term_id = *self.lexicon.entry(token).or_insert(next);
            if term_id == next {
                self.postings.push(PostingsList::new());
            }
            *counts.entry(term_id).or_insert(0) += 1;
        }
        for (term_id, count) in counts {
            self.postings[term_id as usize].push(Posting {
                doc_id: internal_id,
                count,
            });
        }

        persist::store_document(&self.paths, doc.date(), &doc.docno, record)?;

        let date = doc.date().to_owned();
        self.metadata.push(DocMeta {
            docno: doc.docno,
            headline: doc.headline,
            date,
            length,
        });
        Ok(internal_id)
    }

    pub fn num_docs(&self) -> u32 {
        self.metadata.len() as u32
    }

    pub fn num_terms(&self) -> u32 {
        self.lexicon.len() as u32
    }

    /// Serialize the three maps into the index directory.
    pub fn finish(self) -> Result<()> {
        persist::save_metadata(&self.paths, &self.metadata)?;
        persist::save_lexicon(&self.paths, &self.lexicon)?;
        persist::save_postings(&self.paths, &self.postings)?;
        tracing::debug!(
            num_docs = self.metadata.len(),
            num_terms = self.lexicon.len(),
            "index serialized"
        );
        Ok(())
    }
}
