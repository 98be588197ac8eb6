//! On-disk layout of an index directory and typed save/load for each part.
//!
//! ```text
//! <index_dir>/MM/DD/YY/<docno>.txt   raw record, verbatim
//! <index_dir>/metadata.txt           Vec<DocMeta>, bincode
//! <index_dir>/lexicon.txt            HashMap<String, TermId>, bincode
//! <index_dir>/invertedIndex.txt      Vec<PostingsList>, bincode
//! ```

use crate::index::{DocMeta, Index, Lexicon, PostingsList};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const METADATA_FILE_NAME: &str = "metadata.txt";
const LEXICON_FILE_NAME: &str = "lexicon.txt";
const INVERTED_INDEX_FILE_NAME: &str = "invertedIndex.txt";

/// Paths inside one index directory.
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn metadata(&self) -> PathBuf {
        self.root.join(METADATA_FILE_NAME)
    }

    fn lexicon(&self) -> PathBuf {
        self.root.join(LEXICON_FILE_NAME)
    }

    fn inverted_index(&self) -> PathBuf {
        self.root.join(INVERTED_INDEX_FILE_NAME)
    }

    /// Directory a document's raw record lives in, partitioned by its
    /// `MMDDYY` date as `MM/DD/YY`.
    fn day_dir(&self, date: &str) -> PathBuf {
        self.root
            .join(&date[0..2])
            .join(&date[2..4])
            .join(&date[4..6])
    }

    /// Full path of a stored document.
    pub fn document(&self, date: &str, docno: &str) -> PathBuf {
        self.day_dir(date).join(format!("{docno}.txt"))
    }
}

fn save<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let bytes = bincode::serialize(value).map_err(|source| Error::Corrupt {
        file: path.display().to_string(),
        source,
    })?;
    let mut f = File::create(path)?;
    f.write_all(&bytes)?;
    Ok(())
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut buf = Vec::new();
    File::open(path)?.read_to_end(&mut buf)?;
    bincode::deserialize(&buf).map_err(|source| Error::Corrupt {
        file: path.display().to_string(),
        source,
    })
}

pub fn save_metadata(paths: &IndexPaths, metadata: &Vec<DocMeta>) -> Result<()> {
    save(metadata, &paths.metadata())
}

pub fn load_metadata(paths: &IndexPaths) -> Result<Vec<DocMeta>> {
    load(&paths.metadata())
}

pub fn save_lexicon(paths: &IndexPaths, lexicon: &Lexicon) -> Result<()> {
    save(lexicon, &paths.lexicon())
}

pub fn load_lexicon(paths: &IndexPaths) -> Result<Lexicon> {
    load(&paths.lexicon())
}

pub fn save_postings(paths: &IndexPaths, postings: &Vec<PostingsList>) -> Result<()> {
    save(postings, &paths.inverted_index())
}

pub fn load_postings(paths: &IndexPaths) -> Result<Vec<PostingsList>> {
    load(&paths.inverted_index())
}

/// Write one raw record verbatim into the date-partitioned store.
pub fn store_document(paths: &IndexPaths, date: &str, docno: &str, record: &str) -> Result<()> {
    let dir = paths.day_dir(date);
    fs::create_dir_all(&dir)?;
    fs::write(paths.document(date, docno), record)?;
    Ok(())
}

/// Read one stored record back.
pub fn load_document(paths: &IndexPaths, date: &str, docno: &str) -> Result<String> {
    Ok(fs::read_to_string(paths.document(date, docno))?)
}

/// Load the three persisted containers and assemble a queryable [`Index`].
pub fn load_index(paths: &IndexPaths) -> Result<Index> {
    let metadata = load_metadata(paths)?;
    let lexicon = load_lexicon(paths)?;
    let postings = load_postings(paths)?;
    let index = Index::new(metadata, lexicon, postings);
    tracing::debug!(
        num_docs = index.num_docs(),
        num_terms = index.num_terms(),
        "index loaded"
    );
    Ok(index)
}
