//! TREC run files and topic files.
//!
//! A run file carries one result per line, `topicId Q0 docno rank score
//! runTag`, single-space separated. A topics file alternates a topic-id line
//! with a free-text query line.

use crate::{Error, Result};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Run tag written by the BM25 engine.
pub const BM25_RUN_TAG: &str = "BM25";
/// Run tag written by the Boolean-AND engine.
pub const BOOLEAN_AND_RUN_TAG: &str = "booleanAND";

const Q0: &str = "Q0";
const RESULT_FIELDS: usize = 6;
const DOCNO_LENGTH: usize = 13;

/// One line of a run file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultLine {
    pub topic_id: u32,
    pub docno: String,
    pub rank: u32,
    pub score: f64,
    pub run_tag: String,
}

impl ResultLine {
    /// Strict parse: exactly six fields, integer topic id and rank, the
    /// literal `Q0`, a 13-char docno, a float score and a non-empty tag.
    pub fn parse(line: &str) -> Result<Self> {
        let bad = |reason: &str| Error::MalformedResultLine(format!("{reason}: '{line}'"));

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != RESULT_FIELDS {
            return Err(bad("expected 6 fields"));
        }
        let topic_id = fields[0]
            .parse::<u32>()
            .map_err(|_| bad("topic id is not an integer"))?;
        if fields[1] != Q0 {
            return Err(bad("second field is not Q0"));
        }
        let docno = fields[2];
        if docno.len() != DOCNO_LENGTH {
            return Err(bad("docno is not 13 characters"));
        }
        let rank = fields[3]
            .parse::<u32>()
            .map_err(|_| bad("rank is not an integer"))?;
        let score = fields[4]
            .parse::<f64>()
            .map_err(|_| bad("score is not a number"))?;
        let run_tag = fields[5];
        if run_tag.is_empty() {
            return Err(bad("run tag is empty"));
        }
        Ok(Self {
            topic_id,
            docno: docno.to_owned(),
            rank,
            score,
            run_tag: run_tag.to_owned(),
        })
    }
}

impl fmt::Display for ResultLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {Q0} {} {} {} {}",
            self.topic_id, self.docno, self.rank, self.score, self.run_tag
        )
    }
}

/// One ad-hoc topic: an id and its free-text query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: u32,
    pub query: String,
}

/// Read a topics file: pairs of lines, id then query, both trimmed.
pub fn read_topics(path: &Path) -> Result<Vec<Topic>> {
    let mut lines = BufReader::new(File::open(path)?).lines();
    let mut topics = Vec::new();
    while let Some(id_line) = lines.next() {
        let id_line = id_line?;
        let raw_id = id_line.trim();
        let id = raw_id
            .parse::<u32>()
            .map_err(|_| Error::MalformedQueries(format!("'{raw_id}' is not a topic id")))?;
        let query = lines
            .next()
            .transpose()?
            .ok_or_else(|| Error::MalformedQueries(format!("topic {id} has no query line")))?
            .trim()
            .to_owned();
        topics.push(Topic { id, query });
    }
    Ok(topics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn round_trips_a_result_line() {
        let line = ResultLine {
            topic_id: 401,
            docno: "LA010189-0001".to_owned(),
            rank: 1,
            score: 4.75,
            run_tag: BM25_RUN_TAG.to_owned(),
        };
        let rendered = line.to_string();
        assert_eq!(rendered, "401 Q0 LA010189-0001 1 4.75 BM25");
        assert_eq!(ResultLine::parse(&rendered).unwrap(), line);
    }

    #[test]
    fn integer_scores_render_without_fraction() {
        let line = ResultLine {
            topic_id: 402,
            docno: "LA010189-0002".to_owned(),
            rank: 2,
            score: 3.0,
            run_tag: BOOLEAN_AND_RUN_TAG.to_owned(),
        };
        assert_eq!(line.to_string(), "402 Q0 LA010189-0002 2 3 booleanAND");
    }

    #[test]
    fn rejects_structural_violations() {
        for bad in [
            "401 Q0 LA010189-0001 1 4.75",            // five fields
            "401 Q0 LA010189-0001 1 4.75 BM25 extra", // seven fields
            "foo Q0 LA010189-0001 1 4.75 BM25",       // topic id
            "401 QX LA010189-0001 1 4.75 BM25",       // Q0 literal
            "401 Q0 SHORT 1 4.75 BM25",               // docno length
            "401 Q0 LA010189-0001 one 4.75 BM25",     // rank
            "401 Q0 LA010189-0001 1 high BM25",       // score
        ] {
            assert!(
                matches!(ResultLine::parse(bad), Err(Error::MalformedResultLine(_))),
                "accepted: {bad}"
            );
        }
    }

    #[test]
    fn reads_topic_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queries.txt");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "401").unwrap();
        writeln!(f, "  foreign minorities Germany  ").unwrap();
        writeln!(f, "402").unwrap();
        writeln!(f, "behavioral genetics").unwrap();
        drop(f);

        let topics = read_topics(&path).unwrap();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].id, 401);
        assert_eq!(topics[0].query, "foreign minorities Germany");
        assert_eq!(topics[1].id, 402);
    }

    #[test]
    fn rejects_a_dangling_topic_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queries.txt");
        std::fs::write(&path, "401\n").unwrap();
        assert!(matches!(
            read_topics(&path),
            Err(Error::MalformedQueries(_))
        ));
    }
}
