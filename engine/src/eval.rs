//! Batch effectiveness measures: AP, P@10, NDCG@10, NDCG@1000 and
//! Time-Biased Gain, scored from a qrels file and a TREC run file.

use crate::index::DocMeta;
use crate::run::ResultLine;
use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// First and last ad-hoc topic ids reported by the evaluator.
pub const FIRST_TOPIC: u32 = 401;
pub const LAST_TOPIC: u32 = 450;
/// Topics in the range with no qrels; they are left out of the report.
pub const SKIPPED_TOPICS: [u32; 5] = [416, 423, 437, 444, 447];

// Time-biased gain user model.
const P_CLICK_RELEVANT: f64 = 0.64;
const P_CLICK_NON_RELEVANT: f64 = 0.39;
const P_SAVE_RELEVANT: f64 = 0.77;
const TIME_TO_EVAL_SUMMARY: f64 = 4.4;
const HALF_LIFE: f64 = 224.0;

/// Per-topic relevant docno sets, from judgments > 0.
pub type Qrels = HashMap<u32, HashSet<String>>;

/// All measures for one topic.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TopicMeasures {
    pub average_precision: f64,
    pub precision_at_10: f64,
    pub ndcg_at_10: f64,
    pub ndcg_at_1000: f64,
    pub time_biased_gain: f64,
}

/// Topic ids the report table covers, in order.
pub fn report_topics() -> impl Iterator<Item = u32> {
    (FIRST_TOPIC..=LAST_TOPIC).filter(|id| !SKIPPED_TOPICS.contains(id))
}

/// Parse a qrels file of whitespace-separated `topicId iter docno judgment`
/// lines. Only positive judgments contribute to the relevant sets.
pub fn read_qrels(path: &Path) -> Result<Qrels> {
    let mut qrels = Qrels::new();
    for line in BufReader::new(File::open(path)?).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let bad = |reason: &str| Error::MalformedQrel(format!("{reason}: '{line}'"));
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(bad("expected 4 fields"));
        }
        let topic_id = fields[0]
            .parse::<u32>()
            .map_err(|_| bad("topic id is not an integer"))?;
        let docno = fields[2];
        let judgment = fields[3]
            .parse::<i32>()
            .map_err(|_| bad("judgment is not an integer"))?;
        if judgment > 0 {
            qrels.entry(topic_id).or_default().insert(docno.to_owned());
        }
    }
    Ok(qrels)
}

/// Parse a run file and group its lines by topic, keeping file order within
/// each topic. Every line is validated; any violation is fatal.
pub fn read_run(path: &Path) -> Result<BTreeMap<u32, Vec<ResultLine>>> {
    let mut by_topic: BTreeMap<u32, Vec<ResultLine>> = BTreeMap::new();
    for line in BufReader::new(File::open(path)?).lines() {
        let parsed = ResultLine::parse(&line?)?;
        by_topic.entry(parsed.topic_id).or_default().push(parsed);
    }
    Ok(by_topic)
}

/// Score a grouped run against qrels.
///
/// The rank field in the file is not trusted: each topic's results are
/// re-sorted by score descending (stable, so file order breaks ties) before
/// any measure is computed. Topics absent from the qrels are skipped.
pub fn evaluate(
    metadata: &[DocMeta],
    qrels: &Qrels,
    run: &BTreeMap<u32, Vec<ResultLine>>,
) -> Result<HashMap<u32, TopicMeasures>> {
    let doc_lengths: HashMap<&str, u32> = metadata
        .iter()
        .map(|m| (m.docno.as_str(), m.length))
        .collect();

    let mut measures = HashMap::new();
    for (&topic_id, results) in run {
        let Some(relevant) = qrels.get(&topic_id) else {
            continue;
        };
        let mut ranked = results.clone();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        let lengths = ranked
            .iter()
            .map(|r| {
                doc_lengths
                    .get(r.docno.as_str())
                    .copied()
                    .ok_or_else(|| Error::UnknownDocno(r.docno.clone()))
            })
            .collect::<Result<Vec<u32>>>()?;

        measures.insert(
            topic_id,
            TopicMeasures {
                average_precision: average_precision(&ranked, relevant),
                precision_at_10: precision_at_10(&ranked, relevant),
                ndcg_at_10: ndcg_at(10, &ranked, relevant),
                ndcg_at_1000: ndcg_at(1000, &ranked, relevant),
                time_biased_gain: time_biased_gain(&ranked, relevant, &lengths),
            },
        );
    }
    Ok(measures)
}

/// Mean of precision@i over the ranks holding relevant documents, divided by
/// the total number of relevant documents for the topic.
pub fn average_precision(ranked: &[ResultLine], relevant: &HashSet<String>) -> f64 {
    let mut relevant_seen = 0u32;
    let mut sum = 0.0;
    for (i, result) in ranked.iter().enumerate() {
        if relevant.contains(&result.docno) {
            relevant_seen += 1;
            sum += f64::from(relevant_seen) / (i + 1) as f64;
        }
    }
    sum / relevant.len() as f64
}

/// Fraction of the first ten ranks holding relevant documents.
pub fn precision_at_10(ranked: &[ResultLine], relevant: &HashSet<String>) -> f64 {
    let hits = ranked
        .iter()
        .take(10)
        .filter(|r| relevant.contains(&r.docno))
        .count();
    hits as f64 / 10.0
}

/// Binary-gain NDCG at cutoff `n`, normalized by the DCG of an ideal ranking
/// that fronts all relevant documents.
pub fn ndcg_at(n: usize, ranked: &[ResultLine], relevant: &HashSet<String>) -> f64 {
    let mut dcg = 0.0;
    for (i, result) in ranked.iter().take(n).enumerate() {
        if relevant.contains(&result.docno) {
            dcg += 1.0 / ((i + 2) as f64).log2();
        }
    }
    dcg / idcg_at(n, relevant.len())
}

fn idcg_at(n: usize, num_relevant: usize) -> f64 {
    (0..num_relevant.min(n))
        .map(|i| 1.0 / ((i + 2) as f64).log2())
        .sum()
}

/// Time-biased gain with a document-length-dependent reading-time model.
///
/// Each relevant document at rank `k` contributes its expected gain decayed
/// by the time a user needs to reach rank `k`, where reading time for an
/// earlier document is `0.018 * length + 7.8` seconds weighted by the
/// probability it was clicked. `lengths[i]` is the indexed token count of
/// `ranked[i]`'s document.
pub fn time_biased_gain(
    ranked: &[ResultLine],
    relevant: &HashSet<String>,
    lengths: &[u32],
) -> f64 {
    let gain = P_CLICK_RELEVANT * P_SAVE_RELEVANT;
    let mut tbg = 0.0;
    let mut elapsed = 0.0;
    for (i, result) in ranked.iter().enumerate() {
        let is_relevant = relevant.contains(&result.docno);
        if is_relevant {
            tbg += gain * (-elapsed * 2f64.ln() / HALF_LIFE).exp();
        }
        let p_click = if is_relevant {
            P_CLICK_RELEVANT
        } else {
            P_CLICK_NON_RELEVANT
        };
        let read_time = 0.018 * f64::from(lengths[i]) + 7.8;
        elapsed += TIME_TO_EVAL_SUMMARY + read_time * p_click;
    }
    tbg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(topic_id: u32, docno: &str, rank: u32, score: f64) -> ResultLine {
        ResultLine {
            topic_id,
            docno: docno.to_owned(),
            rank,
            score,
            run_tag: "test".to_owned(),
        }
    }

    fn docnos(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn ranked(names: &[&str]) -> Vec<ResultLine> {
        names
            .iter()
            .enumerate()
            .map(|(i, d)| line(401, d, i as u32 + 1, 100.0 - i as f64))
            .collect()
    }

    #[test]
    fn worked_example_matches_hand_calculation() {
        // Relevant {A, B}; returned [A, X, B, Y].
        let relevant = docnos(&["LA010189-000A", "LA010189-000B"]);
        let run = ranked(&[
            "LA010189-000A",
            "LA010189-000X",
            "LA010189-000B",
            "LA010189-000Y",
        ]);

        let ap = average_precision(&run, &relevant);
        assert!((ap - (1.0 + 2.0 / 3.0) / 2.0).abs() < 1e-12);

        assert!((precision_at_10(&run, &relevant) - 0.2).abs() < 1e-12);

        let dcg = 1.0 / 2f64.log2() + 1.0 / 4f64.log2();
        let idcg = 1.0 / 2f64.log2() + 1.0 / 3f64.log2();
        assert!((ndcg_at(10, &run, &relevant) - dcg / idcg).abs() < 1e-12);
    }

    #[test]
    fn perfect_ranking_has_unit_ndcg() {
        let relevant = docnos(&["LA010189-000A", "LA010189-000B"]);
        let run = ranked(&["LA010189-000A", "LA010189-000B", "LA010189-000X"]);
        assert!((ndcg_at(10, &run, &relevant) - 1.0).abs() < 1e-12);
        assert!((ndcg_at(1000, &run, &relevant) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn first_rank_relevant_doc_gets_undecayed_gain() {
        let relevant = docnos(&["LA010189-000A"]);
        let run = ranked(&["LA010189-000A"]);
        let tbg = time_biased_gain(&run, &relevant, &[100]);
        assert!((tbg - 0.64 * 0.77).abs() < 1e-12);
    }

    #[test]
    fn earlier_documents_decay_later_gains() {
        let relevant = docnos(&["LA010189-000B"]);
        let run = ranked(&["LA010189-000X", "LA010189-000B"]);
        // One non-relevant doc of length 100 is inspected first.
        let t1 = 4.4 + (0.018 * 100.0 + 7.8) * 0.39;
        let expected = 0.64 * 0.77 * (-t1 * 2f64.ln() / 224.0).exp();
        let tbg = time_biased_gain(&run, &relevant, &[100, 50]);
        assert!((tbg - expected).abs() < 1e-12);
    }

    #[test]
    fn evaluate_resorts_by_score_and_skips_unjudged_topics() {
        let metadata = vec![
            DocMeta {
                docno: "LA010189-000A".to_owned(),
                headline: String::new(),
                date: "010189".to_owned(),
                length: 10,
            },
            DocMeta {
                docno: "LA010189-000B".to_owned(),
                headline: String::new(),
                date: "010189".to_owned(),
                length: 20,
            },
        ];
        let mut qrels = Qrels::new();
        qrels.insert(401, docnos(&["LA010189-000A"]));

        // Rank fields lie: the relevant doc carries the higher score.
        let mut run = BTreeMap::new();
        run.insert(
            401,
            vec![
                line(401, "LA010189-000B", 1, 1.0),
                line(401, "LA010189-000A", 2, 9.0),
            ],
        );
        run.insert(999, vec![line(999, "LA010189-000B", 1, 1.0)]);

        let measures = evaluate(&metadata, &qrels, &run).unwrap();
        assert_eq!(measures.len(), 1);
        let m = &measures[&401];
        assert!((m.average_precision - 1.0).abs() < 1e-12);
        assert!((m.precision_at_10 - 0.1).abs() < 1e-12);
    }

    #[test]
    fn unknown_docno_in_run_is_fatal() {
        let metadata: Vec<DocMeta> = Vec::new();
        let mut qrels = Qrels::new();
        qrels.insert(401, docnos(&["LA010189-000A"]));
        let mut run = BTreeMap::new();
        run.insert(401, vec![line(401, "LA010189-000A", 1, 1.0)]);
        assert!(matches!(
            evaluate(&metadata, &qrels, &run),
            Err(Error::UnknownDocno(_))
        ));
    }

    #[test]
    fn report_covers_the_fixed_range_minus_skips() {
        let topics: Vec<u32> = report_topics().collect();
        assert_eq!(topics.len(), 45);
        assert_eq!(topics.first(), Some(&401));
        assert_eq!(topics.last(), Some(&450));
        for skipped in SKIPPED_TOPICS {
            assert!(!topics.contains(&skipped));
        }
    }
}
