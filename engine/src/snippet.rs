//! Query-biased snippet extraction for the SERP.

use crate::text;
use std::collections::HashSet;

/// Sentences shorter than this many whitespace-separated words are noise
/// (datelines, bylines, stray abbreviations) and are discarded.
const MIN_SENTENCE_WORDS: usize = 5;
/// How many top sentences make up a snippet.
const SNIPPET_SENTENCES: usize = 2;

struct ScoredSentence<'a> {
    original: &'a str,
    score: u32,
}

/// Build a snippet of at most two sentences from `doc_text`, biased toward
/// the stemmed query tokens.
///
/// Each kept sentence is scored `l + c + d + k`: a lead bonus (2 for the
/// first kept sentence, 1 for the second), total query-term occurrences,
/// distinct query terms present, and the longest contiguous run of
/// query-term tokens. The two best sentences, in score order with ties kept
/// in document order, are joined with a single space.
pub fn query_biased_snippet(doc_text: &str, query_tokens: &[String]) -> String {
    let query_set: HashSet<&str> = query_tokens.iter().map(String::as_str).collect();

    let mut sentences: Vec<ScoredSentence> = Vec::new();
    for (position, original) in segment(doc_text).into_iter().enumerate() {
        let lead = match position {
            0 => 2,
            1 => 1,
            _ => 0,
        };
        let tokens = text::analyze(original);
        let occurrences = tokens.iter().filter(|t| query_set.contains(t.as_str())).count() as u32;
        let distinct = tokens
            .iter()
            .filter(|t| query_set.contains(t.as_str()))
            .collect::<HashSet<_>>()
            .len() as u32;
        let run = longest_run(&tokens, &query_set);
        sentences.push(ScoredSentence {
            original,
            score: lead + occurrences + distinct + run,
        });
    }

    sentences.sort_by(|a, b| b.score.cmp(&a.score));
    let picked: Vec<&str> = sentences
        .iter()
        .take(SNIPPET_SENTENCES)
        .map(|s| s.original)
        .collect();
    picked.join(" ")
}

/// Split on `.`, `!`, `?` (terminator kept with its sentence), trim, and
/// drop sentences below the word threshold. Text after the last terminator
/// is not a sentence and is dropped.
fn segment(doc_text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for (pos, ch) in doc_text.char_indices() {
        if matches!(ch, '.' | '!' | '?') {
            let sentence = doc_text[start..=pos].trim();
            if sentence.split_whitespace().count() >= MIN_SENTENCE_WORDS {
                sentences.push(sentence);
            }
            start = pos + 1;
        }
    }
    sentences
}

/// Longest contiguous run of tokens that are all query terms.
fn longest_run(tokens: &[String], query_set: &HashSet<&str>) -> u32 {
    let mut longest = 0;
    let mut current = 0;
    for token in tokens {
        if query_set.contains(token.as_str()) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
