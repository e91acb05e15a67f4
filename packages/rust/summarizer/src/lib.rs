//! Deterministic extractive summarization.
//!
//! Sentences are scored by term-frequency density: the corpus-wide frequency
//! of each of their long words (more than three characters), divided by the
//! sentence's total word count. The best-scoring sentences are returned in
//! their original order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use docdesk_shared::{DocdeskError, Result};

/// Words at or below this length never contribute to a score.
const MIN_SCORED_WORD_LEN: usize = 3;

/// Sentence terminator followed by the whitespace that separates sentences.
static BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("boundary regex"));

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_]+").expect("word regex"));

/// Score of one sentence within a single summarization call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentenceScore {
    pub index: usize,
    pub score: f64,
}

/// Summarize `text` down to at most `max_sentences` sentences.
///
/// Fails with [`DocdeskError::InvalidArgument`] when `text` is blank or
/// `max_sentences` is zero.
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn summarize(text: &str, max_sentences: usize) -> Result<String> {
    if text.trim().is_empty() {
        return Err(DocdeskError::invalid_argument("Text cannot be empty"));
    }
    if max_sentences < 1 {
        return Err(DocdeskError::invalid_argument(
            "max_sentences must be at least 1",
        ));
    }

    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return Ok(text.to_string());
    }

    let frequencies = word_frequencies(text);
    let mut scores: Vec<SentenceScore> = sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| SentenceScore {
            index,
            score: score_sentence(sentence, &frequencies),
        })
        .collect();

    // Highest score first; equal scores keep their original order.
    scores.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.index.cmp(&b.index))
    });
    scores.truncate(max_sentences);
    scores.sort_by_key(|s| s.index);

    let summary = scores
        .iter()
        .map(|s| sentences[s.index])
        .collect::<Vec<_>>()
        .join(" ");

    debug!(
        sentences = sentences.len(),
        selected = scores.len(),
        summary = %summary,
        "summary built"
    );

    Ok(summary)
}

/// Split after `.`, `!` or `?` where whitespace follows; empty pieces are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in BOUNDARY_RE.find_iter(text) {
        // Terminators are single-byte ASCII, so the sentence keeps it.
        let end = boundary.start() + 1;
        push_nonempty(&mut sentences, &text[start..end]);
        start = boundary.end();
    }
    push_nonempty(&mut sentences, &text[start..]);

    sentences
}

fn push_nonempty<'a>(sentences: &mut Vec<&'a str>, piece: &'a str) {
    if !piece.is_empty() {
        sentences.push(piece);
    }
}

/// Lower-cased frequency of every word longer than three characters.
pub fn word_frequencies(text: &str) -> HashMap<String, usize> {
    let mut frequencies = HashMap::new();
    for word in WORD_RE.find_iter(text) {
        let word = word.as_str();
        if word.len() > MIN_SCORED_WORD_LEN {
            *frequencies.entry(word.to_lowercase()).or_insert(0) += 1;
        }
    }
    frequencies
}

/// Density score: frequencies of long words over the count of all words.
pub fn score_sentence(sentence: &str, frequencies: &HashMap<String, usize>) -> f64 {
    let mut total_words = 0usize;
    let mut weight = 0usize;

    for word in WORD_RE.find_iter(sentence) {
        total_words += 1;
        let word = word.as_str();
        if word.len() > MIN_SCORED_WORD_LEN {
            weight += frequencies.get(&word.to_lowercase()).copied().unwrap_or(0);
        }
    }

    weight as f64 / total_words.max(1) as f64
}
