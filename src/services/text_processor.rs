// Text Processing Service
// Segmenter: lowercase word tokens and candidate sentences

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Candidates with this many trimmed characters or fewer are not sentences.
const MIN_SENTENCE_CHARS: usize = 10;

fn sentence_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("sentence break regex"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    pub word_count: usize,
}

impl Sentence {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            word_count: text.split_whitespace().count(),
        }
    }
}

/// Output of the segmenter, shared read-only by every feature extractor.
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    /// Whole text, lowercased once.
    pub lowered: String,
    /// Lowercase whitespace-separated tokens, punctuation kept.
    pub words: Vec<String>,
    pub sentences: Vec<Sentence>,
}

impl Segmentation {
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Number of qualifying sentences, floored at 1 so it can divide.
    pub fn sentence_count(&self) -> usize {
        self.sentences.len().max(1)
    }
}

/// Split on runs of `.`, `!`, `?` and keep trimmed candidates longer than 10 chars.
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    if text.is_empty() {
        return vec![];
    }

    sentence_break_re()
        .split(text)
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .map(Sentence::new)
        .collect()
}

pub fn segment(text: &str) -> Segmentation {
    let lowered = text.to_lowercase();
    let words = lowered.split_whitespace().map(str::to_string).collect();
    Segmentation {
        lowered,
        words,
        sentences: split_sentences(text),
    }
}

/// First `max_chars` characters of `s` (char-boundary safe).
pub fn preview(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
