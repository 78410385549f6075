// Feature Extractors
// Stateless analyzers over the segmenter output. Each one is a plain function;
// `extract_features` composes them into a FeatureSet.

use super::catalog::{count_phrases_in, AI_PHRASES, COMMON_PHRASES};
use crate::models::FeatureSet;
use crate::services::text_processor::{Segmentation, Sentence};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

const DEFAULT_MEAN_SENTENCE_LEN: f64 = 15.0;
const UNIFORMITY_BASE: f64 = 35.0;
const UNIFORMITY_STD_WEIGHT: f64 = 1.8;
const REPEATED_MIN_LEN: usize = 6;
const REPEATED_MIN_OCCURRENCES: usize = 4;

fn passive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(is|are|was|were|be|been|being)\s+\w+ed\b").expect("passive regex")
    })
}

// ============================================================================
// Phrase Matcher
// ============================================================================

/// Distinct AI-catalog phrases found anywhere in the lowercased text.
pub fn ai_phrase_hits(lowered: &str) -> usize {
    count_phrases_in(AI_PHRASES, lowered)
}

/// Distinct common-phrase catalog entries found anywhere in the lowercased text.
pub fn common_phrase_hits(lowered: &str) -> usize {
    count_phrases_in(COMMON_PHRASES, lowered)
}

/// Tokens that equal an AI-catalog entry once `.,;:` is stripped from both ends.
pub fn ai_word_hits(words: &[String]) -> usize {
    words
        .iter()
        .map(|w| w.trim_matches(|c: char| matches!(c, '.' | ',' | ';' | ':')))
        .filter(|w| AI_PHRASES.contains(w))
        .count()
}

// ============================================================================
// Syllable Counter
// ============================================================================

#[inline]
fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Vowel-group syllable estimate; short words count as one, a final `e` is silent.
pub fn count_syllables(word: &str) -> usize {
    let lowered = word.to_lowercase();
    let word = lowered.trim_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | '"' | '\''));
    if word.chars().count() <= 3 {
        return 1;
    }

    let mut count: i64 = 0;
    let mut prev_vowel = false;
    for c in word.chars() {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }
    if word.ends_with('e') {
        count -= 1;
    }
    count.max(1) as usize
}

pub fn total_syllables(words: &[String]) -> usize {
    words.iter().map(|w| count_syllables(w)).sum()
}

// ============================================================================
// Sentence-Uniformity Analyzer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentenceUniformity {
    pub mean: f64,
    pub variance: f64,
    pub score: f64,
}

/// Mean and population variance of sentence word counts, plus the uniformity bonus.
pub fn sentence_uniformity(sentences: &[Sentence]) -> SentenceUniformity {
    let (mean, variance) = if sentences.is_empty() {
        (DEFAULT_MEAN_SENTENCE_LEN, 0.0)
    } else {
        let n = sentences.len() as f64;
        let mean = sentences.iter().map(|s| s.word_count as f64).sum::<f64>() / n;
        let variance = sentences
            .iter()
            .map(|s| (s.word_count as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        (mean, variance)
    };

    SentenceUniformity {
        mean,
        variance,
        score: (UNIFORMITY_BASE - variance.sqrt() * UNIFORMITY_STD_WEIGHT).max(0.0),
    }
}

// ============================================================================
// Passive-Voice Detector
// ============================================================================

pub fn passive_count(lowered: &str) -> usize {
    passive_re().find_iter(lowered).count()
}

// ============================================================================
// Repetition Detector
// ============================================================================

/// Distinct tokens longer than 5 chars that occur more than 3 times.
pub fn repeated_word_count(words: &[String]) -> usize {
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for w in words {
        *freq.entry(w.as_str()).or_insert(0) += 1;
    }
    freq.iter()
        .filter(|(w, &c)| w.chars().count() >= REPEATED_MIN_LEN && c >= REPEATED_MIN_OCCURRENCES)
        .count()
}

pub fn extract_features(seg: &Segmentation) -> FeatureSet {
    let uniformity = sentence_uniformity(&seg.sentences);
    let features = FeatureSet {
        phrase_hit_count: ai_phrase_hits(&seg.lowered),
        word_hit_count: ai_word_hits(&seg.words),
        mean_sentence_length: uniformity.mean,
        length_variance: uniformity.variance,
        uniformity_score: uniformity.score,
        passive_count: passive_count(&seg.lowered),
        common_phrase_hit_count: common_phrase_hits(&seg.lowered),
        repeated_word_count: repeated_word_count(&seg.words),
        total_syllables: total_syllables(&seg.words),
    };

    debug!(
        phrase_hits = features.phrase_hit_count,
        word_hits = features.word_hit_count,
        passive = features.passive_count,
        common_hits = features.common_phrase_hit_count,
        repeated = features.repeated_word_count,
        uniformity = features.uniformity_score,
        "features.extracted"
    );

    features
}
