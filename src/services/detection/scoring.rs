// Score Aggregator
// Fixed linear formulas over the FeatureSet, rounded half-to-even then clamped.

use crate::models::{FeatureSet, ScoreSet};
use crate::services::text_processor::Segmentation;
use tracing::debug;

pub const AI_SCORE_RANGE: (i32, i32) = (3, 97);
pub const AI_PARAPHRASED_RANGE: (i32, i32) = (5, 95);
pub const PLAG_SCORE_RANGE: (i32, i32) = (1, 82);
pub const READABILITY_RANGE: (i32, i32) = (0, 100);

const PASSIVE_BONUS_CAP: f64 = 15.0;

/// Round to the nearest integer, ties to even.
#[inline]
pub fn round_score(x: f64) -> i64 {
    x.round_ties_even() as i64
}

#[inline]
fn clamp_to(x: i64, range: (i32, i32)) -> i32 {
    x.clamp(range.0 as i64, range.1 as i64) as i32
}

/// Unclamped AI-likelihood sum shared by the AI and paraphrase scores.
pub fn ai_raw(features: &FeatureSet, word_count: usize) -> f64 {
    let word_ratio = features.word_hit_count as f64 / word_count.max(1) as f64;
    features.phrase_hit_count as f64 * 9.0
        + word_ratio * 300.0
        + features.uniformity_score
        + PASSIVE_BONUS_CAP.min(features.passive_count as f64 * 2.0)
}

pub fn ai_score(raw: f64) -> i32 {
    clamp_to(round_score(raw), AI_SCORE_RANGE)
}

pub fn ai_paraphrased_score(raw: f64) -> i32 {
    clamp_to(round_score(raw * 0.6 + 15.0), AI_PARAPHRASED_RANGE)
}

pub fn plag_score(features: &FeatureSet) -> i32 {
    let raw = features.common_phrase_hit_count as f64 * 3.5 + features.repeated_word_count as f64 * 2.2;
    clamp_to(round_score(raw), PLAG_SCORE_RANGE)
}

/// Flesch reading ease, clamped to [0, 100].
pub fn reading_ease(word_count: usize, sentence_count: usize, total_syllables: usize) -> i32 {
    let words_per_sentence = word_count as f64 / sentence_count.max(1) as f64;
    let syllables_per_word = total_syllables as f64 / word_count.max(1) as f64;
    let raw = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    clamp_to(round_score(raw), READABILITY_RANGE)
}

/// Reading-ease score to school grade band.
pub fn grade_level(readability: i32) -> &'static str {
    match readability {
        r if r >= 90 => "5th Grade",
        r if r >= 70 => "7th Grade",
        r if r >= 60 => "8-9th Grade",
        r if r >= 50 => "10-12th Grade",
        r if r >= 30 => "College",
        _ => "College Graduate",
    }
}

pub fn aggregate_scores(seg: &Segmentation, features: &FeatureSet) -> ScoreSet {
    let raw = ai_raw(features, seg.word_count());
    let readability = reading_ease(seg.word_count(), seg.sentence_count(), features.total_syllables);

    let scores = ScoreSet {
        ai_score: ai_score(raw),
        ai_paraphrased_score: ai_paraphrased_score(raw),
        plag_score: plag_score(features),
        readability,
        grade_level: grade_level(readability).to_string(),
    };

    debug!(
        ai_raw = raw,
        ai_score = scores.ai_score,
        plag_score = scores.plag_score,
        readability = scores.readability,
        "scores.aggregated"
    );

    scores
}
