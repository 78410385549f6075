// Highlight Selector and Matched-Source Synthesizer
//
// Highlights re-scan the qualifying sentences and attach a synthetic source or an
// AI-content tag. Matched sources are derived from the aggregate plagiarism score only.

use super::catalog::{
    count_phrases_in, AI_HIGHLIGHT_COLOR, AI_HIGHLIGHT_SOURCE, AI_PHRASES, COMMON_PHRASES,
    HIGHLIGHT_PALETTE, SOURCE_CATALOG,
};
use super::scoring::round_score;
use crate::models::{HighlightedSentence, MatchedSource};
use crate::services::text_processor::Sentence;

pub const MAX_SCANNED_SENTENCES: usize = 40;
pub const MAX_HIGHLIGHTS: usize = 20;
pub const MAX_MATCHED_SOURCES: usize = 5;

/// Sentences need more than this many words to be highlighted.
const MIN_ELIGIBLE_WORDS: usize = 8;
/// Above this plagiarism score every third sentence is attributed to a source.
const CADENCE_PLAG_THRESHOLD: i32 = 20;
const CADENCE_STRIDE: usize = 3;
const MAX_MATCH_PCT: u32 = 99;

fn source_highlight(index: usize, sentence: &Sentence, common_hits: usize) -> HighlightedSentence {
    let source = &SOURCE_CATALOG[index % SOURCE_CATALOG.len()];
    let color = HIGHLIGHT_PALETTE[index % HIGHLIGHT_PALETTE.len()];
    let pct = 45 + common_hits as u32 * 12 + (index % 20) as u32;
    HighlightedSentence {
        text: sentence.text.clone(),
        color: color.to_string(),
        source: source.name.to_string(),
        source_url: source.url.to_string(),
        match_pct: pct.min(MAX_MATCH_PCT),
    }
}

fn ai_highlight(sentence: &Sentence, ai_hits: usize) -> HighlightedSentence {
    let pct = 55 + ai_hits as u32 * 8;
    HighlightedSentence {
        text: sentence.text.clone(),
        color: AI_HIGHLIGHT_COLOR.to_string(),
        source: AI_HIGHLIGHT_SOURCE.to_string(),
        source_url: String::new(),
        match_pct: pct.min(MAX_MATCH_PCT),
    }
}

/// Pick up to 20 sentences to flag, in original order, from the first 40 qualifying ones.
///
/// Common-phrase hits win over AI-phrase hits. Independently of phrase hits, when
/// `plag_score` exceeds 20 every sentence whose index is a multiple of 3 is attributed
/// to a source; this cadence is a fixed heuristic kept as-is.
pub fn select_highlights(sentences: &[Sentence], plag_score: i32) -> Vec<HighlightedSentence> {
    let mut highlighted = Vec::new();

    for (i, sentence) in sentences.iter().take(MAX_SCANNED_SENTENCES).enumerate() {
        if highlighted.len() >= MAX_HIGHLIGHTS {
            break;
        }
        if sentence.word_count <= MIN_ELIGIBLE_WORDS {
            continue;
        }

        let lowered = sentence.text.to_lowercase();
        let common_hits = count_phrases_in(COMMON_PHRASES, &lowered);
        let cadence_hit = plag_score > CADENCE_PLAG_THRESHOLD && i % CADENCE_STRIDE == 0;

        if common_hits > 0 || cadence_hit {
            highlighted.push(source_highlight(i, sentence, common_hits));
            continue;
        }

        let ai_hits = count_phrases_in(AI_PHRASES, &lowered);
        if ai_hits > 0 {
            highlighted.push(ai_highlight(sentence, ai_hits));
        }
    }

    highlighted
}

/// Ranked source list: rank `i` gets `max(1, round(plag * (0.3 - 0.04 i) + 2 i))`,
/// kept only when above 1.
pub fn synthesize_matched_sources(plag_score: i32) -> Vec<MatchedSource> {
    SOURCE_CATALOG
        .iter()
        .take(MAX_MATCHED_SOURCES)
        .enumerate()
        .filter_map(|(i, src)| {
            let rank = i as f64;
            let raw = plag_score as f64 * (0.3 - rank * 0.04) + rank * 2.0;
            let pct = round_score(raw).max(1) as i32;
            (pct > 1).then(|| MatchedSource {
                name: src.name.to_string(),
                url: src.url.to_string(),
                color: src.color.to_string(),
                pct,
            })
        })
        .collect()
}
