// Report Assembler
// Runs the pipeline end to end and stamps the result with submission metadata.

use super::catalog::AI_PHRASES;
use super::features::extract_features;
use super::highlights::{select_highlights, synthesize_matched_sources};
use super::labels::{ai_label, plag_label};
use super::scoring::aggregate_scores;
use crate::models::{Document, Report};
use crate::services::text_processor::{preview, segment};
use chrono::NaiveDateTime;
use tracing::info;

pub const MAX_FLAGGED_PHRASES: usize = 15;
pub const TEXT_PREVIEW_CHARS: usize = 3000;
const SUBMISSION_DATE_FORMAT: &str = "%B %d, %Y at %I:%M %p";
const SUBMISSION_ID_LEN: usize = 8;

/// Source of the only non-deterministic report fields.
pub trait SubmissionStamper {
    fn submitted_at(&self) -> NaiveDateTime;
    fn submission_id(&self) -> String;
}

/// Local wall clock and random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemStamper;

impl SubmissionStamper for SystemStamper {
    fn submitted_at(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }

    fn submission_id(&self) -> String {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(SUBMISSION_ID_LEN);
        id.to_uppercase()
    }
}

/// Fixed clock and id, for reproducible reports.
#[derive(Debug, Clone)]
pub struct FixedStamper {
    pub at: NaiveDateTime,
    pub id: String,
}

impl FixedStamper {
    pub fn new(at: NaiveDateTime, id: impl Into<String>) -> Self {
        Self { at, id: id.into() }
    }
}

impl SubmissionStamper for FixedStamper {
    fn submitted_at(&self) -> NaiveDateTime {
        self.at
    }

    fn submission_id(&self) -> String {
        self.id.clone()
    }
}

/// AI-catalog phrases present in the text, catalog order, at most 15.
pub fn flagged_phrases(lowered: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for phrase in AI_PHRASES.iter().filter(|p| lowered.contains(**p)) {
        if out.len() >= MAX_FLAGGED_PHRASES {
            break;
        }
        if !out.iter().any(|p| p == phrase) {
            out.push(phrase.to_string());
        }
    }
    out
}

pub fn format_submission_date(at: &NaiveDateTime) -> String {
    at.format(SUBMISSION_DATE_FORMAT).to_string()
}

/// Score `doc` and assemble the full report.
pub fn analyze_document<S>(doc: &Document, stamper: &S) -> Report
where
    S: SubmissionStamper + ?Sized,
{
    let seg = segment(&doc.raw_text);
    let features = extract_features(&seg);
    let scores = aggregate_scores(&seg, &features);
    let highlighted_sentences = select_highlights(&seg.sentences, scores.plag_score);
    let matched_sources = synthesize_matched_sources(scores.plag_score);

    let report = Report {
        filename: doc.filename.clone(),
        submission_date: format_submission_date(&stamper.submitted_at()),
        submission_id: stamper.submission_id(),
        word_count: seg.word_count(),
        sentence_count: seg.sentence_count(),
        character_count: doc.raw_text.chars().count(),
        ai_score: scores.ai_score,
        ai_paraphrased_score: scores.ai_paraphrased_score,
        plag_score: scores.plag_score,
        readability: scores.readability,
        grade_level: scores.grade_level,
        flagged_phrases: flagged_phrases(&seg.lowered),
        highlighted_sentences,
        matched_sources,
        ai_label: ai_label(scores.ai_score),
        plag_label: plag_label(scores.plag_score),
        text_preview: preview(&doc.raw_text, TEXT_PREVIEW_CHARS),
        original_pct: (100 - scores.plag_score).max(0),
        ai_original_pct: (100 - scores.ai_score).max(0),
    };

    info!(
        submission_id = %report.submission_id,
        filename = %report.filename,
        word_count = report.word_count,
        ai_score = report.ai_score,
        plag_score = report.plag_score,
        highlights = report.highlighted_sentences.len(),
        "report.assembled"
    );

    report
}

/// Analyze with the system clock and a random submission id.
pub fn analyze_text(text: &str, filename: &str) -> Report {
    analyze_document(&Document::new(text, filename), &SystemStamper)
}
