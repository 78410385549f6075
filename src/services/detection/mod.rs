// Detection Module
// Heuristic scoring core organized into specialized submodules:
// - catalog: fixed phrase lists, source catalog and highlight palette
// - features: the five stateless feature extractors
// - scoring: score aggregation, reading ease and grade bands
// - labels: threshold ladders for AI and plagiarism scores
// - highlights: sentence highlighting and matched-source synthesis
// - report: report assembly with an injectable clock/id source

pub mod catalog;
pub mod features;
pub mod scoring;
pub mod labels;
pub mod highlights;
pub mod report;

// Re-export commonly used functions
pub use features::{count_syllables, extract_features};
pub use scoring::{aggregate_scores, grade_level, reading_ease};
pub use labels::{ai_label, plag_label, classify, ScoreMode};
pub use highlights::{select_highlights, synthesize_matched_sources};
pub use report::{
    analyze_document,
    analyze_text,
    FixedStamper,
    SubmissionStamper,
    SystemStamper,
};
