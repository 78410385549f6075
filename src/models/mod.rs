// OriginScan Data Models
// Report contract shared by the scoring core, the HTTP layer and the renderers

use serde::{Deserialize, Serialize};

// ============ Input ============

/// Filename recorded for text that was pasted rather than uploaded.
pub const PASTED_TEXT_FILENAME: &str = "Pasted Text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub raw_text: String,
    pub filename: String,
}

impl Document {
    pub fn new(raw_text: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            filename: filename.into(),
        }
    }

    pub fn pasted(raw_text: impl Into<String>) -> Self {
        Self::new(raw_text, PASTED_TEXT_FILENAME)
    }
}

// ============ Features & Scores ============

/// Lexical/statistical signals extracted once per document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FeatureSet {
    /// Distinct AI-catalog phrases occurring anywhere in the lowercased text.
    pub phrase_hit_count: usize,
    /// Tokens that exactly equal an AI-catalog entry.
    pub word_hit_count: usize,
    pub mean_sentence_length: f64,
    /// Population variance of per-sentence word counts.
    pub length_variance: f64,
    pub uniformity_score: f64,
    pub passive_count: usize,
    /// Distinct common-phrase catalog entries occurring anywhere in the text.
    pub common_phrase_hit_count: usize,
    pub repeated_word_count: usize,
    pub total_syllables: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSet {
    /// In [3, 97].
    pub ai_score: i32,
    /// In [5, 95].
    pub ai_paraphrased_score: i32,
    /// In [1, 82].
    pub plag_score: i32,
    /// In [0, 100].
    pub readability: i32,
    pub grade_level: String,
}

// ============ Labels ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub color: String,
    pub class: String,
}

// ============ Highlights & Sources ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightedSentence {
    pub text: String,
    pub color: String,
    /// Attributed source name, or "AI Generated Content" for AI-style sentences.
    pub source: String,
    /// Empty for AI-style sentences.
    pub source_url: String,
    pub match_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedSource {
    pub name: String,
    pub url: String,
    pub color: String,
    pub pct: i32,
}

// ============ Report ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub filename: String,
    pub submission_date: String,
    pub submission_id: String,
    pub word_count: usize,
    pub sentence_count: usize,
    pub character_count: usize,
    pub ai_score: i32,
    pub ai_paraphrased_score: i32,
    pub plag_score: i32,
    pub readability: i32,
    pub grade_level: String,
    pub flagged_phrases: Vec<String>,
    pub highlighted_sentences: Vec<HighlightedSentence>,
    pub matched_sources: Vec<MatchedSource>,
    pub ai_label: Label,
    pub plag_label: Label,
    pub text_preview: String,
    pub original_pct: i32,
    pub ai_original_pct: i32,
}

// ============ Transport payloads ============

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Which rendered report variant to produce.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ReportKind {
    Similarity,
    AiWriting,
}

impl ReportKind {
    pub fn parse(val: &str) -> Option<Self> {
        match val.trim().to_lowercase().as_str() {
            "similarity" | "sim" | "plag" => Some(Self::Similarity),
            "ai" | "ai-writing" | "ai_writing" => Some(Self::AiWriting),
            _ => None,
        }
    }

    /// Prefix used for files stored in the reports directory.
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::Similarity => "sim",
            Self::AiWriting => "ai",
        }
    }

    /// Name offered to the client when downloading the rendered report.
    pub fn download_name(self, submission_id: &str) -> String {
        match self {
            Self::Similarity => format!("Similarity_{}.txt", submission_id),
            Self::AiWriting => format!("AI_Writing_{}.txt", submission_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pasted_document_uses_placeholder_name() {
        let doc = Document::pasted("some text");
        assert_eq!(doc.filename, "Pasted Text");
    }

    #[test]
    fn test_report_kind_parse() {
        assert_eq!(ReportKind::parse("similarity"), Some(ReportKind::Similarity));
        assert_eq!(ReportKind::parse(" AI "), Some(ReportKind::AiWriting));
        assert_eq!(ReportKind::parse("pdf"), None);
        assert_eq!(ReportKind::Similarity.download_name("AB12CD34"), "Similarity_AB12CD34.txt");
    }

    #[test]
    fn test_label_serializes_as_object() {
        let label = Label {
            text: "Human Written".to_string(),
            color: "#27ae60".to_string(),
            class: "green".to_string(),
        };
        let json = serde_json::to_value(&label).unwrap();
        assert_eq!(json["class"], "green");
        assert_eq!(json["text"], "Human Written");
    }
}
