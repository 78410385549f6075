// Report Rendering
// Plain-text renderings of the two report variants (similarity, AI writing).

use crate::models::{Report, ReportKind};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const RULE_WIDTH: usize = 72;
const MAX_RENDERED_HIGHLIGHTS: usize = 12;

const SIMILARITY_DISCLAIMER: &str = "This Similarity Report is a heuristic estimate derived from surface-level \
text features. Matched sources are synthesized from the similarity score and were not compared \
against the listed sites.";

const AI_NOTICE: &str = "IMPORTANT NOTICE: This AI Writing Detection Report is an indicator only. \
Scores come from phrase, rhythm and style heuristics and must not be the sole basis for \
academic integrity decisions.";

const AI_FAQ: &[(&str, &str)] = &[
    (
        "What does the AI score mean?",
        "It estimates how much of the text shows patterns consistent with AI-generated writing. \
         A higher score means more such patterns were found.",
    ),
    (
        "What is AI-paraphrased content?",
        "Text that appears to have been generated by AI and then edited by a person. It keeps \
         AI writing patterns while showing signs of manual modification.",
    ),
    (
        "Can AI detection be 100% accurate?",
        "No. Detection is heuristic and results should be read alongside other context.",
    ),
    (
        "What should I do if I believe the result is incorrect?",
        "Speak with your instructor or institution. The report is one indicator, not proof.",
    ),
];

fn rule(out: &mut String, ch: char) {
    out.push_str(&ch.to_string().repeat(RULE_WIDTH));
    out.push('\n');
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", title);
    out.push_str(&"-".repeat(title.chars().count()));
    out.push('\n');
}

/// Thousands separator, e.g. 12345 -> "12,345".
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn submission_details(out: &mut String, report: &Report, with_counts: bool) {
    heading(out, "Submission Details");
    let _ = writeln!(out, "Document:       {}", report.filename);
    let _ = writeln!(out, "Submission ID:  {}", report.submission_id);
    let _ = writeln!(out, "Submitted:      {}", report.submission_date);
    let _ = writeln!(out, "Word Count:     {}", group_thousands(report.word_count));
    if with_counts {
        let _ = writeln!(out, "Sentences:      {}", report.sentence_count);
        let _ = writeln!(out, "Characters:     {}", group_thousands(report.character_count));
    }
}

pub fn render_similarity_report(report: &Report) -> String {
    let mut out = String::new();
    rule(&mut out, '=');
    out.push_str("OriginScan | Similarity Report\n");
    rule(&mut out, '=');

    submission_details(&mut out, report, true);

    heading(&mut out, "Originality Overview");
    let _ = writeln!(out, "Similarity Index:  {}%  ({})", report.plag_score, report.plag_label.text);
    let _ = writeln!(out, "AI Writing:        {}%  ({})", report.ai_score, report.ai_label.text);
    let _ = writeln!(out, "Original:          {}%  (Unique Content)", report.original_pct);

    if !report.matched_sources.is_empty() {
        heading(&mut out, "Matched Sources");
        let _ = writeln!(out, "{:<3} {:<36} {:>8}  {}", "#", "Source", "Match %", "Type");
        for (i, s) in report.matched_sources.iter().enumerate() {
            let source = format!("{} ({})", s.name, s.url);
            let _ = writeln!(out, "{:<3} {:<36} {:>7}%  Internet Source", i + 1, source, s.pct);
        }
    }

    if !report.highlighted_sentences.is_empty() {
        heading(&mut out, "Text with Highlighted Matches");
        for hs in report.highlighted_sentences.iter().take(MAX_RENDERED_HIGHLIGHTS) {
            let _ = writeln!(out, "> {} [{} - {}% match]", hs.text, hs.source, hs.match_pct);
        }
    }

    out.push('\n');
    rule(&mut out, '-');
    let _ = writeln!(out, "{}", SIMILARITY_DISCLAIMER);
    let _ = writeln!(
        out,
        "OriginScan | Similarity Report | {} | ID: {}",
        report.submission_date, report.submission_id
    );
    out
}

pub fn render_ai_report(report: &Report) -> String {
    let mut out = String::new();
    rule(&mut out, '=');
    out.push_str("OriginScan | AI Writing Detection Report\n");
    rule(&mut out, '=');

    submission_details(&mut out, report, false);

    heading(&mut out, "AI Detection Results");
    let _ = writeln!(out, "AI-Generated:    {}%  ({})", report.ai_score, report.ai_label.text);
    let _ = writeln!(out, "AI-Paraphrased:  {}%  (AI Paraphrasing Detected)", report.ai_paraphrased_score);
    let _ = writeln!(out, "Human-Written:   {}%  (Original Human Writing)", report.ai_original_pct);

    heading(&mut out, "Highlight Color Key");
    out.push_str("Red    - AI Generated text          Purple - AI Paraphrased\n");
    out.push_str("Green  - Original human writing     Orange - Uncertain / Mixed origin\n");

    if !report.flagged_phrases.is_empty() {
        heading(&mut out, "AI-Indicative Phrases");
        for pair in report.flagged_phrases.chunks(2) {
            match pair {
                [a, b] => {
                    let _ = writeln!(out, "* {:<34} * {}", a, b);
                }
                [a] => {
                    let _ = writeln!(out, "* {}", a);
                }
                _ => {}
            }
        }
    }

    heading(&mut out, "Frequently Asked Questions");
    for (q, a) in AI_FAQ {
        let _ = writeln!(out, "Q: {}\nA: {}\n", q, a);
    }

    rule(&mut out, '-');
    let _ = writeln!(out, "{}", AI_NOTICE);
    let _ = writeln!(
        out,
        "OriginScan | AI Writing Detection | {} | ID: {}",
        report.submission_date, report.submission_id
    );
    out
}

pub fn render_report(kind: ReportKind, report: &Report) -> String {
    match kind {
        ReportKind::Similarity => render_similarity_report(report),
        ReportKind::AiWriting => render_ai_report(report),
    }
}

/// Write a rendered report as `<prefix>_<submission id>.txt` under `dir`.
pub fn store_rendered(
    dir: &Path,
    kind: ReportKind,
    submission_id: &str,
    body: &str,
) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let id = if submission_id.trim().is_empty() { "X" } else { submission_id.trim() };
    let safe_id: String = id.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    let path = dir.join(format!("{}_{}.txt", kind.file_prefix(), safe_id));
    fs::write(&path, body)?;
    info!(path = %path.display(), "report.stored");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HighlightedSentence, Label, MatchedSource};

    fn sample_report() -> Report {
        Report {
            filename: "essay.txt".to_string(),
            submission_date: "March 05, 2024 at 02:07 PM".to_string(),
            submission_id: "AB12CD34".to_string(),
            word_count: 12345,
            sentence_count: 7,
            character_count: 999,
            ai_score: 53,
            ai_paraphrased_score: 47,
            plag_score: 56,
            readability: 37,
            grade_level: "College".to_string(),
            flagged_phrases: vec!["as a result".to_string(), "in recent years".to_string(), "moreover".to_string()],
            highlighted_sentences: vec![HighlightedSentence {
                text: "According to the latest report".to_string(),
                color: "#e74c3c".to_string(),
                source: "Wikipedia".to_string(),
                source_url: "wikipedia.org".to_string(),
                match_pct: 93,
            }],
            matched_sources: vec![MatchedSource {
                name: "Wikipedia".to_string(),
                url: "wikipedia.org".to_string(),
                color: "#e74c3c".to_string(),
                pct: 17,
            }],
            ai_label: Label {
                text: "Mixed / Uncertain".to_string(),
                color: "#f39c12".to_string(),
                class: "amber".to_string(),
            },
            plag_label: Label {
                text: "High Similarity".to_string(),
                color: "#e67e22".to_string(),
                class: "orange".to_string(),
            },
            text_preview: String::new(),
            original_pct: 44,
            ai_original_pct: 47,
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_similarity_report_sections() {
        let body = render_similarity_report(&sample_report());
        assert!(body.contains("Similarity Index:  56%  (High Similarity)"));
        assert!(body.contains("Word Count:     12,345"));
        assert!(body.contains("Internet Source"));
        assert!(body.contains("[Wikipedia - 93% match]"));
        assert!(body.contains("ID: AB12CD34"));
    }

    #[test]
    fn test_ai_report_sections() {
        let body = render_ai_report(&sample_report());
        assert!(body.contains("AI-Generated:    53%  (Mixed / Uncertain)"));
        assert!(body.contains("Human-Written:   47%"));
        assert!(body.contains("* moreover"));
        assert!(body.contains("Frequently Asked Questions"));
        assert!(!body.contains("Matched Sources"));
    }

    #[test]
    fn test_store_rendered_sanitizes_id() {
        let dir = std::env::temp_dir().join(format!("originscan-reports-{}", uuid::Uuid::new_v4()));
        let path = store_rendered(&dir, ReportKind::Similarity, "../AB12", "body").unwrap();
        assert_eq!(path.file_name().unwrap(), "sim_AB12.txt");
        assert_eq!(fs::read_to_string(&path).unwrap(), "body");
        let _ = fs::remove_dir_all(&dir);
    }
}
