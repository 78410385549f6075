// Label Classifier
// Two fixed five-bucket ladders. Each bucket covers [previous breakpoint, breakpoint).

use crate::models::Label;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScoreMode {
    Ai,
    Plagiarism,
}

struct Bucket {
    /// Exclusive upper bound; `None` for the top bucket.
    below: Option<i32>,
    text: &'static str,
    color: &'static str,
    class: &'static str,
}

static AI_LADDER: [Bucket; 5] = [
    Bucket { below: Some(20), text: "Human Written", color: "#27ae60", class: "green" },
    Bucket { below: Some(45), text: "Likely Human", color: "#2ecc71", class: "lime" },
    Bucket { below: Some(65), text: "Mixed / Uncertain", color: "#f39c12", class: "amber" },
    Bucket { below: Some(80), text: "Likely AI-Generated", color: "#e67e22", class: "orange" },
    Bucket { below: None, text: "AI Generated", color: "#e74c3c", class: "red" },
];

static PLAGIARISM_LADDER: [Bucket; 5] = [
    Bucket { below: Some(10), text: "No Plagiarism Detected", color: "#27ae60", class: "green" },
    Bucket { below: Some(25), text: "Low Similarity", color: "#2ecc71", class: "lime" },
    Bucket { below: Some(50), text: "Moderate Similarity", color: "#f39c12", class: "amber" },
    Bucket { below: Some(70), text: "High Similarity", color: "#e67e22", class: "orange" },
    Bucket { below: None, text: "Plagiarism Detected", color: "#e74c3c", class: "red" },
];

fn ladder(mode: ScoreMode) -> &'static [Bucket; 5] {
    match mode {
        ScoreMode::Ai => &AI_LADDER,
        ScoreMode::Plagiarism => &PLAGIARISM_LADDER,
    }
}

pub fn classify(score: i32, mode: ScoreMode) -> Label {
    let buckets = ladder(mode);
    let bucket = buckets
        .iter()
        .find(|b| b.below.map_or(true, |limit| score < limit))
        .unwrap_or(&buckets[buckets.len() - 1]);

    Label {
        text: bucket.text.to_string(),
        color: bucket.color.to_string(),
        class: bucket.class.to_string(),
    }
}

pub fn ai_label(ai_score: i32) -> Label {
    classify(ai_score, ScoreMode::Ai)
}

pub fn plag_label(plag_score: i32) -> Label {
    classify(plag_score, ScoreMode::Plagiarism)
}
