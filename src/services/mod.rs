// OriginScan Core Services

pub mod text_processor;
pub mod extraction;
pub mod config_store;
pub mod report_render;
pub mod detection;

pub use text_processor::*;
pub use config_store::*;

// Re-export detection module functions
pub use detection::{
    analyze_document,
    analyze_text,
    extract_features,
    aggregate_scores,
    select_highlights,
    synthesize_matched_sources,
    FixedStamper,
    SubmissionStamper,
    SystemStamper,
};
