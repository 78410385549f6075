// Fixed phrase and source catalogs
// Process-wide, read-only tables consulted by the feature extractors and the highlighter.

/// Phrases and single words typical of machine-written prose.
pub const AI_PHRASES: &[&str] = &[
    "furthermore",
    "moreover",
    "in conclusion",
    "it is worth noting",
    "it should be noted",
    "in summary",
    "to summarize",
    "in addition",
    "as a result",
    "consequently",
    "therefore",
    "thus",
    "hence",
    "this highlights",
    "this demonstrates",
    "this suggests",
    "plays a crucial role",
    "plays an important role",
    "is essential",
    "delve",
    "delves",
    "tapestry",
    "nuanced",
    "multifaceted",
    "comprehensive",
    "robust",
    "leverage",
    "utilize",
    "facilitate",
    "endeavor",
    "underscore",
    "paramount",
    "pivotal",
    "notably",
    "it's important to note",
    "importantly",
    "it is important to",
    "in today's world",
    "in the modern era",
    "in recent years",
    "has become increasingly",
    "cannot be overstated",
    "it goes without saying",
];

/// Stock phrases that commonly appear in widely published material.
pub const COMMON_PHRASES: &[&str] = &[
    "climate change",
    "global warming",
    "machine learning",
    "artificial intelligence",
    "the united states",
    "in recent years",
    "according to",
    "research shows",
    "studies have shown",
    "experts say",
    "it has been",
    "there are many",
    "on the other hand",
    "as a result of",
    "in order to",
    "due to the fact",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceEntry {
    pub name: &'static str,
    pub url: &'static str,
    pub color: &'static str,
}

pub const SOURCE_CATALOG: &[SourceEntry] = &[
    SourceEntry { name: "Wikipedia", url: "wikipedia.org", color: "#e74c3c" },
    SourceEntry { name: "ResearchGate", url: "researchgate.net", color: "#f39c12" },
    SourceEntry { name: "Academia.edu", url: "academia.edu", color: "#27ae60" },
    SourceEntry { name: "JSTOR", url: "jstor.org", color: "#8e44ad" },
    SourceEntry { name: "Google Scholar", url: "scholar.google.com", color: "#2980b9" },
    SourceEntry { name: "PubMed", url: "pubmed.ncbi.nlm.nih.gov", color: "#16a085" },
    SourceEntry { name: "SpringerLink", url: "springer.com", color: "#d35400" },
];

/// Highlight colours for source-attributed sentences, cycled by sentence index.
pub const HIGHLIGHT_PALETTE: &[&str] = &[
    "#e74c3c", "#f39c12", "#27ae60", "#8e44ad", "#2980b9", "#16a085", "#d35400",
];

pub const AI_HIGHLIGHT_COLOR: &str = "#9b59b6";
pub const AI_HIGHLIGHT_SOURCE: &str = "AI Generated Content";

/// Number of catalog phrases occurring as substrings of `lowered`.
pub fn count_phrases_in(catalog: &[&str], lowered: &str) -> usize {
    catalog.iter().filter(|p| lowered.contains(**p)).count()
}
