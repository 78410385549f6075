// Upload Extraction Service
// Turns uploaded .txt/.pdf/.docx bytes into plain text. Extraction failures never
// propagate: they are logged and degrade to an empty string.

use regex::Regex;
use std::io::{Cursor, Read};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "docx"];

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("PDF extractor panicked")]
    PdfPanic,
    #[error("DOCX parse failed: {0}")]
    Docx(String),
    #[error("DOCX container error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FileKind {
    Txt,
    Pdf,
    Docx,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Txt),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }
}

/// Lowercased text after the last `.`, if any.
pub fn file_extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Resolve the kind of an upload, honouring the configured extension allow-list.
pub fn file_kind_for(name: &str, allowed: &[String]) -> Option<FileKind> {
    let ext = file_extension(name)?;
    if !allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext)) {
        return None;
    }
    FileKind::from_extension(&ext)
}

/// Reduce an uploaded filename to a safe ASCII name without path components.
/// Accented letters are folded to their base letter (NFKD) before the filter.
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Extract plain text; any failure is logged and yields "".
pub fn extract_text(kind: FileKind, bytes: &[u8]) -> String {
    match try_extract_text(kind, bytes) {
        Ok(text) => {
            debug!(kind = ?kind, bytes = bytes.len(), chars = text.chars().count(), "extraction.done");
            text
        }
        Err(e) => {
            warn!(kind = ?kind, bytes = bytes.len(), error = %e, "extraction.failed");
            String::new()
        }
    }
}

pub fn try_extract_text(kind: FileKind, bytes: &[u8]) -> Result<String, ExtractionError> {
    match kind {
        FileKind::Txt => Ok(decode_text(bytes)),
        FileKind::Pdf => extract_pdf(bytes),
        FileKind::Docx => extract_docx(bytes),
    }
}

/// UTF-8 decode, dropping invalid sequences.
fn decode_text(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract panics on some malformed inputs
    let result = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|_| ExtractionError::PdfPanic)?;
    result.map_err(|e| ExtractionError::Pdf(e.to_string()))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    match extract_docx_paragraphs(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            debug!(error = %e, "docx.reader_failed_falling_back_to_xml");
            extract_docx_xml(bytes)
        }
    }
}

fn extract_docx_paragraphs(bytes: &[u8]) -> Result<String, ExtractionError> {
    use docx_rs::DocumentChild;

    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;
    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(p),
            _ => None,
        })
        .map(|p| {
            let mut text = String::new();
            push_paragraph_text(&p.children, &mut text);
            text
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

/// Run text in document order; hyperlinks contribute their link text.
fn push_paragraph_text(children: &[docx_rs::ParagraphChild], out: &mut String) {
    use docx_rs::{ParagraphChild, RunChild};

    for pc in children {
        match pc {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_text(&link.children, out),
            _ => {}
        }
    }
}

fn docx_text_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>").expect("docx text run regex"))
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Read `word/document.xml` straight from the container, one line per `<w:p>`.
fn extract_docx_xml(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;

    let paragraphs: Vec<String> = xml
        .split("</w:p>")
        .filter(|chunk| chunk.contains("<w:p"))
        .map(|chunk| {
            docx_text_run_re()
                .captures_iter(chunk)
                .filter_map(|c| c.get(1))
                .map(|m| unescape_xml(m.as_str()))
                .collect::<String>()
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn allowed() -> Vec<String> {
        DEFAULT_ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_file_kind_for() {
        assert_eq!(file_kind_for("essay.TXT", &allowed()), Some(FileKind::Txt));
        assert_eq!(file_kind_for("paper.pdf", &allowed()), Some(FileKind::Pdf));
        assert_eq!(file_kind_for("draft.final.docx", &allowed()), Some(FileKind::Docx));
        assert_eq!(file_kind_for("notes.md", &allowed()), None);
        assert_eq!(file_kind_for("noext", &allowed()), None);
        assert_eq!(file_kind_for("trailing.", &allowed()), None);
        assert_eq!(file_kind_for("paper.pdf", &["txt".to_string()]), None);
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
        assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("résumé final.docx"), "resume_final.docx");
        assert_eq!(secure_filename("Ärger über Öl.txt"), "Arger_uber_Ol.txt");
        assert_eq!(secure_filename("..."), "");
    }

    #[test]
    fn test_txt_decoding_drops_invalid_bytes() {
        let bytes = b"caf\xff is open";
        assert_eq!(extract_text(FileKind::Txt, bytes), "caf is open");
    }

    #[test]
    fn test_txt_decoding_keeps_valid_replacement_chars() {
        let mut bytes = "a\u{FFFD}b".as_bytes().to_vec();
        bytes.push(0xC3);
        assert_eq!(extract_text(FileKind::Txt, &bytes), "a\u{FFFD}b");
    }

    fn build_docx(docx: docx_rs::Docx) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_docx_reader_joins_paragraphs() {
        use docx_rs::{Docx, Paragraph, Run};

        let bytes = build_docx(
            Docx::new()
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("First paragraph here.")))
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Second one."))),
        );
        assert_eq!(extract_docx_paragraphs(&bytes).unwrap(), "First paragraph here.\nSecond one.");
        assert_eq!(extract_text(FileKind::Docx, &bytes), "First paragraph here.\nSecond one.");
    }

    #[test]
    fn test_docx_reader_keeps_hyperlink_text() {
        use docx_rs::{Docx, Hyperlink, HyperlinkType, Paragraph, Run};

        let paragraph = Paragraph::new()
            .add_run(Run::new().add_text("See "))
            .add_hyperlink(
                Hyperlink::new("https://example.com", HyperlinkType::External)
                    .add_run(Run::new().add_text("the guide")),
            )
            .add_run(Run::new().add_text(" for details."));
        let bytes = build_docx(Docx::new().add_paragraph(paragraph));
        assert_eq!(extract_docx_paragraphs(&bytes).unwrap(), "See the guide for details.");
    }

    /// Single-page PDF with one Helvetica text run; xref offsets computed as written.
    fn minimal_pdf(line: &str) -> Vec<u8> {
        let content = format!("BT /F1 24 Tf 72 700 Td ({}) Tj ET", line);
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>".to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_string(),
            format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }
        let xref_at = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for off in offsets {
            xref.push_str(&format!("{:010} 00000 n \n", off));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }

    #[test]
    fn test_pdf_text_layer_is_extracted() {
        let bytes = minimal_pdf("Hello PDF World");
        let text = try_extract_text(FileKind::Pdf, &bytes).unwrap();
        assert!(text.contains("Hello"), "got {:?}", text);
        assert!(text.contains("World"), "got {:?}", text);
    }

    #[test]
    fn test_garbage_pdf_degrades_to_empty() {
        assert_eq!(extract_text(FileKind::Pdf, b"definitely not a pdf"), "");
    }

    #[test]
    fn test_garbage_docx_degrades_to_empty() {
        assert_eq!(extract_text(FileKind::Docx, b"PK but not really"), "");
    }

    #[test]
    fn test_docx_xml_fallback_reads_paragraphs() {
        let xml = r#"<?xml version="1.0"?><w:document><w:body><w:p><w:r><w:t>Fish &amp; chips</w:t></w:r><w:r><w:t xml:space="preserve"> taste good.</w:t></w:r></w:p><w:p><w:r><w:t>Second line</w:t></w:r></w:p></w:body></w:document>"#;
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        let text = extract_docx_xml(buf.get_ref()).unwrap();
        assert_eq!(text, "Fish & chips taste good.\nSecond line");
    }
}
