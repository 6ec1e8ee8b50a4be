//! Plain-text extraction from uploaded résumé files.

use std::io::{Cursor, Read};
use std::sync::OnceLock;

use regex::Regex;

use crate::errors::AppError;

const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
}

impl ResumeFormat {
    /// Detects the format from the uploaded file name, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, AppError> {
        let lower = filename.trim().to_lowercase();
        if lower.ends_with(".pdf") {
            Ok(Self::Pdf)
        } else if lower.ends_with(".docx") {
            Ok(Self::Docx)
        } else {
            Err(AppError::Validation("Only PDF/DOCX supported".to_string()))
        }
    }
}

/// Extracts the text of a PDF or DOCX résumé. Blocking; run it off the async runtime.
pub fn extract_resume_text(filename: &str, bytes: &[u8]) -> Result<String, AppError> {
    let text = match ResumeFormat::from_filename(filename)? {
        ResumeFormat::Pdf => extract_pdf_text(bytes)?,
        ResumeFormat::Docx => extract_docx_text(bytes)?,
    };
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the resume".to_string(),
        ));
    }
    Ok(text)
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, AppError> {
    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Validation(format!("Failed to read PDF: {e}")))?;
    Ok(raw
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

fn extract_docx_text(bytes: &[u8]) -> Result<String, AppError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AppError::Validation(format!("Failed to read DOCX: {e}")))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|e| AppError::Validation(format!("Failed to read DOCX: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| AppError::Validation(format!("Failed to read DOCX: {e}")))?;
    Ok(docx_paragraphs(&xml).join("\n"))
}

fn text_run_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab/>").expect("static regex is valid")
    })
}

/// Non-empty paragraphs of a WordprocessingML body, in document order.
fn docx_paragraphs(xml: &str) -> Vec<String> {
    xml.split("</w:p>")
        .map(|chunk| {
            text_run_pattern()
                .captures_iter(chunk)
                .map(|cap| match cap.get(1) {
                    Some(run) => unescape_xml(run.as_str()),
                    None => "\t".to_string(),
                })
                .collect::<String>()
        })
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn entity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|lt|gt|quot|apos|amp);")
            .expect("static regex is valid")
    })
}

/// Decodes the predefined entities and numeric character references in one pass.
/// References to invalid code points are kept verbatim.
fn unescape_xml(s: &str) -> String {
    entity_pattern()
        .replace_all(s, |cap: &regex::Captures| {
            let entity = &cap[1];
            let decoded = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "amp" => Some('&'),
                _ => {
                    let code = match entity.strip_prefix("#x").or(entity.strip_prefix("#X")) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => entity[1..].parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded.map_or_else(|| cap[0].to_string(), String::from)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            let options = zip::write::FileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);
            writer.start_file("[Content_Types].xml", options).unwrap();
            writer.write_all(b"<Types/>").unwrap();
            writer.start_file(DOCX_BODY, options).unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ResumeFormat::from_filename("cv.PDF").unwrap(), ResumeFormat::Pdf);
        assert_eq!(ResumeFormat::from_filename("cv.docx").unwrap(), ResumeFormat::Docx);
        let err = ResumeFormat::from_filename("cv.txt").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Only PDF/DOCX supported"));
    }

    #[test]
    fn test_docx_paragraphs_are_joined() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
            <w:p></w:p>
            <w:p><w:r><w:t xml:space="preserve">Rust </w:t></w:r><w:r><w:t>&amp; Go</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let text = extract_resume_text("resume.docx", &build_docx(xml)).unwrap();
        assert_eq!(text, "Jane Doe\nRust & Go");
    }

    #[test]
    fn test_empty_docx_is_rejected() {
        let xml = "<w:document><w:body><w:p></w:p></w:body></w:document>";
        let err = extract_resume_text("resume.docx", &build_docx(xml)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_garbage_bytes_are_a_validation_error() {
        assert!(matches!(
            extract_resume_text("resume.docx", b"not a zip"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            extract_resume_text("resume.pdf", b"not a pdf"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_unescape_xml() {
        assert_eq!(unescape_xml("a &lt;b&gt; &amp;amp;"), "a <b> &amp;");
        assert_eq!(unescape_xml("&quot;x&apos;"), "\"x'");
    }

    #[test]
    fn test_unescape_numeric_references() {
        assert_eq!(unescape_xml("Caf&#233; &#x2019;s"), "Caf\u{e9} \u{2019}s");
        assert_eq!(unescape_xml("&#X41;&#66;"), "AB");
        assert_eq!(unescape_xml("&#xD800;"), "&#xD800;");
    }

    #[test]
    fn test_docx_numeric_references_are_decoded() {
        let xml = "<w:document><w:body><w:p><w:r><w:t>Caf&#233; &#x2019;s</w:t></w:r></w:p></w:body></w:document>";
        let text = extract_resume_text("resume.docx", &build_docx(xml)).unwrap();
        assert_eq!(text, "Caf\u{e9} \u{2019}s");
    }
}
