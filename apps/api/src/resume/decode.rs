//! Best-effort resume text recovery.
//!
//! There is no real PDF or DOCX parser here: bytes are decoded as lossy UTF-8
//! and everything outside printable ASCII is blanked. That recovers text from
//! plain-text-ish uploads and degrades to a filename placeholder otherwise.

use bytes::Bytes;
use thiserror::Error;
use tracing::warn;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeKind {
    Pdf,
    Docx,
}

/// A resume file as handed over by the host environment.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Only PDF or DOCX resumes are accepted (got {0})")]
    UnsupportedType(String),

    #[error("Resume is {size} bytes; the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("Resume file is empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedResume {
    pub text: String,
    /// True when no text could be recovered and `text` is the placeholder.
    pub degraded: bool,
}

/// Accepts PDF and DOCX by content type, falling back to the file extension
/// when the client sent none (or a generic one).
pub fn validate_upload(upload: &ResumeUpload, max_bytes: usize) -> Result<ResumeKind, UploadError> {
    let kind = match upload.content_type.as_deref() {
        Some(PDF_MIME) => Some(ResumeKind::Pdf),
        Some(DOCX_MIME) => Some(ResumeKind::Docx),
        None | Some("application/octet-stream") => kind_from_extension(&upload.file_name),
        Some(_) => None,
    };
    let kind = kind.ok_or_else(|| {
        UploadError::UnsupportedType(
            upload
                .content_type
                .clone()
                .unwrap_or_else(|| upload.file_name.clone()),
        )
    })?;

    if upload.bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if upload.bytes.len() >= max_bytes {
        return Err(UploadError::TooLarge {
            size: upload.bytes.len(),
            limit: max_bytes,
        });
    }
    Ok(kind)
}

fn kind_from_extension(file_name: &str) -> Option<ResumeKind> {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".pdf") {
        Some(ResumeKind::Pdf)
    } else if lower.ends_with(".docx") {
        Some(ResumeKind::Docx)
    } else {
        None
    }
}

pub fn decode(upload: &ResumeUpload) -> DecodedResume {
    let text = recover_text(&upload.bytes);
    if text.is_empty() {
        warn!(file = %upload.file_name, "no text recovered from resume; manual entry required");
        return DecodedResume {
            text: placeholder(&upload.file_name),
            degraded: true,
        };
    }
    DecodedResume {
        text,
        degraded: false,
    }
}

pub fn placeholder(file_name: &str) -> String {
    format!("File: {file_name}")
}

/// Lossy UTF-8, non-printables blanked, whitespace runs inside a line
/// collapsed, blank lines dropped. Line breaks survive for the label matchers.
pub fn recover_text(bytes: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(bytes);
    let printable: String = decoded
        .chars()
        .map(|c| {
            if matches!(c, '\x20'..='\x7E' | '\n' | '\r' | '\t') {
                c
            } else {
                ' '
            }
        })
        .collect();
    printable
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
