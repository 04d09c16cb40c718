// Resume intake: upload validation, best-effort text recovery and contact
// field inference. Nothing here fails once the upload itself is accepted.

pub mod decode;
pub mod extractor;
pub mod phone;

use serde::Serialize;
use tracing::info;

use crate::resume::decode::{ResumeUpload, UploadError};
use crate::resume::extractor::ExtractedFields;

pub use extractor::extract;

/// What the candidate sees after uploading: the guesses to confirm and the
/// text they were drawn from.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeIntake {
    pub fields: ExtractedFields,
    pub raw_text: String,
    pub degraded: bool,
}

pub fn ingest(upload: &ResumeUpload, max_bytes: usize) -> Result<ResumeIntake, UploadError> {
    let kind = decode::validate_upload(upload, max_bytes)?;
    let decoded = decode::decode(upload);

    let fields = if decoded.degraded {
        ExtractedFields::default()
    } else {
        extract(&decoded.text)
    };

    info!(
        file = %upload.file_name,
        ?kind,
        found = ?fields.found(),
        degraded = decoded.degraded,
        "resume ingested"
    );

    Ok(ResumeIntake {
        fields,
        raw_text: decoded.text,
        degraded: decoded.degraded,
    })
}
