//! File kinds the worker understands.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::keys;

/// Formats a document may be converted to.
pub const CONVERSION_TARGETS: &[&str] = &["pdf", "doc", "docx", "txt", "odt", "rtf", "html"];

/// A document kind the scraper can pull text out of.
///
/// Resolved once from the object key's extension; everything downstream
/// matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    Text,
    WordProcessor,
    Pdf,
}

impl FileFormat {
    /// Map a file extension (without the dot) to a format.
    pub fn from_extension(ext: &str) -> Result<Self, CoreError> {
        match ext.to_lowercase().as_str() {
            "txt" => Ok(FileFormat::Text),
            "docx" => Ok(FileFormat::WordProcessor),
            "pdf" => Ok(FileFormat::Pdf),
            other => Err(CoreError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Resolve the declared format of an object from its key.
    pub fn from_key(key: &str) -> Result<Self, CoreError> {
        let ext = keys::extension(key)
            .ok_or_else(|| CoreError::UnsupportedFormat(format!("no extension on key {key}")))?;
        Self::from_extension(ext)
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Text => "txt",
            FileFormat::WordProcessor => "docx",
            FileFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        content_type_for_extension(self.extension())
    }
}

/// MIME type used when uploading an object with the given extension.
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "odt" => "application/vnd.oasis.opendocument.text",
        "rtf" => "application/rtf",
        "html" => "text/html",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

pub fn is_conversion_target(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    CONVERSION_TARGETS.contains(&ext.as_str())
}
