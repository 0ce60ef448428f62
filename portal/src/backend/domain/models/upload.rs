//! Domain models for uploaded documents and the blob handles that locate them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::backend::domain::error::{PortalError, PortalResult};

const MAX_COMPONENT_LEN: usize = 255;

/// Opaque reference to stored content, rendered as `{student_id}/{filename}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobHandle(String);

impl BlobHandle {
    pub fn new(student_id: &str, filename: &str) -> PortalResult<Self> {
        validate_path_component("student id", student_id)?;
        validate_path_component("filename", filename)?;
        Ok(Self(format!("{}/{}", student_id, filename)))
    }

    /// Parse a handle previously produced by [`BlobHandle::new`]
    pub fn parse(handle: &str) -> PortalResult<Self> {
        let (student_id, filename) = handle
            .split_once('/')
            .ok_or_else(|| PortalError::NotFound(format!("blob {}", handle)))?;
        Self::new(student_id, filename)
    }

    pub fn student_id(&self) -> &str {
        self.parts().0
    }

    pub fn filename(&self) -> &str {
        self.parts().1
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn parts(&self) -> (&str, &str) {
        // Both halves were validated on construction and neither contains '/'
        self.0.split_once('/').unwrap_or((self.0.as_str(), ""))
    }
}

impl fmt::Display for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of writing content to the blob store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
    pub handle: BlobHandle,
    /// Where the bytes live on disk
    pub path: PathBuf,
    pub size: u64,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: String,
    pub student_id: String,
    /// Original filename as supplied by the uploader
    pub filename: String,
    pub handle: BlobHandle,
    pub path: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// A name may be stored verbatim only if it stays inside its namespace directory.
fn validate_path_component(label: &str, value: &str) -> PortalResult<()> {
    if value.trim().is_empty() {
        return Err(PortalError::InvalidInput(format!("{} cannot be empty", label)));
    }
    if value.len() > MAX_COMPONENT_LEN {
        return Err(PortalError::InvalidInput(format!(
            "{} cannot exceed {} bytes",
            label, MAX_COMPONENT_LEN
        )));
    }
    if value.chars().any(char::is_control) {
        return Err(PortalError::InvalidInput(format!(
            "{} {:?} cannot contain control characters",
            label, value
        )));
    }
    if value == "." || value == ".." || value.contains(['/', '\\']) {
        return Err(PortalError::InvalidInput(format!(
            "{} '{}' must be a plain file name",
            label, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_layout() {
        let handle = BlobHandle::new("S1", "marksheet.pdf").unwrap();
        assert_eq!(handle.as_str(), "S1/marksheet.pdf");
        assert_eq!(handle.student_id(), "S1");
        assert_eq!(handle.filename(), "marksheet.pdf");
        assert_eq!(BlobHandle::parse("S1/marksheet.pdf").unwrap(), handle);
    }

    #[test]
    fn test_filenames_keep_spaces_and_unicode() {
        let handle = BlobHandle::new("S1", "Bus Pass – 2025.jpg").unwrap();
        assert_eq!(handle.filename(), "Bus Pass – 2025.jpg");
    }

    #[test]
    fn test_traversal_is_rejected() {
        for bad in ["", " ", ".", "..", "../etc/passwd", "a/b", "a\\b", "nul\0byte"] {
            let err = BlobHandle::new("S1", bad).unwrap_err();
            assert_eq!(err.kind(), "invalid_input", "accepted {:?}", bad);
        }
        assert!(BlobHandle::new("..", "x.pdf").is_err());
    }

    #[test]
    fn test_control_characters_are_rejected() {
        for bad in ["mark\nsheet.pdf", "tab\there.pdf", "bell\x07.pdf", "del\x7f.pdf", "cr\r.pdf"] {
            let err = BlobHandle::new("S1", bad).unwrap_err();
            assert_eq!(err.kind(), "invalid_input", "accepted {:?}", bad);
        }
        assert!(BlobHandle::new("S\n1", "x.pdf").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_handles() {
        assert_eq!(BlobHandle::parse("no-slash").unwrap_err().kind(), "not_found");
        assert!(BlobHandle::parse("S1/a/b").is_err());
    }
}
