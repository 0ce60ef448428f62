//! # Storage Traits
//!
//! Abstraction over where uploaded document content lives, so the document
//! service can be exercised against any backend.

use crate::backend::domain::error::PortalResult;
use crate::backend::domain::models::upload::{BlobHandle, StoredBlob};

/// Content-addressed-by-name storage for uploaded documents.
///
/// Content is namespaced per student. Storing the same filename twice for one
/// student replaces the content; the last writer wins.
pub trait BlobStore: Send + Sync {
    /// Durably write `content` under `{student_id}/{filename}`
    ///
    /// Fails with `InvalidInput` when either name is not a safe path
    /// component, and with `StorageFailure` when the write does not complete.
    fn store(&self, student_id: &str, filename: &str, content: &[u8]) -> PortalResult<StoredBlob>;

    /// Files held for a student as `(filename, handle)` pairs in first-store order
    fn list(&self, student_id: &str) -> PortalResult<Vec<(String, BlobHandle)>>;

    /// Read back the full content behind a handle
    fn retrieve(&self, handle: &BlobHandle) -> PortalResult<Vec<u8>>;
}
