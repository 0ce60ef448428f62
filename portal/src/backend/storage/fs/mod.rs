//! # Filesystem Storage
//!
//! Uploaded documents are kept as plain files, one directory per student:
//!
//! ```text
//! college_portal_files/
//!   3f9c2a1b/
//!     marksheet.pdf
//!     photo.jpg
//! ```

pub mod blob_store;

#[cfg(test)]
pub mod test_utils;

pub use blob_store::FsBlobStore;
