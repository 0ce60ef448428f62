use log::{info, warn};
use std::sync::Arc;

use crate::backend::domain::commands::documents::UploadDocumentCommand;
use crate::backend::domain::error::{PortalError, PortalResult};
use crate::backend::domain::models::upload::{BlobHandle, UploadRecord};
use crate::backend::domain::record_store::RecordStore;
use crate::backend::storage::traits::BlobStore;

/// Service for storing uploaded documents and keeping their metadata in step
#[derive(Clone)]
pub struct DocumentService {
    records: Arc<RecordStore>,
    blobs: Arc<dyn BlobStore>,
}

impl DocumentService {
    pub fn new(records: Arc<RecordStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { records, blobs }
    }

    /// Store one document for a registered student.
    ///
    /// The student is checked before any bytes are written, so uploads for an
    /// unknown student never reach the blob store.
    pub fn upload_document(&self, command: UploadDocumentCommand) -> PortalResult<UploadRecord> {
        info!(
            "Uploading document '{}' ({} bytes) for student {}",
            command.filename,
            command.content.len(),
            command.student_id
        );

        if !self.records.student_exists(&command.student_id)? {
            warn!("Upload rejected, unknown student: {}", command.student_id);
            return Err(PortalError::UnknownStudent(command.student_id));
        }

        let blob = self
            .blobs
            .store(&command.student_id, &command.filename, &command.content)?;
        let record = self
            .records
            .record_upload(&command.student_id, &command.filename, &blob)?;

        info!("Uploaded document {} as {}", record.handle, record.id);
        Ok(record)
    }

    /// Store several files in the order given, stopping at the first failure.
    ///
    /// Files stored before the failure stay stored and recorded.
    pub fn upload_documents(
        &self,
        student_id: &str,
        files: Vec<(String, Vec<u8>)>,
    ) -> PortalResult<Vec<UploadRecord>> {
        if files.is_empty() {
            return Err(PortalError::InvalidInput("No files selected".to_string()));
        }

        let mut records = Vec::with_capacity(files.len());
        for (filename, content) in files {
            records.push(self.upload_document(UploadDocumentCommand {
                student_id: student_id.to_string(),
                filename,
                content,
            })?);
        }
        Ok(records)
    }

    /// Every upload the student has made, including re-uploads of one filename
    pub fn list_documents(&self, student_id: &str) -> PortalResult<Vec<UploadRecord>> {
        self.ensure_student(student_id)?;
        self.records.list_uploads(Some(student_id))
    }

    /// Files currently held for the student, one entry per filename
    pub fn stored_files(&self, student_id: &str) -> PortalResult<Vec<(String, BlobHandle)>> {
        self.ensure_student(student_id)?;
        self.blobs.list(student_id)
    }

    /// Metadata and current content of an upload
    pub fn read_document(&self, upload_id: &str) -> PortalResult<(UploadRecord, Vec<u8>)> {
        let record = self.records.get_upload(upload_id)?;
        let content = self.blobs.retrieve(&record.handle)?;
        Ok((record, content))
    }

    fn ensure_student(&self, student_id: &str) -> PortalResult<()> {
        if self.records.student_exists(student_id)? {
            Ok(())
        } else {
            Err(PortalError::UnknownStudent(student_id.to_string()))
        }
    }
}
