use crate::backend::domain::models::upload::{BlobHandle, UploadRecord as DomainUpload};
use shared::{StoredFile, UploadRecord as SharedUpload};

pub struct UploadMapper;

impl UploadMapper {
    pub fn to_dto(domain: DomainUpload) -> SharedUpload {
        SharedUpload {
            id: domain.id,
            student_id: domain.student_id,
            filename: domain.filename,
            handle: domain.handle.to_string(),
            path: domain.path,
            size: domain.size,
            uploaded_at: domain.uploaded_at.to_rfc3339(),
        }
    }

    pub fn to_stored_file(entry: (String, BlobHandle)) -> StoredFile {
        let (filename, handle) = entry;
        StoredFile {
            filename,
            handle: handle.to_string(),
        }
    }
}
