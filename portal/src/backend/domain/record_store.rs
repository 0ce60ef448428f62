//! # Record Store
//!
//! Single source of truth for students, uploads, transactions and service
//! requests. Every collection keeps insertion order and every mutation goes
//! through one write lock, so identifier allocation and foreign-key checks
//! happen atomically with the insert they guard. Reads share the lock.
//!
//! Students are never deleted, which means a student that passed the
//! foreign-key check stays valid for the lifetime of the store.

use chrono::{Datelike, NaiveDate, Utc};
use log::{info, warn};
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::backend::domain::commands::payment::RecordPaymentCommand;
use crate::backend::domain::commands::requests::{ServiceRequestQuery, SubmitServiceRequestCommand};
use crate::backend::domain::commands::student::{RegisterStudentCommand, UpdateStudentCommand};
use crate::backend::domain::error::{PortalError, PortalResult};
use crate::backend::domain::identifiers::{IdentifierGenerator, IdentifierGenerators};
use crate::backend::domain::models::service_request::{RequestKind, ServiceRequest};
use crate::backend::domain::models::student::Student;
use crate::backend::domain::models::transaction::Transaction;
use crate::backend::domain::models::upload::{StoredBlob, UploadRecord};

const MAX_NAME_LEN: usize = 100;
const MAX_TEXT_LEN: usize = 500;
const MAX_PURPOSE_LEN: usize = 200;
const MAX_ID_ATTEMPTS: usize = 16;

#[derive(Debug, Default)]
struct Collections {
    students: Vec<Student>,
    student_index: HashMap<String, usize>,
    uploads: Vec<UploadRecord>,
    transactions: Vec<Transaction>,
    service_requests: Vec<ServiceRequest>,
}

impl Collections {
    fn require_student(&self, student_id: &str) -> PortalResult<&Student> {
        self.student_index
            .get(student_id)
            .map(|&index| &self.students[index])
            .ok_or_else(|| PortalError::UnknownStudent(student_id.to_string()))
    }
}

/// Collection sizes, used by the health endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCounts {
    pub students: usize,
    pub uploads: usize,
    pub transactions: usize,
    pub service_requests: usize,
}

pub struct RecordStore {
    collections: RwLock<Collections>,
    ids: IdentifierGenerators,
}

impl RecordStore {
    pub fn new(ids: IdentifierGenerators) -> Self {
        Self {
            collections: RwLock::new(Collections::default()),
            ids,
        }
    }

    fn read(&self) -> PortalResult<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| PortalError::StorageFailure("Record store lock poisoned".to_string()))
    }

    fn write(&self) -> PortalResult<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| PortalError::StorageFailure("Record store lock poisoned".to_string()))
    }

    // ---------------------------------------------------------------------
    // Students
    // ---------------------------------------------------------------------

    /// Register a new student and return the stored record
    pub fn register_student(&self, command: RegisterStudentCommand) -> PortalResult<Student> {
        info!(
            "Registering student: first_name={}, email={}",
            command.first_name, command.email
        );

        let first_name = validate_name("First name", &command.first_name, true)?;
        let last_name = validate_name("Last name", &command.last_name, false)?;
        let email = validate_email(&command.email)?;
        let phone = validate_phone(&command.phone)?;
        let address = validate_text("Address", &command.address, MAX_TEXT_LEN)?;
        let course = validate_text("Course", &command.course, MAX_NAME_LEN)?;
        let date_of_birth = match command.date_of_birth.as_deref() {
            Some(value) => parse_date_of_birth(value)?,
            None => None,
        };
        let semester = command.semester.map(validate_semester).transpose()?;

        let mut collections = self.write()?;
        let id = fresh_id(self.ids.student.as_ref(), |candidate| {
            collections.student_index.contains_key(candidate)
        })?;

        let now = Utc::now();
        let student = Student {
            id: id.clone(),
            first_name,
            last_name,
            email,
            phone,
            address,
            date_of_birth,
            course,
            semester,
            created_at: now,
            updated_at: now,
        };

        let index = collections.students.len();
        collections.students.push(student.clone());
        collections.student_index.insert(id, index);

        info!("Registered student: {} with ID: {}", student.full_name(), student.id);
        Ok(student)
    }

    /// Overwrite the provided fields of an existing student
    pub fn update_student(&self, command: UpdateStudentCommand) -> PortalResult<Student> {
        info!("Updating student: {}", command.student_id);

        let mut collections = self.write()?;
        let index = *collections
            .student_index
            .get(&command.student_id)
            .ok_or_else(|| PortalError::UnknownStudent(command.student_id.clone()))?;

        let first_name = command
            .first_name
            .as_deref()
            .map(|v| validate_name("First name", v, true))
            .transpose()?;
        let last_name = command
            .last_name
            .as_deref()
            .map(|v| validate_name("Last name", v, false))
            .transpose()?;
        let email = command.email.as_deref().map(validate_email).transpose()?;
        let phone = command.phone.as_deref().map(validate_phone).transpose()?;
        let address = command
            .address
            .as_deref()
            .map(|v| validate_text("Address", v, MAX_TEXT_LEN))
            .transpose()?;
        let course = command
            .course
            .as_deref()
            .map(|v| validate_text("Course", v, MAX_NAME_LEN))
            .transpose()?;
        let date_of_birth = command
            .date_of_birth
            .as_deref()
            .map(parse_date_of_birth)
            .transpose()?;
        let semester = command.semester.map(validate_semester).transpose()?;

        let student = &mut collections.students[index];
        if let Some(first_name) = first_name {
            student.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            student.last_name = last_name;
        }
        if let Some(email) = email {
            student.email = email;
        }
        if let Some(phone) = phone {
            student.phone = phone;
        }
        if let Some(address) = address {
            student.address = address;
        }
        if let Some(course) = course {
            student.course = course;
        }
        // An empty date string clears the stored date of birth
        if let Some(date_of_birth) = date_of_birth {
            student.date_of_birth = date_of_birth;
        }
        if let Some(semester) = semester {
            student.semester = Some(semester);
        }
        student.updated_at = Utc::now();

        info!("Updated student: {} with ID: {}", student.full_name(), student.id);
        Ok(student.clone())
    }

    pub fn get_student(&self, student_id: &str) -> PortalResult<Student> {
        let collections = self.read()?;
        match collections.student_index.get(student_id) {
            Some(&index) => Ok(collections.students[index].clone()),
            None => {
                warn!("Student not found: {}", student_id);
                Err(PortalError::NotFound(format!("student {}", student_id)))
            }
        }
    }

    pub fn student_exists(&self, student_id: &str) -> PortalResult<bool> {
        Ok(self.read()?.student_index.contains_key(student_id))
    }

    /// All students in registration order
    pub fn list_students(&self) -> PortalResult<Vec<Student>> {
        Ok(self.read()?.students.clone())
    }

    // ---------------------------------------------------------------------
    // Uploads
    // ---------------------------------------------------------------------

    /// Record that `blob` was stored for a student
    pub fn record_upload(
        &self,
        student_id: &str,
        filename: &str,
        blob: &StoredBlob,
    ) -> PortalResult<UploadRecord> {
        info!("Recording upload '{}' for student {}", filename, student_id);

        let mut collections = self.write()?;
        collections.require_student(student_id)?;

        let id = fresh_id(self.ids.upload.as_ref(), |candidate| {
            collections.uploads.iter().any(|u| u.id == candidate)
        })?;

        let upload = UploadRecord {
            id,
            student_id: student_id.to_string(),
            filename: filename.to_string(),
            handle: blob.handle.clone(),
            path: blob.path.to_string_lossy().to_string(),
            size: blob.size,
            uploaded_at: Utc::now(),
        };
        collections.uploads.push(upload.clone());

        info!("Recorded upload {} ({} bytes) as {}", upload.handle, upload.size, upload.id);
        Ok(upload)
    }

    /// All uploads, or those of one student, in upload order
    pub fn list_uploads(&self, student_id: Option<&str>) -> PortalResult<Vec<UploadRecord>> {
        let collections = self.read()?;
        Ok(collections
            .uploads
            .iter()
            .filter(|u| student_id.map_or(true, |id| u.student_id == id))
            .cloned()
            .collect())
    }

    pub fn get_upload(&self, upload_id: &str) -> PortalResult<UploadRecord> {
        self.read()?
            .uploads
            .iter()
            .find(|u| u.id == upload_id)
            .cloned()
            .ok_or_else(|| PortalError::NotFound(format!("upload {}", upload_id)))
    }

    // ---------------------------------------------------------------------
    // Transactions
    // ---------------------------------------------------------------------

    /// Record a successful fee payment
    pub fn record_transaction(&self, command: RecordPaymentCommand) -> PortalResult<Transaction> {
        info!(
            "Recording payment of {} for student {}",
            command.amount, command.student_id
        );

        let mut collections = self.write()?;
        collections.require_student(&command.student_id)?;

        if !command.amount.is_finite() || command.amount < 0.0 {
            warn!("Rejected payment amount {}", command.amount);
            return Err(PortalError::InvalidAmount(command.amount));
        }
        // -0.0 passes the check above; store it as a plain zero
        let amount = if command.amount == 0.0 { 0.0 } else { command.amount };

        let purpose = match command.purpose.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => Some(validate_text("Purpose", p, MAX_PURPOSE_LEN)?),
            _ => None,
        };

        let id = fresh_id(self.ids.transaction.as_ref(), |candidate| {
            candidate == command.student_id
                || collections.transactions.iter().any(|t| t.id == candidate)
        })?;

        let transaction = Transaction {
            id,
            student_id: command.student_id,
            amount,
            purpose,
            time: Utc::now(),
        };
        collections.transactions.push(transaction.clone());

        info!(
            "Recorded transaction {} of {} for student {}",
            transaction.id, transaction.amount, transaction.student_id
        );
        Ok(transaction)
    }

    /// All transactions, or those of one student, in creation order
    pub fn list_transactions(&self, student_id: Option<&str>) -> PortalResult<Vec<Transaction>> {
        let collections = self.read()?;
        Ok(collections
            .transactions
            .iter()
            .filter(|t| student_id.map_or(true, |id| t.student_id == id))
            .cloned()
            .collect())
    }

    // ---------------------------------------------------------------------
    // Service requests
    // ---------------------------------------------------------------------

    /// Store a submitted form after checking its fields and attachments
    pub fn record_service_request(
        &self,
        command: SubmitServiceRequestCommand,
    ) -> PortalResult<ServiceRequest> {
        info!(
            "Recording {} for student {}",
            command.kind.name(),
            command.student_id
        );

        let mut collections = self.write()?;
        collections.require_student(&command.student_id)?;

        let mut details: BTreeMap<String, String> = BTreeMap::new();
        for (key, value) in command.details {
            let key = key.trim().to_string();
            if details.contains_key(&key) {
                warn!("Duplicate detail '{}' in {}", key, command.kind.name());
                return Err(PortalError::InvalidInput(format!("duplicate detail '{}'", key)));
            }
            details.insert(key, value.trim().to_string());
        }
        command.kind.validate_details(&details)?;

        let mut attachments: Vec<String> = Vec::new();
        for upload_id in command.attachments {
            let upload = collections
                .uploads
                .iter()
                .find(|u| u.id == upload_id)
                .ok_or_else(|| PortalError::NotFound(format!("upload {}", upload_id)))?;
            if upload.student_id != command.student_id {
                return Err(PortalError::InvalidInput(format!(
                    "Upload {} does not belong to student {}",
                    upload_id, command.student_id
                )));
            }
            if !attachments.contains(&upload_id) {
                attachments.push(upload_id);
            }
        }

        if command.kind == RequestKind::FinalSubmission
            && !collections
                .uploads
                .iter()
                .any(|u| u.student_id == command.student_id)
        {
            return Err(PortalError::InvalidInput(
                "Upload at least one document before the final submission".to_string(),
            ));
        }

        let id = fresh_id(self.ids.request.as_ref(), |candidate| {
            collections.service_requests.iter().any(|r| r.id == candidate)
        })?;

        let request = ServiceRequest {
            id,
            student_id: command.student_id,
            kind: command.kind,
            details,
            attachments,
            submitted_at: Utc::now(),
        };
        collections.service_requests.push(request.clone());

        info!(
            "Recorded {} {} for student {}",
            request.kind.name(),
            request.id,
            request.student_id
        );
        Ok(request)
    }

    /// Submitted forms in submission order, optionally filtered
    pub fn list_service_requests(&self, query: &ServiceRequestQuery) -> PortalResult<Vec<ServiceRequest>> {
        let collections = self.read()?;
        Ok(collections
            .service_requests
            .iter()
            .filter(|r| query.student_id.as_deref().map_or(true, |id| r.student_id == id))
            .filter(|r| query.kind.map_or(true, |kind| r.kind == kind))
            .cloned()
            .collect())
    }

    pub fn counts(&self) -> PortalResult<RecordCounts> {
        let collections = self.read()?;
        Ok(RecordCounts {
            students: collections.students.len(),
            uploads: collections.uploads.len(),
            transactions: collections.transactions.len(),
            service_requests: collections.service_requests.len(),
        })
    }
}

/// Draw identifiers until one is not taken in the target collection
fn fresh_id(
    generator: &dyn IdentifierGenerator,
    taken: impl Fn(&str) -> bool,
) -> PortalResult<String> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = generator.next();
        if !taken(&candidate) {
            return Ok(candidate);
        }
        warn!("Identifier collision on {}, drawing again", candidate);
    }
    Err(PortalError::StorageFailure(
        "Could not allocate a unique identifier".to_string(),
    ))
}

fn validate_name(label: &str, value: &str, required: bool) -> PortalResult<String> {
    let value = value.trim();
    if required && value.is_empty() {
        return Err(PortalError::InvalidInput(format!("{} cannot be empty", label)));
    }
    validate_text(label, value, MAX_NAME_LEN)
}

fn validate_text(label: &str, value: &str, max_len: usize) -> PortalResult<String> {
    let value = value.trim();
    if value.chars().count() > max_len {
        return Err(PortalError::InvalidInput(format!(
            "{} cannot exceed {} characters",
            label, max_len
        )));
    }
    Ok(value.to_string())
}

fn validate_email(value: &str) -> PortalResult<String> {
    let email = value.trim();
    let malformed = || PortalError::InvalidInput(format!("Malformed email address: '{}'", email));

    let (local, domain) = email.split_once('@').ok_or_else(malformed)?;
    if local.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || domain.contains("..")
    {
        return Err(malformed());
    }
    validate_text("Email", email, MAX_NAME_LEN)
}

fn validate_phone(value: &str) -> PortalResult<String> {
    let phone = value.trim();
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')');
    if !phone.chars().all(allowed) {
        return Err(PortalError::InvalidInput(format!(
            "Phone number may only contain digits, spaces and + - ( ): '{}'",
            phone
        )));
    }
    validate_text("Phone", phone, 20)
}

fn validate_semester(semester: u8) -> PortalResult<u8> {
    if (1..=8).contains(&semester) {
        Ok(semester)
    } else {
        Err(PortalError::InvalidInput(format!(
            "Semester must be between 1 and 8, got {}",
            semester
        )))
    }
}

/// Parse YYYY-MM-DD; an empty string means "no date"
fn parse_date_of_birth(value: &str) -> PortalResult<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        PortalError::InvalidInput(format!(
            "Date of birth must be in YYYY-MM-DD format, got '{}'",
            value
        ))
    })?;

    if date.year() < 1900 {
        return Err(PortalError::InvalidInput(
            "Date of birth cannot be before 1900".to_string(),
        ));
    }
    if date > Utc::now().date_naive() {
        return Err(PortalError::InvalidInput(
            "Date of birth cannot be in the future".to_string(),
        ));
    }
    Ok(Some(date))
}
