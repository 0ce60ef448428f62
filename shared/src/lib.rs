use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A registered student as seen by API consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Short opaque identifier, e.g. "3f9c2a1b"
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Date of birth (YYYY-MM-DD)
    pub date_of_birth: Option<String>,
    /// Course or department, e.g. "CSE"
    pub course: String,
    pub semester: Option<u8>,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// RFC 3339 timestamp
    pub updated_at: String,
}

/// Request to register a new student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterStudentRequest {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    /// Date of birth (YYYY-MM-DD)
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub semester: Option<u8>,
}

/// Partial profile update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub semester: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentResponse {
    pub student: Student,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentListResponse {
    pub students: Vec<Student>,
}

/// Metadata of one uploaded document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: String,
    pub student_id: String,
    pub filename: String,
    /// Opaque handle in the form "{student_id}/{filename}"
    pub handle: String,
    /// Location of the stored content on the server
    pub path: String,
    pub size: u64,
    /// RFC 3339 timestamp
    pub uploaded_at: String,
}

/// A file currently held by the blob store for a student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    pub filename: String,
    pub handle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub uploads: Vec<UploadRecord>,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadListResponse {
    pub uploads: Vec<UploadRecord>,
    pub stored_files: Vec<StoredFile>,
}

/// Request to pay a fee on behalf of a student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Must be zero or positive
    pub amount: f64,
    /// Free text such as "Semester fee"
    #[serde(default)]
    pub purpose: Option<String>,
}

/// A completed payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub student_id: String,
    pub amount: f64,
    pub purpose: Option<String>,
    /// RFC 3339 timestamp
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub transaction: Transaction,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
}

/// Every form a student can submit besides registration, uploads and payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceRequestKind {
    Scholarship,
    Internship,
    CulturalEvent,
    BusPass,
    AadhaarRevalidation,
    FinalSubmission,
    CourseRegistration,
    ExamApplication,
    Reevaluation,
    Convocation,
}

impl fmt::Display for ServiceRequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceRequestKind::Scholarship => "scholarship",
            ServiceRequestKind::Internship => "internship",
            ServiceRequestKind::CulturalEvent => "cultural_event",
            ServiceRequestKind::BusPass => "bus_pass",
            ServiceRequestKind::AadhaarRevalidation => "aadhaar_revalidation",
            ServiceRequestKind::FinalSubmission => "final_submission",
            ServiceRequestKind::CourseRegistration => "course_registration",
            ServiceRequestKind::ExamApplication => "exam_application",
            ServiceRequestKind::Reevaluation => "reevaluation",
            ServiceRequestKind::Convocation => "convocation",
        };
        write!(f, "{}", name)
    }
}

/// Request body for submitting a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitServiceRequest {
    pub kind: ServiceRequestKind,
    /// Form fields, e.g. {"exam_name": "Semester 3 Finals"}
    #[serde(default)]
    pub details: BTreeMap<String, String>,
    /// Upload ids of documents attached to this request
    #[serde(default)]
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: String,
    pub student_id: String,
    pub kind: ServiceRequestKind,
    pub details: BTreeMap<String, String>,
    pub attachments: Vec<String>,
    /// RFC 3339 timestamp
    pub submitted_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequestResponse {
    pub request: ServiceRequest,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequestListResponse {
    pub requests: Vec<ServiceRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// YYYY-MM-DD
    pub date: String,
    pub event: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicCalendarResponse {
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableSlot {
    /// e.g. "09:00-10:00"
    pub time: String,
    /// One subject per day, in the same order as `TimetableResponse::days`
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableResponse {
    pub days: Vec<String>,
    pub slots: Vec<TimetableSlot>,
}

/// Tabular report rendered as JSON; rows follow the order of `columns`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub report: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalInfoResponse {
    pub college_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionUpdatesResponse {
    pub updates: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub students: usize,
    pub uploads: usize,
    pub transactions: usize,
    pub service_requests: usize,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine readable kind, e.g. "unknown_student"
    pub error: String,
    pub message: String,
}
