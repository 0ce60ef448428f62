//! Domain-level command types.
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the DTOs defined in the
//! `shared` crate to these internal types.

pub mod student {
    /// Input for registering a student.
    #[derive(Debug, Clone, Default)]
    pub struct RegisterStudentCommand {
        pub first_name: String,
        pub last_name: String,
        pub email: String,
        pub phone: String,
        pub address: String,
        /// YYYY-MM-DD
        pub date_of_birth: Option<String>,
        pub course: String,
        pub semester: Option<u8>,
    }

    /// Partial profile edit. `None` leaves the field untouched.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateStudentCommand {
        pub student_id: String,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub address: Option<String>,
        pub date_of_birth: Option<String>,
        pub course: Option<String>,
        pub semester: Option<u8>,
    }
}

pub mod payment {
    /// Input for recording a fee payment.
    #[derive(Debug, Clone)]
    pub struct RecordPaymentCommand {
        pub student_id: String,
        pub amount: f64,
        pub purpose: Option<String>,
    }
}

pub mod documents {
    /// One file received from the uploader.
    #[derive(Debug, Clone)]
    pub struct UploadDocumentCommand {
        pub student_id: String,
        pub filename: String,
        pub content: Vec<u8>,
    }
}

pub mod requests {
    use crate::backend::domain::models::service_request::RequestKind;
    use std::collections::BTreeMap;

    /// Input for submitting any of the portal's forms.
    #[derive(Debug, Clone)]
    pub struct SubmitServiceRequestCommand {
        pub student_id: String,
        pub kind: RequestKind,
        pub details: BTreeMap<String, String>,
        pub attachments: Vec<String>,
    }

    /// Filter for listing submitted forms.
    #[derive(Debug, Clone, Default)]
    pub struct ServiceRequestQuery {
        pub student_id: Option<String>,
        pub kind: Option<RequestKind>,
    }
}
