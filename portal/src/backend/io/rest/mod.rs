//! # REST API Interface Layer
//!
//! One module per resource. Every handler logs the request line, calls one
//! domain operation and maps its result; failures go through
//! [`errors::error_response`] so clients always get `{error, message}`.

pub mod academic_apis;
pub mod errors;
pub mod mappers;
pub mod payment_apis;
pub mod portal_apis;
pub mod report_apis;
pub mod request_apis;
pub mod student_apis;
pub mod upload_apis;
