//! # Domain Module
//!
//! Business rules of the college portal: who is registered, what they uploaded,
//! what they paid and which forms they submitted, plus the reports built from
//! those records. Nothing here knows about HTTP.
//!
//! ## Module Organization
//!
//! - **record_store**: the in-memory collections and every mutation on them
//! - **document_service**: uploads, keeping blob content and metadata in step
//! - **report_formatter**: entity lists to rows and rows to CSV
//! - **report_service**: the named reports offered for download
//! - **academic_service**: calendar and timetable published by the college
//! - **identifiers**: id generation for each collection
//!
//! ## Business Rules
//!
//! - Every upload, payment and form refers to a registered student
//! - Payments are zero or positive
//! - A failed operation changes nothing and never reports success

pub mod academic_service;
pub mod commands;
pub mod document_service;
pub mod error;
pub mod identifiers;
pub mod models;
pub mod record_store;
pub mod report_formatter;
pub mod report_service;

pub use academic_service::AcademicService;
pub use document_service::DocumentService;
pub use error::{PortalError, PortalResult};
pub use identifiers::IdentifierGenerators;
pub use record_store::{RecordCounts, RecordStore};
pub use report_service::{CsvExport, ReportKind, ReportService};
