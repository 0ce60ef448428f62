use log::{info, warn};
use std::sync::Arc;

use crate::backend::domain::academic_service::AcademicService;
use crate::backend::domain::commands::requests::ServiceRequestQuery;
use crate::backend::domain::error::{PortalError, PortalResult};
use crate::backend::domain::models::academics::CalendarEvent;
use crate::backend::domain::models::service_request::ServiceRequest;
use crate::backend::domain::models::student::Student;
use crate::backend::domain::models::transaction::Transaction;
use crate::backend::domain::models::upload::UploadRecord;
use crate::backend::domain::record_store::RecordStore;
use crate::backend::domain::report_formatter::{self, LineEnding, Report, Tabular};

/// The tabular exports the portal offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Students,
    Transactions,
    Uploads,
    ServiceRequests,
    AcademicCalendar,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::Students,
        ReportKind::Transactions,
        ReportKind::Uploads,
        ReportKind::ServiceRequests,
        ReportKind::AcademicCalendar,
    ];

    /// Look a report up by the name used in URLs
    pub fn parse(name: &str) -> PortalResult<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| PortalError::NotFound(format!("report {}", name)))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::Students => "students",
            ReportKind::Transactions => "transactions",
            ReportKind::Uploads => "uploads",
            ReportKind::ServiceRequests => "requests",
            ReportKind::AcademicCalendar => "calendar",
        }
    }

    /// Suggested download filename
    pub fn file_name(&self) -> &'static str {
        match self {
            ReportKind::Students => "students.csv",
            ReportKind::Transactions => "transactions.csv",
            ReportKind::Uploads => "uploaded_files.csv",
            ReportKind::ServiceRequests => "service_requests.csv",
            ReportKind::AcademicCalendar => "academic_calendar.csv",
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            ReportKind::Students => &["student_id", "first", "last", "email", "course"],
            ReportKind::Transactions => &["id", "student", "amount", "time"],
            ReportKind::Uploads => &["student_id", "filename", "path"],
            ReportKind::ServiceRequests => &["id", "student", "kind", "details", "submitted_at"],
            ReportKind::AcademicCalendar => &["Date", "Event"],
        }
    }
}

/// A rendered CSV download
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
    pub row_count: usize,
}

impl Tabular for Student {
    fn field(&self, column: &str) -> Option<String> {
        match column {
            "student_id" => Some(self.id.clone()),
            "first" => Some(self.first_name.clone()),
            "last" => Some(self.last_name.clone()),
            "email" => Some(self.email.clone()),
            "course" => Some(self.course.clone()),
            "phone" => Some(self.phone.clone()),
            "semester" => self.semester.map(|s| s.to_string()),
            _ => None,
        }
    }
}

impl Tabular for Transaction {
    fn field(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.clone()),
            "student" => Some(self.student_id.clone()),
            "amount" => Some(self.amount.to_string()),
            "time" => Some(self.time.to_rfc3339()),
            "purpose" => self.purpose.clone(),
            _ => None,
        }
    }
}

impl Tabular for UploadRecord {
    fn field(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.clone()),
            "student_id" => Some(self.student_id.clone()),
            "filename" => Some(self.filename.clone()),
            "path" => Some(self.path.clone()),
            "size" => Some(self.size.to_string()),
            _ => None,
        }
    }
}

impl Tabular for ServiceRequest {
    fn field(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.clone()),
            "student" => Some(self.student_id.clone()),
            "kind" => Some(self.kind.name().to_string()),
            "details" => Some(
                self.details
                    .iter()
                    .map(|(key, value)| format!("{}={}", key, value))
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            "submitted_at" => Some(self.submitted_at.to_rfc3339()),
            _ => None,
        }
    }
}

impl Tabular for CalendarEvent {
    fn field(&self, column: &str) -> Option<String> {
        match column {
            "Date" => Some(self.date.format("%Y-%m-%d").to_string()),
            "Event" => Some(self.event.clone()),
            _ => None,
        }
    }
}

/// Service that builds the portal's reports from live records
#[derive(Clone)]
pub struct ReportService {
    records: Arc<RecordStore>,
    academics: Arc<AcademicService>,
    line_ending: LineEnding,
}

impl ReportService {
    pub fn new(records: Arc<RecordStore>, academics: Arc<AcademicService>, line_ending: LineEnding) -> Self {
        Self {
            records,
            academics,
            line_ending,
        }
    }

    pub fn build(&self, kind: ReportKind) -> PortalResult<Report> {
        info!("Building {} report", kind.name());

        let columns = kind.columns();
        let report = match kind {
            ReportKind::Students => report_formatter::to_rows(&self.records.list_students()?, columns),
            ReportKind::Transactions => {
                report_formatter::to_rows(&self.records.list_transactions(None)?, columns)
            }
            ReportKind::Uploads => report_formatter::to_rows(&self.records.list_uploads(None)?, columns),
            ReportKind::ServiceRequests => report_formatter::to_rows(
                &self.records.list_service_requests(&ServiceRequestQuery::default())?,
                columns,
            ),
            ReportKind::AcademicCalendar => report_formatter::to_rows(self.academics.calendar(), columns),
        };

        info!("Built {} report with {} rows", kind.name(), report.len());
        Ok(report)
    }

    pub fn export_csv(&self, kind: ReportKind) -> PortalResult<CsvExport> {
        let report = self.build(kind)?;
        let content = report_formatter::to_csv(&report, self.line_ending).map_err(|e| {
            warn!("Failed to render {} report: {}", kind.name(), e);
            e
        })?;

        info!(
            "Exported {} report as {} ({} bytes)",
            kind.name(),
            kind.file_name(),
            content.len()
        );
        Ok(CsvExport {
            file_name: kind.file_name().to_string(),
            content,
            row_count: report.len(),
        })
    }
}
