//! Domain model for the forms students submit: scholarships, exam applications,
//! bus passes and the rest.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::backend::domain::error::{PortalError, PortalResult};

const MAX_DETAIL_LEN: usize = 1000;

pub const REEVALUATION_TYPES: [&str; 3] =
    ["Re-evaluation", "Challenge Valuation", "Rejection of Result"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
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

impl RequestKind {
    pub const ALL: [RequestKind; 10] = [
        RequestKind::Scholarship,
        RequestKind::Internship,
        RequestKind::CulturalEvent,
        RequestKind::BusPass,
        RequestKind::AadhaarRevalidation,
        RequestKind::FinalSubmission,
        RequestKind::CourseRegistration,
        RequestKind::ExamApplication,
        RequestKind::Reevaluation,
        RequestKind::Convocation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RequestKind::Scholarship => "scholarship",
            RequestKind::Internship => "internship",
            RequestKind::CulturalEvent => "cultural_event",
            RequestKind::BusPass => "bus_pass",
            RequestKind::AadhaarRevalidation => "aadhaar_revalidation",
            RequestKind::FinalSubmission => "final_submission",
            RequestKind::CourseRegistration => "course_registration",
            RequestKind::ExamApplication => "exam_application",
            RequestKind::Reevaluation => "reevaluation",
            RequestKind::Convocation => "convocation",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Human readable label used in confirmation messages
    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Scholarship => "Scholarship application",
            RequestKind::Internship => "Internship details",
            RequestKind::CulturalEvent => "Event participation",
            RequestKind::BusPass => "Bus pass details",
            RequestKind::AadhaarRevalidation => "Aadhaar revalidation",
            RequestKind::FinalSubmission => "Final submission",
            RequestKind::CourseRegistration => "Course registration",
            RequestKind::ExamApplication => "Exam application",
            RequestKind::Reevaluation => "Re-evaluation request",
            RequestKind::Convocation => "Convocation attendance",
        }
    }

    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            RequestKind::Scholarship => &["scholarship_type", "income_certificate_number"],
            RequestKind::Internship => &["company_name", "start_date", "end_date"],
            RequestKind::CulturalEvent => &["event_name"],
            RequestKind::BusPass => &["route_number"],
            RequestKind::AadhaarRevalidation => &["aadhaar_number"],
            RequestKind::FinalSubmission => &[],
            RequestKind::CourseRegistration => &["course_code", "course_name", "department", "semester"],
            RequestKind::ExamApplication => &["exam_name", "subjects"],
            RequestKind::Reevaluation => &["subject", "request_type"],
            RequestKind::Convocation => &["attending"],
        }
    }

    /// Check the submitted form fields for this kind.
    ///
    /// Values are expected to be trimmed already. Fields beyond the required
    /// ones are accepted and stored as given.
    pub fn validate_details(&self, details: &BTreeMap<String, String>) -> PortalResult<()> {
        for field in self.required_fields() {
            let present = details.get(*field).map(|v| !v.is_empty()).unwrap_or(false);
            if !present {
                return Err(PortalError::InvalidInput(format!(
                    "{} requires '{}'",
                    self.name(),
                    field
                )));
            }
        }

        for (key, value) in details {
            if key.trim().is_empty() {
                return Err(PortalError::InvalidInput("Detail names cannot be empty".to_string()));
            }
            if value.len() > MAX_DETAIL_LEN {
                return Err(PortalError::InvalidInput(format!(
                    "'{}' cannot exceed {} characters",
                    key, MAX_DETAIL_LEN
                )));
            }
        }

        match self {
            RequestKind::Internship => {
                let start = parse_date(details, "start_date")?;
                let end = parse_date(details, "end_date")?;
                if end < start {
                    return Err(PortalError::InvalidInput(
                        "Internship end_date cannot be before start_date".to_string(),
                    ));
                }
            }
            RequestKind::CourseRegistration => {
                let semester = field(details, "semester");
                match semester.parse::<u8>() {
                    Ok(n) if (1..=8).contains(&n) => {}
                    _ => {
                        return Err(PortalError::InvalidInput(format!(
                            "Semester must be between 1 and 8, got '{}'",
                            semester
                        )))
                    }
                }
            }
            RequestKind::Reevaluation => {
                let request_type = field(details, "request_type");
                if !REEVALUATION_TYPES.contains(&request_type) {
                    return Err(PortalError::InvalidInput(format!(
                        "request_type must be one of {}",
                        REEVALUATION_TYPES.join(", ")
                    )));
                }
            }
            RequestKind::Convocation => {
                let attending = field(details, "attending");
                if attending != "true" && attending != "false" {
                    return Err(PortalError::InvalidInput(
                        "attending must be 'true' or 'false'".to_string(),
                    ));
                }
            }
            RequestKind::AadhaarRevalidation => {
                let digits: String = field(details, "aadhaar_number")
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                if digits.len() != 12 || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(PortalError::InvalidInput(
                        "Aadhaar number must have 12 digits".to_string(),
                    ));
                }
            }
            _ => {}
        }

        Ok(())
    }
}

fn field<'a>(details: &'a BTreeMap<String, String>, name: &str) -> &'a str {
    details.get(name).map(String::as_str).unwrap_or("")
}

fn parse_date(details: &BTreeMap<String, String>, name: &str) -> PortalResult<NaiveDate> {
    let value = field(details, name);
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        PortalError::InvalidInput(format!("{} must be in YYYY-MM-DD format, got '{}'", name, value))
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: String,
    pub student_id: String,
    pub kind: RequestKind,
    pub details: BTreeMap<String, String>,
    /// Upload ids owned by the same student
    pub attachments: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_names_round_trip() {
        for kind in RequestKind::ALL {
            assert_eq!(RequestKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(RequestKind::from_name("library_card"), None);
    }

    #[test]
    fn test_missing_required_field() {
        let err = RequestKind::ExamApplication
            .validate_details(&details(&[("exam_name", "Finals")]))
            .unwrap_err();
        assert_eq!(err, PortalError::InvalidInput("exam_application requires 'subjects'".to_string()));
    }

    #[test]
    fn test_empty_required_field_counts_as_missing() {
        let result = RequestKind::BusPass.validate_details(&details(&[("route_number", "")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_exam_application_accepts_extra_fields() {
        let form = details(&[
            ("exam_name", "Semester 3"),
            ("subjects", "Maths, Physics"),
            ("hall_preference", "Block A"),
        ]);
        assert!(RequestKind::ExamApplication.validate_details(&form).is_ok());
    }

    #[test]
    fn test_internship_dates() {
        let ok = details(&[
            ("company_name", "Acme"),
            ("start_date", "2025-05-01"),
            ("end_date", "2025-06-30"),
        ]);
        assert!(RequestKind::Internship.validate_details(&ok).is_ok());

        let reversed = details(&[
            ("company_name", "Acme"),
            ("start_date", "2025-06-30"),
            ("end_date", "2025-05-01"),
        ]);
        assert!(RequestKind::Internship.validate_details(&reversed).is_err());

        let malformed = details(&[
            ("company_name", "Acme"),
            ("start_date", "01/05/2025"),
            ("end_date", "2025-06-30"),
        ]);
        assert!(RequestKind::Internship.validate_details(&malformed).is_err());
    }

    #[test]
    fn test_course_registration_semester_range() {
        let mut form = details(&[
            ("course_code", "CS301"),
            ("course_name", "Operating Systems"),
            ("department", "CSE"),
            ("semester", "5"),
        ]);
        assert!(RequestKind::CourseRegistration.validate_details(&form).is_ok());

        form.insert("semester".to_string(), "9".to_string());
        assert!(RequestKind::CourseRegistration.validate_details(&form).is_err());
    }

    #[test]
    fn test_reevaluation_type_must_be_known() {
        let ok = details(&[("subject", "Physics"), ("request_type", "Challenge Valuation")]);
        assert!(RequestKind::Reevaluation.validate_details(&ok).is_ok());

        let bad = details(&[("subject", "Physics"), ("request_type", "Regrade")]);
        assert!(RequestKind::Reevaluation.validate_details(&bad).is_err());
    }

    #[test]
    fn test_aadhaar_number_allows_grouping_spaces() {
        let ok = details(&[("aadhaar_number", "1234 5678 9012")]);
        assert!(RequestKind::AadhaarRevalidation.validate_details(&ok).is_ok());

        let short = details(&[("aadhaar_number", "12345")]);
        assert!(RequestKind::AadhaarRevalidation.validate_details(&short).is_err());
    }

    #[test]
    fn test_convocation_flag() {
        assert!(RequestKind::Convocation
            .validate_details(&details(&[("attending", "true")]))
            .is_ok());
        assert!(RequestKind::Convocation
            .validate_details(&details(&[("attending", "yes")]))
            .is_err());
    }
}
