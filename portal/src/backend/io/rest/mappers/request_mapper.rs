//! Conversions for service requests. The wire enum lives in `shared` so the
//! domain enum can grow validation rules without touching API consumers.

use crate::backend::domain::commands::requests::SubmitServiceRequestCommand;
use crate::backend::domain::models::service_request::{RequestKind, ServiceRequest as DomainRequest};
use shared::{ServiceRequest as SharedRequest, ServiceRequestKind, SubmitServiceRequest};

pub struct RequestMapper;

impl RequestMapper {
    pub fn to_domain_kind(kind: ServiceRequestKind) -> RequestKind {
        match kind {
            ServiceRequestKind::Scholarship => RequestKind::Scholarship,
            ServiceRequestKind::Internship => RequestKind::Internship,
            ServiceRequestKind::CulturalEvent => RequestKind::CulturalEvent,
            ServiceRequestKind::BusPass => RequestKind::BusPass,
            ServiceRequestKind::AadhaarRevalidation => RequestKind::AadhaarRevalidation,
            ServiceRequestKind::FinalSubmission => RequestKind::FinalSubmission,
            ServiceRequestKind::CourseRegistration => RequestKind::CourseRegistration,
            ServiceRequestKind::ExamApplication => RequestKind::ExamApplication,
            ServiceRequestKind::Reevaluation => RequestKind::Reevaluation,
            ServiceRequestKind::Convocation => RequestKind::Convocation,
        }
    }

    pub fn to_dto_kind(kind: RequestKind) -> ServiceRequestKind {
        match kind {
            RequestKind::Scholarship => ServiceRequestKind::Scholarship,
            RequestKind::Internship => ServiceRequestKind::Internship,
            RequestKind::CulturalEvent => ServiceRequestKind::CulturalEvent,
            RequestKind::BusPass => ServiceRequestKind::BusPass,
            RequestKind::AadhaarRevalidation => ServiceRequestKind::AadhaarRevalidation,
            RequestKind::FinalSubmission => ServiceRequestKind::FinalSubmission,
            RequestKind::CourseRegistration => ServiceRequestKind::CourseRegistration,
            RequestKind::ExamApplication => ServiceRequestKind::ExamApplication,
            RequestKind::Reevaluation => ServiceRequestKind::Reevaluation,
            RequestKind::Convocation => ServiceRequestKind::Convocation,
        }
    }

    pub fn to_dto(domain: DomainRequest) -> SharedRequest {
        SharedRequest {
            id: domain.id,
            student_id: domain.student_id,
            kind: Self::to_dto_kind(domain.kind),
            details: domain.details,
            attachments: domain.attachments,
            submitted_at: domain.submitted_at.to_rfc3339(),
        }
    }

    pub fn to_command(student_id: String, request: SubmitServiceRequest) -> SubmitServiceRequestCommand {
        SubmitServiceRequestCommand {
            student_id,
            kind: Self::to_domain_kind(request.kind),
            details: request.details,
            attachments: request.attachments,
        }
    }
}
