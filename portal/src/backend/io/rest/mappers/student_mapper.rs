//! Conversions between shared student DTOs and domain students.

use crate::backend::domain::commands::student::{RegisterStudentCommand, UpdateStudentCommand};
use crate::backend::domain::models::student::Student as DomainStudent;
use shared::{RegisterStudentRequest, Student as SharedStudent, UpdateStudentRequest};

pub struct StudentMapper;

impl StudentMapper {
    pub fn to_dto(domain: DomainStudent) -> SharedStudent {
        SharedStudent {
            id: domain.id,
            first_name: domain.first_name,
            last_name: domain.last_name,
            email: domain.email,
            phone: domain.phone,
            address: domain.address,
            date_of_birth: domain.date_of_birth.map(|d| d.format("%Y-%m-%d").to_string()),
            course: domain.course,
            semester: domain.semester,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_register_command(request: RegisterStudentRequest) -> RegisterStudentCommand {
        RegisterStudentCommand {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            date_of_birth: request.date_of_birth,
            course: request.course,
            semester: request.semester,
        }
    }

    pub fn to_update_command(student_id: String, request: UpdateStudentRequest) -> UpdateStudentCommand {
        UpdateStudentCommand {
            student_id,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            date_of_birth: request.date_of_birth,
            course: request.course,
            semester: request.semester,
        }
    }
}
