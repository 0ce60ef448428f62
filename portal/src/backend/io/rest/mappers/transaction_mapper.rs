use crate::backend::domain::commands::payment::RecordPaymentCommand;
use crate::backend::domain::models::transaction::Transaction as DomainTransaction;
use shared::{PaymentRequest, Transaction as SharedTransaction};

pub struct TransactionMapper;

impl TransactionMapper {
    pub fn to_dto(domain: DomainTransaction) -> SharedTransaction {
        SharedTransaction {
            id: domain.id,
            student_id: domain.student_id,
            amount: domain.amount,
            purpose: domain.purpose,
            time: domain.time.to_rfc3339(),
        }
    }

    pub fn to_command(student_id: String, request: PaymentRequest) -> RecordPaymentCommand {
        RecordPaymentCommand {
            student_id,
            amount: request.amount,
            purpose: request.purpose,
        }
    }
}
