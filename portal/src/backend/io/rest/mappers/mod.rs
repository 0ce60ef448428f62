pub mod academics_mapper;
pub mod request_mapper;
pub mod student_mapper;
pub mod transaction_mapper;
pub mod upload_mapper;

pub use academics_mapper::AcademicsMapper;
pub use request_mapper::RequestMapper;
pub use student_mapper::StudentMapper;
pub use transaction_mapper::TransactionMapper;
pub use upload_mapper::UploadMapper;
