pub mod academics;
pub mod service_request;
pub mod student;
pub mod transaction;
pub mod upload;
