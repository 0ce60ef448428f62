//! College portal backend: student records, document uploads, fee payments,
//! service requests and CSV reports behind a JSON HTTP API.

pub mod backend;
