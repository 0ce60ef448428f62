//! Domain model for a fee payment.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub student_id: String,
    /// Never negative
    pub amount: f64,
    pub purpose: Option<String>,
    pub time: DateTime<Utc>,
}
