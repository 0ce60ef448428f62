//! Domain model for a registered student.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: Option<NaiveDate>,
    /// Course or department
    pub course: String,
    pub semester: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_skips_missing_last_name() {
        let now = Utc::now();
        let mut student = Student {
            id: "S1".to_string(),
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@college.edu".to_string(),
            phone: String::new(),
            address: String::new(),
            date_of_birth: None,
            course: "CSE".to_string(),
            semester: Some(3),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(student.full_name(), "Asha Rao");

        student.last_name.clear();
        assert_eq!(student.full_name(), "Asha");
    }
}
