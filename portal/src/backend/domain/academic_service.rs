use chrono::NaiveDate;
use log::info;

use crate::backend::domain::models::academics::{CalendarEvent, Timetable};

/// Read-only academic information published by the college
#[derive(Debug, Clone)]
pub struct AcademicService {
    calendar: Vec<CalendarEvent>,
    timetable: Timetable,
}

impl AcademicService {
    /// Events are kept sorted by date; events on the same date keep their given order.
    pub fn new(mut calendar: Vec<CalendarEvent>, timetable: Timetable) -> Self {
        calendar.sort_by_key(|event| event.date);
        info!(
            "Loaded academic calendar with {} events and a {}-slot timetable",
            calendar.len(),
            timetable.slots.len()
        );
        Self { calendar, timetable }
    }

    pub fn calendar(&self) -> &[CalendarEvent] {
        &self.calendar
    }

    /// Events on or after `date`
    pub fn upcoming(&self, date: NaiveDate) -> Vec<CalendarEvent> {
        self.calendar
            .iter()
            .filter(|event| event.date >= date)
            .cloned()
            .collect()
    }

    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::academics::TimetableSlot;

    fn event(date: &str, name: &str) -> CalendarEvent {
        CalendarEvent {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            event: name.to_string(),
        }
    }

    #[test]
    fn test_calendar_is_sorted_by_date() {
        let service = AcademicService::new(
            vec![
                event("2025-12-20", "Semester ends"),
                event("2025-08-01", "Semester begins"),
                event("2025-10-15", "Midterm Exams"),
            ],
            Timetable { days: vec![], slots: vec![] },
        );
        let names: Vec<_> = service.calendar().iter().map(|e| e.event.as_str()).collect();
        assert_eq!(names, vec!["Semester begins", "Midterm Exams", "Semester ends"]);

        let upcoming = service.upcoming(NaiveDate::from_ymd_opt(2025, 10, 15).unwrap());
        assert_eq!(upcoming.len(), 2);
    }

    #[test]
    fn test_timetable_is_returned_as_given() {
        let timetable = Timetable {
            days: vec!["Monday".to_string(), "Tuesday".to_string()],
            slots: vec![TimetableSlot {
                time: "09:00-10:00".to_string(),
                subjects: vec!["Math".to_string(), "English".to_string()],
            }],
        };
        let service = AcademicService::new(Vec::new(), timetable.clone());
        assert_eq!(service.timetable(), &timetable);
    }
}
