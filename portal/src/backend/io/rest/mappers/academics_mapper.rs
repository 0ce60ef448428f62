use crate::backend::domain::models::academics::{CalendarEvent as DomainEvent, Timetable};
use shared::{CalendarEvent, TimetableResponse, TimetableSlot};

pub struct AcademicsMapper;

impl AcademicsMapper {
    pub fn to_event_dto(domain: &DomainEvent) -> CalendarEvent {
        CalendarEvent {
            date: domain.date.format("%Y-%m-%d").to_string(),
            event: domain.event.clone(),
        }
    }

    pub fn to_timetable_dto(domain: &Timetable) -> TimetableResponse {
        TimetableResponse {
            days: domain.days.clone(),
            slots: domain
                .slots
                .iter()
                .map(|slot| TimetableSlot {
                    time: slot.time.clone(),
                    subjects: slot.subjects.clone(),
                })
                .collect(),
        }
    }
}
