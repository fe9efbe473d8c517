//! Test data helpers for creating request payloads

use chrono::{NaiveDate, NaiveTime};
use EventBoard::models::event::EventFormat;
use EventBoard::models::request::CreateEventRequestData;

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid test date")
}

pub fn time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M").expect("valid test time")
}

/// A minimal valid request payload for one day and time window
pub fn request_data(
    organizer_id: i64,
    day: &str,
    time_start: &str,
    time_end: &str,
) -> CreateEventRequestData {
    CreateEventRequestData {
        organizer_id,
        title: "Board games night".to_string(),
        date_start: date(day),
        date_end: date(day),
        time_start: time(time_start),
        time_end: time(time_end),
        place: "Main hall".to_string(),
        format: EventFormat::Open,
        department_id: None,
        department_ids: None,
        labels: vec![],
        limit_participants: None,
        description: "An evening of board games".to_string(),
        post_link: None,
        reg_link: None,
        responsible_link: None,
        repeat: None,
    }
}

/// Request payload spanning several days
pub fn multi_day_request_data(
    organizer_id: i64,
    day_start: &str,
    day_end: &str,
    time_start: &str,
    time_end: &str,
) -> CreateEventRequestData {
    let mut data = request_data(organizer_id, day_start, time_start, time_end);
    data.date_end = date(day_end);
    data
}
