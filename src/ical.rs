use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use icalendar::{Calendar, Component, Event, EventLike};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::models::{Day, ScheduleEntry};

static START_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{1,2})[:.](\d{2})").expect("regex compiles"));

#[derive(Clone)]
pub struct ICalExporter {
    calendar_name: String,
    location: String,
}

impl ICalExporter {
    pub fn new(calendar_name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            calendar_name: calendar_name.into(),
            location: location.into(),
        }
    }

    /// Events for `entries` during the week starting on `monday`. Entries whose
    /// time cannot be read are left out.
    pub fn generate(&self, entries: &[ScheduleEntry<'_>], monday: NaiveDate) -> Vec<u8> {
        if entries.is_empty() {
            return Vec::new();
        }

        let mut calendar = Calendar::new();
        calendar.name(&self.calendar_name);

        for entry in entries {
            let c = entry.session;
            let Some(start) = session_start(monday, c.day, &c.time) else {
                warn!(
                    class_id = %c.id,
                    time = %c.time,
                    "skipping class with unreadable start time"
                );
                continue;
            };
            let end = start + Duration::minutes(i64::from(c.duration));

            let mut event = Event::new();
            event.summary(&format!("Forge: {}", c.name));
            event.starts(start);
            event.ends(end);
            event.location(&self.location);
            event.description(&format!(
                "{} Class\nTrainer: {}\nIntensity: {}\nSpots left: {}",
                c.session_type, entry.trainer_name, c.intensity, c.spots_left
            ));
            event.uid(&format!(
                "{}-{}-forge-schedule",
                start.format("%Y%m%dT%H%M%S"),
                c.slug
            ));
            calendar.push(event);
        }

        calendar.to_string().into_bytes()
    }
}

/// Parses the leading `HH:MM` of a free-form time label.
pub fn parse_start_time(label: &str) -> Option<NaiveTime> {
    let caps = START_TIME.captures(label)?;
    let hour = caps[1].parse().ok()?;
    let minute = caps[2].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

pub fn session_start(monday: NaiveDate, day: Day, time: &str) -> Option<NaiveDateTime> {
    let date = monday + Duration::days(i64::from(day.weekday().num_days_from_monday()));
    Some(date.and_time(parse_start_time(time)?))
}

/// Monday of the current week in `tz`.
pub fn current_monday<Tz: TimeZone>(tz: &Tz) -> NaiveDate {
    let today = Utc::now().with_timezone(tz).date_naive();
    today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassSession, Intensity, SessionType};

    fn session(day: Day, time: &str) -> ClassSession {
        ClassSession {
            id: "c1".to_string(),
            name: "Saturday Forge".to_string(),
            trainer_id: "alex-vane".to_string(),
            day,
            time: time.to_string(),
            duration: 90,
            session_type: SessionType::Strength,
            intensity: Intensity::Extreme,
            spots_left: 4,
            slug: "saturday-forge".to_string(),
        }
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 24).unwrap()
    }

    #[test]
    fn test_parse_start_time() {
        assert_eq!(parse_start_time("06:00"), NaiveTime::from_hms_opt(6, 0, 0));
        assert_eq!(parse_start_time("7.30 AM"), NaiveTime::from_hms_opt(7, 30, 0));
        assert_eq!(parse_start_time("25:00"), None);
        assert_eq!(parse_start_time("Dawn"), None);
    }

    #[test]
    fn test_session_start_offsets_from_monday() {
        let start = session_start(monday(), Day::Saturday, "09:00").unwrap();
        assert_eq!(start.to_string(), "2025-11-29 09:00:00");
    }

    #[test]
    fn test_current_monday_is_monday() {
        let monday = current_monday(&chrono_tz::Europe::London);
        assert_eq!(monday.weekday(), chrono::Weekday::Mon);
    }

    #[test]
    fn test_generate_single_class() {
        let exporter = ICalExporter::new("Forge Schedule", "Forge HQ");
        let class = session(Day::Saturday, "09:00");
        let entry = ScheduleEntry {
            session: &class,
            trainer_name: "Alex Vane",
        };
        let body = String::from_utf8(exporter.generate(&[entry], monday())).unwrap();
        assert!(body.contains("BEGIN:VEVENT"));
        assert!(body.contains("Forge: Saturday Forge"));
        assert!(body.contains("20251129T090000-saturday-forge-forge-schedule"));
        assert!(body.contains("Trainer: Alex Vane"));
    }

    #[test]
    fn test_generate_skips_unreadable_time() {
        let exporter = ICalExporter::new("Forge Schedule", "Forge HQ");
        let class = session(Day::Monday, "TBD");
        let entry = ScheduleEntry {
            session: &class,
            trainer_name: "Alex Vane",
        };
        let body = String::from_utf8(exporter.generate(&[entry], monday())).unwrap();
        assert!(!body.contains("BEGIN:VEVENT"));
    }

    #[test]
    fn test_generate_empty() {
        let exporter = ICalExporter::new("Forge Schedule", "Forge HQ");
        assert!(exporter.generate(&[], monday()).is_empty());
    }
}
