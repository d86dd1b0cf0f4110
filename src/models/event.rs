use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};

const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One event as the Meetup API returns it. Fields we do not consume are
/// left to serde to ignore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetupEvent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub local_date: String,
    pub local_time: String,
    /// Elapsed time of the event, in milliseconds.
    pub duration: u64,
    #[serde(rename = "eventType")]
    pub event_type: EventType,
    pub group: EventGroup,
    pub venue: Option<Venue>,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Physical,
    Online,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventGroup {
    pub name: String,
    pub urlname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub city: String,
}

/// A Meetup event with the wire's split date/time collapsed into one local
/// timestamp and the millisecond duration broken into named units.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: String,
    pub link: String,
    pub event_type: EventType,
    pub group: EventGroup,
    pub venue: Option<Venue>,
    pub datetime: DateTime<Local>,
    pub duration: EventDuration,
}

impl Event {
    /// Combines `local_date` and `local_time` ("yyyy-MM-dd" + "HH:mm") into
    /// a process-local timestamp. A date/time the API hands us that does not
    /// parse, or does not exist in the local timezone, fails the whole fetch.
    pub fn from_meetup(raw: MeetupEvent) -> Result<Event> {
        let combined = format!("{} {}", raw.local_date, raw.local_time);
        let naive = NaiveDateTime::parse_from_str(&combined, LOCAL_DATETIME_FORMAT)
            .map_err(|e| {
                BotError::UpstreamFetch(format!(
                    "event {}: invalid local time {:?}: {}",
                    raw.id, combined, e
                ))
            })?;
        let datetime = naive.and_local_timezone(Local).earliest().ok_or_else(|| {
            BotError::UpstreamFetch(format!(
                "event {}: local time {:?} does not exist in this timezone",
                raw.id, combined
            ))
        })?;
        Ok(Event {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            link: raw.link,
            event_type: raw.event_type,
            group: raw.group,
            venue: raw.venue,
            datetime,
            duration: EventDuration::from_millis(raw.duration),
        })
    }
}

/// A raw millisecond count split into whole days, hours, minutes and
/// seconds. Events never span months, so no larger unit is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDuration {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl EventDuration {
    pub fn from_millis(millis: u64) -> Self {
        let total_seconds = millis / 1_000;
        EventDuration {
            days: total_seconds / 86_400,
            hours: total_seconds % 86_400 / 3_600,
            minutes: total_seconds % 3_600 / 60,
            seconds: total_seconds % 60,
        }
    }

    /// "3 hours 30 minutes" style, zero parts skipped, empty when the whole
    /// duration is zero.
    pub fn format(&self) -> String {
        let units = [
            (self.days, "day"),
            (self.hours, "hour"),
            (self.minutes, "minute"),
            (self.seconds, "second"),
        ];
        let mut parts: Vec<String> = Vec::new();
        for (amount, unit) in units {
            if amount > 0 {
                let plural = if amount == 1 { "" } else { "s" };
                parts.push(format!("{} {}{}", amount, unit, plural));
            }
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event() -> MeetupEvent {
        MeetupEvent {
            id: "281498261".to_string(),
            name: "Rust Hack and Learn".to_string(),
            description: "<p>Bring a laptop!</p>".to_string(),
            local_date: "2024-03-15".to_string(),
            local_time: "18:30".to_string(),
            duration: 12_600_000,
            event_type: EventType::Physical,
            group: EventGroup {
                name: "Rust London".to_string(),
                urlname: "rust-london".to_string(),
            },
            venue: Some(Venue {
                name: "The Crypt".to_string(),
                city: "London".to_string(),
            }),
            link: "https://www.meetup.com/rust-london/events/281498261/".to_string(),
        }
    }

    #[test]
    fn normalizes_local_date_and_time() {
        let event = Event::from_meetup(sample_event()).expect("normalization should succeed");
        let expected = Local.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap();
        assert_eq!(event.datetime, expected);
    }

    #[test]
    fn passes_other_fields_through_unchanged() {
        let event = Event::from_meetup(sample_event()).expect("normalization should succeed");
        assert_eq!(event.id, "281498261");
        assert_eq!(event.name, "Rust Hack and Learn");
        assert_eq!(event.group.urlname, "rust-london");
        assert_eq!(event.venue.as_ref().unwrap().city, "London");
        assert_eq!(event.event_type, EventType::Physical);
        assert_eq!(
            event.link,
            "https://www.meetup.com/rust-london/events/281498261/"
        );
        assert_eq!(event.duration, EventDuration::from_millis(12_600_000));
    }

    #[test]
    fn rejects_unparseable_date() {
        let mut raw = sample_event();
        raw.local_date = "15/03/2024".to_string();
        let err = Event::from_meetup(raw).expect_err("normalization should fail");
        assert!(matches!(err, BotError::UpstreamFetch(_)));
    }

    #[test]
    fn decodes_wire_records_and_ignores_extra_fields() {
        let body = r#"{
            "created": 163239511000,
            "duration": 7200000,
            "id": "99",
            "name": "Online Rust Meetup",
            "status": "upcoming",
            "time": 1633107600000,
            "local_date": "2024-10-01",
            "local_time": "19:00",
            "utc_offset": 3600000,
            "yes_rsvp_count": 42,
            "is_online_event": true,
            "eventType": "ONLINE",
            "group": {
                "created": 1258123610000,
                "name": "Rust Berlin",
                "id": 1234,
                "urlname": "rust-berlin",
                "timezone": "Europe/Berlin"
            },
            "link": "https://www.meetup.com/rust-berlin/events/99/",
            "description": "Remote talks.",
            "visibility": "public"
        }"#;
        let raw: MeetupEvent = serde_json::from_str(body).expect("record should decode");
        assert_eq!(raw.event_type, EventType::Online);
        assert!(raw.venue.is_none());
        assert_eq!(raw.group.urlname, "rust-berlin");
        assert_eq!(raw.duration, 7_200_000);
    }

    #[test]
    fn duration_breakdown_covers_each_unit() {
        assert_eq!(
            EventDuration::from_millis(12_600_000),
            EventDuration { days: 0, hours: 3, minutes: 30, seconds: 0 }
        );
        assert_eq!(
            EventDuration::from_millis(90_061_000),
            EventDuration { days: 1, hours: 1, minutes: 1, seconds: 1 }
        );
        assert_eq!(
            EventDuration::from_millis(0),
            EventDuration { days: 0, hours: 0, minutes: 0, seconds: 0 }
        );
    }

    #[test]
    fn duration_formats_like_a_sentence() {
        assert_eq!(EventDuration::from_millis(12_600_000).format(), "3 hours 30 minutes");
        assert_eq!(EventDuration::from_millis(3_600_000).format(), "1 hour");
        assert_eq!(
            EventDuration::from_millis(90_000_000).format(),
            "1 day 1 hour"
        );
        assert_eq!(EventDuration::from_millis(30_000).format(), "30 seconds");
        assert_eq!(EventDuration::from_millis(0).format(), "");
    }
}
