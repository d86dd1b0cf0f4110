use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use regex::Regex;

use crate::models::embed::{Embed, EmbedAuthor, EmbedField};
use crate::models::event::{Event, EventType};

pub const EMBED_COLOR: u32 = 0xBF1C2E;
const DESCRIPTION_LIMIT: usize = 480;

static TAG_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]+>").ok());

/// Filters `events` down to the ones happening before the month rolls
/// over, sorts them soonest first and renders one embed per event.
/// Duplicate listings are kept as-is; the sort is stable, so they stay
/// adjacent in their fetched order.
pub fn build_digest(mut events: Vec<Event>, now: DateTime<Local>) -> Vec<Embed> {
    let cutoff = month_end_cutoff(now);
    events.retain(|event| event.datetime < cutoff);
    events.sort_by(|a, b| a.datetime.cmp(&b.datetime));
    events.iter().map(event_embed).collect()
}

/// First instant of the month after `now`. Everything strictly before it
/// counts as "this month", which keeps evening events on the last day in
/// the digest.
pub fn month_end_cutoff(now: DateTime<Local>) -> DateTime<Local> {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    Local
        .from_local_datetime(&first_of_next)
        .single()
        .unwrap_or_else(|| Local.from_utc_datetime(&first_of_next))
}

pub fn event_embed(event: &Event) -> Embed {
    Embed {
        kind: "rich".to_string(),
        author: EmbedAuthor {
            name: event.group.name.clone(),
            url: format!("https://meetup.com/{}", event.group.urlname),
        },
        color: EMBED_COLOR,
        title: event.name.clone(),
        description: truncate_chars(&strip_tags(&event.description), DESCRIPTION_LIMIT),
        url: event.link.clone(),
        fields: vec![
            EmbedField {
                name: "🗓️ When?".to_string(),
                value: format!("`{}`", format_when(&event.datetime)),
            },
            EmbedField {
                name: "📍 Where?".to_string(),
                value: location_value(event),
            },
            EmbedField {
                name: "⏲️ Duration?".to_string(),
                value: format!("`{}`", event.duration.format()),
            },
        ],
    }
}

fn location_value(event: &Event) -> String {
    match event.event_type {
        EventType::Online => "`Online`".to_string(),
        EventType::Physical => match &event.venue {
            Some(venue) => format!("`{}, {}`", venue.name, venue.city),
            None => "`TBC`".to_string(),
        },
    }
}

/// "Friday, 15th March, 18:30"
fn format_when(datetime: &DateTime<Local>) -> String {
    let day = datetime.day();
    format!(
        "{}, {}{} {}, {}",
        datetime.format("%A"),
        day,
        ordinal_suffix(day),
        datetime.format("%B"),
        datetime.format("%H:%M")
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

/// Meetup descriptions arrive as HTML; embeds want plain text.
fn strip_tags(text: &str) -> String {
    match TAG_PATTERN.as_ref() {
        Some(pattern) => pattern.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
