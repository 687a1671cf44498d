//! ICS parsing using the icalendar crate's parser.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{read_calendar, unfold},
};

use crate::event::{BirthdayEvent, CARD_UID_PROPERTY, CARD_URL_PROPERTY, Reminder};

/// Parse ICS content into a BirthdayEvent.
///
/// Back-reference properties and the UID are looked up on the VEVENT first
/// and then on the VCALENDAR itself, where older birthdav versions put them.
/// Returns `None` for anything without a VEVENT, a UID or a DTSTART.
pub fn parse_event(body: &[u8]) -> Option<BirthdayEvent> {
    let text = std::str::from_utf8(body).ok()?;
    let unfolded = unfold(text);
    let calendar = read_calendar(&unfolded).ok()?;
    let vevent = calendar.components.iter().find(|c| c.name == "VEVENT")?;

    let find = |name: &str| {
        vevent
            .find_prop(name)
            .or_else(|| calendar.properties.iter().find(|p| p.name == name))
    };

    let uid = find("UID")?.val.to_string();
    let start = to_naive(DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()?);

    let summary = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_default();
    let recurrence_rule = vevent.find_prop("RRULE").map(|p| p.val.to_string());

    let source_person_uid = find(CARD_UID_PROPERTY).map(|p| p.val.to_string());
    let source_collection = find(CARD_URL_PROPERTY).map(|p| p.val.to_string());

    let reminders = vevent
        .components
        .iter()
        .filter(|c| c.name == "VALARM")
        .filter_map(|alarm| {
            let offset = parse_trigger(alarm.find_prop("TRIGGER")?.val.as_ref())?;
            let action = alarm
                .find_prop("ACTION")
                .map(|p| p.val.to_string())
                .unwrap_or_else(|| "DISPLAY".to_string());
            let description = alarm
                .find_prop("DESCRIPTION")
                .map(|p| p.val.to_string())
                .unwrap_or_default();

            Some(Reminder {
                action,
                offset,
                description,
            })
        })
        .collect();

    Some(BirthdayEvent {
        uid,
        source_person_uid,
        source_collection,
        summary,
        start,
        recurrence_rule,
        reminders,
        key: None,
    })
}

/// Only the date part of DTSTART matters to the sync, so every form is
/// reduced to a naive local datetime.
fn to_naive(dpt: DatePerhapsTime) -> NaiveDateTime {
    match dpt {
        DatePerhapsTime::Date(d) => d.and_time(NaiveTime::MIN),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => dt.naive_utc(),
            CalendarDateTime::Floating(naive) => naive,
            CalendarDateTime::WithTimezone { date_time, .. } => date_time,
        },
    }
}

/// Parse a relative TRIGGER value (`-P7D`, `PT0S`, `-PT30M`) into an offset.
/// Absolute triggers are not supported.
fn parse_trigger(value: &str) -> Option<Duration> {
    let (negative, duration_str) = match value.trim() {
        v if v.starts_with('-') => (true, &v[1..]),
        v if v.starts_with('+') => (false, &v[1..]),
        v => (false, v),
    };

    let duration = iso8601::duration(duration_str).ok()?;
    let std_duration: std::time::Duration = duration.into();
    let offset = Duration::from_std(std_duration).ok()?;

    Some(if negative { -offset } else { offset })
}
