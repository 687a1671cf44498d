//! ICS generation.

use chrono::{Duration, Utc};
use icalendar::{Alarm, Calendar, Component, EventLike};

use crate::error::BirthdavResult;
use crate::event::{BirthdayEvent, CARD_UID_PROPERTY, CARD_URL_PROPERTY};

/// Generate .ics content for a birthday event.
pub fn generate_ics(event: &BirthdayEvent) -> BirthdavResult<String> {
    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);
    ics_event.summary(&event.summary);

    // DTSTAMP is required by RFC 5545
    let dtstamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    ics_event.add_property("DTSTAMP", &dtstamp);

    // Floating start: 08:00 wherever the reader is
    ics_event.add_property("DTSTART", event.start.format("%Y%m%dT%H%M%S").to_string());

    if let Some(ref rrule) = event.recurrence_rule {
        ics_event.add_property("RRULE", rrule);
    }

    if let Some(ref person_uid) = event.source_person_uid {
        ics_event.add_property(CARD_UID_PROPERTY, person_uid);
    }
    if let Some(ref collection) = event.source_collection {
        ics_event.add_property(CARD_URL_PROPERTY, collection);
    }

    for reminder in &event.reminders {
        let mut alarm = Alarm::display(&reminder.description, reminder.offset);
        // icalendar prints the trigger as -PT604800S or P0D; write it by hand
        alarm.add_property("TRIGGER", format_trigger(reminder.offset));
        if reminder.action != "DISPLAY" {
            alarm.add_property("ACTION", &reminder.action);
        }
        ics_event.alarm(alarm);
    }

    let ics_event = ics_event.done();
    cal.push(ics_event);
    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

/// Format a reminder offset as an RFC 5545 duration (`-P7D`, `PT0S`, `-PT1H30M`).
fn format_trigger(offset: Duration) -> String {
    let total = offset.num_seconds().abs();
    if total == 0 {
        return "PT0S".to_string();
    }

    let sign = if offset < Duration::zero() { "-" } else { "" };
    let (days, rest) = (total / 86_400, total % 86_400);

    let mut out = format!("{}P", sign);
    if days > 0 {
        out.push_str(&format!("{}D", days));
    }
    if rest > 0 {
        out.push('T');
        let (hours, minutes, seconds) = (rest / 3600, rest % 3600 / 60, rest % 60);
        if hours > 0 {
            out.push_str(&format!("{}H", hours));
        }
        if minutes > 0 {
            out.push_str(&format!("{}M", minutes));
        }
        if seconds > 0 {
            out.push_str(&format!("{}S", seconds));
        }
    }
    out
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with BIRTHDAV
/// - Remove CALSCALE:GREGORIAN (it's the default)
/// - Remove DTSTAMP and UID inside VALARM sections (not required by RFC 5545)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    let mut in_valarm = false;

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:BIRTHDAV\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        if line == "BEGIN:VALARM" {
            in_valarm = true;
        } else if line == "END:VALARM" {
            in_valarm = false;
        }

        if in_valarm && (line.starts_with("DTSTAMP:") || line.starts_with("UID:")) {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Reminder, YEARLY_RRULE};
    use chrono::NaiveDate;

    fn make_test_event() -> BirthdayEvent {
        BirthdayEvent {
            uid: "0b7f3c1e-birthday".to_string(),
            source_person_uid: Some("card-1".to_string()),
            source_collection: Some("http://foo".to_string()),
            summary: "Foo Bar Baz".to_string(),
            start: BirthdayEvent::start_for(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
            recurrence_rule: Some(YEARLY_RRULE.to_string()),
            reminders: vec![
                Reminder::display(Duration::zero(), "Foo Bar Baz"),
                Reminder::display(Duration::days(-7), "Foo Bar Baz"),
            ],
            key: None,
        }
    }

    #[test]
    fn test_format_trigger() {
        assert_eq!(format_trigger(Duration::zero()), "PT0S");
        assert_eq!(format_trigger(Duration::days(-7)), "-P7D");
        assert_eq!(format_trigger(Duration::minutes(-90)), "-PT1H30M");
        assert_eq!(format_trigger(Duration::days(1) + Duration::seconds(5)), "P1DT5S");
    }

    #[test]
    fn test_generate_ics_has_floating_start_and_rrule() {
        let ics = generate_ics(&make_test_event()).unwrap();

        assert!(ics.contains("DTSTART:19700101T080000\r\n"), "ICS:\n{}", ics);
        assert!(ics.contains("RRULE:FREQ=YEARLY"), "ICS:\n{}", ics);
        assert!(ics.contains("UID:0b7f3c1e-birthday"), "ICS:\n{}", ics);
        assert!(ics.contains("PRODID:BIRTHDAV"), "ICS:\n{}", ics);
    }

    #[test]
    fn test_generate_ics_has_back_reference() {
        let ics = generate_ics(&make_test_event()).unwrap();

        assert!(ics.contains("X-BIRTHDAV-CARD-UID:card-1"), "ICS:\n{}", ics);
        assert!(ics.contains("X-BIRTHDAV-CARD-URL:http://foo"), "ICS:\n{}", ics);
    }

    #[test]
    fn test_generate_ics_alarms_are_minimal() {
        let ics = generate_ics(&make_test_event()).unwrap();

        assert_eq!(ics.matches("BEGIN:VALARM").count(), 2, "ICS:\n{}", ics);
        assert!(ics.contains("TRIGGER:PT0S"), "ICS:\n{}", ics);
        assert!(ics.contains("TRIGGER:-P7D"), "ICS:\n{}", ics);
        assert_eq!(ics.matches("ACTION:DISPLAY").count(), 2, "ICS:\n{}", ics);

        for valarm in ics.split("BEGIN:VALARM").skip(1) {
            let section = valarm.split("END:VALARM").next().unwrap();
            assert!(!section.contains("UID:"), "VALARM should not have UID:\n{}", section);
            assert!(!section.contains("DTSTAMP:"), "VALARM should not have DTSTAMP:\n{}", section);
            assert!(section.contains("DESCRIPTION:Foo Bar Baz"), "VALARM:\n{}", section);
        }
    }

    #[test]
    fn test_each_alarm_has_one_compact_trigger() {
        let mut event = make_test_event();
        event.reminders.push(Reminder {
            action: "AUDIO".to_string(),
            offset: Duration::hours(-1),
            description: "Foo Bar Baz".to_string(),
        });

        let ics = generate_ics(&event).unwrap();

        assert!(!ics.contains("604800"), "ICS:\n{}", ics);
        assert!(!ics.contains("P0D"), "ICS:\n{}", ics);
        for valarm in ics.split("BEGIN:VALARM").skip(1) {
            let section = valarm.split("END:VALARM").next().unwrap();
            assert_eq!(section.matches("TRIGGER").count(), 1, "VALARM:\n{}", section);
            assert_eq!(section.matches("ACTION:").count(), 1, "VALARM:\n{}", section);
        }
        assert!(ics.contains("ACTION:AUDIO"), "ICS:\n{}", ics);
        assert!(ics.contains("TRIGGER:-PT1H"), "ICS:\n{}", ics);
    }
}
