//! Building a birthday event from a contact.

use chrono::Duration;
use uuid::Uuid;

use crate::error::BirthdavResult;
use crate::event::{BirthdayEvent, Reminder, YEARLY_RRULE};
use crate::person::PersonRecord;

/// Days before the birthday of the early reminder.
pub const EARLY_REMINDER_DAYS: i64 = 7;

/// Create a new birthday event for a contact.
///
/// The event gets a fresh random UID, starts at 08:00 on the birth date
/// (original year kept, the yearly RRULE covers the rest) and carries two
/// display reminders: on the day and a week before. Nothing is stored.
pub fn synthesize_event(person: &PersonRecord, source_identity: &str) -> BirthdavResult<BirthdayEvent> {
    let birthday = person.birthday()?;
    let name = person.display_name();

    Ok(BirthdayEvent {
        uid: Uuid::new_v4().to_string(),
        source_person_uid: Some(person.uid.clone()),
        source_collection: Some(source_identity.to_string()),
        start: BirthdayEvent::start_for(birthday),
        recurrence_rule: Some(YEARLY_RRULE.to_string()),
        reminders: vec![
            Reminder::display(Duration::zero(), &name),
            Reminder::display(Duration::days(-EARLY_REMINDER_DAYS), &name),
        ],
        summary: name,
        key: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn foo_bar_baz() -> PersonRecord {
        PersonRecord::new("card-1")
            .with_birth_date("1970-01-01")
            .with_name("Foo", "Bar", "Baz")
    }

    #[test]
    fn test_synthesize_birthday_event() {
        let event = synthesize_event(&foo_bar_baz(), "http://foo").unwrap();

        assert_eq!(event.summary, "Foo Bar Baz");
        assert_eq!(event.back_reference(), Some(("card-1", "http://foo")));
        assert_eq!(
            event.start,
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap().and_hms_opt(8, 0, 0).unwrap()
        );
        assert_eq!(event.recurrence_rule.as_deref(), Some("FREQ=YEARLY"));
    }

    #[test]
    fn test_synthesize_reminders() {
        let event = synthesize_event(&foo_bar_baz(), "http://foo").unwrap();

        assert_eq!(event.reminders.len(), 2);
        assert!(event.reminders.iter().all(|r| r.action == "DISPLAY"));
        assert!(event.reminders.iter().all(|r| r.description == "Foo Bar Baz"));

        let mut triggers: Vec<i64> = event.reminders.iter().map(|r| r.offset.num_seconds()).collect();
        triggers.sort();
        assert_eq!(triggers, vec![-604800, 0]);
    }

    #[test]
    fn test_synthesize_generates_unique_uids() {
        let first = synthesize_event(&foo_bar_baz(), "http://foo").unwrap();
        let second = synthesize_event(&foo_bar_baz(), "http://foo").unwrap();

        assert_ne!(first.uid, second.uid);
        assert_ne!(first.uid, "card-1");
    }

    #[test]
    fn test_synthesize_without_name() {
        let person = PersonRecord::new("anon").with_birth_date("2000-02-29");
        let event = synthesize_event(&person, "http://foo").unwrap();

        assert_eq!(event.summary, "");
        assert_eq!(event.start.to_string(), "2000-02-29 08:00:00");
    }
}
