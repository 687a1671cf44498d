//! Birthday events stored in the event collection.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Time of day of every birthday event (floating, local time).
pub const BIRTHDAY_TIME: NaiveTime = match NaiveTime::from_hms_opt(8, 0, 0) {
    Some(time) => time,
    None => unreachable!(),
};

pub const YEARLY_RRULE: &str = "FREQ=YEARLY";

/// Back-reference to the contact's UID.
pub const CARD_UID_PROPERTY: &str = "X-BIRTHDAV-CARD-UID";
/// Back-reference to the person collection the event was generated from.
pub const CARD_URL_PROPERTY: &str = "X-BIRTHDAV-CARD-URL";

/// A VALARM attached to a birthday event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub action: String,
    /// Offset relative to the event start; negative means before.
    pub offset: Duration,
    pub description: String,
}

impl Reminder {
    pub fn display(offset: Duration, description: &str) -> Self {
        Reminder {
            action: "DISPLAY".to_string(),
            offset,
            description: description.to_string(),
        }
    }
}

/// A yearly birthday event.
///
/// The event's own `uid` is opaque and only addresses the event collection;
/// matching against contacts goes through `source_person_uid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayEvent {
    pub uid: String,
    pub source_person_uid: Option<String>,
    pub source_collection: Option<String>,
    pub summary: String,
    pub start: NaiveDateTime,
    pub recurrence_rule: Option<String>,
    pub reminders: Vec<Reminder>,
    /// Key the object was listed under, for events read back from a store.
    pub key: Option<String>,
}

impl BirthdayEvent {
    /// Start of the first occurrence for a given birth date.
    pub fn start_for(birthday: NaiveDate) -> NaiveDateTime {
        birthday.and_time(BIRTHDAY_TIME)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Move the event to a corrected birth date, keeping its identifier.
    pub fn reschedule(&mut self, birthday: NaiveDate) {
        self.start = Self::start_for(birthday);
    }

    /// Both halves of the back-reference, when present.
    pub fn back_reference(&self) -> Option<(&str, &str)> {
        match (&self.source_person_uid, &self.source_collection) {
            (Some(person), Some(collection)) => Some((person.as_str(), collection.as_str())),
            _ => None,
        }
    }

    pub fn object_key(&self) -> String {
        Self::key_for(&self.uid)
    }

    /// Where the event currently lives: the listed key when known, otherwise
    /// the key derived from its UID.
    pub fn stored_key(&self) -> String {
        self.key.clone().unwrap_or_else(|| self.object_key())
    }

    /// Key of the event object in the event collection.
    pub fn key_for(uid: &str) -> String {
        format!("{}.ics", uid)
    }
}
