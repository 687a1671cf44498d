//! Reconciliation of contacts against birthday events.
//!
//! Both sides are keyed by the contact UID: a contact's own UID on one side,
//! the event's back-reference on the other. The event's own UID never takes
//! part in matching.

use std::collections::HashMap;

use crate::error::BirthdavResult;
use crate::event::BirthdayEvent;
use crate::person::PersonRecord;

/// What has to change in the event collection for it to mirror the contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// Contacts with a birth date and no event yet.
    pub to_create: Vec<PersonRecord>,
    /// Events whose contact is gone, each addressed by the key it is
    /// stored under.
    pub to_delete: Vec<BirthdayEvent>,
    /// Contacts whose event sits on the wrong date, with that event.
    pub to_update: Vec<(PersonRecord, BirthdayEvent)>,
}

impl ReconciliationResult {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty() && self.to_update.is_empty()
    }

    /// Count of (created, updated, deleted).
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.to_create.len(), self.to_update.len(), self.to_delete.len())
    }
}

/// Whether an event already sits on the contact's birth date.
///
/// Only the date is compared; the time of day of the event is not checked.
pub fn birthday_matches_event(person: &PersonRecord, event: &BirthdayEvent) -> BirthdavResult<bool> {
    Ok(person.birthday()? == event.start_date())
}

/// Compute creations, deletions and updates.
///
/// `people` holds contacts with a birth date, keyed by contact UID. `events`
/// holds owned events, keyed by the contact UID they reference. Output lists
/// are sorted by contact UID (event UID, then key, for deletions) so runs are
/// reproducible; the order has no effect on the result of applying them.
///
/// Fails if any contact's birth date cannot be read as a date, before
/// anything has been written.
pub fn reconcile(
    people: &HashMap<String, PersonRecord>,
    events: &HashMap<String, BirthdayEvent>,
) -> BirthdavResult<ReconciliationResult> {
    let mut result = ReconciliationResult::default();

    let mut person_uids: Vec<&String> = people.keys().collect();
    person_uids.sort();

    for uid in person_uids {
        let person = &people[uid];
        match events.get(uid) {
            None => {
                person.birthday()?;
                result.to_create.push(person.clone());
            }
            Some(event) => {
                if !birthday_matches_event(person, event)? {
                    result.to_update.push((person.clone(), event.clone()));
                }
            }
        }
    }

    result.to_delete = events
        .iter()
        .filter(|(uid, _)| !people.contains_key(*uid))
        .map(|(_, event)| event.clone())
        .collect();
    result.to_delete.sort_by_key(|event| (event.uid.clone(), event.stored_key()));

    Ok(result)
}
