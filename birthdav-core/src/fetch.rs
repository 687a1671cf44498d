//! Loading contacts and owned birthday events out of their collections.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, warn};

use crate::error::BirthdavResult;
use crate::event::BirthdayEvent;
use crate::ics::parse_event;
use crate::identity::SourceIdentity;
use crate::person::PersonRecord;
use crate::store::Store;
use crate::vcard::parse_person;

const VCARD_EXTENSION: &str = ".vcf";
const ICS_EXTENSION: &str = ".ics";

/// Birthday events that belong to one person collection.
#[derive(Debug, Default)]
pub struct OwnedEvents {
    /// Events keyed by the contact UID they reference.
    pub events: HashMap<String, BirthdayEvent>,
    /// Extra events pointing at a contact that already has one.
    pub duplicates: Vec<BirthdayEvent>,
}

/// Every contact with a birth date, keyed by contact UID.
///
/// Objects that cannot be read as a vCard are skipped with a warning.
pub async fn fetch_people<S: Store>(store: &S) -> BirthdavResult<HashMap<String, PersonRecord>> {
    let mut people = HashMap::new();

    for key in store.list().await? {
        if !key.ends_with(VCARD_EXTENSION) {
            continue;
        }

        let body = store.fetch(&key).await?;
        let Some(person) = parse_person(&body) else {
            warn!(collection = store.identity(), key = %key, "Skipping unreadable vCard");
            continue;
        };

        if !person.has_birth_date() {
            continue;
        }

        if let Some(previous) = people.insert(person.uid.clone(), person) {
            warn!(key = %key, uid = %previous.uid, "Contact UID appears twice, keeping the last one");
        }
    }

    debug!(count = people.len(), "Loaded contacts with a birth date");
    Ok(people)
}

/// Birthday events that were generated from `source`.
///
/// Events lacking either back-reference property, or generated from another
/// person collection, are left alone. When two events reference the same
/// contact the one with the smaller event UID wins; copies sharing a UID
/// prefer the one stored under its own `{uid}.ics` key.
///
/// Each returned event remembers the key it was listed under.
pub async fn fetch_owned_events<S: Store>(
    store: &S,
    source: &SourceIdentity,
) -> BirthdavResult<OwnedEvents> {
    let mut owned = OwnedEvents::default();

    for key in store.list().await? {
        if !key.ends_with(ICS_EXTENSION) {
            continue;
        }

        let body = store.fetch(&key).await?;
        let Some(mut event) = parse_event(&body) else {
            warn!(collection = store.identity(), key = %key, "Skipping unreadable calendar object");
            continue;
        };

        let person_uid = match event.back_reference() {
            Some((person_uid, collection)) if source.owns(collection) => person_uid.to_string(),
            _ => continue,
        };
        event.key = Some(key);

        match owned.events.entry(person_uid) {
            Entry::Vacant(slot) => {
                slot.insert(event);
            }
            Entry::Occupied(mut slot) => {
                let loser = if precedence(&event) < precedence(slot.get()) {
                    slot.insert(event)
                } else {
                    event
                };
                warn!(
                    contact = %slot.key(),
                    event = %loser.uid,
                    key = %loser.stored_key(),
                    "Duplicate birthday event"
                );
                owned.duplicates.push(loser);
            }
        }
    }

    owned.duplicates.sort_by_key(precedence);
    debug!(
        count = owned.events.len(),
        duplicates = owned.duplicates.len(),
        "Loaded owned birthday events"
    );
    Ok(owned)
}

fn precedence(event: &BirthdayEvent) -> (String, bool, String) {
    let key = event.stored_key();
    (event.uid.clone(), key != event.object_key(), key)
}
