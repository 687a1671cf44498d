//! Core of birthdav: keeps one yearly birthday event per contact.
//!
//! The crate is transport-agnostic. It provides:
//! - `PersonRecord` / `BirthdayEvent` and the vCard / iCalendar codecs
//! - the `Store` trait that collection adapters implement, plus `DirStore`
//! - the reconciliation pass: `fetch` → `reconcile` → `apply`

pub mod apply;
pub mod config;
pub mod diff_kind;
pub mod error;
pub mod event;
pub mod fetch;
pub mod ics;
pub mod identity;
pub mod person;
pub mod reconcile;
pub mod store;
pub mod synthesis;
pub mod vcard;

pub use apply::{ApplyFailure, ApplyReport, apply_diff};
pub use diff_kind::DiffKind;
pub use error::{BirthdavError, BirthdavResult};
pub use event::{BirthdayEvent, Reminder};
pub use fetch::{OwnedEvents, fetch_owned_events, fetch_people};
pub use identity::SourceIdentity;
pub use person::{NameParts, PersonRecord};
pub use reconcile::{ReconciliationResult, birthday_matches_event, reconcile};
pub use store::{DirStore, Store};
pub use synthesis::synthesize_event;
