//! WebDAV collections for birthdav.
//!
//! Contacts and birthday events are plain objects in a WebDAV collection, so
//! the same adapter serves CardDAV address books and CalDAV calendars.

pub mod client;
pub mod requests;
mod store;

pub use store::DavStore;
