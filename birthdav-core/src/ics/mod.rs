//! ICS generation and parsing for birthday events.
//!
//! This module handles reading and writing .ics objects according to RFC 5545.

mod generate;
mod parse;

pub use generate::generate_ics;
pub use parse::parse_event;
