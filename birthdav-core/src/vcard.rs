//! vCard reading.
//!
//! Only the properties the sync needs are extracted (`UID`, `BDAY`, `N`).
//! Content lines are unfolded with the icalendar crate and then read line by
//! line, which tolerates vCard-only syntax such as property groups
//! (`item1.EMAIL`) that an iCalendar parser rejects.

use icalendar::parser::unfold;

use crate::person::{NameParts, PersonRecord};

/// Parse a vCard object into a PersonRecord.
///
/// Returns `None` for anything that is not a complete vCard with a UID.
pub fn parse_person(body: &[u8]) -> Option<PersonRecord> {
    let text = std::str::from_utf8(body).ok()?;
    let unfolded = unfold(text);

    let mut in_card = false;
    let mut complete = false;
    let mut uid = None;
    let mut birth_date = None;
    let mut name = None;

    for line in unfolded.lines() {
        let Some((prop, value)) = split_content_line(line.trim_end_matches('\r')) else {
            continue;
        };

        match prop.as_str() {
            "BEGIN" if value.eq_ignore_ascii_case("VCARD") => in_card = true,
            "END" if in_card && value.eq_ignore_ascii_case("VCARD") => {
                complete = true;
                break;
            }
            _ if !in_card => {}
            "UID" => uid = Some(unescape(value.trim())),
            "BDAY" => birth_date = Some(value.trim().to_string()),
            "N" => name = Some(parse_name(value)),
            _ => {}
        }
    }

    let uid = uid.filter(|uid| !uid.is_empty())?;
    if !complete {
        return None;
    }

    Some(PersonRecord {
        uid,
        birth_date: birth_date.filter(|b| !b.is_empty()),
        name,
    })
}

/// Split a content line into its upper-cased property name and raw value.
///
/// Parameters and the group prefix are dropped; the value starts after the
/// first colon that is not inside a quoted parameter value.
fn split_content_line(line: &str) -> Option<(String, &str)> {
    let mut in_quotes = false;
    let colon = line.char_indices().find_map(|(i, c)| match c {
        '"' => {
            in_quotes = !in_quotes;
            None
        }
        ':' if !in_quotes => Some(i),
        _ => None,
    })?;

    let (head, value) = (&line[..colon], &line[colon + 1..]);
    let name = head.split(';').next()?;
    let name = name.rsplit('.').next()?.trim();
    if name.is_empty() {
        return None;
    }

    Some((name.to_ascii_uppercase(), value))
}

/// `N` is `family;given;additional;prefixes;suffixes`, each possibly a
/// comma-separated list.
fn parse_name(value: &str) -> NameParts {
    let components: Vec<String> = split_unescaped(value, ';')
        .into_iter()
        .map(|component| {
            split_unescaped(component, ',')
                .into_iter()
                .map(|v| unescape(v).trim().to_string())
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    let part = |i: usize| components.get(i).cloned().unwrap_or_default();

    NameParts {
        family: part(0),
        given: part(1),
        additional: part(2),
    }
}

fn split_unescaped(value: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == separator {
            parts.push(&value[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&value[start..]);
    parts
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
