//! Coloured terminal output for sync plans and results.

use birthdav_core::{DiffKind, PersonRecord, ReconciliationResult};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for DiffKind {
    fn render(&self) -> String {
        let symbol = self.to_string();
        match self {
            DiffKind::Create => symbol.green().to_string(),
            DiffKind::Update => symbol.yellow().to_string(),
            DiffKind::Delete => symbol.red().to_string(),
        }
    }
}

fn colorize_diff(kind: DiffKind, text: &str) -> String {
    match kind {
        DiffKind::Create => text.green().to_string(),
        DiffKind::Update => text.yellow().to_string(),
        DiffKind::Delete => text.red().to_string(),
    }
}

fn person_label(person: &PersonRecord) -> String {
    match person.display_name() {
        name if name.is_empty() => person.uid.clone(),
        name => name,
    }
}

impl Render for ReconciliationResult {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        for person in &self.to_create {
            let bday = person.birth_date.as_deref().unwrap_or_default();
            lines.push(format!(
                "   {} {} {}",
                DiffKind::Create.render(),
                colorize_diff(DiffKind::Create, &person_label(person)),
                bday.dimmed()
            ));
        }
        for (person, event) in &self.to_update {
            let change = format!(
                "{} -> {}",
                event.start_date(),
                person.birth_date.as_deref().unwrap_or_default()
            );
            lines.push(format!(
                "   {} {} {}",
                DiffKind::Update.render(),
                colorize_diff(DiffKind::Update, &person_label(person)),
                change.dimmed()
            ));
        }
        for event in &self.to_delete {
            let mut line = format!(
                "   {} {}",
                DiffKind::Delete.render(),
                colorize_diff(DiffKind::Delete, &event.uid)
            );
            let key = event.stored_key();
            if key != event.object_key() {
                line = format!("{} {}", line, key.dimmed());
            }
            lines.push(line);
        }

        lines.join("\n")
    }
}

/// One-line summary of a pass.
pub fn render_summary(created: usize, updated: usize, deleted: usize, dry_run: bool) -> String {
    if created == 0 && updated == 0 && deleted == 0 {
        return "Birthdays already in sync".dimmed().to_string();
    }

    let label = if dry_run { "Would sync" } else { "Synced" };
    format!(
        "{}: {} created, {} updated, {} deleted",
        label, created, updated, deleted
    )
}
