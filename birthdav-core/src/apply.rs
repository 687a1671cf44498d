//! Applying a reconciliation result to the event collection.

use std::fmt;

use tracing::{error, info};

use crate::diff_kind::DiffKind;
use crate::error::{BirthdavError, BirthdavResult};
use crate::event::BirthdayEvent;
use crate::ics::generate_ics;
use crate::person::PersonRecord;
use crate::reconcile::ReconciliationResult;
use crate::store::Store;
use crate::synthesis::synthesize_event;

/// A single store operation that did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyFailure {
    pub kind: DiffKind,
    pub key: String,
    pub message: String,
}

impl fmt::Display for ApplyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.key, self.message)
    }
}

/// Outcome of [`apply_diff`].
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub failures: Vec<ApplyFailure>,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.created + self.updated + self.deleted + self.failures.len()
    }

    /// Turn failures into an error once every operation has been attempted.
    pub fn into_result(self) -> BirthdavResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(BirthdavError::Apply(self.failures.len(), self.attempted()))
        }
    }

    fn record(&mut self, kind: DiffKind, key: String, outcome: BirthdavResult<()>) {
        match outcome {
            Ok(()) => match kind {
                DiffKind::Create => self.created += 1,
                DiffKind::Update => self.updated += 1,
                DiffKind::Delete => self.deleted += 1,
            },
            Err(e) => {
                error!(%kind, key = %key, "Store operation failed: {}", e);
                self.failures.push(ApplyFailure {
                    kind,
                    key,
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Push creations, then deletions, then updates to the event collection.
///
/// A failing item does not stop the others, in its phase or later ones;
/// failures are collected in the report and nothing is retried.
pub async fn apply_diff<S: Store>(
    events: &S,
    source_identity: &str,
    diff: &ReconciliationResult,
) -> ApplyReport {
    let mut report = ApplyReport::default();

    for person in &diff.to_create {
        match synthesize_event(person, source_identity) {
            Ok(event) => {
                let key = event.object_key();
                let outcome = push_event(events, &key, &event).await;
                if outcome.is_ok() {
                    info!(person = %person.uid, event = %event.uid, "Created birthday event");
                }
                report.record(DiffKind::Create, key, outcome);
            }
            Err(e) => report.record(DiffKind::Create, person.uid.clone(), Err(e)),
        }
    }

    for event in &diff.to_delete {
        let key = event.stored_key();
        let outcome = events.delete(&key).await;
        if outcome.is_ok() {
            info!(event = %event.uid, key = %key, "Deleted birthday event");
        }
        report.record(DiffKind::Delete, key, outcome);
    }

    for (person, event) in &diff.to_update {
        let key = event.object_key();
        let outcome = update_event(events, &key, person, event).await;
        if outcome.is_ok() {
            info!(person = %person.uid, event = %event.uid, "Moved birthday event");
        }
        report.record(DiffKind::Update, key, outcome);
    }

    report
}

/// Re-push an existing event on the contact's current birth date, under its
/// existing UID.
///
/// The event always lands on `{uid}.ics`; a copy listed under another key is
/// removed once the push went through.
async fn update_event<S: Store>(
    events: &S,
    key: &str,
    person: &PersonRecord,
    event: &BirthdayEvent,
) -> BirthdavResult<()> {
    let mut moved = event.clone();
    moved.reschedule(person.birthday()?);
    push_event(events, key, &moved).await?;

    match event.key.as_deref() {
        Some(old_key) if old_key != key => events.delete(old_key).await,
        _ => Ok(()),
    }
}

async fn push_event<S: Store>(events: &S, key: &str, event: &BirthdayEvent) -> BirthdavResult<()> {
    let ics = generate_ics(event)?;
    events.push(key, ics.as_bytes()).await
}
