//! One reconciliation pass: fetch both collections, compute the diff and
//! apply it.

use anyhow::Result;
use birthdav_core::config::SyncConfig;
use birthdav_core::{
    ApplyReport, ReconciliationResult, SourceIdentity, Store, apply_diff, fetch_owned_events,
    fetch_people, reconcile,
};
use tracing::info;

use crate::collection::Collection;
use crate::render::{Render, render_summary};

/// Result of a pass: the plan, and what applying it did (absent on a dry run).
pub struct SyncOutcome {
    pub plan: ReconciliationResult,
    pub report: Option<ApplyReport>,
}

/// Open both configured collections and run a pass, printing the outcome.
pub async fn run(config: &SyncConfig, dry_run: bool) -> Result<()> {
    let people = Collection::open(&config.card)?;
    let events = Collection::open(&config.cal)?;

    let outcome = sync_pass(&people, &events, dry_run).await?;

    if !outcome.plan.is_empty() {
        println!("{}", outcome.plan.render());
    }

    match outcome.report {
        None => {
            let (created, updated, deleted) = outcome.plan.counts();
            println!("{}", render_summary(created, updated, deleted, true));
        }
        Some(report) => {
            println!(
                "{}",
                render_summary(report.created, report.updated, report.deleted, false)
            );
            report.into_result()?;
        }
    }

    Ok(())
}

/// Fetch, reconcile and (unless `dry_run`) apply, strictly in that order.
///
/// Fetch and reconcile errors abort before anything is written. Store
/// failures while applying are collected in the returned report.
pub async fn sync_pass<P: Store, E: Store>(
    people: &P,
    events: &E,
    dry_run: bool,
) -> Result<SyncOutcome> {
    let source = SourceIdentity::new(people.identity());

    let contacts = fetch_people(people).await?;
    let owned = fetch_owned_events(events, &source).await?;

    let mut plan = reconcile(&contacts, &owned.events)?;
    plan.to_delete.extend(owned.duplicates);
    plan.to_delete.sort_by_key(|event| (event.uid.clone(), event.stored_key()));
    plan.to_delete.dedup_by_key(|event| event.stored_key());

    let (created, updated, deleted) = plan.counts();
    info!(
        source = %source,
        contacts = contacts.len(),
        events = owned.events.len(),
        created,
        updated,
        deleted,
        "Reconciled"
    );

    if dry_run || plan.is_empty() {
        return Ok(SyncOutcome {
            report: (!dry_run).then(ApplyReport::default),
            plan,
        });
    }

    let report = apply_diff(events, source.as_str(), &plan).await;
    Ok(SyncOutcome {
        plan,
        report: Some(report),
    })
}
