//! Transfers heat and lane assignments from a Lenex entry list onto a Dian
//! meet document.
//!
//! The two documents share no identifiers. Events are paired through their
//! [`ClassificationKey`], consuming Lenex events first-in-first-out per key, and
//! athletes through their [`AthleteKey`](crate::model::AthleteKey). The pass is
//! a single forward walk over the Dian events; an event without a Lenex
//! counterpart is left exactly as it was.

pub mod apply;
pub mod extract;
pub mod index;
pub mod matcher;

use serde::Serialize;
use tracing::{debug, info};

use crate::model::ClassificationKey;
use crate::model::dian::DianDocument;
use crate::model::lenex::LenexDocument;

pub use apply::{Applied, apply};
pub use extract::{Assignments, HeatAssignment, extract};
pub use index::EventIndex;
pub use matcher::next_event;

/// Outcome of a lookup that separates absences worth reporting from expected
/// ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    /// Nothing found; the absence has already been logged.
    Logged,
    /// Nothing found, and nothing is wrong with that.
    Silent,
}

/// Summary of one reconciliation pass, one outcome per Dian event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ReconcileReport {
    pub events: Vec<EventOutcome>,
}

impl ReconcileReport {
    pub fn matched(&self) -> usize {
        self.events
            .iter()
            .filter(|outcome| matches!(outcome.status, EventStatus::Matched { .. }))
            .count()
    }

    pub fn unmatched(&self) -> usize {
        self.events.len() - self.matched()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventOutcome {
    /// Position of the event within the Dian document.
    pub position: usize,
    pub key: ClassificationKey,
    #[serde(flatten)]
    pub status: EventStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EventStatus {
    Matched {
        lenex_event: String,
        heat_count: u32,
        assigned: usize,
    },
    Unmatched,
}

/// Reconciliation state bound to one Lenex document.
///
/// The event index is built once, in [`Reconciler::new`], and drained by
/// [`Reconciler::run`]. Running the same reconciler twice therefore finds
/// every bucket already consumed and reports every event of the second pass
/// as unmatched; build a new reconciler (or call [`reconcile`]) for a fresh
/// pass.
pub struct Reconciler<'a> {
    lenex: &'a LenexDocument,
    index: EventIndex<'a>,
}

impl<'a> Reconciler<'a> {
    pub fn new(lenex: &'a LenexDocument) -> Self {
        Self {
            lenex,
            index: EventIndex::from_meet(&lenex.meet),
        }
    }

    /// Lenex events not yet consumed by any pass.
    pub fn index(&self) -> &EventIndex<'a> {
        &self.index
    }

    /// Matches every Dian event in document order and applies the heat and
    /// lane assignments of its Lenex counterpart.
    pub fn run(&mut self, dian: &mut DianDocument) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for (position, event) in dian.events.iter_mut().enumerate() {
            let key = event.classification();
            let status = match next_event(&mut self.index, &key) {
                Lookup::Found(lenex_event) => {
                    let assignments = extract(lenex_event, self.lenex.meet.athletes());
                    let applied = apply(event, &assignments);
                    event.heat_count = Some(applied.heat_count);
                    debug!(
                        %key,
                        lenex_event = %lenex_event.id,
                        heat_count = applied.heat_count,
                        assigned = applied.assigned,
                        "event reconciled"
                    );
                    EventStatus::Matched {
                        lenex_event: lenex_event.id.clone(),
                        heat_count: applied.heat_count,
                        assigned: applied.assigned,
                    }
                }
                Lookup::Logged | Lookup::Silent => EventStatus::Unmatched,
            };
            report.events.push(EventOutcome {
                position,
                key,
                status,
            });
        }

        info!(
            matched = report.matched(),
            unmatched = report.unmatched(),
            "reconciliation finished"
        );
        report
    }
}

/// Runs one pass against a freshly built index.
pub fn reconcile(dian: &mut DianDocument, lenex: &LenexDocument) -> ReconcileReport {
    Reconciler::new(lenex).run(dian)
}
