use std::collections::HashMap;

use tracing::debug;

use crate::model::AthleteKey;
use crate::model::lenex::{Athlete, Entry, Event};
use crate::reconcile::Lookup;

/// Heat placement of one athlete in one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeatAssignment {
    /// Order of the heat within the event.
    pub heat: Option<u32>,
    pub lane: Option<u32>,
    pub participating: bool,
}

impl HeatAssignment {
    pub const NOT_PARTICIPATING: Self = Self {
        heat: None,
        lane: None,
        participating: false,
    };

    pub fn placed(heat: u32, lane: Option<u32>) -> Self {
        Self {
            heat: Some(heat),
            lane,
            participating: true,
        }
    }
}

pub type Assignments = HashMap<AthleteKey, HeatAssignment>;

/// Derives the placement of every athlete of `roster` in `event`.
///
/// Athletes without any entry are recorded as not participating. Athletes
/// whose entries all belong to other events are left out. When an athlete has
/// several entries for `event`, the last one that resolves wins; rejected and
/// withdrawn entries resolve to not participating, and entries pointing at a
/// heat the event does not list are ignored.
pub fn extract<'a>(event: &Event, roster: impl IntoIterator<Item = &'a Athlete>) -> Assignments {
    let heats: HashMap<&str, u32> = event
        .heats
        .iter()
        .map(|heat| (heat.id.as_str(), heat.order))
        .collect();

    let mut assignments = Assignments::new();
    for athlete in roster {
        let key = athlete.key();
        if athlete.entries.is_empty() {
            assignments.insert(key, HeatAssignment::NOT_PARTICIPATING);
            continue;
        }

        for entry in athlete.entries.iter().filter(|entry| entry.event_id == event.id) {
            if !entry.status.is_participating() {
                assignments.insert(key.clone(), HeatAssignment::NOT_PARTICIPATING);
                continue;
            }
            if let Lookup::Found(order) = resolve_heat(&heats, event, entry) {
                assignments.insert(key.clone(), HeatAssignment::placed(order, entry.lane));
            }
        }
    }
    assignments
}

fn resolve_heat(heats: &HashMap<&str, u32>, event: &Event, entry: &Entry) -> Lookup<u32> {
    let order = entry
        .heat_id
        .as_deref()
        .and_then(|heat_id| heats.get(heat_id).copied());
    match order {
        Some(order) => Lookup::Found(order),
        None => {
            debug!(
                event_id = %event.id,
                heat_id = ?entry.heat_id,
                "heat not found"
            );
            Lookup::Logged
        }
    }
}
