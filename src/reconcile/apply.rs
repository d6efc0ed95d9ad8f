use crate::model::dian::{DianAthlete, DianEvent};
use crate::reconcile::Lookup;
use crate::reconcile::extract::Assignments;

/// What [`apply`] did to one local event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    /// Highest heat any athlete was placed in, never below one.
    pub heat_count: u32,
    /// Athletes that received a heat and lane.
    pub assigned: usize,
}

/// Writes heat and lane numbers onto the athletes of `event` that have a
/// participating assignment and computes the event's heat count.
///
/// The heat count is returned rather than stored; the caller decides whether
/// to keep it.
pub fn apply(event: &mut DianEvent, assignments: &Assignments) -> Applied {
    let mut heat_count = 1;
    let mut assigned = 0;

    for athlete in &mut event.athletes {
        let Lookup::Found((heat, lane)) = lookup(athlete, assignments) else {
            continue;
        };
        athlete.heat = Some(heat);
        athlete.lane = lane;
        heat_count = heat_count.max(heat);
        assigned += 1;
    }

    Applied {
        heat_count,
        assigned,
    }
}

fn lookup(athlete: &DianAthlete, assignments: &Assignments) -> Lookup<(u32, Option<u32>)> {
    let assignment = athlete.key().and_then(|key| assignments.get(&key));
    match assignment {
        Some(assignment) if assignment.participating => match assignment.heat {
            Some(heat) => Lookup::Found((heat, assignment.lane)),
            None => Lookup::Silent,
        },
        _ => Lookup::Silent,
    }
}
