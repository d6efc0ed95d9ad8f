use tracing::warn;

use crate::model::ClassificationKey;
use crate::model::lenex::Event;
use crate::reconcile::Lookup;
use crate::reconcile::index::EventIndex;

/// Consumes the next Lenex event sharing `key`.
///
/// Matching is first-in-first-out within a bucket and destructive: an event
/// handed out here is never handed out again by the same index. An absent or
/// drained bucket is reported as a warning.
pub fn next_event<'a>(index: &mut EventIndex<'a>, key: &ClassificationKey) -> Lookup<&'a Event> {
    match index.pop_front(key) {
        Some(event) => Lookup::Found(event),
        None => {
            warn!(%key, "no Lenex event left for this classification");
            Lookup::Logged
        }
    }
}
