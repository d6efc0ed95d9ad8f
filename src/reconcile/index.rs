use std::collections::{HashMap, VecDeque};

use crate::model::ClassificationKey;
use crate::model::lenex::{Event, Meet};

/// Lenex events bucketed by classification key.
///
/// Each bucket keeps the traversal order of the source (session order, then
/// event order) and is drained from the front as local events are matched.
#[derive(Debug, Default)]
pub struct EventIndex<'a> {
    buckets: HashMap<ClassificationKey, VecDeque<&'a Event>>,
}

impl<'a> EventIndex<'a> {
    pub fn build(events: impl IntoIterator<Item = &'a Event>) -> Self {
        let mut buckets: HashMap<ClassificationKey, VecDeque<&'a Event>> = HashMap::new();
        for event in events {
            buckets
                .entry(event.classification())
                .or_default()
                .push_back(event);
        }
        Self { buckets }
    }

    /// Indexes every event of every session of `meet`.
    pub fn from_meet(meet: &'a Meet) -> Self {
        Self::build(meet.events())
    }

    /// Removes and returns the oldest unconsumed event for `key`.
    pub fn pop_front(&mut self, key: &ClassificationKey) -> Option<&'a Event> {
        self.buckets.get_mut(key)?.pop_front()
    }

    /// Events still waiting to be matched under `key`.
    pub fn remaining(&self, key: &ClassificationKey) -> usize {
        self.buckets.get(key).map_or(0, VecDeque::len)
    }

    pub fn is_exhausted(&self) -> bool {
        self.buckets.values().all(VecDeque::is_empty)
    }
}
