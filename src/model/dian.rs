//! In-memory view of a Dian meet document.
//!
//! The document keeps its full element tree so that everything the typed view
//! does not own survives a write. Typed records remember where they live in
//! that tree through a [`NodePath`].

use chrono::NaiveDate;

use crate::io::xml::{Document, Element, NodePath};
use crate::model::{AthleteKey, ClassificationKey, Gender, Stroke};

#[derive(Debug, Clone, PartialEq)]
pub struct DianDocument {
    pub(crate) source: Document,
    pub events: Vec<DianEvent>,
}

impl DianDocument {
    /// Root element of the source tree, as read. Reconciled values live in
    /// `events` until the document is written.
    pub fn root(&self) -> &Element {
        &self.source.root
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DianEvent {
    pub(crate) path: NodePath,
    pub gender: Gender,
    pub distance: u32,
    pub stroke: Stroke,
    /// Number of heats; `None` until the event has been reconciled or when the
    /// source left it out.
    pub heat_count: Option<u32>,
    pub athletes: Vec<DianAthlete>,
}

impl DianEvent {
    pub fn classification(&self) -> ClassificationKey {
        ClassificationKey::new(self.gender, self.distance, self.stroke)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DianAthlete {
    pub(crate) path: NodePath,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub heat: Option<u32>,
    pub lane: Option<u32>,
}

impl DianAthlete {
    /// Identity of the athlete, absent when the document carries no birth date.
    pub fn key(&self) -> Option<AthleteKey> {
        self.birth_date
            .map(|birth_date| AthleteKey::new(&self.first_name, &self.last_name, birth_date))
    }
}
