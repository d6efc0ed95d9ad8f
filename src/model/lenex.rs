//! In-memory view of a Lenex entry list, limited to what reconciliation reads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{AthleteKey, ClassificationKey, Gender, Stroke};

/// Root of a parsed Lenex file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenexDocument {
    pub meet: Meet,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Meet {
    pub name: Option<String>,
    pub sessions: Vec<Session>,
    pub clubs: Vec<Club>,
}

impl Meet {
    /// Every event of the meet in session order, then event order.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.sessions.iter().flat_map(|session| session.events.iter())
    }

    /// Every athlete of every club, in document order.
    pub fn athletes(&self) -> impl Iterator<Item = &Athlete> {
        self.clubs.iter().flat_map(|club| club.athletes.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    pub number: Option<u32>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub number: Option<u32>,
    pub gender: Gender,
    pub distance: u32,
    pub stroke: Stroke,
    pub heats: Vec<Heat>,
}

impl Event {
    pub fn classification(&self) -> ClassificationKey {
        ClassificationKey::new(self.gender, self.distance, self.stroke)
    }
}

/// A single race of an event. `order` is the position the heat is swum in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heat {
    pub id: String,
    pub number: u32,
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Club {
    pub name: Option<String>,
    pub athletes: Vec<Athlete>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub entries: Vec<Entry>,
}

impl Athlete {
    pub fn key(&self) -> AthleteKey {
        AthleteKey::new(&self.first_name, &self.last_name, self.birth_date)
    }
}

/// Registration of an athlete for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub event_id: String,
    pub heat_id: Option<String>,
    pub lane: Option<u32>,
    pub status: EntryStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntryStatus {
    #[default]
    Normal,
    /// `EXH`
    Exhibition,
    /// `RJC`
    Rejected,
    /// `SICK`
    Sick,
    /// `WDR`
    Withdrawn,
}

impl EntryStatus {
    /// Resolves a status code. Unrecognised codes count as a normal entry.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "EXH" => EntryStatus::Exhibition,
            "RJC" => EntryStatus::Rejected,
            "SICK" => EntryStatus::Sick,
            "WDR" => EntryStatus::Withdrawn,
            _ => EntryStatus::Normal,
        }
    }

    /// Rejected and withdrawn entries never take part in a heat.
    pub fn is_participating(self) -> bool {
        !matches!(self, EntryStatus::Rejected | EntryStatus::Withdrawn)
    }
}
