//! Value types shared by both meet documents.
//!
//! Neither document carries identifiers the other understands, so events are
//! related through a [`ClassificationKey`] and athletes through an
//! [`AthleteKey`]. Both keys are built through the constructors in this module
//! so that the Lenex and Dian sides normalise identically.

pub mod dian;
pub mod lenex;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Birth date layouts accepted from either document, tried in order.
const BIRTH_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

/// Gender category of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "X")]
    Mixed,
    #[serde(rename = "A")]
    All,
}

impl Gender {
    /// Resolves the single letter code used by both documents.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            "X" => Some(Gender::Mixed),
            "A" => Some(Gender::All),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Mixed => "X",
            Gender::All => "A",
        }
    }
}

/// Stroke category of a swim style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stroke {
    Apnea,
    Back,
    Bifins,
    Breast,
    Fly,
    Free,
    Immersion,
    #[serde(rename = "IMRELAY")]
    ImRelay,
    Medley,
    Surface,
    Unknown,
}

impl Stroke {
    pub fn from_code(code: &str) -> Option<Self> {
        let stroke = match code.trim().to_ascii_uppercase().as_str() {
            "APNEA" => Stroke::Apnea,
            "BACK" => Stroke::Back,
            "BIFINS" => Stroke::Bifins,
            "BREAST" => Stroke::Breast,
            "FLY" => Stroke::Fly,
            "FREE" => Stroke::Free,
            "IMMERSION" => Stroke::Immersion,
            "IMRELAY" => Stroke::ImRelay,
            "MEDLEY" => Stroke::Medley,
            "SURFACE" => Stroke::Surface,
            "UNKNOWN" => Stroke::Unknown,
            _ => return None,
        };
        Some(stroke)
    }

    pub fn code(self) -> &'static str {
        match self {
            Stroke::Apnea => "APNEA",
            Stroke::Back => "BACK",
            Stroke::Bifins => "BIFINS",
            Stroke::Breast => "BREAST",
            Stroke::Fly => "FLY",
            Stroke::Free => "FREE",
            Stroke::Immersion => "IMMERSION",
            Stroke::ImRelay => "IMRELAY",
            Stroke::Medley => "MEDLEY",
            Stroke::Surface => "SURFACE",
            Stroke::Unknown => "UNKNOWN",
        }
    }
}

/// Groups equivalent event types across both documents.
///
/// Several events of one meet may share a key (heats and finals, age groups),
/// so the key groups events and never identifies a single one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationKey {
    pub gender: Gender,
    pub distance: u32,
    pub stroke: Stroke,
}

impl ClassificationKey {
    pub fn new(gender: Gender, distance: u32, stroke: Stroke) -> Self {
        Self {
            gender,
            distance,
            stroke,
        }
    }
}

impl fmt::Display for ClassificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}m {}",
            self.gender.code(),
            self.distance,
            self.stroke.code()
        )
    }
}

/// Natural identity of an athlete: lowercased names plus birth date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AthleteKey {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
}

impl AthleteKey {
    /// Builds a key, normalising both names the same way for either document.
    pub fn new(first_name: &str, last_name: &str, birth_date: NaiveDate) -> Self {
        Self {
            first_name: normalize_name(first_name),
            last_name: normalize_name(last_name),
            birth_date,
        }
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parses a birth date written either as `YYYY-MM-DD` or `DD.MM.YYYY`.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    BIRTH_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}
