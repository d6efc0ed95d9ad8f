use std::fs;
use std::path::Path;

use crate::error::{Result, ToolError};
use crate::io::xml::{self, Document, Element, NodePath};
use crate::model::dian::{DianAthlete, DianDocument, DianEvent};
use crate::model::{Gender, Stroke, parse_birth_date};

/// Root element of a Dian meet file.
pub const ROOT_ELEMENT: &str = "MEET";

/// Reads a Dian `.swimming` file in whatever encoding its XML declaration
/// names.
pub fn read_dian(path: &Path) -> Result<DianDocument> {
    let source = xml::decode_document(&fs::read(path)?)?;
    parse_dian(&source)
}

/// Parses Dian XML text. Every `EVENT` element becomes a local event and every
/// `ATHLETE` below it one of its athletes.
pub fn parse_dian(xml: &str) -> Result<DianDocument> {
    let source = xml::parse_document(xml)?;
    if source.root.name != ROOT_ELEMENT {
        return Err(ToolError::dian(format!(
            "expected root element {ROOT_ELEMENT}, found {}",
            source.root.name
        )));
    }

    let events = source
        .root
        .descendants_named("EVENT")
        .into_iter()
        .map(|(path, element)| parse_event(path, element))
        .collect::<Result<Vec<_>>>()?;

    Ok(DianDocument { source, events })
}

fn parse_event(path: NodePath, element: &Element) -> Result<DianEvent> {
    let gender_code = required(element, "gender")?;
    let gender = Gender::from_code(gender_code)
        .ok_or_else(|| ToolError::dian(format!("unknown gender '{gender_code}'")))?;
    let stroke_code = required(element, "stroke")?;
    let stroke = Stroke::from_code(stroke_code)
        .ok_or_else(|| ToolError::dian(format!("unknown stroke '{stroke_code}'")))?;
    let distance = parse_number(element, "distance", required(element, "distance")?)?;

    let athletes = element
        .descendants_named("ATHLETE")
        .into_iter()
        .map(|(relative, athlete)| {
            let mut athlete_path = path.clone();
            athlete_path.extend(relative);
            parse_athlete(athlete_path, athlete)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DianEvent {
        heat_count: optional_number(element, "heatcount")?,
        path,
        gender,
        distance,
        stroke,
        athletes,
    })
}

fn parse_athlete(path: NodePath, element: &Element) -> Result<DianAthlete> {
    let birth_date = match element.attribute("birthdate") {
        Some(raw) if !raw.trim().is_empty() => Some(
            parse_birth_date(raw)
                .ok_or_else(|| ToolError::dian(format!("invalid birthdate '{raw}'")))?,
        ),
        _ => None,
    };

    Ok(DianAthlete {
        first_name: required(element, "firstname")?.to_string(),
        last_name: required(element, "lastname")?.to_string(),
        birth_date,
        heat: optional_number(element, "heatnum")?,
        lane: optional_number(element, "lanenum")?,
        path,
    })
}

/// Serialises the document, carrying every reconciled value back into the
/// element tree it was read from.
pub fn dian_to_bytes(document: &DianDocument) -> Result<Vec<u8>> {
    xml::write_document(&to_document(document)?)
}

/// Writes the document to `path`.
pub fn write_dian(path: &Path, document: &DianDocument) -> Result<()> {
    fs::write(path, dian_to_bytes(document)?)?;
    Ok(())
}

/// Copy of the source tree with heat counts and heat/lane numbers patched in.
/// Athletes without a heat and events without a heat count keep their source
/// attributes untouched.
pub fn to_document(document: &DianDocument) -> Result<Document> {
    let mut source = document.source.clone();
    let root = &mut source.root;
    for event in &document.events {
        let element = locate(root, &event.path)?;
        if let Some(heat_count) = event.heat_count {
            element.set_attribute("heatcount", heat_count.to_string());
        }

        for athlete in &event.athletes {
            let Some(heat) = athlete.heat else {
                continue;
            };
            let element = locate(root, &athlete.path)?;
            element.set_attribute("heatnum", heat.to_string());
            match athlete.lane {
                Some(lane) => element.set_attribute("lanenum", lane.to_string()),
                None => element.remove_attribute("lanenum"),
            }
        }
    }
    Ok(source)
}

fn locate<'a>(root: &'a mut Element, path: &[usize]) -> Result<&'a mut Element> {
    root.at_path_mut(path)
        .ok_or_else(|| ToolError::dian(format!("element at {path:?} no longer exists")))
}

fn required<'a>(element: &'a Element, key: &str) -> Result<&'a str> {
    element.attribute(key).ok_or_else(|| {
        ToolError::dian(format!("{} is missing attribute '{key}'", element.name))
    })
}

fn optional_number(element: &Element, key: &str) -> Result<Option<u32>> {
    match element.attribute(key) {
        Some(raw) if !raw.trim().is_empty() => parse_number(element, key, raw).map(Some),
        _ => Ok(None),
    }
}

fn parse_number(element: &Element, key: &str, raw: &str) -> Result<u32> {
    raw.trim().parse().map_err(|_| {
        ToolError::dian(format!(
            "{} attribute '{key}' is not a number: '{raw}'",
            element.name
        ))
    })
}
