use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{Result, ToolError};
use crate::io::xml::{self, Element};
use crate::model::lenex::{Athlete, Club, Entry, EntryStatus, Event, Heat, LenexDocument, Meet, Session};
use crate::model::{Gender, Stroke, parse_birth_date};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Physical packaging of a Lenex file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LenexContainer {
    /// `.lef`: the XML document itself.
    Plain,
    /// `.lxf`: a zip archive holding the `.lef` document.
    Zipped,
}

/// Reads a Lenex file, unpacking it first when it is an `.lxf` archive.
pub fn read_lenex(path: &Path) -> Result<LenexDocument> {
    let bytes = match detect_container(path)? {
        LenexContainer::Plain => fs::read(path)?,
        LenexContainer::Zipped => read_zipped(path)?,
    };
    parse_lenex(&xml::decode_document(&bytes)?)
}

/// Chooses the container from the extension, sniffing the file header when the
/// extension is not conclusive.
pub fn detect_container(path: &Path) -> Result<LenexContainer> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("lxf") => return Ok(LenexContainer::Zipped),
        Some("lef") | Some("xml") => return Ok(LenexContainer::Plain),
        _ => {}
    }

    let mut header = [0u8; 4];
    let mut file = File::open(path)?;
    let read = file.read(&mut header)?;
    if read == ZIP_MAGIC.len() && header.as_slice() == ZIP_MAGIC {
        Ok(LenexContainer::Zipped)
    } else {
        Ok(LenexContainer::Plain)
    }
}

fn read_zipped(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let member = names
        .iter()
        .find(|name| name.to_ascii_lowercase().ends_with(".lef"))
        .or_else(|| names.first())
        .ok_or_else(|| {
            ToolError::UnsupportedFormat(format!("{} is an empty archive", path.display()))
        })?;
    debug!(member = %member, "reading Lenex document from archive");

    let mut content = Vec::new();
    archive.by_name(member)?.read_to_end(&mut content)?;
    Ok(content)
}

/// Parses Lenex XML text.
pub fn parse_lenex(xml: &str) -> Result<LenexDocument> {
    let root = xml::parse_document(xml)?.root;
    if root.name != "LENEX" {
        return Err(ToolError::lenex(format!(
            "expected root element LENEX, found {}",
            root.name
        )));
    }

    let mut meets = root
        .child("MEETS")
        .into_iter()
        .flat_map(|meets| meets.children_named("MEET"));
    let meet = meets
        .next()
        .ok_or_else(|| ToolError::lenex("no MEET element"))?;
    let ignored = meets.count();
    if ignored > 0 {
        warn!(ignored, "Lenex file holds several meets; only the first is used");
    }

    Ok(LenexDocument {
        meet: parse_meet(meet)?,
    })
}

fn parse_meet(element: &Element) -> Result<Meet> {
    let sessions = nested(element, "SESSIONS", "SESSION")
        .map(parse_session)
        .collect::<Result<Vec<_>>>()?;
    let clubs = nested(element, "CLUBS", "CLUB")
        .map(parse_club)
        .collect::<Result<Vec<_>>>()?;
    Ok(Meet {
        name: element.attribute("name").map(str::to_string),
        sessions,
        clubs,
    })
}

fn parse_session(element: &Element) -> Result<Session> {
    let events = nested(element, "EVENTS", "EVENT")
        .map(parse_event)
        .collect::<Result<Vec<_>>>()?;
    Ok(Session {
        number: optional_number(element, "number")?,
        events,
    })
}

fn parse_event(element: &Element) -> Result<Event> {
    let id = required(element, "eventid")?.to_string();
    let gender = match element.attribute("gender") {
        Some(code) => Gender::from_code(code)
            .ok_or_else(|| ToolError::lenex(format!("event {id}: unknown gender '{code}'")))?,
        None => Gender::All,
    };

    let style = element
        .child("SWIMSTYLE")
        .ok_or_else(|| ToolError::lenex(format!("event {id}: missing SWIMSTYLE")))?;
    let distance = required_number(style, "distance")?;
    let stroke_code = required(style, "stroke")?;
    let stroke = Stroke::from_code(stroke_code)
        .ok_or_else(|| ToolError::lenex(format!("event {id}: unknown stroke '{stroke_code}'")))?;

    let heats = nested(element, "HEATS", "HEAT")
        .map(parse_heat)
        .collect::<Result<Vec<_>>>()?;

    Ok(Event {
        number: optional_number(element, "number")?,
        id,
        gender,
        distance,
        stroke,
        heats,
    })
}

fn parse_heat(element: &Element) -> Result<Heat> {
    let number = required_number(element, "number")?;
    Ok(Heat {
        id: required(element, "heatid")?.to_string(),
        number,
        order: optional_number(element, "order")?.unwrap_or(number),
    })
}

fn parse_club(element: &Element) -> Result<Club> {
    let athletes = nested(element, "ATHLETES", "ATHLETE")
        .map(parse_athlete)
        .collect::<Result<Vec<_>>>()?;
    Ok(Club {
        name: element.attribute("name").map(str::to_string),
        athletes,
    })
}

fn parse_athlete(element: &Element) -> Result<Athlete> {
    let first_name = required(element, "firstname")?.to_string();
    let last_name = required(element, "lastname")?.to_string();
    let raw_birth_date = required(element, "birthdate")?;
    let birth_date = parse_birth_date(raw_birth_date).ok_or_else(|| {
        ToolError::lenex(format!(
            "athlete {first_name} {last_name}: invalid birthdate '{raw_birth_date}'"
        ))
    })?;
    let entries = nested(element, "ENTRIES", "ENTRY")
        .map(parse_entry)
        .collect::<Result<Vec<_>>>()?;

    Ok(Athlete {
        first_name,
        last_name,
        birth_date,
        entries,
    })
}

fn parse_entry(element: &Element) -> Result<Entry> {
    Ok(Entry {
        event_id: required(element, "eventid")?.to_string(),
        heat_id: element
            .attribute("heatid")
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string),
        lane: optional_number(element, "lane")?,
        status: element
            .attribute("status")
            .map(EntryStatus::from_code)
            .unwrap_or_default(),
    })
}

/// Children named `item` of the first `wrapper` child, the shape Lenex uses
/// for every collection.
fn nested<'a>(
    element: &'a Element,
    wrapper: &'a str,
    item: &'a str,
) -> impl Iterator<Item = &'a Element> + 'a {
    element
        .child(wrapper)
        .into_iter()
        .flat_map(move |collection| collection.children_named(item))
}

fn required<'a>(element: &'a Element, key: &str) -> Result<&'a str> {
    element.attribute(key).ok_or_else(|| {
        ToolError::lenex(format!("{} is missing attribute '{key}'", element.name))
    })
}

fn required_number(element: &Element, key: &str) -> Result<u32> {
    let raw = required(element, key)?;
    parse_number(element, key, raw)
}

fn optional_number(element: &Element, key: &str) -> Result<Option<u32>> {
    match element.attribute(key) {
        Some(raw) if !raw.trim().is_empty() => parse_number(element, key, raw).map(Some),
        _ => Ok(None),
    }
}

fn parse_number(element: &Element, key: &str, raw: &str) -> Result<u32> {
    raw.trim().parse().map_err(|_| {
        ToolError::lenex(format!(
            "{} attribute '{key}' is not a number: '{raw}'",
            element.name
        ))
    })
}
