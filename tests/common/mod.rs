#![allow(dead_code)]

//! XML fixture builders shared by the integration tests.

use lenex_dian_sync::io::{dian, lenex};
use lenex_dian_sync::model::dian::DianDocument;
use lenex_dian_sync::model::lenex::LenexDocument;

pub fn heat(id: &str, number: u32, order: u32) -> String {
    format!(r#"<HEAT heatid="{id}" number="{number}" order="{order}"/>"#)
}

pub fn lenex_event(id: &str, gender: &str, distance: u32, stroke: &str, heats: &[String]) -> String {
    format!(
        r#"<EVENT eventid="{id}" number="{id}" gender="{gender}">
             <SWIMSTYLE distance="{distance}" relaycount="1" stroke="{stroke}"/>
             <HEATS>{}</HEATS>
           </EVENT>"#,
        heats.concat()
    )
}

pub fn entry(event_id: &str, heat_id: &str, lane: u32) -> String {
    format!(r#"<ENTRY eventid="{event_id}" heatid="{heat_id}" lane="{lane}"/>"#)
}

pub fn entry_with_status(event_id: &str, heat_id: &str, lane: u32, status: &str) -> String {
    format!(r#"<ENTRY eventid="{event_id}" heatid="{heat_id}" lane="{lane}" status="{status}"/>"#)
}

pub fn lenex_athlete(first: &str, last: &str, birth_date: &str, entries: &[String]) -> String {
    let entries = if entries.is_empty() {
        String::new()
    } else {
        format!("<ENTRIES>{}</ENTRIES>", entries.concat())
    };
    format!(
        r#"<ATHLETE firstname="{first}" lastname="{last}" birthdate="{birth_date}" gender="M">{entries}</ATHLETE>"#
    )
}

/// A Lenex meet with one session per slice in `sessions` and a single club.
pub fn lenex_xml(sessions: &[&[String]], athletes: &[String]) -> String {
    let sessions: String = sessions
        .iter()
        .enumerate()
        .map(|(index, events)| {
            format!(
                r#"<SESSION number="{}"><EVENTS>{}</EVENTS></SESSION>"#,
                index + 1,
                events.concat()
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<LENEX version="3.0">
  <MEETS>
    <MEET name="City Open">
      <SESSIONS>{sessions}</SESSIONS>
      <CLUBS><CLUB name="Dolphins"><ATHLETES>{}</ATHLETES></CLUB></CLUBS>
    </MEET>
  </MEETS>
</LENEX>"#,
        athletes.concat()
    )
}

pub fn dian_athlete(first: &str, last: &str, birth_date: &str) -> String {
    format!(r#"<ATHLETE firstname="{first}" lastname="{last}" birthdate="{birth_date}"/>"#)
}

pub fn dian_event(gender: &str, distance: u32, stroke: &str, athletes: &[String]) -> String {
    format!(
        r#"<EVENT gender="{gender}" distance="{distance}" stroke="{stroke}"><ATHLETES>{}</ATHLETES></EVENT>"#,
        athletes.concat()
    )
}

pub fn dian_xml(events: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<MEET name="City Open"><EVENTS>{}</EVENTS></MEET>"#,
        events.concat()
    )
}

pub fn parse_lenex(xml: &str) -> LenexDocument {
    lenex::parse_lenex(xml).expect("Lenex parsed")
}

pub fn parse_dian(xml: &str) -> DianDocument {
    dian::parse_dian(xml).expect("Dian parsed")
}

/// Lenex side of the worked example: two 50m freestyle events for men, with
/// John Smith entered in heat 10 of the first one.
pub fn example_lenex() -> String {
    let events = [
        lenex_event("1", "M", 50, "FREE", &[heat("10", 1, 1), heat("11", 2, 2)]),
        lenex_event("2", "M", 50, "FREE", &[heat("20", 1, 1)]),
    ];
    let athletes = [lenex_athlete(
        "John",
        "Smith",
        "2000-01-01",
        &[entry("1", "10", 3)],
    )];
    lenex_xml(&[&events[..]], &athletes)
}

pub fn example_dian() -> String {
    let john = dian_athlete("John", "Smith", "01.01.2000");
    dian_xml(&[
        dian_event("M", 50, "FREE", std::slice::from_ref(&john)),
        dian_event("M", 50, "FREE", &[john]),
    ])
}
