mod common;

use std::fs::{self, File};
use std::io::Write;

use chrono::NaiveDate;
use common::*;
use lenex_dian_sync::ToolError;
use lenex_dian_sync::io::lenex::{LenexContainer, detect_container, read_lenex};
use lenex_dian_sync::io::{dian, lenex, xml};
use lenex_dian_sync::model::lenex::EntryStatus;
use lenex_dian_sync::io::xml::Node;
use lenex_dian_sync::model::{Gender, Stroke};
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use zip::write::SimpleFileOptions;

#[test]
fn lenex_reader_collects_sessions_heats_and_entries() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<LENEX version="3.0">
  <CONSTRUCTOR name="Splash"/>
  <MEETS>
    <MEET name="Spring Cup" city="Riga">
      <SESSIONS>
        <SESSION number="1">
          <EVENTS>
            <EVENT eventid="31" number="1">
              <SWIMSTYLE distance="100" relaycount="1" stroke="MEDLEY"/>
              <HEATS>
                <HEAT heatid="311" number="1"/>
                <HEAT heatid="312" number="2" order="1"/>
              </HEATS>
            </EVENT>
          </EVENTS>
        </SESSION>
      </SESSIONS>
      <CLUBS>
        <CLUB name="Sharks">
          <ATHLETES>
            <ATHLETE athleteid="7" firstname="Liis" lastname="Tamm" birthdate="2006-03-04" gender="F">
              <ENTRIES>
                <ENTRY eventid="31" heatid="312" lane="5" status="SICK"/>
                <ENTRY eventid="32"/>
              </ENTRIES>
            </ATHLETE>
          </ATHLETES>
        </CLUB>
      </CLUBS>
    </MEET>
  </MEETS>
</LENEX>"#;

    let document = lenex::parse_lenex(xml).expect("Lenex parsed");

    let event = &document.meet.sessions[0].events[0];
    assert_eq!(document.meet.name.as_deref(), Some("Spring Cup"));
    assert_eq!(event.id, "31");
    assert_eq!(event.gender, Gender::All);
    assert_eq!((event.distance, event.stroke), (100, Stroke::Medley));
    let orders: Vec<(&str, u32)> = event
        .heats
        .iter()
        .map(|heat| (heat.id.as_str(), heat.order))
        .collect();
    assert_eq!(orders, vec![("311", 1), ("312", 1)]);

    let athlete = document.meet.athletes().next().expect("one athlete");
    assert_eq!(
        athlete.birth_date,
        NaiveDate::from_ymd_opt(2006, 3, 4).expect("valid date")
    );
    assert_eq!(athlete.entries[0].status, EntryStatus::Sick);
    assert!(athlete.entries[0].status.is_participating());
    assert_eq!(athlete.entries[0].lane, Some(5));
    assert_eq!(athlete.entries[1].heat_id, None);
    assert_eq!(athlete.entries[1].status, EntryStatus::Normal);
}

#[test]
fn lenex_reader_rejects_unknown_strokes() {
    let xml = lenex_xml(&[&[lenex_event("1", "M", 50, "DOLPHIN", &[])][..]], &[]);

    let error = lenex::parse_lenex(&xml).expect_err("stroke rejected");

    assert!(matches!(error, ToolError::InvalidDocument { kind: "Lenex", .. }));
}

#[test]
fn lenex_reader_requires_a_meet() {
    let error = lenex::parse_lenex(r#"<LENEX version="3.0"><MEETS/></LENEX>"#)
        .expect_err("missing meet rejected");

    assert!(matches!(error, ToolError::InvalidDocument { .. }));
}

#[test]
fn malformed_xml_is_reported() {
    let error = lenex::parse_lenex("<LENEX><MEETS></LENEX>").expect_err("mismatched tags");

    assert!(matches!(error, ToolError::Xml(_)));
}

#[test]
fn zipped_lenex_files_are_unpacked() {
    let temp_dir = tempdir().expect("temporary directory");
    let lxf_path = temp_dir.path().join("entries.lxf");
    let mut archive = zip::ZipWriter::new(File::create(&lxf_path).expect("archive created"));
    archive
        .start_file("entries.lef", SimpleFileOptions::default())
        .expect("member started");
    archive
        .write_all(example_lenex().as_bytes())
        .expect("member written");
    archive.finish().expect("archive finished");

    let document = read_lenex(&lxf_path).expect("Lenex read from archive");

    assert_eq!(document, parse_lenex(&example_lenex()));
}

#[test]
fn container_is_sniffed_when_extension_is_unknown() {
    let temp_dir = tempdir().expect("temporary directory");
    let zipped = temp_dir.path().join("entries.bin");
    let mut archive = zip::ZipWriter::new(File::create(&zipped).expect("archive created"));
    archive
        .start_file("entries.lef", SimpleFileOptions::default())
        .expect("member started");
    archive
        .write_all(example_lenex().as_bytes())
        .expect("member written");
    archive.finish().expect("archive finished");
    let plain = temp_dir.path().join("entries.txt");
    fs::write(&plain, example_lenex()).expect("plain file written");

    assert_eq!(
        detect_container(&zipped).expect("sniffed"),
        LenexContainer::Zipped
    );
    assert_eq!(
        detect_container(&plain).expect("sniffed"),
        LenexContainer::Plain
    );
}

#[test]
fn dian_reader_accepts_unset_and_empty_assignments() {
    let xml = r#"<MEET>
  <EVENTS>
    <EVENT gender="F" distance="50" stroke="BACK" heatcount="">
      <ATHLETES>
        <ATHLETE firstname="Ann" lastname="Lee" birthdate="06.05.2004" heatnum="" lanenum=""/>
        <ATHLETE firstname="Bea" lastname="Lee" birthdate="2004-05-07" heatnum="2" lanenum="8"/>
      </ATHLETES>
    </EVENT>
  </EVENTS>
</MEET>"#;

    let document = dian::parse_dian(xml).expect("Dian parsed");

    let event = &document.events[0];
    assert_eq!(event.heat_count, None);
    assert_eq!((event.athletes[0].heat, event.athletes[0].lane), (None, None));
    assert_eq!((event.athletes[1].heat, event.athletes[1].lane), (Some(2), Some(8)));
    assert_eq!(
        event.athletes[1].birth_date,
        NaiveDate::from_ymd_opt(2004, 5, 7)
    );
}

#[test]
fn dian_reader_rejects_a_foreign_root() {
    let error = dian::parse_dian("<LENEX/>").expect_err("wrong root rejected");

    assert!(matches!(error, ToolError::InvalidDocument { kind: "Dian", .. }));
}

#[test]
fn dian_writer_patches_assignments_and_keeps_everything_else() {
    let source = r#"<?xml version="1.0" encoding="UTF-8"?>
<MEET name="Tom &amp; Jerry Cup" version="2">
  <POOL lanes="8"/>
  <EVENTS>
    <EVENT number="1" gender="M" distance="50" stroke="FREE" heatcount="9">
      <NOTE>Seeded by <B>time</B></NOTE>
      <ATHLETES>
        <ATHLETE id="a1" firstname="John" lastname="Smith" birthdate="01.01.2000" lanenum="7"/>
        <ATHLETE id="a2" firstname="Nobody" lastname="Here" birthdate="01.01.1990"/>
      </ATHLETES>
    </EVENT>
    <EVENT number="2" gender="F" distance="1500" stroke="FREE" heatcount="3"/>
  </EVENTS>
</MEET>"#;
    let lenex = parse_lenex(&example_lenex());
    let mut document = dian::parse_dian(source).expect("Dian parsed");
    assert_eq!(document.root().attribute("name"), Some("Tom & Jerry Cup"));

    lenex_dian_sync::reconcile::reconcile(&mut document, &lenex);
    assert_eq!(
        document.root().descendants_named("EVENT")[0].1.attribute("heatcount"),
        Some("9")
    );
    let bytes = dian::dian_to_bytes(&document).expect("Dian written");
    let written = String::from_utf8(bytes).expect("UTF-8 output");

    assert!(written.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(written.contains(r#"name="Tom &amp; Jerry Cup""#));

    let root = xml::parse_document(&written).expect("output parsed").root;
    assert_eq!(root.attribute("version"), Some("2"));
    assert_eq!(
        root.child("POOL").and_then(|pool| pool.attribute("lanes")),
        Some("8")
    );

    let events: Vec<_> = root
        .descendants_named("EVENT")
        .into_iter()
        .map(|(_, event)| event)
        .collect();
    assert_eq!(events[0].attribute("heatcount"), Some("1"));
    assert_eq!(events[1].attribute("heatcount"), Some("3"));

    let note = events[0].child("NOTE").expect("note kept");
    assert_eq!(note.child("B").map(|bold| bold.children.len()), Some(1));

    let athletes: Vec<_> = events[0]
        .descendants_named("ATHLETE")
        .into_iter()
        .map(|(_, athlete)| athlete)
        .collect();
    assert_eq!(athletes[0].attribute("id"), Some("a1"));
    assert_eq!(athletes[0].attribute("heatnum"), Some("1"));
    assert_eq!(athletes[0].attribute("lanenum"), Some("3"));
    assert_eq!(athletes[1].attribute("heatnum"), None);

    let reread = dian::parse_dian(&written).expect("output parsed as Dian");
    assert_eq!(reread.events[0].athletes[0].heat, Some(1));
    assert_eq!(reread.events[1].heat_count, Some(3));
}

#[test]
fn element_paths_point_back_into_the_tree() {
    let root = xml::parse_document(&example_dian()).expect("parsed").root;

    let found = root.descendants_named("ATHLETE");

    assert_eq!(found.len(), 2);
    for (path, athlete) in found {
        assert_eq!(root.at_path(&path), Some(athlete));
    }
}

#[test]
fn dian_writer_reproduces_untouched_markup_exactly() {
    let source = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE MEET>
<?xml-stylesheet href="meet.xsl"?>
<!-- exported by the meet desk -->
<MEET version="2">
  <TITLE>Tom &amp; Jerry Cup</TITLE>
  <NOTE>Seeded by <B>time</B> only</NOTE>
  <EVENTS>
    <EVENT gender="F" distance="200" stroke="BREAST">
      <ATHLETES><ATHLETE firstname="Ann" lastname="Lee" birthdate="06.05.2004"/></ATHLETES>
    </EVENT>
  </EVENTS>
</MEET>
"#;
    let mut document = dian::parse_dian(source).expect("Dian parsed");

    lenex_dian_sync::reconcile::reconcile(&mut document, &parse_lenex(&example_lenex()));
    let written = String::from_utf8(dian::dian_to_bytes(&document).expect("Dian written"))
        .expect("UTF-8 output");

    assert!(written.contains("<TITLE>Tom &amp; Jerry Cup</TITLE>"));
    assert!(written.contains("<NOTE>Seeded by <B>time</B> only</NOTE>"));
    assert_eq!(written, source);
}

#[test]
fn markup_around_the_root_is_kept() {
    let document = xml::parse_document(
        "<?xml version=\"1.0\"?>\n<!DOCTYPE MEET>\n<?render fast?>\n<MEET/>\n<!-- end -->\n",
    )
    .expect("parsed");

    assert_eq!(
        document.prolog,
        vec![
            Node::DocType("MEET".to_string()),
            Node::ProcessingInstruction("render fast".to_string()),
        ]
    );
    assert_eq!(document.epilog, vec![Node::Comment(" end ".to_string())]);
}

#[test]
fn stray_text_outside_the_root_is_rejected() {
    let error = xml::parse_document("<MEET/> trailing").expect_err("stray text rejected");

    assert!(matches!(error, ToolError::Xml(_)));
}

#[test]
fn dian_files_in_a_legacy_code_page_are_decoded() {
    let temp_dir = tempdir().expect("temporary directory");
    let lenex_path = temp_dir.path().join("entries.lef");
    let dian_path = temp_dir.path().join("meet.swimming");
    let output_path = temp_dir.path().join("distributed.swimming");
    let events = [lenex_event("1", "M", 100, "BACK", &[heat("10", 1, 1)])];
    let athletes = [lenex_athlete(
        "Иван",
        "Петров",
        "2001-02-03",
        &[entry("1", "10", 4)],
    )];
    fs::write(&lenex_path, lenex_xml(&[&events[..]], &athletes)).expect("Lenex input written");
    let source = dian_xml(&[dian_event(
        "M",
        100,
        "BACK",
        &[dian_athlete("ИВАН", "Петров", "03.02.2001")],
    )])
    .replace("UTF-8", "windows-1251");
    let (encoded, _, unmappable) = encoding_rs::WINDOWS_1251.encode(&source);
    assert!(!unmappable);
    fs::write(&dian_path, &encoded).expect("Dian input written");

    let document = dian::read_dian(&dian_path).expect("windows-1251 Dian read");
    assert_eq!(document.events[0].athletes[0].first_name, "ИВАН");

    let report = lenex_dian_sync::sync::lenex_to_dian(&lenex_path, &dian_path, &output_path)
        .expect("Lenex to Dian sync");
    assert_eq!(report.matched(), 1);

    let written = fs::read_to_string(&output_path).expect("output is UTF-8");
    assert!(written.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(written.contains(r#"lastname="Петров""#));
    let athlete = &dian::read_dian(&output_path).expect("output read").events[0].athletes[0];
    assert_eq!((athlete.heat, athlete.lane), (Some(1), Some(4)));
}

#[test]
fn undecodable_documents_are_reported() {
    let unknown = xml::decode_document(br#"<?xml version="1.0" encoding="klingon"?><MEET/>"#)
        .expect_err("unknown label rejected");
    assert!(matches!(unknown, ToolError::UnsupportedFormat(_)));

    let broken = xml::decode_document(b"<?xml version=\"1.0\"?><MEET name=\"\xff\"/>")
        .expect_err("invalid UTF-8 rejected");
    assert!(matches!(broken, ToolError::Xml(_)));
}
