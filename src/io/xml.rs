//! Minimal element tree over `quick-xml`, shared by the Lenex and Dian adapters.
//!
//! Attribute values are held unescaped. Character data, whitespace included,
//! is held in its escaped source form so that it is written back exactly as it
//! was read. Source bytes are decoded with the encoding named in the XML
//! declaration; output is always UTF-8.

use std::io::Write;

use encoding_rs::{Encoding, UTF_8};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Result, ToolError};

/// Child indices leading from an element down to one of its descendants.
pub type NodePath = Vec<usize>;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    DocType(String),
    ProcessingInstruction(String),
}

/// A parsed document: the root element plus the markup around it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Comments, doctype and processing instructions before the root.
    pub prolog: Vec<Node>,
    pub root: Element,
    /// Comments and processing instructions after the root.
    pub epilog: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Replaces the value of `key`, appending the attribute when missing.
    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(name, _)| name == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn remove_attribute(&mut self, key: &str) {
        self.attributes.retain(|(name, _)| name != key);
    }

    /// Direct child elements, skipping text and comments.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|element| element.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |element| element.name == name)
    }

    /// Elements named `name` below this one, in document order, paired with
    /// their path relative to `self`. Matches are not searched further.
    pub fn descendants_named(&self, name: &str) -> Vec<(NodePath, &Element)> {
        let mut found = Vec::new();
        let mut path = Vec::new();
        collect_descendants(self, name, &mut path, &mut found);
        found
    }

    pub fn at_path(&self, path: &[usize]) -> Option<&Element> {
        let mut current = self;
        for &index in path {
            current = match current.children.get(index)? {
                Node::Element(element) => element,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &index in path {
            current = match current.children.get_mut(index)? {
                Node::Element(element) => element,
                _ => return None,
            };
        }
        Some(current)
    }

    fn push_text(&mut self, raw: &str) {
        if let Some(Node::Text(existing)) = self.children.last_mut() {
            existing.push_str(raw);
            return;
        }
        self.children.push(Node::Text(raw.to_string()));
    }
}

fn collect_descendants<'a>(
    element: &'a Element,
    name: &str,
    path: &mut NodePath,
    found: &mut Vec<(NodePath, &'a Element)>,
) {
    for (index, child) in element.children.iter().enumerate() {
        let Node::Element(child) = child else {
            continue;
        };
        path.push(index);
        if child.name == name {
            found.push((path.clone(), child));
        } else {
            collect_descendants(child, name, path, found);
        }
        path.pop();
    }
}

/// Decodes raw document bytes to text.
///
/// A byte order mark wins over the declaration; without either the bytes are
/// taken as UTF-8. Undecodable input is an error rather than being replaced.
pub fn decode_document(bytes: &[u8]) -> Result<String> {
    let encoding = declared_encoding(bytes)?.unwrap_or(UTF_8);
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(ToolError::Xml(format!(
            "document is not valid {}",
            used.name()
        )));
    }
    Ok(text.into_owned())
}

fn declared_encoding(bytes: &[u8]) -> Result<Option<&'static Encoding>> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let label = match reader.read_event_into(&mut buf) {
        Ok(Event::Decl(ref decl)) => match decl.encoding() {
            Some(Ok(label)) => String::from_utf8_lossy(&label).into_owned(),
            _ => return Ok(None),
        },
        _ => return Ok(None),
    };
    Encoding::for_label(label.trim().as_bytes())
        .map(Some)
        .ok_or_else(|| ToolError::UnsupportedFormat(format!("unknown encoding '{label}'")))
}

/// Parses XML text into a [`Document`].
///
/// Inside the root every character of text is kept, whitespace between
/// elements included. Whitespace outside the root is dropped, since the writer
/// lays out the prolog itself; any other text there is an error.
pub fn parse_document(xml: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut prolog = Vec::new();
    let mut epilog = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| ToolError::Xml(err.to_string()))?;
        let node = match event {
            Event::Start(ref e) => {
                stack.push(element_from_start(e)?);
                None
            }
            Event::Empty(ref e) => {
                let element = element_from_start(e)?;
                attach(&mut stack, &mut root, element)?;
                None
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ToolError::Xml("unbalanced closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
                None
            }
            Event::Text(ref e) => {
                let text = String::from_utf8_lossy(e);
                match stack.last_mut() {
                    Some(parent) => parent.push_text(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(ToolError::Xml(
                            "character data outside the root element".to_string(),
                        ));
                    }
                }
                None
            }
            Event::GeneralRef(ref e) => {
                let parent = stack.last_mut().ok_or_else(|| {
                    ToolError::Xml("entity reference outside the root element".to_string())
                })?;
                parent.push_text(&format!("&{};", String::from_utf8_lossy(e)));
                None
            }
            Event::CData(ref e) => Some(Node::CData(String::from_utf8_lossy(e).into_owned())),
            Event::Comment(ref e) => Some(Node::Comment(String::from_utf8_lossy(e).into_owned())),
            Event::DocType(ref e) => Some(Node::DocType(String::from_utf8_lossy(e).into_owned())),
            Event::PI(ref e) => Some(Node::ProcessingInstruction(
                String::from_utf8_lossy(e).into_owned(),
            )),
            // The writer emits its own UTF-8 declaration.
            Event::Decl(_) => None,
            Event::Eof => break,
        };

        if let Some(node) = node {
            match (stack.last_mut(), &root) {
                (Some(parent), _) => parent.children.push(node),
                (None, None) => prolog.push(node),
                (None, Some(_)) => epilog.push(node),
            }
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ToolError::Xml("unexpected end of document".to_string()));
    }
    let root = root.ok_or_else(|| ToolError::Xml("document has no root element".to_string()))?;
    Ok(Document {
        prolog,
        root,
        epilog,
    })
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|err| ToolError::Xml(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = quick_xml::escape::unescape(&raw)
            .map_err(|err| ToolError::Xml(format!("attribute '{key}': {err}")))?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(ToolError::Xml(format!(
            "second root element '{}'",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

/// Serialises `document` as UTF-8 behind an XML declaration.
///
/// Content inside the root is written verbatim, so the layout of the source
/// survives; top-level nodes go on lines of their own.
pub fn write_document(document: &Document) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|err| ToolError::Xml(err.to_string()))?;
    for node in &document.prolog {
        write_line_break(&mut writer)?;
        write_node(&mut writer, node)?;
    }
    write_line_break(&mut writer)?;
    write_element(&mut writer, &document.root)?;
    for node in &document.epilog {
        write_line_break(&mut writer)?;
        write_node(&mut writer, node)?;
    }
    write_line_break(&mut writer)?;
    Ok(writer.into_inner())
}

fn write_line_break<W: Write>(writer: &mut Writer<W>) -> Result<()> {
    writer
        .write_event(Event::Text(BytesText::from_escaped("\n")))
        .map_err(|err| ToolError::Xml(err.to_string()))
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|err| ToolError::Xml(err.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|err| ToolError::Xml(err.to_string()))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|err| ToolError::Xml(err.to_string()))
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<()> {
    let written = match node {
        Node::Element(element) => return write_element(writer, element),
        Node::Text(raw) => writer.write_event(Event::Text(BytesText::from_escaped(raw.as_str()))),
        Node::CData(text) => writer.write_event(Event::CData(BytesCData::new(text.as_str()))),
        Node::Comment(raw) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(raw.as_str())))
        }
        Node::DocType(raw) => {
            writer.write_event(Event::DocType(BytesText::from_escaped(raw.as_str())))
        }
        Node::ProcessingInstruction(raw) => {
            writer.write_event(Event::PI(BytesPI::new(raw.as_str())))
        }
    };
    written.map_err(|err| ToolError::Xml(err.to_string()))
}
