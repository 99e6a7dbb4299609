//! Owned XML element tree for icon files.
//!
//! Icons are small, so each file is parsed into a fully owned tree that can be
//! rewritten in place before it is moved into the sprite. Only the parts that
//! matter for inline SVG are kept:
//!
//! - elements (qualified tag name, attributes in document order, children)
//! - text and CDATA content, with entity references resolved
//!
//! Comments, processing instructions, doctypes and the XML declaration are
//! dropped. Internal `<!ENTITY>` declarations from the doctype are kept long
//! enough to expand references to them in text and attribute values.
//! Namespace declarations (`xmlns`, `xmlns:*`) are not attributes; each
//! element records its own in [`Element::namespaces`] and writes them back
//! ahead of its attributes.

use quick_xml::{
    Reader, Writer,
    escape::resolve_predefined_entity,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use regex::Regex;
use rustc_hash::FxHashMap;
use std::{
    io::{self, Write},
    sync::LazyLock,
};
use thiserror::Error;

/// Internal general entity declaration with a literal value.
static ENTITY_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<!ENTITY[ \t\r\n]+([^ \t\r\n%]+)[ \t\r\n]+(?:"([^"]*)"|'([^']*)')[ \t\r\n]*>"#)
        .expect("entity declaration regex is valid")
});

/// Entities declared in a document's internal doctype subset.
type Entities = FxHashMap<String, String>;

/// Markup that could not be turned into a tree.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct XmlError {
    /// Byte offset in the source where the problem was detected.
    pub position: u64,
    pub message: String,
}

impl XmlError {
    fn new(position: u64, message: impl ToString) -> Self {
        Self {
            position,
            message: message.to_string(),
        }
    }
}

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with owned name, attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Namespace declarations as `(prefix, uri)`; the default namespace has
    /// an empty prefix.
    pub namespaces: Vec<(String, String)>,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespaces: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    #[inline]
    pub fn is_tag(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn has_attr(&self, key: &str) -> bool {
        self.attr(key).is_some()
    }

    /// Set an attribute, replacing the value in place if it already exists.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((key, value)),
        }
    }

    /// Namespace URI this element declares for `prefix`.
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Declare `prefix`, replacing an existing declaration of it.
    pub fn declare_namespace(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        let prefix = prefix.into();
        let uri = uri.into();
        match self.namespaces.iter_mut().find(|(p, _)| *p == prefix) {
            Some((_, existing)) => *existing = uri,
            None => self.namespaces.push((prefix, uri)),
        }
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Iterate over direct element children, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(elem) => Some(elem),
            Node::Text(_) => None,
        })
    }

    /// Visit this element and every descendant element, parents first.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(elem) = child {
                elem.walk_mut(f);
            }
        }
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Serialize with two-space indentation and no XML declaration.
    pub fn to_xml(&self) -> io::Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        write_element(&mut writer, self)?;
        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }
}

impl From<Element> for Node {
    fn from(elem: Element) -> Self {
        Node::Element(elem)
    }
}

fn collect_text(elem: &Element, out: &mut String) {
    for child in &elem.children {
        match child {
            Node::Element(e) => collect_text(e, out),
            Node::Text(t) => out.push_str(t),
        }
    }
}

fn write_element<W: Write>(writer: &mut Writer<W>, elem: &Element) -> io::Result<()> {
    let mut start = BytesStart::new(elem.name.as_str());
    for (prefix, uri) in &elem.namespaces {
        if prefix.is_empty() {
            start.push_attribute(("xmlns", uri.as_str()));
        } else {
            start.push_attribute((format!("xmlns:{prefix}").as_str(), uri.as_str()));
        }
    }
    for (key, value) in &elem.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if elem.children.is_empty() {
        return writer.write_event(Event::Empty(start));
    }

    writer.write_event(Event::Start(start))?;
    for child in &elem.children {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            Node::Text(t) => writer.write_event(Event::Text(BytesText::new(t)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(elem.name.as_str())))
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a complete document into its root element.
pub fn parse(source: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(source);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut entities = Entities::default();

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|e| XmlError::new(reader.error_position() as u64, e))?;

        match event {
            Event::Start(start) => stack.push(open_element(&reader, &start, &entities, position)?),
            Event::Empty(start) => {
                let elem = open_element(&reader, &start, &entities, position)?;
                attach(&mut stack, &mut root, elem, position)?;
            }
            Event::End(_) => {
                let mut elem = stack
                    .pop()
                    .ok_or_else(|| XmlError::new(position, "unexpected closing tag"))?;
                drop_blank_text(&mut elem);
                attach(&mut stack, &mut root, elem, position)?;
            }
            Event::Text(text) => {
                let text = text.decode().map_err(|e| XmlError::new(position, e))?;
                push_text(&mut stack, &text, position)?;
            }
            Event::CData(data) => {
                let text = data.decode().map_err(|e| XmlError::new(position, e))?;
                push_text(&mut stack, &text, position)?;
            }
            Event::GeneralRef(reference) => {
                let resolved = match reference
                    .resolve_char_ref()
                    .map_err(|e| XmlError::new(position, e))?
                {
                    Some(ch) => ch.to_string(),
                    None => {
                        let name = reference.decode().map_err(|e| XmlError::new(position, e))?;
                        resolve_entity(&entities, &name)
                            .ok_or_else(|| {
                                XmlError::new(position, format!("unknown entity `&{name};`"))
                            })?
                            .to_string()
                    }
                };
                push_text(&mut stack, &resolved, position)?;
            }
            Event::DocType(doctype) => {
                let doctype = doctype.decode().map_err(|e| XmlError::new(position, e))?;
                collect_entities(&doctype, &mut entities);
            }
            Event::Eof => break,
            // Declarations, comments and PIs carry no drawing content.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::new(
            source.len() as u64,
            format!("element `<{}>` is never closed", open.name),
        ));
    }
    root.ok_or_else(|| XmlError::new(0, "document has no root element"))
}

fn open_element(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
    entities: &Entities,
    position: u64,
) -> Result<Element, XmlError> {
    let decoder = reader.decoder();
    let qname = start.name();
    let name = decoder
        .decode(qname.as_ref())
        .map_err(|e| XmlError::new(position, e))?;
    let mut elem = Element::new(name.into_owned());

    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::new(position, e))?;
        let key = decoder
            .decode(attr.key.as_ref())
            .map_err(|e| XmlError::new(position, e))?;
        let value = attr
            .decode_and_unescape_value_with(decoder, |name| resolve_entity(entities, name))
            .map_err(|e| XmlError::new(position, e))?;

        match namespace_prefix(&key) {
            Some(prefix) => elem.declare_namespace(prefix, value.into_owned()),
            None => elem.attrs.push((key.into_owned(), value.into_owned())),
        }
    }

    Ok(elem)
}

/// Prefix bound by a namespace declaration attribute, `""` for `xmlns`.
#[inline]
fn namespace_prefix(key: &str) -> Option<&str> {
    match key {
        "xmlns" => Some(""),
        _ => key.strip_prefix("xmlns:"),
    }
}

/// Record `<!ENTITY name "value">` declarations. The first one wins.
fn collect_entities(doctype: &str, entities: &mut Entities) {
    for caps in ENTITY_DECL.captures_iter(doctype) {
        let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
        entities
            .entry(caps[1].to_string())
            .or_insert_with(|| value.to_string());
    }
}

fn resolve_entity<'a>(entities: &'a Entities, name: &str) -> Option<&'a str> {
    entities
        .get(name)
        .map(String::as_str)
        .or_else(|| resolve_predefined_entity(name))
}

/// Hand a finished element to its parent, or make it the document root.
fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    elem: Element,
    position: u64,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.push(elem),
        None if root.is_none() => *root = Some(elem),
        None => return Err(XmlError::new(position, "document has more than one root element")),
    }
    Ok(())
}

/// Append character data to the open element, merging adjacent runs.
fn push_text(stack: &mut [Element], text: &str, position: u64) -> Result<(), XmlError> {
    let Some(parent) = stack.last_mut() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(XmlError::new(position, "text outside of the root element"));
    };

    match parent.children.last_mut() {
        Some(Node::Text(existing)) => existing.push_str(text),
        _ => parent.children.push(Node::Text(text.to_string())),
    }
    Ok(())
}

/// Remove whitespace-only text runs (source indentation) from a closed element.
fn drop_blank_text(elem: &mut Element) {
    elem.children
        .retain(|node| !matches!(node, Node::Text(t) if t.trim().is_empty()));
}
