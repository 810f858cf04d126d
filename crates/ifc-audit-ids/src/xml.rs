// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Owned XML tree and codec
//!
//! The engine works on a plain owned element tree. Namespace prefixes are
//! stripped on read (the IDS content, XML Schema and XML Schema instance
//! namespaces all collapse to local names) and namespace declarations are
//! re-emitted on the root by the document writer.

use crate::error::{IdsError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// One XML element: name, attributes, child elements and optional text
#[derive(Clone, Debug, PartialEq, Default)]
pub struct XmlElement {
    /// Local element name (prefix stripped)
    pub name: String,
    /// Attributes in document order, local names
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<XmlElement>,
    /// Text content, if any
    pub text: Option<String>,
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: add a child element
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Get an attribute value by local name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get the first child with the given name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Iterate all children with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed text content, `None` when absent or blank
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Strip a namespace prefix from a qualified name
fn local_name(raw: &[u8]) -> String {
    let raw = match raw.iter().rposition(|&b| b == b':') {
        Some(pos) => &raw[pos + 1..],
        None => raw,
    };
    String::from_utf8_lossy(raw).into_owned()
}

/// Read a document into an element tree
///
/// Namespace declarations (`xmlns`, `xmlns:*`) are dropped; every other
/// attribute and element keeps its local name.
pub fn read_document(source: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(IdsError::xml)?;
        match event {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let content = text.unescape().map_err(IdsError::xml)?;
                if let Some(current) = stack.last_mut() {
                    match &mut current.text {
                        Some(existing) => existing.push_str(&content),
                        None => current.text = Some(content.into_owned()),
                    }
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| IdsError::xml("unbalanced end tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Eof => break,
            // Declarations, comments, PIs and CDATA carry nothing the
            // engine reads
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(IdsError::xml("unclosed element at end of input"));
    }
    root.ok_or_else(|| IdsError::xml("document has no root element"))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let mut element = XmlElement::new(local_name(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(IdsError::xml)?;
        let key = attr.key.as_ref();
        if key.starts_with(b"xmlns") {
            continue;
        }
        let value = attr.unescape_value().map_err(IdsError::xml)?;
        element
            .attributes
            .push((local_name(key), value.into_owned()));
    }
    Ok(element)
}

fn attach(
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(IdsError::xml("multiple root elements")),
    }
}

/// Write an element tree as an indented UTF-8 document
pub fn write_document(root: &XmlElement) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(IdsError::xml)?;
    write_element(&mut writer, root)?;
    String::from_utf8(writer.into_inner()).map_err(IdsError::xml)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    let empty = element.children.is_empty() && element.text_content().is_none();
    if empty {
        writer
            .write_event(Event::Empty(start))
            .map_err(IdsError::xml)?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(IdsError::xml)?;
    if let Some(text) = element.text_content() {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(IdsError::xml)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(IdsError::xml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_strips_prefixes_and_namespace_declarations() {
        let source = r#"<?xml version="1.0"?>
            <ids xmlns="http://standards.buildingsmart.org/IDS"
                 xmlns:xs="http://www.w3.org/2001/XMLSchema"
                 xsi:schemaLocation="http://standards.buildingsmart.org/IDS/ids_05.xsd"
                 xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
              <info><title>Audit</title></info>
              <specifications>
                <specification name="S1" ifcVersion="IFC4">
                  <applicability>
                    <attribute><name><xs:restriction base="xs:string">
                      <xs:pattern value="Wall.*"/>
                    </xs:restriction></name></attribute>
                  </applicability>
                  <requirements/>
                </specification>
              </specifications>
            </ids>"#;

        let root = read_document(source).unwrap();
        assert_eq!(root.name, "ids");
        assert_eq!(root.attr("schemaLocation").is_some(), true);
        assert!(root.attr("xmlns").is_none());

        let title = root.child("info").and_then(|i| i.child("title")).unwrap();
        assert_eq!(title.text_content(), Some("Audit"));

        let spec = root
            .child("specifications")
            .and_then(|s| s.child("specification"))
            .unwrap();
        assert_eq!(spec.attr("name"), Some("S1"));
        let restriction = spec
            .child("applicability")
            .and_then(|a| a.child("attribute"))
            .and_then(|a| a.child("name"))
            .and_then(|n| n.child("restriction"))
            .unwrap();
        assert_eq!(restriction.attr("base"), Some("xs:string"));
        assert_eq!(restriction.child("pattern").unwrap().attr("value"), Some("Wall.*"));
    }

    #[test]
    fn write_then_read_round_trips_structure() {
        let doc = XmlElement::new("ids")
            .with_attr("xmlns", "http://standards.buildingsmart.org/IDS")
            .with_child(
                XmlElement::new("info")
                    .with_child(XmlElement::new("title").with_text("A & B <audit>")),
            )
            .with_child(XmlElement::new("specifications"));

        let text = write_document(&doc).unwrap();
        assert!(text.starts_with("<?xml"));

        let reread = read_document(&text).unwrap();
        assert_eq!(reread.name, "ids");
        assert_eq!(
            reread
                .child("info")
                .and_then(|i| i.child("title"))
                .and_then(|t| t.text_content()),
            Some("A & B <audit>")
        );
        assert!(reread.child("specifications").unwrap().children.is_empty());
    }

    #[test]
    fn malformed_markup_errors() {
        assert!(read_document("<ids><info></ids>").is_err());
        assert!(read_document("").is_err());
    }
}
