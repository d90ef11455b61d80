//! Minimal namespace-agnostic XML element tree
//!
//! Documents are read fully into a tree of elements keyed by local name, so
//! `kml:Placemark` and `Placemark` compare equal. A document that fails to
//! parse produces no tree at all.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One element with its local name, direct text and child elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Whether this element's local name equals `name`
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// This element and all its descendants in document order
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First element named `name` in document order, including this one
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.descendants().find(|e| e.is(name))
    }

    /// Direct text with surrounding whitespace removed
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}

/// Pre-order iterator over an element subtree
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// Tag name with any `prefix:` qualifier removed
pub fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

/// Close an element: attach it to its parent, or make it the root
///
/// Returns `false` when a second root element shows up.
fn close(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> bool {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            true
        }
        None if root.is_none() => {
            *root = Some(element);
            true
        }
        None => false,
    }
}

/// Parse a whole document into an element tree
///
/// Malformed XML, unbalanced tags, multiple roots or a missing root all
/// yield `None`.
pub fn parse_document(bytes: &[u8]) -> Option<Element> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(
                    position = reader.buffer_position(),
                    error = %e,
                    "XML document could not be parsed"
                );
                return None;
            }
        };

        match event {
            Event::Start(start) => stack.push(Element::new(local_name(&start))),
            Event::Empty(empty) => {
                if !close(&mut stack, &mut root, Element::new(local_name(&empty))) {
                    return None;
                }
            }
            Event::End(_) => {
                let element = stack.pop()?;
                if !close(&mut stack, &mut root, element) {
                    return None;
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    let unescaped = text.unescape().ok()?;
                    current.text.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        tracing::debug!(open = stack.len(), "XML document ended with unclosed elements");
        return None;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(&BytesStart::new("Placemark")), "Placemark");
        assert_eq!(local_name(&BytesStart::new("kml:Placemark")), "Placemark");
        assert_eq!(local_name(&BytesStart::new("gx:Track")), "Track");
    }

    #[test]
    fn test_parse_nested_document() {
        let doc = br#"<?xml version="1.0"?>
            <k:kml xmlns:k="http://www.opengis.net/kml/2.2">
              <k:Document><k:name>A &amp; B</k:name><k:open/></k:Document>
            </k:kml>"#;
        let root = parse_document(doc).unwrap();

        assert_eq!(root.name, "kml");
        let names: Vec<&str> = root.descendants().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["kml", "Document", "name", "open"]);
        assert_eq!(root.find("name").unwrap().trimmed_text(), "A & B");
    }

    #[test]
    fn test_cdata_text() {
        let root = parse_document(b"<a><b><![CDATA[1,2 3,4]]></b></a>").unwrap();
        assert_eq!(root.find("b").unwrap().text, "1,2 3,4");
    }

    #[test]
    fn test_malformed_documents() {
        assert!(parse_document(b"").is_none());
        assert!(parse_document(b"not xml at all").is_none());
        assert!(parse_document(b"<a><b></a>").is_none());
        assert!(parse_document(b"<a><b></b>").is_none());
        assert!(parse_document(b"<a/><b/>").is_none());
    }
}
