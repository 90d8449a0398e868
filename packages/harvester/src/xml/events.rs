//! Streaming, namespace-aware XML event walker.
//!
//! [`walk`] reads a complete document in a single forward pass and reports
//! element starts, element ends and character data to an [`XmlHandler`].
//! No tree is built; memory use is bounded by the largest single event.
//!
//! Comments, processing instructions, the XML declaration and the doctype
//! are consumed but not reported. The parser underneath checks syntax
//! only loosely, so the walker adds the namespace and name checks a
//! well-formed namespaced document must pass. Self-closing elements are reported as a
//! start immediately followed by an end.

use std::borrow::Cow;

use quick_xml::events::attributes::Attribute as RawAttribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::error::{HarvesterError, Result};

/// Name of an element as written and as resolved against namespace scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementName<'a> {
    /// Qualified name exactly as written, including any prefix.
    pub qname: &'a str,
    /// Namespace URI the element belongs to, if bound.
    pub namespace: Option<&'a str>,
    /// Local part of the name.
    pub local_name: &'a str,
}

impl ElementName<'_> {
    /// Whether this element is `{namespace}local_name`.
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace == Some(namespace) && self.local_name == local_name
    }
}

/// A single attribute with its value entity-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Attribute name exactly as written (namespace declarations included).
    pub name: &'a str,
    pub value: Cow<'a, str>,
}

/// An element start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartElement<'a> {
    pub name: ElementName<'a>,
    /// Attributes in document order.
    pub attributes: Vec<Attribute<'a>>,
}

impl StartElement<'_> {
    /// Value of the attribute written as `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_ref())
    }
}

/// Receiver of the events produced by [`walk`].
pub trait XmlHandler {
    fn start_element(&mut self, element: &StartElement<'_>) -> Result<()>;

    fn end_element(&mut self, name: &ElementName<'_>) -> Result<()>;

    /// Character data, entity references and CDATA sections decoded.
    ///
    /// Consecutive calls may split what is logically one text node.
    fn characters(&mut self, text: &str) -> Result<()>;
}

/// Walk `document` from start to end, dispatching events to `handler`.
///
/// The document must be well-formed: exactly one document element, all
/// elements closed, no character data outside the document element, the XML
/// declaration only at the very start, valid element and attribute names,
/// no `<` in attribute values and every prefix bound to a non-empty
/// namespace. Any violation, as well as an error returned by the handler,
/// stops the walk.
pub fn walk<H: XmlHandler + ?Sized>(document: &[u8], handler: &mut H) -> Result<()> {
    let mut reader = NsReader::from_reader(document);
    reader.config_mut().trim_text(false);

    let mut depth: usize = 0;
    let mut root_closed = false;
    let mut at_start = true;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed(&reader, e.to_string()))?;
        let first = std::mem::replace(&mut at_start, false);

        match event {
            Event::Start(e) => {
                check_new_element(&reader, depth, root_closed)?;
                let start = start_element(&reader, &e)?;
                handler.start_element(&start)?;
                depth += 1;
            }
            Event::Empty(e) => {
                check_new_element(&reader, depth, root_closed)?;
                let start = start_element(&reader, &e)?;
                handler.start_element(&start)?;
                handler.end_element(&start.name)?;
                if depth == 0 {
                    root_closed = true;
                }
            }
            Event::End(e) => {
                let (ns, local) = reader.resolve_element(e.name());
                let name =
                    element_name(&reader, e.name().into_inner(), ns, local.into_inner())?;
                handler.end_element(&name)?;
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    root_closed = true;
                }
            }
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|err| malformed(&reader, err.to_string()))?;
                if depth > 0 {
                    handler.characters(&text)?;
                } else if !text.trim().is_empty() {
                    return Err(malformed(
                        &reader,
                        "character data outside the document element",
                    ));
                }
            }
            Event::CData(e) => {
                if depth == 0 {
                    return Err(malformed(
                        &reader,
                        "CDATA section outside the document element",
                    ));
                }
                let raw = e.into_inner();
                let text = std::str::from_utf8(&raw)
                    .map_err(|err| malformed(&reader, err.to_string()))?;
                handler.characters(text)?;
            }
            Event::Decl(_) if !first => {
                return Err(malformed(
                    &reader,
                    "XML declaration not at start of document",
                ));
            }
            Event::Eof => break,
            // Declaration, doctype, comments and processing instructions.
            _ => {}
        }
    }

    if depth > 0 {
        return Err(malformed(&reader, "unclosed element at end of document"));
    }
    if !root_closed {
        return Err(malformed(&reader, "no element found"));
    }
    Ok(())
}

fn check_new_element<R>(reader: &NsReader<R>, depth: usize, root_closed: bool) -> Result<()> {
    if depth == 0 && root_closed {
        return Err(malformed(reader, "junk after document element"));
    }
    Ok(())
}

fn start_element<'a, R>(
    reader: &'a NsReader<R>,
    e: &'a BytesStart<'_>,
) -> Result<StartElement<'a>> {
    let (ns, local) = reader.resolve_element(e.name());
    let name = element_name(reader, e.name().into_inner(), ns, local.into_inner())?;

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| malformed(reader, err.to_string()))?;
        let name = utf8(reader, attr.key.into_inner())?;
        check_attribute(reader, &attr, name)?;
        let value = attr
            .unescape_value()
            .map_err(|err| malformed(reader, err.to_string()))?;
        attributes.push(Attribute { name, value });
    }

    Ok(StartElement { name, attributes })
}

fn element_name<'a, R>(
    reader: &NsReader<R>,
    qname: &'a [u8],
    ns: ResolveResult<'a>,
    local: &'a [u8],
) -> Result<ElementName<'a>> {
    let qname = utf8(reader, qname)?;
    if !is_qname(qname) {
        return Err(malformed(reader, format!("invalid element name '{qname}'")));
    }
    let namespace = match ns {
        ResolveResult::Bound(Namespace(uri)) => Some(utf8(reader, uri)?),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => return Err(unbound_prefix(reader, &prefix)),
    };
    Ok(ElementName {
        qname,
        namespace,
        local_name: utf8(reader, local)?,
    })
}

fn check_attribute<R>(reader: &NsReader<R>, attr: &RawAttribute<'_>, name: &str) -> Result<()> {
    if !is_qname(name) {
        return Err(malformed(reader, format!("invalid attribute name '{name}'")));
    }
    if attr.value.contains(&b'<') {
        return Err(malformed(
            reader,
            format!("'<' in value of attribute '{name}'"),
        ));
    }

    if let Some(prefix) = name.strip_prefix("xmlns:") {
        if attr.value.is_empty() {
            return Err(malformed(
                reader,
                format!("empty namespace bound to prefix '{prefix}'"),
            ));
        }
    } else if name != "xmlns" && !name.starts_with("xml:") {
        if let (ResolveResult::Unknown(prefix), _) = reader.resolve_attribute(attr.key) {
            return Err(unbound_prefix(reader, &prefix));
        }
    }
    Ok(())
}

/// `Name` restricted to at most one colon separating two non-empty parts.
fn is_qname(name: &str) -> bool {
    match name.split_once(':') {
        Some((prefix, local)) => is_ncname(prefix) && is_ncname(local),
        None => is_ncname(name),
    }
}

fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|ch| is_ncname_char(ch, true))
        && chars.all(|ch| is_ncname_char(ch, false))
}

fn is_ncname_char(ch: char, is_first: bool) -> bool {
    let start = matches!(ch,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}');
    if is_first {
        start
    } else {
        start
            || matches!(ch,
                '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
    }
}

fn unbound_prefix<R>(reader: &NsReader<R>, prefix: &[u8]) -> HarvesterError {
    malformed(
        reader,
        format!("unbound prefix '{}'", String::from_utf8_lossy(prefix)),
    )
}

fn utf8<'a, R>(reader: &NsReader<R>, bytes: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|err| malformed(reader, err.to_string()))
}

fn malformed<R>(reader: &NsReader<R>, message: impl Into<String>) -> HarvesterError {
    HarvesterError::Xml {
        position: reader.buffer_position() as u64,
        message: message.into(),
    }
}
