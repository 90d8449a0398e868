//! Re-emission of a response document into the aggregate output.
//!
//! Element and attribute names are written exactly as they appear in the
//! source, so prefixes and namespace declarations survive unchanged.
//! Character data and attribute values are escaped with [`write_escaped`].

use std::io::Write;

use crate::error::Result;

use super::events::{walk, ElementName, StartElement, XmlHandler};

/// Write `text` to `out`, replacing `<`, `&`, `"` and `'` with their
/// predefined entities. All other characters, `>` included, are written
/// unchanged.
pub fn write_escaped<W: Write + ?Sized>(out: &mut W, text: &str) -> std::io::Result<()> {
    let bytes = text.as_bytes();
    let mut start = 0;

    for (i, byte) in bytes.iter().enumerate() {
        let entity: &[u8] = match byte {
            b'<' => b"&lt;",
            b'&' => b"&amp;",
            b'"' => b"&quot;",
            b'\'' => b"&apos;",
            _ => continue,
        };
        out.write_all(&bytes[start..i])?;
        out.write_all(entity)?;
        start = i + 1;
    }

    out.write_all(&bytes[start..])
}

/// Event handler that writes every event back out as XML.
struct XmlSerializer<'w, W: Write + ?Sized> {
    out: &'w mut W,
}

impl<W: Write + ?Sized> XmlHandler for XmlSerializer<'_, W> {
    fn start_element(&mut self, element: &StartElement<'_>) -> Result<()> {
        write!(self.out, "<{}", element.name.qname)?;
        for attr in &element.attributes {
            write!(self.out, " {}=\"", attr.name)?;
            write_escaped(self.out, &attr.value)?;
            self.out.write_all(b"\"")?;
        }
        self.out.write_all(b">")?;
        Ok(())
    }

    fn end_element(&mut self, name: &ElementName<'_>) -> Result<()> {
        write!(self.out, "</{}>", name.qname)?;
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        write_escaped(self.out, text)?;
        Ok(())
    }
}

/// Re-serialize a complete response document onto `out`.
///
/// The whole document element is written, envelope included. Self-closing
/// tags are expanded to a start/end pair; the XML declaration, comments and
/// processing instructions are dropped.
///
/// # Errors
/// Returns [`crate::HarvesterError::Xml`] if the document is not well-formed
/// and [`crate::HarvesterError::Io`] if writing fails. Output written before
/// the error is left in `out`.
///
/// # Examples
/// ```
/// use oai_harvester::xml::serialize_response;
///
/// let mut out = Vec::new();
/// serialize_response(b"<a x='1'><b/>x &gt; y</a>", &mut out).unwrap();
/// assert_eq!(out, b"<a x=\"1\"><b></b>x > y</a>");
/// ```
pub fn serialize_response<W: Write + ?Sized>(document: &[u8], out: &mut W) -> Result<()> {
    let mut serializer = XmlSerializer { out };
    walk(document, &mut serializer)
}
