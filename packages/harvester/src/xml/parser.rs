//! Extraction of control signals from a `ListRecords` response.

use crate::buffer::ByteBuffer;
use crate::config::OAI_NAMESPACE;
use crate::error::Result;
use crate::types::{ProtocolError, ResponseInfo};

use super::events::{walk, ElementName, StartElement, XmlHandler};

/// What character data is currently being collected for.
#[derive(Debug, Default)]
enum Capture {
    #[default]
    Idle,
    /// Inside `<error>`; holds the `code` attribute.
    Error { code: Option<String> },
    /// Inside `<resumptionToken>`.
    Token,
}

/// Event handler that accumulates a [`ResponseInfo`].
#[derive(Debug, Default)]
struct ResponseParser {
    info: ResponseInfo,
    capture: Capture,
    text: ByteBuffer,
}

impl XmlHandler for ResponseParser {
    fn start_element(&mut self, element: &StartElement<'_>) -> Result<()> {
        let name = &element.name;
        if name.is(OAI_NAMESPACE, "record") {
            self.info.record_count += 1;
        } else if name.is(OAI_NAMESPACE, "error") {
            self.capture = Capture::Error {
                code: element.attribute("code").map(str::to_string),
            };
        } else if name.is(OAI_NAMESPACE, "resumptionToken") {
            self.capture = Capture::Token;
        }
        Ok(())
    }

    fn end_element(&mut self, _name: &ElementName<'_>) -> Result<()> {
        // The first end tag seen while capturing closes the capture.
        match std::mem::take(&mut self.capture) {
            Capture::Idle => return Ok(()),
            Capture::Error { code } => self.info.errors.push(ProtocolError {
                code,
                message: self.text.to_string_lossy(),
            }),
            Capture::Token => self.info.resumption_token = Some(self.text.to_string_lossy()),
        }
        self.text.reset();
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        if !matches!(self.capture, Capture::Idle) {
            self.text.append(text.as_bytes());
        }
        Ok(())
    }
}

/// Parse one response body into its record count, protocol errors and
/// resumption token.
///
/// Elements are matched by namespace URI and local name, so `record`
/// elements from other vocabularies embedded in the metadata are not
/// counted.
///
/// # Errors
/// Returns [`crate::HarvesterError::Xml`] if the body is not well-formed XML.
///
/// # Examples
/// ```
/// use oai_harvester::xml::parse_response;
///
/// let body = br#"<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">
///   <ListRecords>
///     <record/><record/>
///     <resumptionToken>next</resumptionToken>
///   </ListRecords>
/// </OAI-PMH>"#;
///
/// let info = parse_response(body).unwrap();
/// assert_eq!(info.record_count, 2);
/// assert_eq!(info.resumption_token.as_deref(), Some("next"));
/// ```
pub fn parse_response(document: &[u8]) -> Result<ResponseInfo> {
    let mut parser = ResponseParser::default();
    walk(document, &mut parser)?;
    Ok(parser.info)
}
