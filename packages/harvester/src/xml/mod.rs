//! Streaming XML processing of OAI-PMH responses.
//!
//! Each response is read twice by the same event walker: once by
//! [`parse_response`] to extract control signals, and, when it carries
//! records, once more by [`serialize_response`] to copy it into the output.

pub mod events;
pub mod parser;
pub mod serializer;

pub use events::{walk, Attribute, ElementName, StartElement, XmlHandler};
pub use parser::parse_response;
pub use serializer::{serialize_response, write_escaped};
