//! OAI-PMH Harvester - Download every record of a `ListRecords` feed.
//!
//! This crate issues a `ListRecords` request against an OAI-PMH repository,
//! follows resumption tokens until the list is exhausted and writes every
//! record-bearing response into a single XML document.
//!
//! # Example
//!
//! ```
//! use oai_harvester::url::{build_initial_url, build_resume_url};
//!
//! let url = build_initial_url("http://example.org/oai", "oai_dc", Some("2020-01-01"), None, None);
//! assert_eq!(url, "http://example.org/oai?verb=ListRecords&metadataPrefix=oai_dc&from=2020-01-01");
//!
//! let next = build_resume_url("http://example.org/oai", "abc123");
//! assert!(next.ends_with("&resumptionToken=abc123"));
//! ```
//!
//! # Architecture
//!
//! The harvester is organized into several modules:
//!
//! - [`config`]: Configuration constants and request parameters
//! - [`types`]: Core data types (ProtocolError, ResponseInfo, ...)
//! - [`error`]: Error types and Result alias
//! - [`buffer`]: Growable byte buffer
//! - [`url`]: Request URL construction
//! - [`http`]: Transport trait and HTTP implementation
//! - [`xml`]: Streaming response parser and re-serializer
//! - [`harvester`]: Resumption-token harvest loop
//! - [`output`]: Output destination and document framing
//! - [`cli`]: Command-line interface

pub mod buffer;
pub mod cli;
pub mod config;
pub mod error;
pub mod harvester;
pub mod http;
pub mod output;
pub mod types;
pub mod url;
pub mod xml;

// Re-export main functions
pub use harvester::harvest;
pub use output::harvest_document;

// Re-export commonly used items
pub use buffer::ByteBuffer;
pub use config::{ClientConfig, HarvestRequest};
pub use error::{HarvesterError, Result};
pub use http::{HttpTransport, Transport};
pub use types::{HarvestSummary, PageReport, ProtocolError, ResponseInfo};
