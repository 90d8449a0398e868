//! Core data types for the harvester.

use std::fmt;

/// An `<error>` element reported by the repository inside a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolError {
    /// Value of the `code` attribute (e.g. `noRecordsMatch`), if present.
    pub code: Option<String>,
    /// Character content of the element.
    pub message: String,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -- {}",
            self.code.as_deref().unwrap_or("(none)"),
            self.message
        )
    }
}

/// Control signals extracted from one `ListRecords` response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseInfo {
    /// Number of `record` elements in the OAI-PMH namespace.
    pub record_count: usize,
    /// Protocol errors in document order.
    pub errors: Vec<ProtocolError>,
    /// Content of the `resumptionToken` element, if the element was present.
    ///
    /// An empty string is a present token and continues the harvest.
    pub resumption_token: Option<String>,
}

impl ResponseInfo {
    #[must_use]
    pub fn has_records(&self) -> bool {
        self.record_count > 0
    }
}

/// Progress information about one harvested page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageReport<'a> {
    /// One-based page number.
    pub page: usize,
    /// URL the page was fetched from.
    pub url: &'a str,
    pub record_count: usize,
    pub error_count: usize,
    pub resumption_token: Option<&'a str>,
}

/// Totals over a complete harvest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Number of responses fetched.
    pub pages: usize,
    /// Number of records written to the output.
    pub records: usize,
    /// Number of protocol errors reported by the repository.
    pub protocol_errors: usize,
}
