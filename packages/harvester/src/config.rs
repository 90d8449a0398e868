//! Configuration constants and request parameters for the harvester.

/// Namespace of OAI-PMH 2.0 response documents.
pub const OAI_NAMESPACE: &str = "http://www.openarchives.org/OAI/2.0/";

/// Default namespace of the aggregate `<records>` output element.
pub const OUTPUT_NAMESPACE: &str = "tag:dmaus@dmaus.name,2018:oai-client";

/// HTTP timeout in seconds.
///
/// Some repositories take a long time to assemble a large ListRecords page.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Default maximum HTTP response size in bytes (100 MB).
///
/// A single page is buffered in memory before parsing, so an upper bound
/// protects against a misbehaving server. Can be overridden via `--max-size`.
pub const DEFAULT_MAX_RESPONSE_SIZE: u64 = 100 * 1024 * 1024;

/// User agent string identifying this harvester.
pub const USER_AGENT: &str = concat!("oai-harvester/", env!("CARGO_PKG_VERSION"));

/// Parameters of the initial `ListRecords` request.
///
/// Values are used verbatim in the query string; callers supply them
/// already URL-encoded where needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestRequest {
    /// Repository base URL, without query string.
    pub base_url: String,
    /// Metadata format to request (e.g. `oai_dc`).
    pub metadata_prefix: String,
    /// Lower datestamp bound.
    pub from: Option<String>,
    /// Upper datestamp bound.
    pub until: Option<String>,
    /// Set spec to restrict the harvest to.
    pub set: Option<String>,
}

impl HarvestRequest {
    /// Create a request for every record in `metadata_prefix` format.
    pub fn new(base_url: impl Into<String>, metadata_prefix: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            metadata_prefix: metadata_prefix.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    #[must_use]
    pub fn with_until(mut self, until: impl Into<String>) -> Self {
        self.until = Some(until.into());
        self
    }

    #[must_use]
    pub fn with_set(mut self, set: impl Into<String>) -> Self {
        self.set = Some(set.into());
        self
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum accepted response body size in bytes.
    pub max_response_size: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: HTTP_TIMEOUT_SECS,
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }
}
