//! HTTP transport for fetching OAI-PMH responses.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::buffer::ByteBuffer;
use crate::config::{ClientConfig, USER_AGENT};
use crate::error::{HarvesterError, Result};

/// Fetches a complete response body for a URL.
///
/// Implementations perform a single attempt per call. Any failure is
/// returned as an error and ends the harvest.
pub trait Transport {
    fn fetch(&mut self, url: &str) -> Result<ByteBuffer>;
}

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` configured with timeout and user agent.
/// Redirects are followed.
pub fn create_client(config: &ClientConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// [`Transport`] over a single reused `reqwest` blocking client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    max_response_size: u64,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(config)?,
            max_response_size: config.max_response_size,
        })
    }
}

impl Transport for HttpTransport {
    /// GET `url` and read the whole body.
    ///
    /// Connection failures, timeouts and non-success status codes are
    /// errors. Bodies larger than the configured maximum are rejected.
    fn fetch(&mut self, url: &str) -> Result<ByteBuffer> {
        let fetch_error = |source| HarvesterError::Fetch {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(fetch_error)?;

        let too_large = || HarvesterError::ResponseTooLarge {
            url: url.to_string(),
            limit: self.max_response_size,
        };

        if response
            .content_length()
            .is_some_and(|len| len > self.max_response_size)
        {
            return Err(too_large());
        }

        let status = response.status();
        let mut body = ByteBuffer::new();
        if !body.read_from(response, self.max_response_size)? {
            return Err(too_large());
        }

        tracing::debug!(url, status = %status, bytes = body.len(), "Response received");
        Ok(body)
    }
}
