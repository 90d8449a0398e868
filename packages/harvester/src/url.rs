//! Request URL construction for `ListRecords`.
//!
//! Parameter values are inserted verbatim. No percent-encoding is applied, so
//! callers must pass values that are already safe for a query string.

/// Build the URL of the first `ListRecords` request.
///
/// Optional arguments are appended in the fixed order `until`, `from`, `set`,
/// independent of the order in which they were supplied.
///
/// # Examples
/// ```
/// use oai_harvester::url::build_initial_url;
///
/// let url = build_initial_url("http://example.org/oai", "oai_dc", None, None, None);
/// assert_eq!(url, "http://example.org/oai?verb=ListRecords&metadataPrefix=oai_dc");
/// ```
pub fn build_initial_url(
    base_url: &str,
    metadata_prefix: &str,
    from: Option<&str>,
    until: Option<&str>,
    set: Option<&str>,
) -> String {
    let mut url = format!("{base_url}?verb=ListRecords&metadataPrefix={metadata_prefix}");

    if let Some(u) = until {
        url.push_str("&until=");
        url.push_str(u);
    }
    if let Some(f) = from {
        url.push_str("&from=");
        url.push_str(f);
    }
    if let Some(s) = set {
        url.push_str("&set=");
        url.push_str(s);
    }

    url
}

/// Build the URL that continues a harvest with a resumption token.
///
/// # Examples
/// ```
/// use oai_harvester::url::build_resume_url;
///
/// assert_eq!(
///     build_resume_url("http://example.org/oai", "abc123"),
///     "http://example.org/oai?verb=ListRecords&resumptionToken=abc123"
/// );
/// ```
pub fn build_resume_url(base_url: &str, token: &str) -> String {
    format!("{base_url}?verb=ListRecords&resumptionToken={token}")
}
