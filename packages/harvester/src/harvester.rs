//! Main harvest loop that ties all components together.

use std::io::Write;

use crate::config::HarvestRequest;
use crate::error::Result;
use crate::http::Transport;
use crate::types::{HarvestSummary, PageReport, ResponseInfo};
use crate::url::{build_initial_url, build_resume_url};
use crate::xml::{parse_response, serialize_response};

/// Harvest every page of a `ListRecords` request into `out`.
///
/// Starting from the initial request URL, each page is fetched, parsed and,
/// if it contains records, re-serialized onto `out`. The harvest follows
/// resumption tokens until a page arrives without a `resumptionToken`
/// element. A token element that is present but empty still causes one more
/// request.
///
/// Protocol errors reported by the repository are logged and do not stop the
/// harvest. There is no limit on the number of pages.
///
/// `on_page` is called once for every page after it has been processed.
///
/// # Errors
/// Returns the first transport, XML or output error. No further requests
/// are made after an error.
pub fn harvest<T, W, F>(
    transport: &mut T,
    request: &HarvestRequest,
    out: &mut W,
    mut on_page: F,
) -> Result<HarvestSummary>
where
    T: Transport + ?Sized,
    W: Write + ?Sized,
    F: FnMut(&PageReport<'_>),
{
    let mut summary = HarvestSummary::default();
    let mut next_url = Some(build_initial_url(
        &request.base_url,
        &request.metadata_prefix,
        request.from.as_deref(),
        request.until.as_deref(),
        request.set.as_deref(),
    ));

    while let Some(url) = next_url.take() {
        let info = fetch_records(transport, &url, out)?;

        summary.pages += 1;
        summary.records += info.record_count;
        summary.protocol_errors += info.errors.len();

        on_page(&PageReport {
            page: summary.pages,
            url: &url,
            record_count: info.record_count,
            error_count: info.errors.len(),
            resumption_token: info.resumption_token.as_deref(),
        });

        next_url = info
            .resumption_token
            .as_deref()
            .map(|token| build_resume_url(&request.base_url, token));
    }

    tracing::info!(
        pages = summary.pages,
        records = summary.records,
        protocol_errors = summary.protocol_errors,
        "Harvest complete"
    );

    Ok(summary)
}

/// Fetch one page, report its protocol errors and copy it to `out` if it
/// carries records.
fn fetch_records<T, W>(transport: &mut T, url: &str, out: &mut W) -> Result<ResponseInfo>
where
    T: Transport + ?Sized,
    W: Write + ?Sized,
{
    tracing::info!("GET {url}");
    let body = transport.fetch(url)?;

    let info = parse_response(body.as_bytes()).inspect_err(|e| {
        tracing::error!(url, error = %e, "Failed to parse response");
    })?;

    for err in &info.errors {
        tracing::error!("Protocol error: {err}");
    }

    if info.has_records() {
        tracing::info!("Found {} records", info.record_count);
        serialize_response(body.as_bytes(), out).inspect_err(|e| {
            tracing::error!(url, error = %e, "Failed to copy response to output");
        })?;
    }

    if let Some(token) = &info.resumption_token {
        tracing::info!("Found resumption token {token}");
    }

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ByteBuffer;
    use crate::error::HarvesterError;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;

    /// Transport that serves canned bodies in order and records every URL.
    #[derive(Default)]
    struct FakeTransport {
        responses: VecDeque<Result<ByteBuffer>>,
        requested: Vec<String>,
    }

    impl FakeTransport {
        fn with_pages(pages: &[&str]) -> Self {
            Self {
                responses: pages.iter().map(|p| Ok(ByteBuffer::from(*p))).collect(),
                requested: Vec::new(),
            }
        }
    }

    impl Transport for FakeTransport {
        fn fetch(&mut self, url: &str) -> Result<ByteBuffer> {
            self.requested.push(url.to_string());
            self.responses.pop_front().unwrap_or_else(|| {
                Err(std::io::Error::other(format!("unexpected request {url}")).into())
            })
        }
    }

    const BASE: &str = "http://example.org/oai";

    fn page(body: &str) -> String {
        format!(r#"<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">{body}</OAI-PMH>"#)
    }

    fn run(
        transport: &mut FakeTransport,
        request: &HarvestRequest,
    ) -> (Result<HarvestSummary>, String) {
        let mut out = Vec::new();
        let result = harvest(transport, request, &mut out, |_| {});
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_single_page_without_token() {
        let body = page("<ListRecords><record>r1</record></ListRecords>");
        let mut transport = FakeTransport::with_pages(&[&body]);

        let (result, out) = run(&mut transport, &HarvestRequest::new(BASE, "oai_dc"));

        assert_eq!(
            result.unwrap(),
            HarvestSummary {
                pages: 1,
                records: 1,
                protocol_errors: 0
            }
        );
        assert_eq!(
            transport.requested,
            vec!["http://example.org/oai?verb=ListRecords&metadataPrefix=oai_dc"]
        );
        assert_eq!(out, body);
    }

    #[test]
    fn test_follows_resumption_tokens() {
        let first = page(
            "<ListRecords><record/><resumptionToken>abc123</resumptionToken></ListRecords>",
        );
        let second = page("<ListRecords><record/><record/></ListRecords>");
        let mut transport = FakeTransport::with_pages(&[&first, &second]);

        let request = HarvestRequest::new(BASE, "oai_dc")
            .with_from("2020-01-01")
            .with_until("2020-12-31")
            .with_set("abc");
        let (result, _) = run(&mut transport, &request);

        let summary = result.unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.records, 3);
        assert_eq!(
            transport.requested,
            vec![
                "http://example.org/oai?verb=ListRecords&metadataPrefix=oai_dc&until=2020-12-31&from=2020-01-01&set=abc",
                "http://example.org/oai?verb=ListRecords&resumptionToken=abc123",
            ]
        );
    }

    #[test]
    fn test_empty_token_triggers_one_more_request() {
        let first =
            page("<ListRecords><record/><resumptionToken></resumptionToken></ListRecords>");
        let last = page(r#"<error code="badResumptionToken">empty token</error>"#);
        let mut transport = FakeTransport::with_pages(&[&first, &last]);

        let (result, _) = run(&mut transport, &HarvestRequest::new(BASE, "oai_dc"));

        let summary = result.unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.protocol_errors, 1);
        assert_eq!(
            transport.requested[1],
            "http://example.org/oai?verb=ListRecords&resumptionToken="
        );
    }

    #[test]
    fn test_protocol_error_without_records_writes_nothing() {
        let body = page(r#"<error code="noRecordsMatch">no records</error>"#);
        let mut transport = FakeTransport::with_pages(&[&body]);

        let (result, out) = run(&mut transport, &HarvestRequest::new(BASE, "oai_dc"));

        assert_eq!(
            result.unwrap(),
            HarvestSummary {
                pages: 1,
                records: 0,
                protocol_errors: 1
            }
        );
        assert_eq!(out, "");
        assert_eq!(transport.requested.len(), 1);
    }

    #[test]
    fn test_token_only_page_not_serialized() {
        let first = page("<ListRecords><resumptionToken>t1</resumptionToken></ListRecords>");
        let second = page("<ListRecords><record>x</record></ListRecords>");
        let mut transport = FakeTransport::with_pages(&[&first, &second]);

        let (result, out) = run(&mut transport, &HarvestRequest::new(BASE, "oai_dc"));

        assert_eq!(result.unwrap().pages, 2);
        assert_eq!(out, second);
    }

    #[test]
    fn test_each_record_page_appended() {
        let first = page(
            "<ListRecords><record>1</record><resumptionToken>t</resumptionToken></ListRecords>",
        );
        let second = page("<ListRecords><record>2</record></ListRecords>");
        let mut transport = FakeTransport::with_pages(&[&first, &second]);

        let (_, out) = run(&mut transport, &HarvestRequest::new(BASE, "oai_dc"));

        assert_eq!(out, format!("{first}{second}"));
    }

    #[test]
    fn test_malformed_page_stops_harvest() {
        let first = page(
            "<ListRecords><record/><resumptionToken>t</resumptionToken></ListRecords>",
        );
        let broken = "<OAI-PMH><ListRecords></OAI-PMH>";
        let never = page("<ListRecords><record/></ListRecords>");
        let mut transport = FakeTransport::with_pages(&[&first, broken, &never]);

        let (result, _) = run(&mut transport, &HarvestRequest::new(BASE, "oai_dc"));

        assert!(matches!(result, Err(HarvesterError::Xml { .. })));
        assert_eq!(transport.requested.len(), 2);
    }

    #[test]
    fn test_unbound_prefixes_stop_harvest_without_output() {
        let pages = [
            page("<ListRecords><record><metadata><dc:title>t</dc:title></metadata></record></ListRecords>"),
            page(r#"<ListRecords xsi:schemaLocation="x"><record/></ListRecords>"#),
        ];

        for body in &pages {
            let mut transport = FakeTransport::with_pages(&[body.as_str()]);

            let (result, out) = run(&mut transport, &HarvestRequest::new(BASE, "oai_dc"));

            let err = result.unwrap_err();
            assert!(matches!(err, HarvesterError::Xml { .. }));
            assert!(err.to_string().contains("unbound prefix"), "{err}");
            assert_eq!(out, "");
        }
    }

    #[test]
    fn test_invalid_element_name_stops_harvest() {
        let body = page("<ListRecords><record><metadata><1a/></metadata></record></ListRecords>");
        let mut transport = FakeTransport::with_pages(&[&body]);

        let (result, out) = run(&mut transport, &HarvestRequest::new(BASE, "oai_dc"));

        assert!(matches!(result, Err(HarvesterError::Xml { .. })));
        assert_eq!(out, "");
    }

    #[test]
    fn test_transport_error_stops_harvest() {
        let mut transport = FakeTransport::default();

        let (result, out) = run(&mut transport, &HarvestRequest::new(BASE, "oai_dc"));

        assert!(matches!(result, Err(HarvesterError::Io(_))));
        assert_eq!(transport.requested.len(), 1);
        assert_eq!(out, "");
    }

    #[test]
    fn test_on_page_reports_each_page() {
        let first = page(
            "<ListRecords><record/><record/><resumptionToken>next</resumptionToken></ListRecords>",
        );
        let second = page(r#"<error code="noRecordsMatch">done</error>"#);
        let mut transport = FakeTransport::with_pages(&[&first, &second]);

        let mut reports = Vec::new();
        let mut out = Vec::new();
        harvest(
            &mut transport,
            &HarvestRequest::new(BASE, "oai_dc"),
            &mut out,
            |report| {
                reports.push((
                    report.page,
                    report.record_count,
                    report.error_count,
                    report.resumption_token.map(str::to_string),
                ))
            },
        )
        .unwrap();

        assert_eq!(
            reports,
            vec![
                (1, 2, 0, Some("next".to_string())),
                (2, 0, 1, None),
            ]
        );
    }
}
