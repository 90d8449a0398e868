//! Aggregate output document: destination and root element framing.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::config::{HarvestRequest, OUTPUT_NAMESPACE};
use crate::error::Result;
use crate::harvester::harvest;
use crate::http::Transport;
use crate::types::{HarvestSummary, PageReport};

/// Open the output destination: the named file (created or truncated), or
/// standard output when `path` is `None`.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let out: Box<dyn Write> = match path {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    Ok(out)
}

/// Harvest into a single document wrapped in a `<records>` root element.
///
/// The opening tag is written before the first request and the closing tag
/// after the last page; `out` is flushed at the end. On error the document
/// is left unterminated.
pub fn harvest_document<T, W, F>(
    transport: &mut T,
    request: &HarvestRequest,
    out: &mut W,
    on_page: F,
) -> Result<HarvestSummary>
where
    T: Transport + ?Sized,
    W: Write + ?Sized,
    F: FnMut(&PageReport<'_>),
{
    write!(out, "<records xmlns='{OUTPUT_NAMESPACE}'>")?;
    let summary = harvest(transport, request, out, on_page)?;
    write!(out, "</records>")?;
    out.flush()?;
    Ok(summary)
}
