//! CSV export of lead views.
//!
//! Output columns follow [`leadrank_core::schema::lead_schema`]; the header
//! row is always written, even for an empty view.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use arrow::csv::WriterBuilder;
use leadrank_core::schema::to_record_batch;
use leadrank_core::{LeadRecord, top_priority};
use tracing::info;

use crate::StoreError;

/// The three downloads offered from the lead table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// The filtered table, no enrichment query.
    Filtered,
    /// The filtered table with the enrichment query column.
    WithQueries,
    /// The Top-50 priority leads with the enrichment query column.
    TopPriority,
}

impl ExportKind {
    pub fn includes_query(&self) -> bool {
        !matches!(self, Self::Filtered)
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::Filtered => "filtered_leads.csv",
            Self::WithQueries => "leads_with_queries.csv",
            Self::TopPriority => "top50_priority_leads.csv",
        }
    }

    /// The rows this export contains, given the filtered view.
    pub fn project<'a>(&self, view: &[&'a LeadRecord]) -> Vec<&'a LeadRecord> {
        match self {
            Self::Filtered | Self::WithQueries => view.to_vec(),
            Self::TopPriority => top_priority(view.iter().copied()),
        }
    }
}

/// Write `records` as CSV with a header row.
pub fn write_csv<W: Write>(
    writer: W,
    records: &[&LeadRecord],
    with_query: bool,
) -> Result<(), StoreError> {
    let batch = to_record_batch(records, with_query)?;
    let mut csv = WriterBuilder::new().with_header(true).build(writer);
    csv.write(&batch)?;
    Ok(())
}

/// CSV bytes for a download button or similar collaborator.
pub fn export_bytes(records: &[&LeadRecord], with_query: bool) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records, with_query)?;
    Ok(buf)
}

/// Write the `kind` export of `view` to `path`. Returns the number of rows.
pub fn export_csv(path: &Path, view: &[&LeadRecord], kind: ExportKind) -> Result<usize, StoreError> {
    let rows = kind.project(view);
    let mut out = BufWriter::new(File::create(path)?);
    write_csv(&mut out, &rows, kind.includes_query())?;
    out.flush()?;
    info!(path = %path.display(), rows = rows.len(), ?kind, "exported leads");
    Ok(rows.len())
}
