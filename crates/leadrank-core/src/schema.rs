//! Arrow schema for lead tables and conversion from records to batches.
//!
//! The export column order is fixed; spreadsheet tooling downstream depends
//! on it.

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::{LeadRecord, enrichment_query};

/// Column names, in export order.
pub mod columns {
    pub const EMPLOYER_NAME: &str = "employer_name";
    pub const EIN: &str = "ein";
    pub const STATE: &str = "state";
    pub const PARTICIPANT_COUNT: &str = "participant_count";
    pub const PLAN_NAME: &str = "plan_name";
    pub const SEGMENT: &str = "segment";
    pub const TIER: &str = "tier";
    pub const ENRICHMENT_QUERY: &str = "enrichment_query";

    /// Input columns that must be present in the backing file.
    pub const REQUIRED: &[&str] = &[EMPLOYER_NAME, EIN, STATE, PARTICIPANT_COUNT];
}

/// Schema for a lead table, optionally with the enrichment query column last.
pub fn lead_schema(with_query: bool) -> Schema {
    let mut fields = vec![
        Field::new(columns::EMPLOYER_NAME, DataType::Utf8, false),
        Field::new(columns::EIN, DataType::Utf8, false),
        Field::new(columns::STATE, DataType::Utf8, false),
        Field::new(columns::PARTICIPANT_COUNT, DataType::UInt64, false),
        Field::new(columns::PLAN_NAME, DataType::Utf8, true),
        Field::new(columns::SEGMENT, DataType::Utf8, false),
        Field::new(columns::TIER, DataType::Utf8, false),
    ];
    if with_query {
        fields.push(Field::new(columns::ENRICHMENT_QUERY, DataType::Utf8, false));
    }
    Schema::new(fields)
}

/// Build a single RecordBatch from a view of records, preserving order.
pub fn to_record_batch(records: &[&LeadRecord], with_query: bool) -> Result<RecordBatch, ArrowError> {
    let schema: SchemaRef = Arc::new(lead_schema(with_query));

    let mut cols: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.employer_name.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.ein.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.state.as_str()),
        )),
        Arc::new(UInt64Array::from_iter_values(
            records.iter().map(|r| r.participant_count),
        )),
        Arc::new(StringArray::from_iter(
            records.iter().map(|r| r.plan_name.as_deref()),
        )),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.segment().label()),
        )),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.tier().label()),
        )),
    ];
    if with_query {
        cols.push(Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| enrichment_query(r)),
        )));
    }

    RecordBatch::try_new(schema, cols)
}
