//! Load the backing lead file into an immutable [`Snapshot`].
//!
//! CSV is read with every column as `Utf8` so that a malformed participant
//! count never aborts the load; numeric parsing happens per row afterwards.
//! Parquet columns of any type are cast to `Utf8` for the same path.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, StringArray};
use arrow::compute::cast;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use leadrank_core::schema::columns;
use leadrank_core::{DEFAULT_PARTICIPANT_COUNT, LeadRecord, Snapshot, parse_participant_count};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tracing::{info, warn};

use crate::StoreError;

/// Accepted header spellings per logical column, after [`header_key`]
/// normalization.
const EMPLOYER_NAME_ALIASES: &[&str] = &["employer_name", "employer"];
const EIN_ALIASES: &[&str] = &["ein"];
const STATE_ALIASES: &[&str] = &["state"];
const PARTICIPANT_ALIASES: &[&str] = &["participant_count", "participants"];
const PLAN_NAME_ALIASES: &[&str] = &["plan_name"];

/// What happened while normalizing the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows: usize,
    /// Rows whose participant count was missing or unparseable and was set to
    /// [`DEFAULT_PARTICIPANT_COUNT`].
    pub defaulted_participants: usize,
    /// Rows with an empty state code (classified as `Other`).
    pub blank_states: usize,
}

/// Load a `.csv` or `.parquet` lead file.
pub fn load_snapshot(path: &Path) -> Result<(Snapshot, LoadReport), StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let (schema, batches) = match ext.as_deref() {
        Some("csv") => read_csv(path)?,
        Some("parquet") | Some("pq") => read_parquet(path)?,
        _ => return Err(StoreError::UnsupportedFormat(path.to_path_buf())),
    };

    let (records, report) = records_from_batches(&schema, &batches)?;
    info!(
        path = %path.display(),
        rows = report.rows,
        "loaded lead snapshot"
    );
    if report.defaulted_participants > 0 {
        warn!(
            rows = report.defaulted_participants,
            default_value = DEFAULT_PARTICIPANT_COUNT,
            "participant count missing or malformed; using default"
        );
    }
    if report.blank_states > 0 {
        warn!(rows = report.blank_states, "blank state code; classified as Other");
    }
    Ok((Snapshot::new(records), report))
}

/// Read a CSV file with a header row, every column typed as nullable `Utf8`.
///
/// Rows that stop early read their missing trailing fields as null.
pub fn read_csv(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>), StoreError> {
    let mut file = File::open(path)?;
    let format = Format::default().with_header(true);
    // Header only; every column is read as text regardless of content.
    let (inferred, _) = format.infer_schema(&mut file, Some(0))?;
    file.rewind()?;

    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    let schema: SchemaRef = Arc::new(Schema::new(fields));

    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .with_truncated_rows(true)
        .build(file)?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok((schema, batches))
}

/// Read a Parquet file into Arrow RecordBatches.
pub fn read_parquet(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>), StoreError> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = Arc::clone(builder.schema());
    let reader = builder.build()?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok((schema, batches))
}

// ── Normalization ──

/// Resolved column positions in the input schema.
struct ColumnMap {
    employer_name: usize,
    ein: usize,
    state: usize,
    participant_count: usize,
    plan_name: Option<usize>,
}

impl ColumnMap {
    fn resolve(schema: &Schema) -> Result<Self, StoreError> {
        let find = |aliases: &[&str]| {
            schema
                .fields()
                .iter()
                .position(|f| aliases.contains(&header_key(f.name()).as_str()))
        };

        let employer_name = find(EMPLOYER_NAME_ALIASES);
        let ein = find(EIN_ALIASES);
        let state = find(STATE_ALIASES);
        let participant_count = find(PARTICIPANT_ALIASES);

        let missing: Vec<String> = [
            (columns::EMPLOYER_NAME, employer_name),
            (columns::EIN, ein),
            (columns::STATE, state),
            (columns::PARTICIPANT_COUNT, participant_count),
        ]
        .iter()
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| name.to_string())
        .collect();

        match (employer_name, ein, state, participant_count) {
            (Some(employer_name), Some(ein), Some(state), Some(participant_count)) => Ok(Self {
                employer_name,
                ein,
                state,
                participant_count,
                plan_name: find(PLAN_NAME_ALIASES),
            }),
            _ => Err(StoreError::MissingColumns(missing)),
        }
    }
}

/// `" Employer Name "` → `"employer_name"`.
fn header_key(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Turn raw batches into normalized lead records.
///
/// Fails with [`StoreError::MissingColumns`] when a required column is absent
/// from `schema`, even if there are no rows.
pub fn records_from_batches(
    schema: &Schema,
    batches: &[RecordBatch],
) -> Result<(Vec<LeadRecord>, LoadReport), StoreError> {
    let map = ColumnMap::resolve(schema)?;
    let mut report = LoadReport::default();
    let mut records = Vec::with_capacity(batches.iter().map(|b| b.num_rows()).sum());

    for batch in batches {
        let employer_name = utf8_column(batch, map.employer_name)?;
        let ein = utf8_column(batch, map.ein)?;
        let state = utf8_column(batch, map.state)?;
        let participants = utf8_column(batch, map.participant_count)?;
        let plan_name = map
            .plan_name
            .map(|i| utf8_column(batch, i))
            .transpose()?;

        let employer_name = as_strings(&employer_name)?;
        let ein = as_strings(&ein)?;
        let state = as_strings(&state)?;
        let participants = as_strings(&participants)?;
        let plan_name = plan_name.as_ref().map(as_strings).transpose()?;

        for row in 0..batch.num_rows() {
            let participant_count = match value(participants, row).and_then(parse_participant_count) {
                Some(n) => n,
                None => {
                    report.defaulted_participants += 1;
                    DEFAULT_PARTICIPANT_COUNT
                }
            };

            let mut record = LeadRecord::new(
                value(employer_name, row).unwrap_or_default().trim(),
                value(ein, row).unwrap_or_default().trim(),
                value(state, row).unwrap_or_default(),
                participant_count,
            );
            if record.state.is_empty() {
                report.blank_states += 1;
            }
            if let Some(plan) = plan_name
                && let Some(p) = value(plan, row).map(str::trim)
                && !p.is_empty()
            {
                record.plan_name = Some(p.to_string());
            }

            records.push(record);
            report.rows += 1;
        }
    }

    Ok((records, report))
}

/// Column `idx` of `batch`, cast to `Utf8`.
fn utf8_column(batch: &RecordBatch, idx: usize) -> Result<ArrayRef, StoreError> {
    Ok(cast(batch.column(idx), &DataType::Utf8)?)
}

fn as_strings(col: &ArrayRef) -> Result<&StringArray, StoreError> {
    col.as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| StoreError::Arrow(ArrowError::CastError("column is not Utf8".into())))
}

fn value(col: &StringArray, row: usize) -> Option<&str> {
    if col.is_null(row) {
        None
    } else {
        Some(col.value(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int64Array, StringArray};
    use leadrank_core::{Segment, Tier};
    use parquet::arrow::ArrowWriter;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_canonical_headers() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(
            &tmp,
            "leads.csv",
            "employer_name,ein,state,participant_count\n\
             Acme Corp,12-3456789,ma,6200\n\
             \"Bayside, Inc.\",98-7654321, tx ,1500\n",
        );
        let (snap, report) = load_snapshot(&path).unwrap();
        assert_eq!(snap.len(), 2);
        assert_eq!(report.rows, 2);
        assert_eq!(report.defaulted_participants, 0);

        let a = &snap.records()[0];
        assert_eq!(a.employer_name, "Acme Corp");
        assert_eq!(a.state, "MA");
        assert_eq!(a.participant_count, 6_200);
        assert_eq!(a.tier(), Tier::Tier1);
        assert_eq!(a.segment(), Segment::Large);

        let b = &snap.records()[1];
        assert_eq!(b.employer_name, "Bayside, Inc.");
        assert_eq!(b.state, "TX");
        assert_eq!(b.plan_name, None);
    }

    #[test]
    fn loads_dashboard_headers_and_extra_columns() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(
            &tmp,
            "self_insured_crm_list.csv",
            "Employer_Name,EIN,State,Participants,Plan_Name,Market_Segment\n\
             Acme Corp,123456789,NY,800,Acme Welfare Plan,Mid-Market (500-5K)\n",
        );
        let (snap, _) = load_snapshot(&path).unwrap();
        let r = &snap.records()[0];
        assert_eq!(r.ein, "123456789");
        assert_eq!(r.participant_count, 800);
        assert_eq!(r.plan_name.as_deref(), Some("Acme Welfare Plan"));
        assert_eq!(r.segment(), Segment::MidMarket);
    }

    #[test]
    fn short_rows_default_missing_trailing_fields() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(
            &tmp,
            "leads.csv",
            "employer_name,ein,state,participant_count\n\
             Acme,1,NY,6000\n\
             Globex,2,CA\n\
             Initech,3\n",
        );
        let (snap, report) = load_snapshot(&path).unwrap();
        assert_eq!(report.rows, 3);
        assert_eq!(report.defaulted_participants, 2);
        assert_eq!(report.blank_states, 1);

        let globex = &snap.records()[1];
        assert_eq!(globex.state, "CA");
        assert_eq!(globex.participant_count, 0);
        assert_eq!(globex.segment(), Segment::Small);
        assert_eq!(snap.records()[2].tier(), Tier::Other);
    }

    #[test]
    fn malformed_participant_counts_default_to_zero() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(
            &tmp,
            "leads.csv",
            "employer_name,ein,state,participant_count\n\
             A,1,NY,\n\
             B,2,NY,unknown\n\
             C,3,NY,-40\n\
             D,4,NY,\"1,250\"\n\
             E,5,,700.0\n",
        );
        let (snap, report) = load_snapshot(&path).unwrap();
        let counts: Vec<u64> = snap.records().iter().map(|r| r.participant_count).collect();
        assert_eq!(counts, vec![0, 0, 0, 1_250, 700]);
        assert_eq!(report.defaulted_participants, 3);
        assert_eq!(report.blank_states, 1);
        assert_eq!(snap.records()[4].tier(), Tier::Other);
    }

    #[test]
    fn missing_file_is_not_found() {
        let result = load_snapshot(Path::new("/nonexistent/leads.csv"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn unsupported_extension() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(&tmp, "leads.xlsx", "whatever");
        assert!(matches!(
            load_snapshot(&path),
            Err(StoreError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn missing_columns_are_named() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(&tmp, "leads.csv", "employer_name,state\nAcme,NY\n");
        match load_snapshot(&path) {
            Err(StoreError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["ein", "participant_count"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn header_only_file_is_an_empty_snapshot() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(&tmp, "leads.csv", "employer_name,ein,state,participant_count\n");
        let (snap, report) = load_snapshot(&path).unwrap();
        assert!(snap.is_empty());
        assert_eq!(report.rows, 0);
    }

    #[test]
    fn empty_schema_reports_all_required_columns() {
        let schema = Schema::empty();
        match records_from_batches(&schema, &[]) {
            Err(StoreError::MissingColumns(missing)) => assert_eq!(missing.len(), 4),
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn header_keys() {
        assert_eq!(header_key("Employer_Name"), "employer_name");
        assert_eq!(header_key(" Participant Count "), "participant_count");
        assert_eq!(header_key("\u{feff}EIN"), "ein");
    }

    #[test]
    fn loads_parquet_with_numeric_columns() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("leads.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("Employer_Name", DataType::Utf8, false),
            Field::new("EIN", DataType::Int64, false),
            Field::new("State", DataType::Utf8, true),
            Field::new("Participants", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            Arc::clone(&schema),
            vec![
                Arc::new(StringArray::from(vec!["Acme", "Globex"])),
                Arc::new(Int64Array::from(vec![123456789, 987654321])),
                Arc::new(StringArray::from(vec![Some("CA"), None])),
                Arc::new(Int64Array::from(vec![Some(5_000), None])),
            ],
        )
        .unwrap();

        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let (snap, report) = load_snapshot(&path).unwrap();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.records()[0].ein, "123456789");
        assert_eq!(snap.records()[0].participant_count, 5_000);
        assert_eq!(snap.records()[1].state, "");
        assert_eq!(report.defaulted_participants, 1);
        assert_eq!(report.blank_states, 1);
    }
}
