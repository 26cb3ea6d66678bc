use super::domain::{Dimension, DimensionScores, HistoryRecord};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;

/// Textual timestamp layout shared with every other reader of the history
/// stream. Part of the compatibility contract, as is the field order below.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// timestamp, context, R, C, H, T, FFS
const FIELD_COUNT: usize = 7;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("history store unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("history stream unreadable: {0}")]
    Csv(#[from] csv::Error),
    #[error("history row {row} carries {fields} fields, expected {FIELD_COUNT}")]
    FieldCount { row: usize, fields: usize },
    #[error("history row {row} field '{field}' does not parse")]
    FieldValue { row: usize, field: &'static str },
}

/// Storage seam for the append-only assessment log, so the pipeline can be
/// exercised against an in-memory stand-in.
pub trait HistoryStore {
    /// Appends one record. Appends are the only write path; records are
    /// never updated or deleted.
    fn append(&mut self, record: &HistoryRecord) -> Result<(), HistoryError>;

    /// Every record in chronological (append) order. A missing backing
    /// store is empty history, not an error.
    fn load_all(&self) -> Result<Vec<HistoryRecord>, HistoryError>;

    fn latest(&self) -> Result<Option<HistoryRecord>, HistoryError> {
        Ok(self.load_all()?.pop())
    }

    /// The second-to-last record overall, regardless of context.
    fn previous(&self) -> Result<Option<HistoryRecord>, HistoryError> {
        let mut records = self.load_all()?;
        if records.len() < 2 {
            return Ok(None);
        }
        records.pop();
        Ok(records.pop())
    }
}

/// File-backed store: headerless CSV rows, one append per completed
/// assessment. Single-writer by assumption.
#[derive(Debug, Clone)]
pub struct CsvHistoryStore {
    path: PathBuf,
}

impl CsvHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl HistoryStore for CsvHistoryStore {
    fn append(&mut self, record: &HistoryRecord) -> Result<(), HistoryError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write_record(file, record)
    }

    fn load_all(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        read_records(file)
    }
}

/// Serializes one record onto the stream in the fixed field order.
pub fn write_record<W: Write>(writer: W, record: &HistoryRecord) -> Result<(), HistoryError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    let mut fields = vec![
        record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        record.context.clone(),
    ];
    for dimension in Dimension::ordered() {
        fields.push(record.scores.get(dimension).to_string());
    }
    fields.push(record.composite.to_string());

    csv_writer.write_record(&fields)?;
    csv_writer.flush().map_err(HistoryError::Io)?;
    Ok(())
}

/// Reads every record from the stream, refusing to misalign fields when a
/// row deviates from the layout.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<HistoryRecord>, HistoryError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let row = row?;
        if row.len() != FIELD_COUNT {
            return Err(HistoryError::FieldCount {
                row: index + 1,
                fields: row.len(),
            });
        }

        let timestamp = NaiveDateTime::parse_from_str(&row[0], TIMESTAMP_FORMAT).map_err(|_| {
            HistoryError::FieldValue {
                row: index + 1,
                field: "timestamp",
            }
        })?;
        let context = row[1].to_string();

        let mut scores = BTreeMap::new();
        for (offset, dimension) in Dimension::ordered().into_iter().enumerate() {
            let value = row[2 + offset]
                .parse::<f64>()
                .map_err(|_| HistoryError::FieldValue {
                    row: index + 1,
                    field: dimension.code(),
                })?;
            scores.insert(dimension, value);
        }
        let composite = row[6].parse::<f64>().map_err(|_| HistoryError::FieldValue {
            row: index + 1,
            field: "FFS",
        })?;

        records.push(HistoryRecord {
            timestamp,
            context,
            scores: DimensionScores::new(scores),
            composite,
        });
    }

    Ok(records)
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    records: Vec<HistoryRecord>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn append(&mut self, record: &HistoryRecord) -> Result<(), HistoryError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn record(day: u32, context: &str, base: f64) -> HistoryRecord {
        let mut scores = BTreeMap::new();
        for (offset, dimension) in Dimension::ordered().into_iter().enumerate() {
            scores.insert(dimension, base + offset as f64 * 0.5);
        }
        HistoryRecord {
            timestamp: NaiveDate::from_ymd_opt(2025, 11, day)
                .expect("valid date")
                .and_hms_opt(9, 30, 0)
                .expect("valid time"),
            context: context.to_string(),
            scores: DimensionScores::new(scores),
            composite: base + 1.0,
        }
    }

    #[test]
    fn records_round_trip_through_the_stream_in_order() {
        let originals = vec![
            record(1, "ethics", 6.5),
            record(2, "ai", 7.25),
            record(3, "personal_growth", 5.8),
        ];

        let mut buffer = Vec::new();
        for original in &originals {
            write_record(&mut buffer, original).expect("serializes");
        }

        let loaded = read_records(Cursor::new(buffer)).expect("parses");
        assert_eq!(loaded, originals);
    }

    #[test]
    fn stream_layout_matches_the_compatibility_contract() {
        let mut buffer = Vec::new();
        write_record(&mut buffer, &record(5, "ethics", 6.0)).expect("serializes");

        let line = String::from_utf8(buffer).expect("utf-8");
        assert_eq!(
            line.trim_end(),
            "2025-11-05 09:30:00,ethics,6,6.5,7,7.5,7"
        );
    }

    #[test]
    fn short_row_is_rejected_rather_than_misaligned() {
        let stream = "2025-11-05 09:30:00,ethics,6,6.5,7\n";
        let err = read_records(Cursor::new(stream)).expect_err("field short");
        assert!(matches!(
            err,
            HistoryError::FieldCount { row: 1, fields: 5 }
        ));
    }

    #[test]
    fn unparseable_score_names_the_offending_field() {
        let stream = "2025-11-05 09:30:00,ethics,6,abc,7,7.5,7\n";
        let err = read_records(Cursor::new(stream)).expect_err("bad score");
        assert!(matches!(
            err,
            HistoryError::FieldValue { row: 1, field: "C" }
        ));
    }

    #[test]
    fn previous_is_the_second_to_last_record_overall() {
        let mut store = InMemoryHistoryStore::new();
        assert!(store.previous().expect("readable").is_none());

        store.append(&record(1, "ethics", 6.0)).expect("appends");
        assert!(store.previous().expect("readable").is_none());

        store.append(&record(2, "ai", 7.0)).expect("appends");
        let previous = store.previous().expect("readable").expect("two records");
        assert_eq!(previous.context, "ethics");

        let latest = store.latest().expect("readable").expect("non-empty");
        assert_eq!(latest.context, "ai");
    }
}
