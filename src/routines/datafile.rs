use crate::routines::settings::Columns;
use crate::structs::observation::{Dataset, Observation};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading a datafile or deriving series from it
///
/// All of them point at caller-supplied data, and none are recoverable by retrying.
#[derive(Error, Debug)]
pub enum DataError {
    /// A required column is absent from the header
    #[error("Required column `{column}` is missing from the datafile")]
    Schema { column: String },
    /// A cell could not be parsed as the required type
    #[error("Malformed value {value:?} in column `{column}` at row {row}: {reason}")]
    MalformedValue {
        row: usize,
        column: String,
        value: String,
        reason: &'static str,
    },
    /// Two observations share the same subject and time
    #[error("Subject {subject_id} has more than one observation at time {time_h} (rows {first_row} and {second_row})")]
    DuplicateObservation {
        subject_id: String,
        time_h: f64,
        first_row: usize,
        second_row: usize,
    },
    /// The configured delimiter cannot be used by the reader
    #[error("Delimiter {0:?} is not a single-byte ASCII character")]
    InvalidDelimiter(char),
    /// The datafile could not be read, or a record is malformed at the CSV level
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Dataset {
    /// Read a concentration-time datafile
    ///
    /// The file must have a header row containing the subject, time and concentration columns named in `columns`.
    /// Other columns are ignored, and lines starting with `#` are treated as comments.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use pkseries::prelude::*;
    ///
    /// let data = Dataset::from_path("theophylline.csv", &Columns::default()).unwrap();
    /// println!("Number of observations: {}", data.len());
    /// ```
    pub fn from_path(path: impl AsRef<Path>, columns: &Columns) -> Result<Dataset, DataError> {
        let reader = reader_builder(columns)?.from_path(path.as_ref())?;
        let data = read_observations(reader, columns)?;
        tracing::debug!(
            "Read {} observations from {}",
            data.len(),
            path.as_ref().display()
        );
        Ok(data)
    }

    /// Read a concentration-time dataset from any reader, see [Dataset::from_path]
    pub fn from_reader<R: Read>(reader: R, columns: &Columns) -> Result<Dataset, DataError> {
        let reader = reader_builder(columns)?.from_reader(reader);
        read_observations(reader, columns)
    }
}

fn reader_builder(columns: &Columns) -> Result<csv::ReaderBuilder, DataError> {
    if !columns.delimiter.is_ascii() {
        return Err(DataError::InvalidDelimiter(columns.delimiter));
    }

    let mut builder = csv::ReaderBuilder::new();
    builder
        .comment(Some(b'#'))
        .delimiter(columns.delimiter as u8)
        .has_headers(true)
        .trim(csv::Trim::All);
    Ok(builder)
}

fn read_observations<R: Read>(
    mut reader: csv::Reader<R>,
    columns: &Columns,
) -> Result<Dataset, DataError> {
    // Header names are compared case-insensitively
    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect::<Vec<_>>();

    let subject_idx = find_column(&headers, &columns.subject)?;
    let time_idx = find_column(&headers, &columns.time)?;
    let conc_idx = find_column(&headers, &columns.concentration)?;

    let mut observations: Vec<Observation> = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;

        let subject_id = record.get(subject_idx).unwrap_or_default();
        if subject_id.is_empty() {
            return Err(DataError::MalformedValue {
                row,
                column: columns.subject.clone(),
                value: subject_id.to_string(),
                reason: "subject identifier is empty",
            });
        }
        let time = parse_non_negative(&record, time_idx, row, &columns.time)?;
        let conc = parse_non_negative(&record, conc_idx, row, &columns.concentration)?;

        observations.push(Observation::new(subject_id, time, conc, row));
    }

    Ok(Dataset::new(observations))
}

fn find_column(headers: &[String], name: &str) -> Result<usize, DataError> {
    let wanted = name.trim().to_lowercase();
    headers
        .iter()
        .position(|h| *h == wanted)
        .ok_or_else(|| DataError::Schema {
            column: name.to_string(),
        })
}

fn parse_non_negative(
    record: &csv::StringRecord,
    idx: usize,
    row: usize,
    column: &str,
) -> Result<f64, DataError> {
    let raw = record.get(idx).unwrap_or_default();
    let malformed = |reason| DataError::MalformedValue {
        row,
        column: column.to_string(),
        value: raw.to_string(),
        reason,
    };

    let value = raw
        .parse::<f64>()
        .map_err(|_| malformed("not a number"))?;
    if !value.is_finite() {
        return Err(malformed("not a finite number"));
    }
    if value < 0.0 {
        return Err(malformed("negative value"));
    }
    Ok(value)
}
