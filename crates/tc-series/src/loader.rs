//! Delimited time-series loader.
//!
//! # Format
//!
//! ```text
//! ; comment lines before the header are skipped; after it they are data
//! TIMESTAMP,flow,gauge
//! 2020-01-01 00:00:00,12.5,a
//! 2020-01-01 01:00:00,13.0,b
//! ```
//!
//! The header fixes the delimiter: it must contain tabs or commas, not both
//! and not neither.  The first column is always the time key, parsed with the
//! lenient grammar or with an explicit pattern.  Remaining header fields name
//! the columns, whose types are inferred from their first value.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tc_core::{CalendarTime, TimeError};
use tracing::debug;

use crate::{SeriesError, SeriesResult, TimeSeries, Value};

const COMMENT: char = ';';

/// Load a series from a file, parsing keys with the lenient grammar.
pub fn load_series(path: &Path) -> SeriesResult<TimeSeries> {
    let file = File::open(path)?;
    load_series_reader(file, None)
}

/// Load a series from a file, parsing keys with `pattern`
/// (e.g. `"dd.MM.yyyy HH:mm"`).
pub fn load_series_with_format(path: &Path, pattern: &str) -> SeriesResult<TimeSeries> {
    let file = File::open(path)?;
    load_series_reader(file, Some(pattern))
}

/// Like [`load_series`] but accepts any `Read` source.
pub fn load_series_reader<R: Read>(reader: R, pattern: Option<&str>) -> SeriesResult<TimeSeries> {
    let mut reader = BufReader::new(reader);

    // ── Header ────────────────────────────────────────────────────────────
    let mut line = String::new();
    let mut header_line: u64 = 0;
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(SeriesError::Blank);
        }
        header_line += 1;
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with(COMMENT) {
            break;
        }
    }
    let header = line.trim_end_matches(['\r', '\n']);
    let delimiter = detect_delimiter(header)?;
    let names: Vec<&str> = header.split(delimiter as char).skip(1).map(str::trim).collect();
    let mut series = TimeSeries::new(names)?;

    // ── Rows ──────────────────────────────────────────────────────────────
    let mut records = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    for result in records.records() {
        let record = result?;
        let line = header_line + record.position().map_or(0, |p| p.line());
        add_record(&mut series, &record, pattern).map_err(|e| SeriesError::AtLine {
            line,
            source: Box::new(e),
        })?;
    }

    debug!(
        rows = series.len(),
        columns = series.column_count(),
        delimiter = %(delimiter as char).escape_default(),
        "loaded time series"
    );
    Ok(series)
}

fn detect_delimiter(header: &str) -> SeriesResult<u8> {
    match (header.contains('\t'), header.contains(',')) {
        (true, true) => Err(SeriesError::AmbiguousDelimiter),
        (true, false) => Ok(b'\t'),
        (false, true) => Ok(b','),
        (false, false) => Err(SeriesError::MissingDelimiter),
    }
}

fn add_record(series: &mut TimeSeries, record: &StringRecord, pattern: Option<&str>) -> SeriesResult<()> {
    let stamp = record.get(0).unwrap_or_default();
    // An empty stamp would otherwise parse as "now".
    if stamp.is_empty() {
        return Err(TimeError::Parse(stamp.to_owned()).into());
    }
    let time = match pattern {
        Some(p) => CalendarTime::parse_with_format(stamp, p)?,
        None => CalendarTime::parse(stamp)?,
    };

    let expected = series.column_count();
    let values: Vec<Value> = record.iter().skip(1).take(expected).map(Value::from).collect();
    if values.len() < expected {
        return Err(SeriesError::ColumnCount {
            expected,
            got: values.len(),
        });
    }
    series.add_row(&time, values)?;
    Ok(())
}
