//! CSV output for time series.
//!
//! One header row (`TIMESTAMP` then the column names in declaration order),
//! then one row per key in ascending order with the key in its variant's
//! default format.

use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::{SeriesResult, TimeSeries};

/// Create (or truncate) `path` and write `series` to it.
pub fn write_series(series: &TimeSeries, path: &Path) -> SeriesResult<()> {
    let out = Writer::from_path(path)?;
    write_records(series, out)
}

/// Like [`write_series`] but accepts any `Write` sink.
pub fn write_series_to<W: Write>(series: &TimeSeries, sink: W) -> SeriesResult<()> {
    write_records(series, Writer::from_writer(sink))
}

fn write_records<W: Write>(series: &TimeSeries, mut out: Writer<W>) -> SeriesResult<()> {
    let mut header = vec!["TIMESTAMP".to_owned()];
    header.extend(series.column_names().map(str::to_owned));
    out.write_record(&header)?;

    for (key, &row) in series.entries() {
        let mut record = Vec::with_capacity(series.column_count() + 1);
        record.push(key.render_default());
        for column in series.columns() {
            record.push(column.get(row).map(|v| v.to_string()).unwrap_or_default());
        }
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

impl TimeSeries {
    pub fn write(&self, path: &Path) -> SeriesResult<()> {
        write_series(self, path)
    }

    pub fn write_to<W: Write>(&self, sink: W) -> SeriesResult<()> {
        write_series_to(self, sink)
    }
}
