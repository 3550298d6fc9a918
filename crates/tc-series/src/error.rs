use tc_core::TimeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error(transparent)]
    Time(#[from] TimeError),

    #[error("the time series does not contain the column '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' is declared more than once")]
    DuplicateColumn(String),

    #[error("cannot interpolate between text values in column '{0}'")]
    NotNumeric(String),

    #[error("the time {0} does not exist in the time series")]
    NotFound(String),

    #[error("row has {got} values but the time series has {expected} columns")]
    ColumnCount { expected: usize, got: usize },

    #[error("value '{value}' does not fit numeric column '{column}'")]
    ColumnType { column: String, value: String },

    #[error("{0} lies outside the time series' key range")]
    OutOfRange(String),

    #[error("the time series has no rows")]
    Empty,

    #[error("input is blank")]
    Blank,

    #[error("ambiguous format: the header line contains both a tab and a comma")]
    AmbiguousDelimiter,

    #[error("illegal format: the header line contains neither a tab nor a comma")]
    MissingDelimiter,

    #[error("line {line}: {source}")]
    AtLine {
        line:   u64,
        #[source]
        source: Box<SeriesError>,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SeriesResult<T> = Result<T, SeriesError>;
