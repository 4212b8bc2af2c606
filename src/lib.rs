use polars::prelude::*;
use std::fmt::{Display, Formatter};

mod chart;
mod smooth;
mod stats;
mod validate;

pub use chart::{
    ColorValue, Encoding, FieldRef, Layer, LayerChart, LayerData, RAW_SERIES_COLOR,
    SMOOTHED_SERIES_COLOR, visualize_exponential_smoothing, visualize_moving_average,
};
pub use smooth::{
    DEFAULT_ALPHA, EWM_PREFIX, SMA_PREFIX, exponential_smoothing, moving_average, prefixed_names,
};
pub use stats::{DEFAULT_MEASUREMENTS, summary_stats};

/// Errors returned by this crate.
///
/// The validation and parameter messages below are part of the public
/// contract; callers match on their exact wording.
#[derive(Debug)]
pub enum StockAnalyzerError {
    Polars(PolarsError),
    InputConversion,
    ColumnNotFound(String),
    InputNameMismatch(String),
    Conversion(String),
    NumericConversion(String),
    MissingValue(String, Vec<usize>),
    NonNumeric(String),
    InvalidAlpha(f64),
    InvalidWindow(usize),
    NameCountMismatch { expected: usize, got: usize },
}

impl Display for StockAnalyzerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Polars(e) => write!(f, "polars error: {e}"),
            Self::InputConversion => {
                write!(f, "Your input data cannot be converted to a table")
            }
            Self::ColumnNotFound(m) => write!(
                f,
                "Your specified measurement '{m}' is not a column name of the data. \
                 Please double check the column names in data."
            ),
            Self::InputNameMismatch(_) => write!(
                f,
                "Your input name does not match with the dataframe column name! \
                 Please enter valid column name!"
            ),
            Self::Conversion(c) => write!(f, "Type of Column {c} isn't a string or a number"),
            Self::NumericConversion(c) => {
                write!(f, "Column {c} can't be converted to floating point")
            }
            Self::MissingValue(c, rows) => {
                write!(f, "Column {c} has Nan at")?;
                for row in rows {
                    write!(f, " [{row}]")?;
                }
                Ok(())
            }
            Self::NonNumeric(m) => write!(
                f,
                "Data in column '{m}' of your input data cannot be converted to numeric format."
            ),
            Self::InvalidAlpha(_) => write!(f, "The value of alpha must between 0 and 1."),
            Self::InvalidWindow(w) => write!(f, "invalid window: {w}"),
            Self::NameCountMismatch { expected, got } => {
                write!(f, "expected {expected} output column names, got {got}")
            }
        }
    }
}

impl std::error::Error for StockAnalyzerError {}

impl From<PolarsError> for StockAnalyzerError {
    fn from(value: PolarsError) -> Self {
        Self::Polars(value)
    }
}

pub type Result<T> = std::result::Result<T, StockAnalyzerError>;

/// Conversion boundary between caller-supplied data and the table the
/// transforms operate on, applied once at each API edge.
pub trait TryIntoTable {
    fn try_into_table(self) -> Result<DataFrame>;
}

impl TryIntoTable for DataFrame {
    fn try_into_table(self) -> Result<DataFrame> {
        Ok(self)
    }
}

impl TryIntoTable for &DataFrame {
    fn try_into_table(self) -> Result<DataFrame> {
        Ok(self.clone())
    }
}

impl TryIntoTable for Vec<Column> {
    fn try_into_table(self) -> Result<DataFrame> {
        DataFrame::new(self).map_err(|_| StockAnalyzerError::InputConversion)
    }
}

impl TryIntoTable for Vec<Series> {
    fn try_into_table(self) -> Result<DataFrame> {
        DataFrame::new(self.into_iter().map(Column::from).collect())
            .map_err(|_| StockAnalyzerError::InputConversion)
    }
}
