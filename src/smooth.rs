use polars::prelude::*;

use crate::validate::validate_column;
use crate::{Result, StockAnalyzerError, TryIntoTable};

/// Smoothing factor used when callers do not supply one.
pub const DEFAULT_ALPHA: f64 = 0.3;

/// Output-column prefix for the moving-average transform.
pub const SMA_PREFIX: &str = "sma_";

/// Output-column prefix for the exponential-smoothing transform.
pub const EWM_PREFIX: &str = "ewm_";

/// Derive output-column names by prefixing every column of `df`.
pub fn prefixed_names(df: &DataFrame, prefix: &str) -> Vec<String> {
    df.get_column_names_str()
        .into_iter()
        .map(|name| format!("{prefix}{name}"))
        .collect()
}

/// Trailing simple moving average with left-edge replication.
///
/// Each column is validated, left-padded with `window - 1` copies of its
/// first value and averaged over every trailing `window` of the padded
/// series, so the output keeps the input row count and the first output
/// value equals the first input value.
pub fn moving_average(
    data: impl TryIntoTable,
    window: usize,
    new_column_names: &[String],
) -> Result<DataFrame> {
    let df = data.try_into_table()?;
    if window == 0 {
        return Err(StockAnalyzerError::InvalidWindow(window));
    }
    check_name_count(&df, new_column_names)?;

    let mut out = Vec::with_capacity(df.width());
    for (col, new_name) in df.get_columns().iter().zip(new_column_names) {
        let vals = validate_column(col)?;
        out.push(Column::new(
            new_name.as_str().into(),
            trailing_mean_padded(&vals, window),
        ));
    }
    DataFrame::new(out).map_err(Into::into)
}

/// Single exponential smoothing:
/// `S[0] = y[0]`, `S[i] = alpha * y[i] + (1 - alpha) * S[i - 1]`.
pub fn exponential_smoothing(
    data: impl TryIntoTable,
    new_column_names: &[String],
    alpha: f64,
) -> Result<DataFrame> {
    let df = data.try_into_table()?;
    if !(0.0..=1.0).contains(&alpha) {
        return Err(StockAnalyzerError::InvalidAlpha(alpha));
    }
    check_name_count(&df, new_column_names)?;

    let mut out = Vec::with_capacity(df.width());
    for (col, new_name) in df.get_columns().iter().zip(new_column_names) {
        let vals = validate_column(col)?;
        out.push(Column::new(new_name.as_str().into(), exp_smooth(&vals, alpha)));
    }
    DataFrame::new(out).map_err(Into::into)
}

fn check_name_count(df: &DataFrame, new_column_names: &[String]) -> Result<()> {
    if new_column_names.len() != df.width() {
        return Err(StockAnalyzerError::NameCountMismatch {
            expected: df.width(),
            got: new_column_names.len(),
        });
    }
    Ok(())
}

fn trailing_mean_padded(x: &[f64], window: usize) -> Vec<f64> {
    if x.is_empty() {
        return vec![];
    }
    let mut padded = vec![x[0]; window - 1];
    padded.extend_from_slice(x);
    (window - 1..padded.len())
        .map(|i| padded[i + 1 - window..=i].iter().sum::<f64>() / window as f64)
        .collect()
}

fn exp_smooth(x: &[f64], alpha: f64) -> Vec<f64> {
    if x.is_empty() {
        return vec![];
    }
    let mut out = vec![0.0; x.len()];
    out[0] = x[0];
    for i in 1..x.len() {
        out[i] = alpha * x[i] + (1.0 - alpha) * out[i - 1];
    }
    out
}
