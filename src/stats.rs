use polars::prelude::*;

use crate::validate::to_numeric;
use crate::{Result, StockAnalyzerError, TryIntoTable};

/// Measurements summarized when the caller does not pick their own.
pub const DEFAULT_MEASUREMENTS: [&str; 4] = ["High", "Low", "Open", "Close"];

/// Summarize the requested measurement columns of `data`.
///
/// Returns a table with one row per requested measurement, in the order
/// given (duplicates produce duplicate rows), and the columns
/// `measurement`, `mean`, `min`, `max`, `volatility` and `return`.
/// Volatility is the sample standard deviation and return the relative
/// change from the first to the last observation.
pub fn summary_stats(data: impl TryIntoTable, measurements: &[&str]) -> Result<DataFrame> {
    let df = data.try_into_table()?;

    let mut names = Vec::with_capacity(measurements.len());
    let mut means = Vec::with_capacity(measurements.len());
    let mut mins = Vec::with_capacity(measurements.len());
    let mut maxs = Vec::with_capacity(measurements.len());
    let mut vols = Vec::with_capacity(measurements.len());
    let mut rets = Vec::with_capacity(measurements.len());

    for &measurement in measurements {
        let col = df
            .column(measurement)
            .map_err(|_| StockAnalyzerError::ColumnNotFound(measurement.to_owned()))?;
        let vals = to_numeric(col, measurement)?;

        names.push(measurement.to_owned());
        means.push(mean(&vals));
        mins.push(vals.iter().copied().fold(f64::NAN, f64::min));
        maxs.push(vals.iter().copied().fold(f64::NAN, f64::max));
        vols.push(sample_std(&vals));
        rets.push(total_return(&vals));
    }

    DataFrame::new(vec![
        Column::new("measurement".into(), names),
        Column::new("mean".into(), means),
        Column::new("min".into(), mins),
        Column::new("max".into(), maxs),
        Column::new("volatility".into(), vols),
        Column::new("return".into(), rets),
    ])
    .map_err(Into::into)
}

fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }
    x.iter().sum::<f64>() / x.len() as f64
}

fn sample_std(x: &[f64]) -> f64 {
    if x.len() < 2 {
        return f64::NAN;
    }
    let m = mean(x);
    let var = x
        .iter()
        .map(|v| {
            let d = v - m;
            d * d
        })
        .sum::<f64>()
        / (x.len() as f64 - 1.0);
    var.sqrt()
}

// A zero first observation divides through per IEEE-754; no special case.
fn total_return(x: &[f64]) -> f64 {
    match (x.first(), x.last()) {
        (Some(first), Some(last)) => (last - first) / first,
        _ => f64::NAN,
    }
}
