use polars::prelude::*;

use crate::{Result, StockAnalyzerError};

/// Strict per-element check used by the smoothing transforms.
///
/// Type coercion failures fire before the missing-value scan, so a NaN
/// report only ever names a column that is already legitimately numeric.
pub(crate) fn validate_column(col: &Column) -> Result<Vec<f64>> {
    let name = col.name().to_string();
    let s = col.as_materialized_series();
    match s.dtype() {
        dt if dt.is_primitive_numeric() => {
            let casted = s.cast(&DataType::Float64)?;
            let mut vals = Vec::with_capacity(s.len());
            let mut missing = Vec::new();
            for (i, v) in casted.f64()?.into_iter().enumerate() {
                match v {
                    Some(x) if !x.is_nan() => vals.push(x),
                    _ => {
                        missing.push(i);
                        vals.push(f64::NAN);
                    }
                }
            }
            if missing.is_empty() {
                Ok(vals)
            } else {
                Err(StockAnalyzerError::MissingValue(name, missing))
            }
        }
        DataType::String => {
            let mut vals = Vec::with_capacity(s.len());
            let mut missing = Vec::new();
            for (i, v) in s.str()?.into_iter().enumerate() {
                // A null slot in a text column is the non-numeric missing
                // sentinel and fails at the type tier, not the NaN tier.
                let Some(text) = v else {
                    return Err(StockAnalyzerError::Conversion(name));
                };
                let parsed: f64 = text
                    .trim()
                    .parse()
                    .map_err(|_| StockAnalyzerError::NumericConversion(name.clone()))?;
                if parsed.is_nan() {
                    missing.push(i);
                }
                vals.push(parsed);
            }
            if missing.is_empty() {
                Ok(vals)
            } else {
                Err(StockAnalyzerError::MissingValue(name, missing))
            }
        }
        _ => Err(StockAnalyzerError::Conversion(name)),
    }
}

/// Permissive whole-series coercion used by the summary aggregator.
///
/// A non-strict cast turns unparseable values into fresh nulls; any null
/// the cast introduced means the column isn't numeric as a whole.
pub(crate) fn to_numeric(col: &Column, name: &str) -> Result<Vec<f64>> {
    let s = col.as_materialized_series();
    let casted = s
        .cast(&DataType::Float64)
        .map_err(|_| StockAnalyzerError::NonNumeric(name.to_owned()))?;
    if casted.null_count() > s.null_count() {
        return Err(StockAnalyzerError::NonNumeric(name.to_owned()));
    }
    Ok(casted
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}
