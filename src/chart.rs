use polars::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::smooth::{EWM_PREFIX, SMA_PREFIX, exponential_smoothing, moving_average, prefixed_names};
use crate::{Result, StockAnalyzerError, TryIntoTable};

/// Line color of the raw price layer.
pub const RAW_SERIES_COLOR: &str = "#0abab5";

/// Line color of the smoothed layer.
pub const SMOOTHED_SERIES_COLOR: &str = "#00008b";

const SMA_TITLE: &str = "Stock Price History with Simple Moving Average";
const EWM_TITLE: &str = "Stock Price History with Exponential Smoothing";
const PRICE_AXIS_TITLE: &str = "Price";
const LINE_MARK: &str = "line";
const FALLBACK_INDEX: &str = "index";

/// Declarative overlay-chart specification: a shared title and one layer
/// per series, each with inline data, a mark type and x/y/color bindings.
/// Serializes to the layered form a Vega-Lite style renderer consumes.
#[derive(Debug, Clone, Serialize)]
pub struct LayerChart {
    pub title: String,
    pub layer: Vec<Layer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layer {
    pub data: LayerData,
    pub mark: &'static str,
    pub encoding: Encoding,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayerData {
    pub values: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Encoding {
    pub x: FieldRef,
    pub y: FieldRef,
    pub color: ColorValue,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldRef {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorValue {
    pub value: &'static str,
}

impl LayerChart {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Overlay the raw `name` series with its trailing moving average.
pub fn visualize_moving_average(
    data: impl TryIntoTable,
    name: &str,
    window: usize,
) -> Result<LayerChart> {
    let df = data.try_into_table()?;
    let (index, values) = split_index(&df)?;
    if values.get_column_index(name).is_none() {
        return Err(StockAnalyzerError::InputNameMismatch(name.to_owned()));
    }
    let smoothed = moving_average(&values, window, &prefixed_names(&values, SMA_PREFIX))?;
    overlay(
        SMA_TITLE,
        index.as_ref(),
        &values,
        name,
        &smoothed,
        &format!("{SMA_PREFIX}{name}"),
    )
}

/// Overlay the raw `name` series with its exponential smoothing.
pub fn visualize_exponential_smoothing(
    data: impl TryIntoTable,
    name: &str,
    alpha: f64,
) -> Result<LayerChart> {
    let df = data.try_into_table()?;
    let (index, values) = split_index(&df)?;
    if values.get_column_index(name).is_none() {
        return Err(StockAnalyzerError::InputNameMismatch(name.to_owned()));
    }
    let smoothed = exponential_smoothing(&values, &prefixed_names(&values, EWM_PREFIX), alpha)?;
    overlay(
        EWM_TITLE,
        index.as_ref(),
        &values,
        name,
        &smoothed,
        &format!("{EWM_PREFIX}{name}"),
    )
}

// A `date` or `index` column plays the role of the row index; it feeds the
// x axis and stays out of the transform input.
fn split_index(df: &DataFrame) -> Result<(Option<Column>, DataFrame)> {
    let index_name = df
        .get_column_names_str()
        .into_iter()
        .find(|n| n.eq_ignore_ascii_case("date") || n.eq_ignore_ascii_case("index"))
        .map(ToOwned::to_owned);
    match index_name {
        Some(name) => Ok((Some(df.column(&name)?.clone()), df.drop(&name)?)),
        None => Ok((None, df.clone())),
    }
}

fn overlay(
    title: &str,
    index: Option<&Column>,
    values: &DataFrame,
    raw_name: &str,
    smoothed: &DataFrame,
    smoothed_name: &str,
) -> Result<LayerChart> {
    let (x_field, x_type, xs) = match index {
        Some(col) => (
            col.name().to_string(),
            x_field_type(col.dtype()),
            index_values(col)?,
        ),
        None => (
            FALLBACK_INDEX.to_owned(),
            "quantitative",
            (0..values.height()).map(|i| json!(i)).collect(),
        ),
    };
    let raw = column_f64(values, raw_name)?;
    let smooth = column_f64(smoothed, smoothed_name)?;

    Ok(LayerChart {
        title: title.to_owned(),
        layer: vec![
            Layer {
                data: LayerData {
                    values: layer_values(&x_field, &xs, raw_name, &raw),
                },
                mark: LINE_MARK,
                encoding: Encoding {
                    x: FieldRef {
                        field: x_field.clone(),
                        field_type: x_type,
                        title: None,
                    },
                    y: FieldRef {
                        field: raw_name.to_owned(),
                        field_type: "quantitative",
                        title: Some(PRICE_AXIS_TITLE),
                    },
                    color: ColorValue {
                        value: RAW_SERIES_COLOR,
                    },
                },
            },
            Layer {
                data: LayerData {
                    values: layer_values(&x_field, &xs, smoothed_name, &smooth),
                },
                mark: LINE_MARK,
                encoding: Encoding {
                    x: FieldRef {
                        field: x_field,
                        field_type: x_type,
                        title: None,
                    },
                    y: FieldRef {
                        field: smoothed_name.to_owned(),
                        field_type: "quantitative",
                        title: None,
                    },
                    color: ColorValue {
                        value: SMOOTHED_SERIES_COLOR,
                    },
                },
            },
        ],
    })
}

fn x_field_type(dt: &DataType) -> &'static str {
    if dt.is_temporal() {
        "temporal"
    } else if dt.is_primitive_numeric() {
        "quantitative"
    } else {
        "nominal"
    }
}

fn index_values(col: &Column) -> Result<Vec<Value>> {
    let s = col.as_materialized_series();
    if s.dtype().is_integer() {
        let casted = s.cast(&DataType::Int64)?;
        Ok(casted
            .i64()?
            .into_iter()
            .map(|v| v.map_or(Value::Null, |x| json!(x)))
            .collect())
    } else if s.dtype().is_primitive_numeric() {
        let casted = s.cast(&DataType::Float64)?;
        Ok(casted
            .f64()?
            .into_iter()
            .map(|v| v.map_or(Value::Null, |x| json!(x)))
            .collect())
    } else {
        let casted = s.cast(&DataType::String)?;
        Ok(casted
            .str()?
            .into_iter()
            .map(|v| v.map_or(Value::Null, |x| json!(x)))
            .collect())
    }
}

fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let casted = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect())
}

fn layer_values(
    x_name: &str,
    xs: &[Value],
    y_name: &str,
    ys: &[f64],
) -> Vec<Map<String, Value>> {
    xs.iter()
        .zip(ys)
        .map(|(x, y)| {
            let mut row = Map::new();
            row.insert(x_name.to_owned(), x.clone());
            row.insert(y_name.to_owned(), json!(y));
            row
        })
        .collect()
}
