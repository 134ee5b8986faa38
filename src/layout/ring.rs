// In: src/layout/ring.rs

//! Radial time layout: radius from time, angle from row index.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, FieldRef, Schema, TimeUnit as ArrowTimeUnit, TimestampNanosecondType};
use arrow::record_batch::RecordBatch;
use chrono::{NaiveDate, NaiveDateTime};
use ndarray::Array1;
use serde_json::json;

use super::planner::{from_wide_nanos, plan_time_axis, to_wide_nanos, TimeAxisPlan};
use super::AxisLabel;
use crate::config::{LabelFormatter, RingConfig, RingFormatters};
use crate::error::HyperframeError;
use crate::graph::Graph;
use crate::types::TimeUnit;

/// Point colours from earliest to latest.
pub const TIME_PALETTE: [&str; 3] = ["blue", "yellow", "red"];

/// Light grey background; axis labels render dark.
const BACKGROUND: &str = "%23E2E2E2";

//==================================================================================
// 1. Labels
//==================================================================================

/// Formats `t` truncated to `unit`.
pub fn pretty_print_time(t: NaiveDateTime, unit: TimeUnit) -> String {
    match unit {
        TimeUnit::Second => t.format("%Y-%m-%dT%H:%M:%S").to_string(),
        TimeUnit::Minute => t.format("%Y-%m-%dT%H:%M").to_string(),
        TimeUnit::Hour => t.format("%Y-%m-%dT%H").to_string(),
        TimeUnit::Day => t.format("%Y-%m-%d").to_string(),
        TimeUnit::Week => week_start(t).format("%Y-%m-%d").to_string(),
        TimeUnit::Month => t.format("%Y-%m").to_string(),
        TimeUnit::Year => t.format("%Y").to_string(),
        TimeUnit::Century => t.format("%Y-%m-%dT%H:%M:%S%.9f").to_string(),
    }
}

/// First day of the 7-day bucket containing `t`, counting from 1970-01-01.
fn week_start(t: NaiveDateTime) -> NaiveDate {
    let epoch = NaiveDate::default();
    let days = (t.date() - epoch).num_days();
    epoch + chrono::TimeDelta::days(days.div_euclid(7) * 7)
}

/// One label per ring boundary, `0..=num_rings`, ordered outward.
///
/// Label instants advance by the rounded width; radii advance by the
/// calendar offset so month and year rings follow the calendar.
pub fn gen_axis(
    plan: &TimeAxisPlan,
    min_r: f64,
    max_r: f64,
    reverse: bool,
    format_label: Option<&LabelFormatter>,
) -> Result<Vec<AxisLabel>, HyperframeError> {
    let start = plan.start();
    let scale = plan.radius_scale(min_r, max_r);
    let step_ns = plan.step.num_seconds() as i128 * 1_000_000_000 + plan.step.subsec_nanos() as i128;
    let outside = || HyperframeError::config("axis boundary is outside the supported date range");

    let mut axis = Vec::with_capacity(plan.num_rings + 1);
    for ring in 0..=plan.num_rings {
        let at = from_wide_nanos(plan.start_ns + step_ns * ring as i128).ok_or_else(outside)?;
        let label = match format_label {
            Some(format) => format(at, ring, plan.step),
            None => pretty_print_time(at, plan.unit),
        };

        let boundary = plan
            .offset
            .times(ring)
            .and_then(|offset| offset.apply(start))
            .ok_or_else(outside)?;
        let mut r = (to_wide_nanos(boundary) - plan.start_ns) as f64 * scale + min_r;
        if reverse {
            r = -r + (min_r + max_r);
        }

        axis.push(AxisLabel {
            label,
            r,
            internal: true,
        });
    }
    Ok(axis)
}

//==================================================================================
// 2. Layout
//==================================================================================

/// The first timestamp-typed column of `schema`.
fn default_time_col(schema: &Schema) -> Option<String> {
    schema
        .fields()
        .iter()
        .find(|f| matches!(f.data_type(), DataType::Timestamp(_, _)))
        .map(|f| f.name().clone())
}

/// Reads `time_col` as nanoseconds since the epoch, whatever its stored unit.
fn time_nanos(
    nodes: &RecordBatch,
    time_col: &str,
) -> Result<arrow::array::TimestampNanosecondArray, HyperframeError> {
    let column = nodes
        .column_by_name(time_col)
        .ok_or_else(|| HyperframeError::MissingColumn(time_col.to_string()))?;

    match column.data_type() {
        DataType::Timestamp(_, tz) => {
            let target = DataType::Timestamp(ArrowTimeUnit::Nanosecond, tz.clone());
            let converted = cast(column.as_ref(), &target)?;
            Ok(converted.as_primitive::<TimestampNanosecondType>().clone())
        }
        other => Err(HyperframeError::InvalidColumnType {
            column: time_col.to_string(),
            expected: "a timestamp column".to_string(),
            actual: other.to_string(),
        }),
    }
}

/// Replaces same-named columns in place, appending the rest.
fn assign_columns(
    nodes: &RecordBatch,
    columns: Vec<(&str, ArrayRef)>,
) -> Result<RecordBatch, HyperframeError> {
    let schema = nodes.schema();
    let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
    let mut arrays: Vec<ArrayRef> = nodes.columns().to_vec();

    for (name, array) in columns {
        let field = Arc::new(Field::new(name, array.data_type().clone(), true));
        match schema.index_of(name) {
            Ok(idx) => {
                fields[idx] = field;
                arrays[idx] = array;
            }
            Err(_) => {
                fields.push(field);
                arrays.push(array);
            }
        }
    }
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

/// Positions nodes on concentric time rings.
///
/// Adds `x`, `y` and `r` node columns, an axis encoding, a continuous point
/// colour on the time column and playback settings. Null timestamps get null
/// coordinates but still consume an angle.
///
/// # Errors
/// `MissingNodes` without a nodes table; `InvalidConfig` when no timestamp
/// column can be found; `InvalidColumnType` when `time_col` is not a timestamp.
pub fn time_ring(
    g: &Graph,
    config: &RingConfig,
    formatters: &RingFormatters<'_>,
) -> Result<Graph, HyperframeError> {
    config.validate()?;
    let nodes = g.nodes().ok_or(HyperframeError::MissingNodes)?;

    let time_col = match &config.time_col {
        Some(name) => name.clone(),
        None => default_time_col(&nodes.schema()).ok_or_else(|| {
            HyperframeError::config("No time_col provided and no timestamp node column found")
        })?,
    };
    let timestamps = time_nanos(nodes, &time_col)?;

    // 1. Plan the rings.
    let plan = plan_time_axis(&timestamps, config)?;
    let scale = plan.radius_scale(config.min_r, config.max_r);

    // 2. Radius per node, then polar -> cartesian with the row index as angle.
    let offsets: Array1<f64> = timestamps
        .values()
        .iter()
        .map(|&t| (t as i128 - plan.start_ns) as f64)
        .collect();
    let mut r = offsets * scale + config.min_r;
    if config.reverse {
        r = -r + (config.min_r + config.max_r);
    }
    let angle = Array1::range(0.0, timestamps.len() as f64, 1.0);
    let x = &r * &angle.mapv(f64::cos);
    let y = &r * &angle.mapv(f64::sin);

    let nulls = timestamps.nulls().cloned();
    let to_column = |values: Array1<f64>| -> ArrayRef {
        Arc::new(Float64Array::new(values.to_vec().into(), nulls.clone()))
    };
    let positioned = assign_columns(
        nodes,
        vec![("x", to_column(x)), ("y", to_column(y)), ("r", to_column(r))],
    )?;

    // 3. Axis.
    let mut axis = gen_axis(
        &plan,
        config.min_r,
        config.max_r,
        config.reverse,
        formatters.format_label,
    )?;
    if let Some(format_axis) = formatters.format_axis {
        axis = format_axis(axis);
    }

    log::debug!(
        "time_ring: col={} unit={} rings={} start={} end={}",
        time_col,
        plan.unit,
        plan.num_rings,
        plan.start(),
        plan.end()
    );

    Ok(g.clone()
        .with_nodes(positioned)
        .encode_axis(axis)
        .settings([
            ("play", json!(config.play_ms)),
            ("lockedR", json!(true)),
            ("bg", json!(BACKGROUND)),
        ])
        .encode_point_color(&time_col, &TIME_PALETTE, true))
}
