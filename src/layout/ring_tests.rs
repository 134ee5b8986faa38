//==================================================================================
// Unit Tests for the time-ring layout
//==================================================================================

use std::sync::Arc;

use crate::config::{AxisFormatter, LabelFormatter, RingConfig, RingFormatters};
use crate::error::HyperframeError;
use crate::graph::Graph;
use crate::layout::ring::*;
use crate::layout::AxisLabel;
use crate::types::TimeUnit;
use arrow::array::{
    Array, ArrayRef, AsArray, Int64Array, StringArray, TimestampMillisecondArray,
    TimestampNanosecondArray,
};
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn nanos(t: NaiveDateTime) -> i64 {
    t.and_utc().timestamp_nanos_opt().unwrap()
}

fn graph(times: Vec<Option<NaiveDateTime>>) -> Graph {
    let ids: Vec<String> = (0..times.len()).map(|i| format!("n{i}")).collect();
    let nodes = RecordBatch::try_from_iter(vec![
        ("id", Arc::new(StringArray::from(ids)) as ArrayRef),
        (
            "t",
            Arc::new(TimestampNanosecondArray::from(
                times.into_iter().map(|t| t.map(nanos)).collect::<Vec<_>>(),
            )) as ArrayRef,
        ),
    ])
    .unwrap();
    Graph::new().with_nodes(nodes)
}

fn one_ring() -> RingConfig {
    RingConfig {
        num_rings: Some(1),
        ..Default::default()
    }
}

fn floats(g: &Graph, name: &str) -> Vec<Option<f64>> {
    g.nodes()
        .unwrap()
        .column_by_name(name)
        .unwrap()
        .as_primitive::<Float64Type>()
        .iter()
        .collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_radius_interpolates_between_rounded_bounds() {
    let g = graph(vec![Some(at(2018, 1, 1)), Some(at(2018, 1, 2))]);
    let out = time_ring(&g, &one_ring(), &RingFormatters::default()).unwrap();

    let r = floats(&out, "r");
    assert!(close(r[0].unwrap(), 100.0));
    assert!(close(r[1].unwrap(), 1000.0));

    let x = floats(&out, "x");
    let y = floats(&out, "y");
    assert!(close(x[0].unwrap(), 100.0));
    assert!(close(y[0].unwrap(), 0.0));
    assert!(close(x[1].unwrap(), 1000.0 * 1f64.cos()));
    assert!(close(y[1].unwrap(), 1000.0 * 1f64.sin()));
}

#[test]
fn test_reverse_mirrors_every_radius() {
    let g = graph(vec![
        Some(at(2018, 1, 1)),
        Some(at(2018, 1, 9)),
        Some(at(2018, 2, 3)),
        Some(at(2018, 1, 20)),
    ]);
    let config = RingConfig::default();
    let reversed = RingConfig {
        reverse: true,
        ..Default::default()
    };

    let forward = floats(&time_ring(&g, &config, &RingFormatters::default()).unwrap(), "r");
    let backward = floats(&time_ring(&g, &reversed, &RingFormatters::default()).unwrap(), "r");
    for (f, b) in forward.iter().zip(&backward) {
        assert!(close(f.unwrap() + b.unwrap(), config.min_r + config.max_r));
    }
}

#[test]
fn test_axis_has_one_label_per_boundary() {
    let g = graph(vec![Some(at(2018, 1, 1)), Some(at(2018, 1, 2))]);
    let out = time_ring(&g, &one_ring(), &RingFormatters::default()).unwrap();
    let axis = out.encodings().axis.as_ref().unwrap();

    assert_eq!(axis.len(), 2);
    assert_eq!(axis[0].label, "2018-01-01");
    assert_eq!(axis[1].label, "2018-01-02");
    assert!(close(axis[0].r, 100.0));
    assert!(close(axis[1].r, 1000.0));
    assert!(axis.iter().all(|a| a.internal));
}

#[test]
fn test_month_rings_follow_the_calendar() {
    let g = graph(vec![Some(at(2018, 1, 1)), Some(at(2018, 2, 20))]);
    let config = RingConfig {
        num_rings: Some(2),
        time_unit: Some(TimeUnit::Month),
        ..Default::default()
    };
    let out = time_ring(&g, &config, &RingFormatters::default()).unwrap();
    let axis = out.encodings().axis.as_ref().unwrap();

    // Rounded start is 2018-01-15; labels step by 31 days, radii by calendar months.
    let labels: Vec<&str> = axis.iter().map(|a| a.label.as_str()).collect();
    assert_eq!(labels, vec!["2018-01", "2018-02", "2018-03"]);
    assert!(close(axis[1].r, 100.0 + 900.0 * 31.0 / 62.0));
    assert!(close(axis[2].r, 100.0 + 900.0 * 59.0 / 62.0));
}

#[test]
fn test_multi_year_data_lays_out_on_century_rings() {
    let g = graph(vec![Some(at(2012, 1, 1)), Some(at(2018, 6, 1))]);
    let out = time_ring(&g, &RingConfig::default(), &RingFormatters::default()).unwrap();

    // Rings start at the epoch and span five 36500-day centuries.
    let span_secs = 5.0 * 36_500.0 * 86_400.0;
    let r = floats(&out, "r");
    assert!(close(r[0].unwrap(), 100.0 + 900.0 * 1_325_376_000.0 / span_secs));
    assert!(r.iter().all(|v| (100.0..=1000.0).contains(&v.unwrap())));

    let axis = out.encodings().axis.as_ref().unwrap();
    assert_eq!(axis.len(), 6);
    assert!(close(axis[0].r, 100.0));
    assert!(axis.windows(2).all(|w| w[0].r < w[1].r));
    assert!(axis[0].label.starts_with("1970-01-01T00:00:00"));
}

#[test]
fn test_formatters_replace_labels_and_axis() {
    let g = graph(vec![Some(at(2018, 1, 1)), Some(at(2018, 1, 2))]);

    let label: &LabelFormatter = &|t, ring, _width| format!("ring {} @ {}", ring, t.format("%d"));
    let out = time_ring(
        &g,
        &one_ring(),
        &RingFormatters {
            format_label: Some(label),
            format_axis: None,
        },
    )
    .unwrap();
    let axis = out.encodings().axis.as_ref().unwrap();
    assert_eq!(axis[1].label, "ring 1 @ 02");

    let hide: &AxisFormatter = &|_axis: Vec<AxisLabel>| Vec::new();
    let out = time_ring(
        &g,
        &one_ring(),
        &RingFormatters {
            format_label: None,
            format_axis: Some(hide),
        },
    )
    .unwrap();
    assert!(out.encodings().axis.as_ref().unwrap().is_empty());
}

#[test]
fn test_display_settings_and_color() {
    let g = graph(vec![Some(at(2018, 1, 1)), Some(at(2018, 1, 2))]);
    let config = RingConfig {
        play_ms: 500,
        ..one_ring()
    };
    let out = time_ring(&g, &config, &RingFormatters::default()).unwrap();

    assert_eq!(out.url_params()["play"], json!(500));
    assert_eq!(out.url_params()["lockedR"], json!(true));
    assert_eq!(out.url_params()["bg"], json!("%23E2E2E2"));

    let color = out.encodings().point_color.as_ref().unwrap();
    assert_eq!(color.column, "t");
    assert_eq!(color.palette, vec!["blue", "yellow", "red"]);
    assert!(color.as_continuous);
}

#[test]
fn test_null_timestamps_keep_their_angle() {
    let g = graph(vec![Some(at(2018, 1, 1)), None, Some(at(2018, 1, 2))]);
    let out = time_ring(&g, &one_ring(), &RingFormatters::default()).unwrap();

    let r = floats(&out, "r");
    let x = floats(&out, "x");
    assert_eq!(r[1], None);
    assert_eq!(x[1], None);
    assert!(close(x[2].unwrap(), 1000.0 * 2f64.cos()));
}

#[test]
fn test_existing_position_columns_are_replaced() {
    let nodes = RecordBatch::try_from_iter(vec![
        ("x", Arc::new(Int64Array::from(vec![7, 7])) as ArrayRef),
        (
            "t",
            Arc::new(TimestampNanosecondArray::from(vec![
                nanos(at(2018, 1, 1)),
                nanos(at(2018, 1, 2)),
            ])) as ArrayRef,
        ),
    ])
    .unwrap();
    let out = time_ring(&Graph::new().with_nodes(nodes), &one_ring(), &RingFormatters::default())
        .unwrap();
    let positioned = out.nodes().unwrap();

    assert_eq!(positioned.num_columns(), 4);
    assert_eq!(positioned.schema().field(0).name(), "x");
    assert_eq!(positioned.column(0).data_type(), &DataType::Float64);
}

#[test]
fn test_any_timestamp_unit_is_accepted() {
    let millis = |t: NaiveDateTime| t.and_utc().timestamp_millis();
    let nodes = RecordBatch::try_from_iter(vec![(
        "when",
        Arc::new(TimestampMillisecondArray::from(vec![
            millis(at(2018, 1, 1)),
            millis(at(2018, 1, 2)),
        ])) as ArrayRef,
    )])
    .unwrap();
    let out = time_ring(&Graph::new().with_nodes(nodes), &one_ring(), &RingFormatters::default())
        .unwrap();

    let r = floats(&out, "r");
    assert!(close(r[1].unwrap(), 1000.0));
    assert_eq!(out.encodings().point_color.as_ref().unwrap().column, "when");
}

#[test]
fn test_pretty_print_truncates_per_unit() {
    let t = NaiveDate::from_ymd_opt(2018, 1, 3)
        .unwrap()
        .and_hms_nano_opt(4, 5, 6, 123_456_789)
        .unwrap();

    assert_eq!(pretty_print_time(t, TimeUnit::Second), "2018-01-03T04:05:06");
    assert_eq!(pretty_print_time(t, TimeUnit::Minute), "2018-01-03T04:05");
    assert_eq!(pretty_print_time(t, TimeUnit::Hour), "2018-01-03T04");
    assert_eq!(pretty_print_time(t, TimeUnit::Day), "2018-01-03");
    // Weeks are counted from the epoch, a Thursday.
    assert_eq!(pretty_print_time(t, TimeUnit::Week), "2017-12-28");
    assert_eq!(pretty_print_time(t, TimeUnit::Month), "2018-01");
    assert_eq!(pretty_print_time(t, TimeUnit::Year), "2018");
    assert_eq!(
        pretty_print_time(t, TimeUnit::Century),
        "2018-01-03T04:05:06.123456789"
    );
}

//==================================================================================
// Configuration errors
//==================================================================================

#[test]
fn test_missing_nodes_fails() {
    let err = time_ring(&Graph::new(), &RingConfig::default(), &RingFormatters::default())
        .unwrap_err();
    assert!(matches!(err, HyperframeError::MissingNodes));
}

#[test]
fn test_no_timestamp_column_fails() {
    let nodes = RecordBatch::try_from_iter(vec![(
        "id",
        Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef,
    )])
    .unwrap();
    let g = Graph::new().with_nodes(nodes);

    let err = time_ring(&g, &RingConfig::default(), &RingFormatters::default()).unwrap_err();
    assert!(matches!(err, HyperframeError::InvalidConfig(_)));

    let named = RingConfig {
        time_col: Some("id".to_string()),
        ..Default::default()
    };
    let err = time_ring(&g, &named, &RingFormatters::default()).unwrap_err();
    assert!(matches!(err, HyperframeError::InvalidColumnType { ref column, .. } if column == "id"));

    let missing = RingConfig {
        time_col: Some("nope".to_string()),
        ..Default::default()
    };
    let err = time_ring(&g, &missing, &RingFormatters::default()).unwrap_err();
    assert!(matches!(err, HyperframeError::MissingColumn(_)));
}

#[test]
fn test_layout_does_not_touch_input_graph() {
    let g = graph(vec![Some(at(2018, 1, 1)), Some(at(2018, 1, 2))]);
    let _ = time_ring(&g, &one_ring(), &RingFormatters::default()).unwrap();
    assert_eq!(g.nodes().unwrap().num_columns(), 2);
    assert!(g.encodings().axis.is_none());
}
