use super::*;
use crate::config::EngineKind;
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use std::sync::Arc;

fn sample_batch() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("x", DataType::Utf8, true),
        Field::new("i", DataType::Int64, true),
        Field::new("f", DataType::Float64, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(vec![
                Some("a"),
                None,
                Some("a"),
                Some("c"),
                Some("d"),
            ])),
            Arc::new(Int64Array::from(vec![Some(1), Some(2), Some(1), None, Some(5)])),
            Arc::new(Float64Array::from(vec![
                Some(0.5),
                Some(1.5),
                Some(0.5),
                Some(2.5),
                None,
            ])),
        ],
    )
    .unwrap()
}

fn engines() -> Vec<Box<dyn TabularEngine>> {
    vec![
        resolve_engine(&EngineKind::Eager),
        resolve_engine(&EngineKind::Partitioned { partition_rows: 2 }),
    ]
}

#[test]
fn test_resolve_engine_reports_kind() {
    assert_eq!(resolve_engine(&EngineKind::Eager).kind(), EngineKind::Eager);
    assert_eq!(
        resolve_engine(&EngineKind::Partitioned { partition_rows: 7 }).kind(),
        EngineKind::Partitioned { partition_rows: 7 }
    );
}

#[test]
fn test_select_missing_column_is_config_error() {
    for engine in engines() {
        let err = engine.select(&sample_batch(), &["x", "nope"]).unwrap_err();
        assert!(matches!(err, HyperframeError::MissingColumn(ref c) if c == "nope"));
    }
}

#[test]
fn test_valid_mask_matches_across_engines() {
    for engine in engines() {
        let mask = engine.valid_mask(&sample_batch(), &["x", "i"]).unwrap();
        assert_eq!(mask.iter_ones().collect::<Vec<_>>(), vec![0, 2, 4]);
    }
}

#[test]
fn test_filter_preserves_row_order() {
    let predicate = BooleanArray::from(vec![true, false, true, true, false]);
    for engine in engines() {
        let out = engine.filter(&sample_batch(), &predicate).unwrap();
        let x = out.column(0).as_string::<i32>();
        assert_eq!(out.num_rows(), 3);
        assert_eq!(x.value(0), "a");
        assert_eq!(x.value(2), "c");
    }
}

#[test]
fn test_stringify_substitutes_nulls() {
    let batch = sample_batch();
    for engine in engines() {
        let ints = engine.stringify(batch.column(1).as_ref(), "null").unwrap();
        assert_eq!(ints.value(0), "1");
        assert_eq!(ints.value(3), "null");
        assert_eq!(ints.null_count(), 0);

        let strings = engine.stringify(batch.column(0).as_ref(), "NA").unwrap();
        assert_eq!(strings.value(1), "NA");
        assert_eq!(strings.len(), 5);
    }
}

#[test]
fn test_dedup_keeps_first_occurrence() {
    for engine in engines() {
        let out = engine.dedup_by(&sample_batch(), &["x", "i"]).unwrap();
        assert_eq!(out.num_rows(), 4);
        let i = out.column(1).as_primitive::<arrow::datatypes::Int64Type>();
        assert_eq!(i.value(0), 1);
        assert_eq!(i.value(1), 2);
    }
}

#[test]
fn test_concat_of_nothing_is_empty_table() {
    let schema = sample_batch().schema();
    for engine in engines() {
        let out = engine.concat(&schema, &[]).unwrap();
        assert_eq!(out.num_rows(), 0);
        assert_eq!(out.num_columns(), 3);
    }
}

#[test]
fn test_partitions_cover_all_rows() {
    let parts: Vec<_> = partitions(5, 2).collect();
    assert_eq!(parts, vec![(0, 2), (2, 2), (4, 1)]);
    assert_eq!(partitions(0, 3).count(), 0);
}
