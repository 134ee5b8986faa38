// In: src/hyper/shaping.rs

//! Edge construction for the two graph shapes.
//!
//! Hyperedge mode links every attribute entity to its row's event hub.
//! Direct mode links entity to entity following an adjacency map. Both emit
//! key columns first and, unless `drop_edge_attrs` is set, the remaining
//! event columns after them.

use std::collections::BTreeMap;
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{DataType, Field, FieldRef, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use super::bindings::HyperBindings;
use super::encoder::{cell_rows, entity_ids, repeated};
use crate::engine::{column, TabularEngine};
use crate::error::HyperframeError;
use crate::types::entity_key::join_names;

/// Source column -> destination columns, iterated in sorted source order.
pub type Adjacency = BTreeMap<String, Vec<String>>;

//==================================================================================
// 1. Shared Schema Helpers
//==================================================================================

/// Event columns copied onto every edge: all of them except the keys, or none.
fn attribute_fields(events: &Schema, keys: &[&str], drop_edge_attrs: bool) -> Vec<FieldRef> {
    if drop_edge_attrs {
        return Vec::new();
    }
    events
        .fields()
        .iter()
        .filter(|f| !keys.contains(&f.name().as_str()))
        .cloned()
        .collect()
}

/// Utf8 key fields followed by `attributes`.
fn edge_schema(keys: &[&str], attributes: &[FieldRef]) -> SchemaRef {
    let mut fields: Vec<FieldRef> = keys
        .iter()
        .map(|name| Arc::new(Field::new(*name, DataType::Utf8, false)))
        .collect();
    fields.extend(attributes.iter().cloned());
    Arc::new(Schema::new(fields))
}

fn attribute_columns(
    engine: &dyn TabularEngine,
    rows: &RecordBatch,
    attributes: &[FieldRef],
) -> Result<Vec<ArrayRef>, HyperframeError> {
    let names: Vec<&str> = attributes.iter().map(|f| f.name().as_str()).collect();
    Ok(engine.select(rows, &names)?.columns().to_vec())
}

//==================================================================================
// 2. Hyperedge Mode
//==================================================================================

/// One edge per (entity, event) pair, for entity columns in sorted order.
///
/// The edge type is the column's category when it has one, else the column
/// name. Duplicate (entity, event) pairs within one column collapse.
pub(crate) fn hyperedges(
    engine: &dyn TabularEngine,
    events: &RecordBatch,
    columns: &[String],
    bindings: &HyperBindings,
    drop_na: bool,
    drop_edge_attrs: bool,
) -> Result<RecordBatch, HyperframeError> {
    let keys = [
        bindings.edge_type.as_str(),
        bindings.attrib_id.as_str(),
        bindings.event_id.as_str(),
    ];
    let attributes = attribute_fields(&events.schema(), &keys, drop_edge_attrs);
    let schema = edge_schema(&keys, &attributes);

    let mut sorted: Vec<&String> = columns.iter().collect();
    sorted.sort();

    let mut parts = Vec::with_capacity(sorted.len());
    for name in sorted {
        let rows = cell_rows(engine, events, &[name.as_str()], drop_na)?;
        let (attrib_ids, _) = entity_ids(engine, &rows, name, bindings)?;
        let edge_type = bindings.category_of(name).unwrap_or(name.as_str());

        let mut arrays: Vec<ArrayRef> = vec![
            repeated(edge_type, rows.num_rows()),
            Arc::new(attrib_ids),
            column(&rows, &bindings.event_id)?.clone(),
        ];
        arrays.extend(attribute_columns(engine, &rows, &attributes)?);

        let batch = RecordBatch::try_new(schema.clone(), arrays)?;
        parts.push(engine.dedup_by(&batch, &[keys[1], keys[2]])?);
    }

    engine.concat(&schema, &parts)
}

//==================================================================================
// 3. Direct Mode
//==================================================================================

/// The explicit EDGES map, or every entity column linked to each column after it.
pub(crate) fn adjacency(columns: &[String], bindings: &HyperBindings) -> Adjacency {
    match &bindings.edges {
        Some(edges) => edges.clone(),
        None => columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), columns[i + 1..].to_vec()))
            .collect(),
    }
}

/// One edge per row for every (source, destination) pair in `shape`.
///
/// Pairs are emitted in sorted source order, destinations in listed order.
/// With `drop_na`, a row is skipped for a pair when either endpoint is null.
pub(crate) fn direct_edges(
    engine: &dyn TabularEngine,
    events: &RecordBatch,
    shape: &Adjacency,
    bindings: &HyperBindings,
    drop_na: bool,
    drop_edge_attrs: bool,
) -> Result<RecordBatch, HyperframeError> {
    let keys = [
        bindings.edge_type.as_str(),
        bindings.source.as_str(),
        bindings.destination.as_str(),
        bindings.event_id.as_str(),
    ];
    let attributes = attribute_fields(&events.schema(), &keys, drop_edge_attrs);
    let schema = edge_schema(&keys, &attributes);

    let mut parts = Vec::new();
    for (source, destinations) in shape {
        let source_type = bindings.category_of(source).unwrap_or(source.as_str());

        for destination in destinations {
            let rows = cell_rows(
                engine,
                events,
                &[source.as_str(), destination.as_str()],
                drop_na,
            )?;
            let (source_ids, _) = entity_ids(engine, &rows, source, bindings)?;
            let (destination_ids, _) = entity_ids(engine, &rows, destination, bindings)?;
            let destination_type = bindings
                .category_of(destination)
                .unwrap_or(destination.as_str());
            let edge_type = join_names(source_type, destination_type, &bindings.delim);

            let mut arrays: Vec<ArrayRef> = vec![
                repeated(&edge_type, rows.num_rows()),
                Arc::new(source_ids),
                Arc::new(destination_ids),
                column(&rows, &bindings.event_id)?.clone(),
            ];
            arrays.extend(attribute_columns(engine, &rows, &attributes)?);
            parts.push(RecordBatch::try_new(schema.clone(), arrays)?);
        }
    }

    engine.concat(&schema, &parts)
}
