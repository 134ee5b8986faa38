// In: src/hyper/encoder.rs

//! Turns the input table into events and attribute entities.
//!
//! Every function here is written against `TabularEngine` only. Entity ids
//! are produced exclusively through `types::entity_key`, so the uniqueness
//! rule (same prefix + same stringified value => same node) has one home.

use std::iter;
use std::sync::Arc;

use arrow::array::{new_null_array, ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, FieldRef, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use super::bindings::HyperBindings;
use crate::engine::{column, TabularEngine};
use crate::error::HyperframeError;
use crate::null_handling::mask;
use crate::types::entity_key::{render_column, EntityKey, EntityPrefix};

//==================================================================================
// 1. Column Screening
//==================================================================================

/// The columns that become entities, in caller (or table) order, minus SKIP.
pub(crate) fn entity_columns(
    schema: &Schema,
    entity_types: Option<&[String]>,
    bindings: &HyperBindings,
) -> Result<Vec<String>, HyperframeError> {
    let base: Vec<String> = match entity_types {
        Some(requested) => {
            for name in requested {
                schema
                    .index_of(name)
                    .map_err(|_| HyperframeError::MissingColumn(name.clone()))?;
            }
            requested.to_vec()
        }
        None => schema.fields().iter().map(|f| f.name().clone()).collect(),
    };
    Ok(base
        .into_iter()
        .filter(|name| !bindings.skip.contains(name))
        .collect())
}

/// Rows of `batch` where all `columns` are non-null, or `batch` itself when
/// null cells are kept.
pub(crate) fn cell_rows(
    engine: &dyn TabularEngine,
    batch: &RecordBatch,
    columns: &[&str],
    drop_na: bool,
) -> Result<RecordBatch, HyperframeError> {
    if !drop_na {
        return Ok(batch.clone());
    }
    let valid = engine.valid_mask(batch, columns)?;
    if mask::is_all_set(&valid) {
        return Ok(batch.clone());
    }
    engine.filter(batch, &mask::to_boolean_array(&valid))
}

/// Stringifies `column` of `rows` and renders it as entity ids.
pub(crate) fn entity_ids(
    engine: &dyn TabularEngine,
    rows: &RecordBatch,
    name: &str,
    bindings: &HyperBindings,
) -> Result<(StringArray, StringArray), HyperframeError> {
    let values = engine.stringify(column(rows, name)?.as_ref(), &bindings.null_val)?;
    let ids = render_column(bindings.prefix_for(name), &values, &bindings.delim);
    Ok((ids, values))
}

pub(crate) fn repeated(value: &str, len: usize) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(iter::repeat(value).take(len)))
}

//==================================================================================
// 2. Events
//==================================================================================

/// Copies the input table and guarantees a Utf8 event id column.
///
/// An existing event id column is stringified in place; otherwise
/// `<EventID><delim><row>` ids are appended as the last column.
pub(crate) fn create_events(
    engine: &dyn TabularEngine,
    table: &RecordBatch,
    bindings: &HyperBindings,
) -> Result<RecordBatch, HyperframeError> {
    let schema = table.schema();
    let id_field = Arc::new(Field::new(&bindings.event_id, DataType::Utf8, false));

    let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
    let mut arrays: Vec<ArrayRef> = table.columns().to_vec();

    match schema.index_of(&bindings.event_id) {
        Ok(idx) => {
            let ids = engine.stringify(table.column(idx).as_ref(), &bindings.null_val)?;
            fields[idx] = id_field;
            arrays[idx] = Arc::new(ids);
        }
        Err(_) => {
            let prefix = EntityPrefix::Column(&bindings.event_id);
            let ids = StringArray::from_iter_values(
                (0..table.num_rows()).map(|row| EntityKey::new(prefix, row.to_string()).render(&bindings.delim)),
            );
            fields.push(id_field);
            arrays.push(Arc::new(ids));
        }
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

/// Removes rows where any entity column is null.
pub(crate) fn drop_null_rows(
    engine: &dyn TabularEngine,
    events: &RecordBatch,
    columns: &[String],
) -> Result<RecordBatch, HyperframeError> {
    let refs: Vec<&str> = columns.iter().map(String::as_str).collect();
    cell_rows(engine, events, &refs, true)
}

//==================================================================================
// 3. Nodes
//==================================================================================

/// `[nodeID, nodeTitle, type, category]` followed by every event column.
///
/// Event columns sharing a reserved name are dropped, so the reserved value
/// wins. Event columns are nullable because entity rows only fill their own.
pub(crate) fn node_schema(events: &Schema, bindings: &HyperBindings) -> SchemaRef {
    let reserved = [
        &bindings.node_id,
        &bindings.title,
        &bindings.node_type,
        &bindings.category,
    ];
    let mut fields: Vec<Field> = reserved
        .iter()
        .map(|name| Field::new(name.as_str(), DataType::Utf8, false))
        .collect();
    fields.extend(
        events
            .fields()
            .iter()
            .filter(|f| !reserved.contains(&f.name()))
            .map(|f| f.as_ref().clone().with_nullable(true)),
    );
    Arc::new(Schema::new(fields))
}

/// One node per distinct entity id across `columns`; the first occurrence wins.
///
/// Each entity row carries its original typed value in its own column and
/// nulls in every other event column.
pub(crate) fn format_entities(
    engine: &dyn TabularEngine,
    events: &RecordBatch,
    columns: &[String],
    bindings: &HyperBindings,
    drop_na: bool,
    schema: &SchemaRef,
) -> Result<RecordBatch, HyperframeError> {
    let mut parts = Vec::with_capacity(columns.len());

    for name in columns {
        let rows = cell_rows(engine, events, &[name.as_str()], drop_na)?;
        let (ids, titles) = entity_ids(engine, &rows, name, bindings)?;
        let num_rows = rows.num_rows();
        let category = bindings.category_of(name).unwrap_or(name.as_str());

        let mut arrays: Vec<ArrayRef> = vec![
            Arc::new(ids),
            Arc::new(titles),
            repeated(name, num_rows),
            repeated(category, num_rows),
        ];
        for field in schema.fields().iter().skip(4) {
            if field.name() == name {
                arrays.push(column(&rows, name)?.clone());
            } else {
                arrays.push(new_null_array(field.data_type(), num_rows));
            }
        }
        parts.push(RecordBatch::try_new(schema.clone(), arrays)?);
    }

    let all = engine.concat(schema, &parts)?;
    engine.dedup_by(&all, &[bindings.node_id.as_str()])
}

/// One hub node per distinct event id, tagged with the event node type.
///
/// Caller-supplied event ids may repeat; the first row of each id wins.
pub(crate) fn format_event_nodes(
    engine: &dyn TabularEngine,
    events: &RecordBatch,
    bindings: &HyperBindings,
    schema: &SchemaRef,
) -> Result<RecordBatch, HyperframeError> {
    let ids = column(events, &bindings.event_id)?.clone();
    let num_rows = events.num_rows();

    let mut arrays: Vec<ArrayRef> = vec![
        ids.clone(),
        ids,
        repeated(&bindings.event_type, num_rows),
        repeated(&bindings.event_type, num_rows),
    ];
    let names: Vec<&str> = schema
        .fields()
        .iter()
        .skip(4)
        .map(|f| f.name().as_str())
        .collect();
    arrays.extend(engine.select(events, &names)?.columns().iter().cloned());

    let hubs = RecordBatch::try_new(schema.clone(), arrays)?;
    engine.dedup_by(&hubs, &[bindings.node_id.as_str()])
}
