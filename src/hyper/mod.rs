// In: src/hyper/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Hypergraph Builder
// ====================================================================================
//
// `hypergraph` converts one record table into a graph in four steps, each of which
// only talks to the `TabularEngine` chosen for the call:
//
//   1. [bindings]  HyperOpts -> HyperBindings   (defaults, category lookup, column checks)
//   2. [encoder]   table     -> events          (event ids, optional drop_null_rows)
//   3. [encoder]   events    -> entities        (one node per distinct entity id)
//   4. [shaping]   events    -> edges           (hyperedge or direct shape)
//
// Hyperedge mode adds one hub node per event; direct mode has none and reports
// an empty events table. No step mutates the output of an earlier one.
//
// ====================================================================================

pub mod bindings;
mod encoder;
mod shaping;

pub use bindings::HyperBindings;
pub use shaping::Adjacency;

use arrow::record_batch::RecordBatch;

use crate::config::HyperConfig;
use crate::engine::{resolve_engine, TabularEngine};
use crate::error::HyperframeError;
use crate::graph::Graph;

/// Everything one `hypergraph` call produces.
#[derive(Debug, Clone)]
pub struct HypergraphResult {
    /// Distinct attribute entities.
    pub entities: RecordBatch,
    /// The input rows with event ids; empty in direct mode.
    pub events: RecordBatch,
    pub edges: RecordBatch,
    /// Entities, plus one hub per event in hyperedge mode.
    pub nodes: RecordBatch,
    /// `g` with `nodes`, `edges` and their bindings attached.
    pub graph: Graph,
}

/// Builds a hypergraph using the engine selected by `config.engine`.
///
/// # Args
/// * `g`: base graph whose encodings and settings are carried over.
/// * `table`: the record table; never modified.
/// * `entity_types`: columns that become entities; all columns when `None`.
/// * `config`: shaping, null policy and role-name overrides.
pub fn hypergraph(
    g: &Graph,
    table: &RecordBatch,
    entity_types: Option<&[String]>,
    config: &HyperConfig,
) -> Result<HypergraphResult, HyperframeError> {
    config.validate()?;
    let engine = resolve_engine(&config.engine);
    hypergraph_with_engine(engine.as_ref(), g, table, entity_types, config)
}

/// Same as [`hypergraph`] with a caller-supplied engine; `config.engine` is ignored.
pub fn hypergraph_with_engine(
    engine: &dyn TabularEngine,
    g: &Graph,
    table: &RecordBatch,
    entity_types: Option<&[String]>,
    config: &HyperConfig,
) -> Result<HypergraphResult, HyperframeError> {
    // 1. Resolve and check every role before touching data.
    config.validate()?;
    let bindings = HyperBindings::resolve(&config.opts)?;
    bindings.check_columns(&table.schema())?;
    let columns = encoder::entity_columns(&table.schema(), entity_types, &bindings)?;

    log::debug!(
        "hypergraph: engine={:?} direct={} columns={:?}",
        engine.kind(),
        config.direct,
        columns
    );

    // 2. Events.
    let mut events = encoder::create_events(engine, table, &bindings)?;
    if config.drop_null_rows {
        events = encoder::drop_null_rows(engine, &events, &columns)?;
    }

    // 3. Entities.
    let node_schema = encoder::node_schema(&events.schema(), &bindings);
    let entities = encoder::format_entities(
        engine,
        &events,
        &columns,
        &bindings,
        config.drop_na,
        &node_schema,
    )?;

    // 4. Shape.
    let result = if config.direct {
        let shape = shaping::adjacency(&columns, &bindings);
        let edges = shaping::direct_edges(
            engine,
            &events,
            &shape,
            &bindings,
            config.drop_na,
            config.drop_edge_attrs,
        )?;
        let graph = g
            .clone()
            .with_nodes(entities.clone())
            .with_edges(edges.clone())
            .bind(&bindings.source, &bindings.destination, &bindings.node_id);

        HypergraphResult {
            nodes: entities.clone(),
            events: RecordBatch::new_empty(events.schema()),
            entities,
            edges,
            graph,
        }
    } else {
        let edges = shaping::hyperedges(
            engine,
            &events,
            &columns,
            &bindings,
            config.drop_na,
            config.drop_edge_attrs,
        )?;
        let event_nodes = encoder::format_event_nodes(engine, &events, &bindings, &node_schema)?;
        let nodes = engine.concat(&node_schema, &[entities.clone(), event_nodes])?;
        let graph = g
            .clone()
            .with_nodes(nodes.clone())
            .with_edges(edges.clone())
            .bind(&bindings.attrib_id, &bindings.event_id, &bindings.node_id);

        HypergraphResult {
            entities,
            events,
            edges,
            nodes,
            graph,
        }
    };

    if config.verbose {
        log::info!("# links: {}", result.edges.num_rows());
        log::info!("# events: {}", result.events.num_rows());
        log::info!("# attrib entities: {}", result.entities.num_rows());
    }
    log_metric!(
        "event" = "hypergraph",
        "direct" = config.direct,
        "entities" = result.entities.num_rows(),
        "events" = result.events.num_rows(),
        "edges" = result.edges.num_rows(),
        "nodes" = result.nodes.num_rows()
    );

    Ok(result)
}
