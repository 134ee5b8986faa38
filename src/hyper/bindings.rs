// In: src/hyper/bindings.rs

//! Resolved column-role names for one hypergraph call.
//!
//! `HyperOpts` holds optional overrides exactly as the caller wrote them;
//! `HyperBindings` fills in the defaults and builds the column -> category
//! reverse lookup used by every entity key.

use std::collections::BTreeMap;

use arrow::datatypes::Schema;
use hashbrown::HashMap;

use crate::config::HyperOpts;
use crate::error::HyperframeError;
use crate::types::entity_key::EntityPrefix;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperBindings {
    pub title: String,
    pub delim: String,
    pub node_id: String,
    pub attrib_id: String,
    pub event_id: String,
    pub event_type: String,
    pub source: String,
    pub destination: String,
    pub category: String,
    pub node_type: String,
    pub edge_type: String,
    pub null_val: String,
    pub skip: Vec<String>,
    pub categories: BTreeMap<String, Vec<String>>,
    pub edges: Option<BTreeMap<String, Vec<String>>>,
    category_of: HashMap<String, String>,
}

impl Default for HyperBindings {
    fn default() -> Self {
        Self {
            title: "nodeTitle".to_string(),
            delim: "::".to_string(),
            node_id: "nodeID".to_string(),
            attrib_id: "attribID".to_string(),
            event_id: "EventID".to_string(),
            event_type: "event".to_string(),
            source: "src".to_string(),
            destination: "dst".to_string(),
            category: "category".to_string(),
            node_type: "type".to_string(),
            edge_type: "edgeType".to_string(),
            null_val: "null".to_string(),
            skip: Vec::new(),
            categories: BTreeMap::new(),
            edges: None,
            category_of: HashMap::new(),
        }
    }
}

impl HyperBindings {
    /// Applies `opts` over the defaults.
    ///
    /// Fails when a column is declared in more than one category.
    pub fn resolve(opts: &HyperOpts) -> Result<Self, HyperframeError> {
        let defaults = Self::default();
        let pick = |value: &Option<String>, default: String| value.clone().unwrap_or(default);

        let mut category_of = HashMap::new();
        for (category, members) in &opts.categories {
            for member in members {
                if let Some(previous) = category_of.insert(member.clone(), category.clone()) {
                    if previous != *category {
                        return Err(HyperframeError::config(format!(
                            "Column '{}' is declared in both categories '{}' and '{}'",
                            member, previous, category
                        )));
                    }
                }
            }
        }

        Ok(Self {
            title: pick(&opts.title, defaults.title),
            delim: pick(&opts.delim, defaults.delim),
            node_id: pick(&opts.node_id, defaults.node_id),
            attrib_id: pick(&opts.attrib_id, defaults.attrib_id),
            event_id: pick(&opts.event_id, defaults.event_id),
            event_type: pick(&opts.event_type, defaults.event_type),
            source: pick(&opts.source, defaults.source),
            destination: pick(&opts.destination, defaults.destination),
            category: pick(&opts.category, defaults.category),
            node_type: pick(&opts.node_type, defaults.node_type),
            edge_type: pick(&opts.edge_type, defaults.edge_type),
            null_val: pick(&opts.null_val, defaults.null_val),
            skip: opts.skip.clone(),
            categories: opts.categories.clone(),
            edges: opts.edges.clone(),
            category_of,
        })
    }

    /// The category `column` was declared in, if any.
    pub fn category_of(&self, column: &str) -> Option<&str> {
        self.category_of.get(column).map(String::as_str)
    }

    /// The prefix of every entity key derived from `column`.
    pub fn prefix_for<'a>(&'a self, column: &'a str) -> EntityPrefix<'a> {
        match self.category_of(column) {
            Some(category) => EntityPrefix::Category(category),
            None => EntityPrefix::Column(column),
        }
    }

    /// Checks that every column named by a role exists in `schema`.
    pub fn check_columns(&self, schema: &Schema) -> Result<(), HyperframeError> {
        let exists = |name: &str| -> Result<(), HyperframeError> {
            schema
                .index_of(name)
                .map(|_| ())
                .map_err(|_| HyperframeError::MissingColumn(name.to_string()))
        };

        for name in &self.skip {
            exists(name)?;
        }
        for members in self.categories.values() {
            for name in members {
                exists(name)?;
            }
        }
        if let Some(edges) = &self.edges {
            for (source, destinations) in edges {
                exists(source)?;
                for name in destinations {
                    exists(name)?;
                }
            }
        }
        Ok(())
    }
}
