//! Synthetic entity identifiers.
//!
//! Every attribute node in a hypergraph is keyed by `<prefix><delim><value>`,
//! where the prefix is the owning category when the column was declared part
//! of one, and the column name otherwise. All code that builds a node id or an
//! edge endpoint goes through this module, so two cells share an id exactly
//! when they share a prefix and a stringified value.

use arrow::array::StringArray;

/// The naming role that prefixes an entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityPrefix<'a> {
    /// The cell's own column name; used for uncategorised columns.
    Column(&'a str),
    /// The name of the category the column was declared in.
    Category(&'a str),
}

impl<'a> EntityPrefix<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            EntityPrefix::Column(name) | EntityPrefix::Category(name) => name,
        }
    }
}

/// A fully resolved entity identifier, before rendering with a delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    prefix: String,
    value: String,
}

impl EntityKey {
    pub fn new(prefix: EntityPrefix<'_>, value: impl Into<String>) -> Self {
        Self {
            prefix: prefix.name().to_string(),
            value: value.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Renders the identifier as it appears in node and edge tables.
    pub fn render(&self, delim: &str) -> String {
        let mut out = String::with_capacity(self.prefix.len() + delim.len() + self.value.len());
        out.push_str(&self.prefix);
        out.push_str(delim);
        out.push_str(&self.value);
        out
    }
}

/// Renders identifiers for a whole stringified column.
///
/// Null slots stay null; callers substitute the null placeholder before this
/// point when null cells are meant to produce entities.
pub fn render_column(prefix: EntityPrefix<'_>, values: &StringArray, delim: &str) -> StringArray {
    values
        .iter()
        .map(|v| v.map(|value| EntityKey::new(prefix, value).render(delim)))
        .collect()
}

/// Renders `<left><delim><right>` type labels such as direct-mode edge types.
pub fn join_names(left: &str, right: &str, delim: &str) -> String {
    format!("{left}{delim}{right}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;

    #[test]
    fn test_category_prefix_collapses_columns() {
        let from_aa = EntityKey::new(EntityPrefix::Category("n"), "1");
        let from_cc = EntityKey::new(EntityPrefix::Category("n"), "1");
        assert_eq!(from_aa, from_cc);
        assert_eq!(from_aa.render("::"), "n::1");
    }

    #[test]
    fn test_column_prefix_keeps_columns_apart() {
        let a = EntityKey::new(EntityPrefix::Column("aa"), "1");
        let c = EntityKey::new(EntityPrefix::Column("cc"), "1");
        assert_ne!(a, c);
    }

    #[test]
    fn test_render_column_preserves_nulls_and_unicode() {
        let values = StringArray::from(vec![Some("😋"), None, Some("æski ēˈmōjē")]);
        let keys = render_column(EntityPrefix::Column("🙈"), &values, "::");
        assert_eq!(keys.value(0), "🙈::😋");
        assert!(keys.is_null(1));
        assert_eq!(keys.value(2), "🙈::æski ēˈmōjē");
    }
}
