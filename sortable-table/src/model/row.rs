//! Row records

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Field holding the row identity used for navigation links.
pub const ID_FIELD: &str = "id";

/// A single row as received from the remote source.
///
/// Rows map column ids to JSON values. They are immutable once built and
/// cheap to clone: clones share the same field map, so reordering a data
/// set never copies field values.
///
/// # Example
///
/// ```
/// use sortable_table::model::Row;
///
/// let row = Row::new().with("id", "soska-kolco").with("price", 53);
/// assert_eq!(row.id().as_deref(), Some("soska-kolco"));
/// assert_eq!(row.get("price").and_then(|v| v.as_i64()), Some(53));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Row {
    fields: Arc<Map<String, Value>>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field while building the row.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.fields).insert(field.into(), value.into());
        self
    }

    /// Returns a field value, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the row identity as text.
    ///
    /// String ids are returned as-is, numeric ids are formatted.
    pub fn id(&self) -> Option<String> {
        match self.fields.get(ID_FIELD)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Returns all fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns `true` if both rows share the same field storage.
    pub fn ptr_eq(&self, other: &Row) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }
}

impl From<Map<String, Value>> for Row {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            fields: Arc::new(fields),
        }
    }
}

impl From<Row> for Map<String, Value> {
    fn from(row: Row) -> Self {
        Arc::unwrap_or_clone(row.fields)
    }
}
