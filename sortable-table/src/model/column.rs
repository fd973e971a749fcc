//! Column configuration

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::error::Error;
use crate::error::Result;

/// Renders a single cell value to markup.
pub type CellTemplate = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// How the values of a column are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortType {
    /// Locale-aware text ordering.
    String,
    /// Numeric ordering.
    Number,
}

impl SortType {
    /// Returns the tag used in column configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
        }
    }
}

impl FromStr for SortType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            other => Err(Error::UnsupportedSortType(other.to_string())),
        }
    }
}

impl TryFrom<String> for SortType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SortType> for String {
    fn from(value: SortType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column configuration.
///
/// Columns are supplied once when the table is built and never change
/// afterwards. They decide the header title, whether a header activation
/// sorts, which comparator is used, and optionally how a cell is rendered.
///
/// # Examples
///
/// ```
/// use sortable_table::model::{ColumnSpec, SortType};
///
/// let columns = vec![
///     ColumnSpec::new("title", "Name").sortable(SortType::String),
///     ColumnSpec::new("quantity", "Quantity").sortable(SortType::Number),
///     ColumnSpec::new("images", "Image"),
/// ];
/// assert!(columns[0].sortable);
/// assert!(!columns[2].sortable);
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    /// Unique identifier, also the row field the column reads.
    pub id: String,
    /// Header text.
    pub title: String,
    /// Whether activating the header sorts the table.
    #[serde(default)]
    pub sortable: bool,
    /// Comparator used when sorting by this column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_type: Option<SortType>,
    /// Custom cell renderer.
    #[serde(skip)]
    pub template: Option<CellTemplate>,
}

impl ColumnSpec {
    /// Create a non-sortable column.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            sortable: false,
            sort_type: None,
            template: None,
        }
    }

    /// Make the column sortable with the given comparator.
    pub fn sortable(mut self, sort_type: SortType) -> Self {
        self.sortable = true;
        self.sort_type = Some(sort_type);
        self
    }

    /// Set a custom cell renderer.
    pub fn template<F>(mut self, template: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.template = Some(Arc::new(template));
        self
    }
}

impl fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("sortable", &self.sortable)
            .field("sort_type", &self.sort_type)
            .field("template", &self.template.is_some())
            .finish()
    }
}

/// Find a column by id.
pub fn find_column<'a>(columns: &'a [ColumnSpec], id: &str) -> Result<&'a ColumnSpec> {
    columns
        .iter()
        .find(|column| column.id == id)
        .ok_or_else(|| Error::UnknownColumn(id.to_string()))
}

/// Check that column ids are unique.
pub fn validate_columns(columns: &[ColumnSpec]) -> Result<()> {
    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        if !seen.insert(column.id.as_str()) {
            return Err(Error::DuplicateColumn(column.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_header_config() {
        let json = r#"[
            {"id": "title", "title": "Name", "sortable": true, "sortType": "string"},
            {"id": "quantity", "title": "Quantity", "sortable": true, "sortType": "number"},
            {"id": "images", "title": "Image", "sortable": false}
        ]"#;
        let columns: Vec<ColumnSpec> = serde_json::from_str(json).unwrap();

        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].sort_type, Some(SortType::String));
        assert_eq!(columns[1].sort_type, Some(SortType::Number));
        assert!(!columns[2].sortable);
        assert!(columns[2].sort_type.is_none());
    }

    #[test]
    fn test_unknown_sort_type_rejected() {
        let json = r#"{"id": "createdAt", "title": "Created", "sortable": true, "sortType": "date"}"#;
        let err = serde_json::from_str::<ColumnSpec>(json).unwrap_err();
        assert!(err.to_string().contains("Unsupported sort type: date"));

        assert!(matches!(
            "custom".parse::<SortType>(),
            Err(Error::UnsupportedSortType(tag)) if tag == "custom"
        ));
    }

    #[test]
    fn test_serialize_round_trip_keeps_tag() {
        let column = ColumnSpec::new("price", "Price").sortable(SortType::Number);
        let json = serde_json::to_string(&column).unwrap();
        assert!(json.contains("\"sortType\":\"number\""));
        assert!(!json.contains("template"));
    }

    #[test]
    fn test_find_column() {
        let columns = vec![ColumnSpec::new("a", "A"), ColumnSpec::new("b", "B")];
        assert_eq!(find_column(&columns, "b").unwrap().title, "B");
        assert!(matches!(
            find_column(&columns, "c"),
            Err(Error::UnknownColumn(id)) if id == "c"
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let columns = vec![
            ColumnSpec::new("a", "A"),
            ColumnSpec::new("b", "B"),
            ColumnSpec::new("a", "Again"),
        ];
        assert!(matches!(
            validate_columns(&columns),
            Err(Error::DuplicateColumn(id)) if id == "a"
        ));
        assert!(validate_columns(&columns[..2]).is_ok());
    }

    #[test]
    fn test_template_renders_value() {
        let column = ColumnSpec::new("images", "Image")
            .template(|value| format!("<img src=\"{}\">", value.as_str().unwrap_or_default()));
        let render = column.template.as_ref().unwrap();
        assert_eq!(render(&Value::from("a.png")), "<img src=\"a.png\">");
        assert!(format!("{column:?}").contains("template: true"));
    }
}
