//! Sort engine

use std::cmp::Ordering;
use std::fmt;

use log::trace;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::compare::compare;
use crate::error::Error;
use crate::error::Result;
use crate::model::ColumnSpec;
use crate::model::Row;
use crate::model::find_column;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first.
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Applies the direction to a comparator result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    /// Returns the wire form (`asc` / `desc`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The active sort: which column, in which direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    /// Column being sorted on.
    #[serde(rename = "id")]
    pub column_id: String,
    /// Sort direction.
    #[serde(rename = "order", default)]
    pub direction: SortDirection,
}

impl SortState {
    /// Creates a sort state.
    pub fn new(column_id: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column_id: column_id.into(),
            direction,
        }
    }

    /// Ascending sort on a column.
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, SortDirection::Ascending)
    }

    /// Descending sort on a column.
    pub fn desc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, SortDirection::Descending)
    }

    /// The state after activating the header of `column_id`.
    ///
    /// Activating the already-sorted column flips its direction; any other
    /// column starts ascending.
    pub fn activate(current: Option<&SortState>, column_id: &str) -> SortState {
        match current {
            Some(state) if state.column_id == column_id => {
                Self::new(column_id, state.direction.toggled())
            }
            _ => Self::asc(column_id),
        }
    }
}

/// Returns a reordered copy of `rows`, sorted by `column_id`.
///
/// Sorting a non-sortable column returns an unchanged copy, so callers may
/// pass any known column id. The sort is stable: rows with equal keys keep
/// their relative order in both directions. `rows` itself is never touched.
///
/// # Errors
///
/// - [`Error::UnknownColumn`] if no column has that id.
/// - [`Error::UnsupportedSortType`] if the column is sortable but has no
///   sort type.
pub fn sort_rows(
    rows: &[Row],
    column_id: &str,
    direction: SortDirection,
    columns: &[ColumnSpec],
) -> Result<Vec<Row>> {
    let column = find_column(columns, column_id)?;
    let mut sorted = rows.to_vec();

    if !column.sortable {
        trace!("Column {} is not sortable, keeping order", column_id);
        return Ok(sorted);
    }

    let sort_type = column
        .sort_type
        .ok_or_else(|| Error::UnsupportedSortType(format!("<none> on column {column_id}")))?;

    sorted.sort_by(|a, b| {
        direction.apply(compare(cell(a, column_id), cell(b, column_id), sort_type))
    });

    trace!(
        "Sorted {} rows by {} {}",
        sorted.len(),
        column_id,
        direction
    );
    Ok(sorted)
}

fn cell<'a>(row: &'a Row, column_id: &str) -> &'a Value {
    row.get(column_id).unwrap_or(&Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SortType;

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("name", "Name").sortable(SortType::String),
            ColumnSpec::new("qty", "Quantity"),
            ColumnSpec::new("price", "Price").sortable(SortType::Number),
        ]
    }

    fn row(name: &str, qty: i64, price: f64) -> Row {
        Row::new()
            .with("name", name)
            .with("qty", qty)
            .with("price", price)
    }

    fn names(rows: &[Row]) -> Vec<(String, i64)> {
        rows.iter()
            .map(|r| {
                (
                    r.get("name").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                    r.get("qty").and_then(|v| v.as_i64()).unwrap_or_default(),
                )
            })
            .collect()
    }

    #[test]
    fn test_stable_ascending_sort() {
        let rows = vec![row("b", 1, 0.0), row("a", 2, 0.0), row("a", 3, 0.0)];
        let sorted = sort_rows(&rows, "name", SortDirection::Ascending, &columns()).unwrap();
        assert_eq!(
            names(&sorted),
            vec![("a".into(), 2), ("a".into(), 3), ("b".into(), 1)]
        );
        // Input unchanged.
        assert_eq!(names(&rows)[0], ("b".into(), 1));
    }

    #[test]
    fn test_descending_keeps_equal_keys_in_order() {
        let rows = vec![row("a", 1, 0.0), row("b", 2, 0.0), row("a", 3, 0.0)];
        let sorted = sort_rows(&rows, "name", SortDirection::Descending, &columns()).unwrap();
        assert_eq!(
            names(&sorted),
            vec![("b".into(), 2), ("a".into(), 1), ("a".into(), 3)]
        );
    }

    #[test]
    fn test_number_sort() {
        let rows = vec![row("x", 1, 10.0), row("y", 2, 9.5), row("z", 3, 100.0)];
        let sorted = sort_rows(&rows, "price", SortDirection::Ascending, &columns()).unwrap();
        assert_eq!(
            names(&sorted),
            vec![("y".into(), 2), ("x".into(), 1), ("z".into(), 3)]
        );
    }

    #[test]
    fn test_non_sortable_column_is_noop_copy() {
        let rows = vec![row("b", 1, 0.0), row("a", 2, 0.0)];
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let sorted = sort_rows(&rows, "qty", direction, &columns()).unwrap();
            assert_eq!(sorted, rows);
            assert_ne!(sorted.as_ptr(), rows.as_ptr());
        }
    }

    #[test]
    fn test_unknown_column() {
        let rows = vec![row("a", 1, 0.0)];
        assert!(matches!(
            sort_rows(&rows, "missing", SortDirection::Ascending, &columns()),
            Err(Error::UnknownColumn(id)) if id == "missing"
        ));
    }

    #[test]
    fn test_sortable_column_without_type() {
        let mut columns = columns();
        columns[1].sortable = true;
        let rows = vec![row("a", 1, 0.0)];
        assert!(matches!(
            sort_rows(&rows, "qty", SortDirection::Ascending, &columns),
            Err(Error::UnsupportedSortType(_))
        ));
    }

    #[test]
    fn test_activate_toggles_same_column() {
        let current = SortState::asc("name");
        assert_eq!(
            SortState::activate(Some(&current), "name"),
            SortState::desc("name")
        );
        assert_eq!(
            SortState::activate(Some(&SortState::desc("name")), "name"),
            SortState::asc("name")
        );
        assert_eq!(
            SortState::activate(Some(&SortState::desc("name")), "price"),
            SortState::asc("price")
        );
        assert_eq!(SortState::activate(None, "price"), SortState::asc("price"));
    }

    #[test]
    fn test_sort_state_serde() {
        let state: SortState = serde_json::from_str(r#"{"id": "title", "order": "desc"}"#).unwrap();
        assert_eq!(state, SortState::desc("title"));
        let state: SortState = serde_json::from_str(r#"{"id": "title"}"#).unwrap();
        assert_eq!(state.direction, SortDirection::Ascending);
    }
}
