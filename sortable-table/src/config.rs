//! Table configuration

use serde::Deserialize;
use serde::Serialize;

use crate::scroll::DEFAULT_SCROLL_THRESHOLD;
use crate::sort::SortState;
use crate::source::Filters;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Where header activations sort the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Re-sort the already loaded rows in memory.
    Client,
    /// Re-query the first page from the source under the new order.
    #[default]
    Server,
}

/// Configuration for a [`SortableTable`](crate::SortableTable).
///
/// Fixed at construction.
///
/// # Example
///
/// ```
/// use sortable_table::{SortMode, TableConfig};
/// use sortable_table::sort::SortState;
///
/// let config = TableConfig::default()
///     .with_page_size(25)
///     .with_sort_mode(SortMode::Client)
///     .with_initial_sort(SortState::desc("sales"));
/// assert_eq!(config.page_size, 25);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows requested per page.
    ///
    /// Default: 30
    pub page_size: usize,

    /// Index of the first row of the first page.
    ///
    /// Default: 0
    pub start: usize,

    /// Sorting strategy for header activations.
    ///
    /// Default: [`SortMode::Server`]
    pub sort_mode: SortMode,

    /// Sort applied to the first page. `None` picks the first sortable
    /// column, ascending.
    pub initial_sort: Option<SortState>,

    /// Distance in pixels from the viewport bottom that triggers the next
    /// page.
    ///
    /// Default: 300
    pub scroll_threshold: f64,

    /// Filters passed to the source with every request.
    pub filters: Filters,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            start: 0,
            sort_mode: SortMode::default(),
            initial_sort: None,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            filters: Filters::default(),
        }
    }
}

impl TableConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the first row index.
    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Sets the sort mode.
    pub fn with_sort_mode(mut self, sort_mode: SortMode) -> Self {
        self.sort_mode = sort_mode;
        self
    }

    /// Sets the initial sort.
    pub fn with_initial_sort(mut self, sort: SortState) -> Self {
        self.initial_sort = Some(sort);
        self
    }

    /// Sets the scroll threshold in pixels.
    pub fn with_scroll_threshold(mut self, threshold: f64) -> Self {
        self.scroll_threshold = threshold;
        self
    }

    /// Sets the filters.
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortDirection;

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.page_size, 30);
        assert_eq!(config.start, 0);
        assert_eq!(config.sort_mode, SortMode::Server);
        assert!(config.initial_sort.is_none());
        assert_eq!(config.scroll_threshold, 300.0);
        assert!(config.filters.is_empty());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: TableConfig = serde_json::from_str(
            r#"{"page_size": 25, "sort_mode": "client", "initial_sort": {"id": "title", "order": "desc"}}"#,
        )
        .unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.sort_mode, SortMode::Client);
        let sort = config.initial_sort.unwrap();
        assert_eq!(sort.column_id, "title");
        assert_eq!(sort.direction, SortDirection::Descending);
        assert_eq!(config.scroll_threshold, 300.0);
    }
}
