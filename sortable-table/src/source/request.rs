//! Page request parameters.

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::pagination::Window;
use crate::sort::SortState;

/// Extra filter parameters passed through to the remote source.
///
/// The set of recognised filters is closed: a deployment that needs a new
/// filter adds a field here rather than passing free-form parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    /// Lower bound of the date range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    /// Upper bound of the date range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

impl Filters {
    /// No filters.
    pub fn none() -> Self {
        Self::default()
    }

    /// Filter by a date range.
    pub fn date_range(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Returns `true` if no filter is set.
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Query parameters for the set filters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.from {
            pairs.push(("from", iso_timestamp(from)));
        }
        if let Some(to) = self.to {
            pairs.push(("to", iso_timestamp(to)));
        }
        pairs
    }
}

/// A request for one window of rows under a sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Sort order the source must apply.
    pub sort: SortState,
    /// Row range to return.
    pub window: Window,
    /// Pass-through filters.
    pub filters: Filters,
}

impl PageRequest {
    /// Creates a request without filters.
    pub fn new(sort: SortState, window: Window) -> Self {
        Self {
            sort,
            window,
            filters: Filters::none(),
        }
    }

    /// Sets the filters.
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Query parameters in the order the remote source expects them.
    ///
    /// `_sort`, `_order`, `_start`, `_end`, then any filters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("_sort", self.sort.column_id.clone()),
            ("_order", self.sort.direction.as_str().to_string()),
            ("_start", self.window.start.to_string()),
            ("_end", self.window.end().to_string()),
        ];
        pairs.extend(self.filters.query_pairs());
        pairs
    }
}

fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_query_pairs_without_filters() {
        let request = PageRequest::new(SortState::desc("title"), Window::new(30, 30));
        assert_eq!(
            request.query_pairs(),
            vec![
                ("_sort", "title".to_string()),
                ("_order", "desc".to_string()),
                ("_start", "30".to_string()),
                ("_end", "60".to_string()),
            ]
        );
    }

    #[test]
    fn test_date_range_encoding() {
        let from = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 2, 15, 12, 30, 5).unwrap();
        let request = PageRequest::new(SortState::asc("title"), Window::new(0, 25))
            .with_filters(Filters::date_range(from, to));

        let pairs = request.query_pairs();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[4], ("from", "2024-01-15T00:00:00.000Z".to_string()));
        assert_eq!(pairs[5], ("to", "2024-02-15T12:30:05.000Z".to_string()));
    }

    #[test]
    fn test_partial_filters() {
        let to = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let filters = Filters {
            from: None,
            to: Some(to),
        };
        assert!(!filters.is_empty());
        assert_eq!(filters.query_pairs().len(), 1);
        assert!(Filters::none().is_empty());
        assert!(Filters::none().query_pairs().is_empty());
    }
}
