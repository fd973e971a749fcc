//! Pagination state: the request window, the load bracket and the data set.
//!
//! [`Pagination`] is the synchronous half of the fetch controller. The table
//! drives it around each remote call:
//!
//! 1. [`Pagination::begin`] flips the state to [`LoadState::Loading`] before
//!    the request leaves, returning the state to restore on failure.
//! 2. [`Pagination::finish`] merges a successful page, or marks the source
//!    exhausted when the page is empty.
//! 3. [`Pagination::abort`] puts the previous state back after a failure,
//!    leaving rows and window untouched.

use std::fmt;
use std::mem;

use log::debug;

use crate::model::Row;

/// A half-open row range `[start, start + size)` to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    /// First row index.
    pub start: usize,
    /// Number of rows.
    pub size: usize,
}

impl Window {
    /// Creates a window.
    pub fn new(start: usize, size: usize) -> Self {
        Self { start, size }
    }

    /// The first page for a page size.
    pub fn first(size: usize) -> Self {
        Self::new(0, size)
    }

    /// One past the last row index.
    pub fn end(&self) -> usize {
        self.start + self.size
    }

    /// The window right after this one.
    pub fn next(&self) -> Self {
        Self::new(self.end(), self.size)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// Whether the table may request more rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    /// No request in flight.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The source returned an empty page; no further pages are requested.
    Exhausted,
}

/// What a finished load did to the data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Rows were appended; holds the number of new rows.
    Appended(usize),
    /// The data set was replaced; holds the new row count.
    Replaced(usize),
    /// The page was empty. The data set is unchanged.
    Exhausted,
    /// The table was torn down while the request was in flight.
    Discarded,
}

/// Window, load state and rows of one table.
#[derive(Debug, Clone)]
pub struct Pagination {
    window: Window,
    page_size: usize,
    load_state: LoadState,
    rows: Vec<Row>,
}

impl Pagination {
    /// Creates an empty data set whose next request is `window`.
    pub fn new(window: Window) -> Self {
        Self {
            window,
            page_size: window.size,
            load_state: LoadState::Idle,
            rows: Vec::new(),
        }
    }

    /// The next window to request.
    pub fn window(&self) -> Window {
        self.window
    }

    /// The page size fixed at construction.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The first page under the construction page size.
    pub fn first_window(&self) -> Window {
        Window::first(self.page_size)
    }

    /// Current load state.
    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Returns `true` while a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    /// Returns `true` once an empty page was received.
    pub fn is_exhausted(&self) -> bool {
        self.load_state == LoadState::Exhausted
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Enter the loading state. Returns the state to restore on failure.
    ///
    /// Never returns [`LoadState::Loading`]: the page already in flight
    /// settles the state itself, so a failure here falls back to idle.
    pub fn begin(&mut self) -> LoadState {
        match mem::replace(&mut self.load_state, LoadState::Loading) {
            LoadState::Loading => LoadState::Idle,
            previous => previous,
        }
    }

    /// Restore the state saved by [`begin`](Self::begin) after a failed request.
    pub fn abort(&mut self, previous: LoadState) {
        self.load_state = previous;
    }

    /// Merge the rows returned for `window`.
    ///
    /// An empty page marks the source exhausted and leaves rows and window
    /// alone. Otherwise the rows are appended or replace the data set, and
    /// the next request continues after `window`.
    pub fn finish(&mut self, window: Window, page: Vec<Row>, append: bool) -> LoadOutcome {
        if page.is_empty() {
            debug!("Empty page at {}, source exhausted", window);
            self.load_state = LoadState::Exhausted;
            return LoadOutcome::Exhausted;
        }

        self.load_state = LoadState::Idle;
        self.window = window.next();

        let count = page.len();
        if append {
            self.rows.extend(page);
            LoadOutcome::Appended(count)
        } else {
            self.rows = page;
            LoadOutcome::Replaced(count)
        }
    }

    /// Replace the rows with a reordering of the same data set.
    pub fn reorder(&mut self, rows: Vec<Row>) {
        debug_assert_eq!(rows.len(), self.rows.len());
        self.rows = rows;
    }

    /// Drop all rows. Used on teardown.
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(ids: &[&str]) -> Vec<Row> {
        ids.iter().map(|id| Row::new().with("id", *id)).collect()
    }

    fn ids(pagination: &Pagination) -> Vec<String> {
        pagination.rows().iter().filter_map(Row::id).collect()
    }

    #[test]
    fn test_window_arithmetic() {
        let window = Window::first(30);
        assert_eq!(window.end(), 30);
        assert_eq!(window.next(), Window::new(30, 30));
        assert_eq!(window.next().next().end(), 90);
        assert_eq!(window.to_string(), "[0, 30)");
    }

    #[test]
    fn test_begin_sets_loading() {
        let mut pagination = Pagination::new(Window::first(2));
        assert_eq!(pagination.begin(), LoadState::Idle);
        assert!(pagination.is_loading());
    }

    #[test]
    fn test_append_then_replace() {
        let mut pagination = Pagination::new(Window::first(2));

        pagination.begin();
        let outcome = pagination.finish(Window::first(2), page(&["a", "b"]), true);
        assert_eq!(outcome, LoadOutcome::Appended(2));
        assert_eq!(pagination.window(), Window::new(2, 2));
        assert_eq!(pagination.load_state(), LoadState::Idle);

        pagination.begin();
        pagination.finish(Window::new(2, 2), page(&["c"]), true);
        assert_eq!(ids(&pagination), vec!["a", "b", "c"]);
        assert_eq!(pagination.window(), Window::new(4, 2));

        pagination.begin();
        let outcome = pagination.finish(Window::first(2), page(&["z", "y"]), false);
        assert_eq!(outcome, LoadOutcome::Replaced(2));
        assert_eq!(ids(&pagination), vec!["z", "y"]);
        assert_eq!(pagination.window(), Window::new(2, 2));
    }

    #[test]
    fn test_empty_page_exhausts_without_touching_rows() {
        let mut pagination = Pagination::new(Window::first(2));
        pagination.begin();
        pagination.finish(Window::first(2), page(&["a", "b"]), true);

        pagination.begin();
        let outcome = pagination.finish(Window::new(2, 2), Vec::new(), true);
        assert_eq!(outcome, LoadOutcome::Exhausted);
        assert!(pagination.is_exhausted());
        assert_eq!(ids(&pagination), vec!["a", "b"]);
        assert_eq!(pagination.window(), Window::new(2, 2));
    }

    #[test]
    fn test_abort_restores_previous_state() {
        let mut pagination = Pagination::new(Window::first(2));
        pagination.begin();
        pagination.finish(Window::first(2), page(&["a"]), true);

        let previous = pagination.begin();
        pagination.abort(previous);
        assert_eq!(pagination.load_state(), LoadState::Idle);
        assert_eq!(ids(&pagination), vec!["a"]);
        assert_eq!(pagination.window(), Window::new(2, 2));

        pagination.begin();
        pagination.finish(Window::new(2, 2), Vec::new(), true);
        let previous = pagination.begin();
        assert_eq!(previous, LoadState::Exhausted);
        pagination.abort(previous);
        assert!(pagination.is_exhausted());
    }

    #[test]
    fn test_overlapping_begin_never_restores_loading() {
        let mut pagination = Pagination::new(Window::first(2));
        pagination.begin();
        let second = pagination.begin();
        assert_eq!(second, LoadState::Idle);

        pagination.finish(Window::first(2), page(&["a"]), true);
        pagination.abort(second);
        assert_eq!(pagination.load_state(), LoadState::Idle);
    }

    #[test]
    fn test_first_window_uses_construction_page_size() {
        let pagination = Pagination::new(Window::new(60, 30));
        assert_eq!(pagination.first_window(), Window::first(30));
        assert_eq!(pagination.page_size(), 30);
    }
}
