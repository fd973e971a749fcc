//! Render sinks.
//!
//! The table never builds markup itself. It pushes the ordered data set, the
//! active sort marker and the loading flag into a [`RenderSink`], always
//! while holding its state lock, so a sink never sees rows and sort marker
//! from two different moments.

mod html;

use std::sync::Arc;
use std::sync::Mutex;

pub use html::*;

use crate::model::Row;
use crate::sort::SortState;

/// Receiver for table view updates.
pub trait RenderSink: Send + Sync {
    /// Replace the whole body with `rows`.
    fn replace_rows(&mut self, rows: &[Row]);

    /// Add `rows` after the existing body rows.
    fn append_rows(&mut self, rows: &[Row]);

    /// Mark `sort.column_id` as the sorted column, clearing any other marker.
    fn mark_sorted(&mut self, sort: &SortState);

    /// Show or hide the loading indicator.
    fn set_loading(&mut self, loading: bool);
}

/// Sink that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn replace_rows(&mut self, _rows: &[Row]) {}

    fn append_rows(&mut self, _rows: &[Row]) {}

    fn mark_sorted(&mut self, _sort: &SortState) {}

    fn set_loading(&mut self, _loading: bool) {}
}

/// Shared sinks forward to the inner sink, so the caller can keep a handle
/// to read rendered output.
impl<S: RenderSink> RenderSink for Arc<Mutex<S>> {
    fn replace_rows(&mut self, rows: &[Row]) {
        if let Ok(mut guard) = self.lock() {
            guard.replace_rows(rows);
        }
    }

    fn append_rows(&mut self, rows: &[Row]) {
        if let Ok(mut guard) = self.lock() {
            guard.append_rows(rows);
        }
    }

    fn mark_sorted(&mut self, sort: &SortState) {
        if let Ok(mut guard) = self.lock() {
            guard.mark_sorted(sort);
        }
    }

    fn set_loading(&mut self, loading: bool) {
        if let Ok(mut guard) = self.lock() {
            guard.set_loading(loading);
        }
    }
}
