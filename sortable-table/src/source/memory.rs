//! In-memory row source

use std::sync::Mutex;

use async_trait::async_trait;

use super::PageRequest;
use super::RowSource;
use crate::error::Result;
use crate::model::ColumnSpec;
use crate::model::Row;
use crate::sort::sort_rows;

/// Row source serving windows from rows held in memory.
///
/// Rows are sorted per request with the same sort engine the table uses on
/// the client, then sliced to the requested window. Filters are ignored.
/// Every request is recorded, which makes the source handy for driving a
/// table without a backend.
///
/// # Example
///
/// ```
/// use sortable_table::model::{ColumnSpec, Row, SortType};
/// use sortable_table::source::MemoryRowSource;
///
/// let columns = vec![ColumnSpec::new("title", "Name").sortable(SortType::String)];
/// let rows = vec![Row::new().with("title", "b"), Row::new().with("title", "a")];
/// let source = MemoryRowSource::new(columns, rows);
/// assert_eq!(source.request_count(), 0);
/// ```
#[derive(Debug)]
pub struct MemoryRowSource {
    columns: Vec<ColumnSpec>,
    rows: Vec<Row>,
    requests: Mutex<Vec<PageRequest>>,
}

impl MemoryRowSource {
    /// Creates a source over the given rows.
    pub fn new(columns: Vec<ColumnSpec>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns the total number of rows behind the source.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the source holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns every request received so far, oldest first.
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests
            .lock()
            .map(|g| g.clone())
            .unwrap_or_default()
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|g| g.len()).unwrap_or(0)
    }
}

#[async_trait]
impl RowSource for MemoryRowSource {
    async fn fetch(&self, request: &PageRequest) -> Result<Vec<Row>> {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request.clone());
        }

        let sorted = sort_rows(
            &self.rows,
            &request.sort.column_id,
            request.sort.direction,
            &self.columns,
        )?;

        let start = request.window.start.min(sorted.len());
        let end = request.window.end().min(sorted.len());
        Ok(sorted[start..end].to_vec())
    }
}
