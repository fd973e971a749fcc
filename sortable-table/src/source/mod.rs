//! Remote row sources.
//!
//! A [`RowSource`] answers one [`PageRequest`] with an ordered list of rows.
//! An empty list means there is nothing past the requested window.

mod http;
mod memory;
mod request;

use async_trait::async_trait;

pub use http::*;
pub use memory::*;
pub use request::*;

use crate::error::Result;
use crate::model::Row;

/// Trait for fetching pages of rows.
///
/// Implementations must not retry on their own; failures are returned to
/// the table, which leaves its data untouched and lets the caller decide.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use sortable_table::source::{PageRequest, RowSource};
///
/// struct Fixed(Vec<Row>);
///
/// #[async_trait]
/// impl RowSource for Fixed {
///     async fn fetch(&self, request: &PageRequest) -> Result<Vec<Row>> {
///         let start = request.window.start.min(self.0.len());
///         let end = request.window.end().min(self.0.len());
///         Ok(self.0[start..end].to_vec())
///     }
/// }
/// ```
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetches the rows of one window, sorted and filtered as requested.
    async fn fetch(&self, request: &PageRequest) -> Result<Vec<Row>>;
}
