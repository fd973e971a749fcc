//! Error types

mod api;

pub use api::*;

/// Errors returned by the table engine.
///
/// Configuration mistakes (an unknown column id, a sortable column without a
/// usable sort type) are reported as soon as they are detected and are not
/// meant to be retried. Transport failures are wrapped in [`ApiError`] and
/// leave the table in its last successfully merged state.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A column id that is not part of the table's column set.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// A sort type tag that the comparator library does not understand,
    /// or a sortable column without any sort type.
    #[error("Unsupported sort type: {0}")]
    UnsupportedSortType(String),

    /// The column set has no sortable column to use as the default sort.
    #[error("No sortable column to sort by")]
    NoSortableColumn,

    /// A column that is not sortable was named as the sort column.
    #[error("Column is not sortable: {0}")]
    ColumnNotSortable(String),

    /// Two columns share the same id.
    #[error("Duplicate column id: {0}")]
    DuplicateColumn(String),

    /// Page size must be greater than zero.
    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),

    /// Fetching a page from the remote source failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    /// Returns `true` for misconfiguration errors that no retry will fix.
    pub fn is_programming_error(&self) -> bool {
        !matches!(self, Self::Api(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
