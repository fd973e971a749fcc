//! Sortable table library
//!
//! A paginated, sortable data table backed by a remote row source. Rows load
//! in fixed-size windows as the viewport nears the end of the table, and
//! header activations sort either the loaded rows in memory or the whole
//! data set on the server.

pub mod compare;
pub mod config;
pub mod error;
pub mod model;
pub mod pagination;
pub mod render;
pub mod scroll;
pub mod sort;
pub mod source;

mod table;

pub use config::SortMode;
pub use config::TableConfig;
pub use error::Error;
pub use error::Result;
pub use table::*;
