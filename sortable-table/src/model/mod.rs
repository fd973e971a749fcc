//! Table data model: column configuration and row records.

mod column;
mod row;

pub use column::*;
pub use row::*;
