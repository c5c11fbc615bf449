//! Column Repository Module
//!
//! - column_repo: row reads and writes
//! - column_ordering: position management for a board's columns

mod column_repo;
mod column_ordering;

pub use column_repo::ColumnRepository;
pub use column_ordering::ColumnOrdering;
pub(crate) use column_ordering::require_title;
