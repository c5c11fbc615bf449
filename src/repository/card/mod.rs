//! Card Repository Module
//!
//! - card_repo: row reads and writes
//! - card_ordering: position management, cross-column moves, copies

mod card_repo;
mod card_ordering;

pub use card_repo::CardRepository;
pub use card_ordering::CardOrdering;
