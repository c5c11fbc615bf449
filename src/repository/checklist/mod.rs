//! Checklist Repository Module
//!
//! - checklist_repo: checklist and item rows
//! - item_ordering: position management for a checklist's items
//! - checklist_progress: completion percentage

mod checklist_repo;
mod item_ordering;
mod checklist_progress;

pub use checklist_repo::ChecklistRepository;
pub use item_ordering::ChecklistItemOrdering;
pub use checklist_progress::ChecklistProgress;
