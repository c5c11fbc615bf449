//! Checklist Entities
//!
//! A checklist belongs to a card and owns a dense sequence of items.

use serde::{Deserialize, Serialize};
use super::entity::Entity;
use super::position::Position;
use super::{CardId, ChecklistId, ChecklistItemId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: ChecklistId,
    pub card_id: CardId,
    pub title: String,
}

impl Entity for Checklist {
    type Id = ChecklistId;
    const KIND: &'static str = "checklist";

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub checklist_id: ChecklistId,
    pub title: String,
    pub completed: bool,
    /// Dense per checklist
    pub position: Position,
}

impl Entity for ChecklistItem {
    type Id = ChecklistItemId;
    const KIND: &'static str = "checklist item";

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Completion percentage, truncated: 1 of 3 is 33, never 34.
pub fn progress_percent(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    (completed * 100 / total as u64) as u8
}

/// Progress over a loaded item set
pub fn progress_of(items: &[ChecklistItem]) -> u8 {
    let completed = items.iter().filter(|i| i.completed).count() as u32;
    progress_percent(completed, items.len() as u32)
}
