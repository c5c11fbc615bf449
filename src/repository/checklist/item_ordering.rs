//! Checklist Item Ordering
//!
//! The column/card sequencing rules applied to the items of one checklist.

use rusqlite::Connection;

use crate::domain::{ChecklistId, ChecklistItem, ChecklistItemId, DomainResult, Position};
use crate::repository::column::require_title;
use crate::repository::position_store::SiblingSet;
use crate::repository::sequence::Sequence;
use super::checklist_repo::ChecklistRepository;

pub struct ChecklistItemOrdering<'c> {
    rows: ChecklistRepository<'c>,
    seq: Sequence<'c>,
}

impl<'c> ChecklistItemOrdering<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            rows: ChecklistRepository::new(conn),
            seq: Sequence::new(conn, SiblingSet::ChecklistItems),
        }
    }

    pub fn insert(&self, checklist_id: ChecklistId, title: &str, position: Option<Position>) -> DomainResult<ChecklistItem> {
        require_title(title)?;
        self.rows.get(checklist_id)?;

        let slot = self.seq.open_slot(checklist_id, position)?;
        self.rows.insert_item_row(checklist_id, title.trim(), slot)
    }

    pub fn move_to(&self, item_id: ChecklistItemId, new_position: Position) -> DomainResult<ChecklistItem> {
        self.seq.move_within(item_id, new_position)?;
        self.rows.get_item(item_id)
    }

    pub fn delete(&self, item_id: ChecklistItemId) -> DomainResult<bool> {
        Ok(self.seq.remove(item_id)?.is_some())
    }

    pub fn check_dense(&self, checklist_id: ChecklistId) -> DomainResult<()> {
        self.seq.store().check_dense(checklist_id)
    }
}
