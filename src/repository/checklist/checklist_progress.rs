//! Checklist Progress
//!
//! Read-only completion percentage over one checklist's current items.

use rusqlite::{params, Connection};

use crate::domain::{progress_percent, ChecklistId, DomainResult};
use super::checklist_repo::ChecklistRepository;

pub struct ChecklistProgress<'c> {
    conn: &'c Connection,
}

impl<'c> ChecklistProgress<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// 0 for an empty checklist, else `floor(100 * completed / total)`
    pub fn progress(&self, checklist_id: ChecklistId) -> DomainResult<u8> {
        ChecklistRepository::new(self.conn).get(checklist_id)?;

        let (total, completed): (u32, u32) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(completed != 0), 0) FROM checklist_items WHERE checklist_id = ?1",
            params![checklist_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(progress_percent(completed, total))
    }
}
