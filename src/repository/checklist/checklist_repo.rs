//! Checklist Rows
//!
//! Checklists and their items. Item positions are managed by
//! `item_ordering`.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{
    CardId, Checklist, ChecklistId, ChecklistItem, ChecklistItemId, DomainError, DomainResult, Position,
};
use crate::repository::db::inserted_id;

fn row_to_checklist(row: &Row) -> rusqlite::Result<Checklist> {
    Ok(Checklist {
        id: row.get(0)?,
        card_id: row.get(1)?,
        title: row.get(2)?,
    })
}

fn row_to_item(row: &Row) -> rusqlite::Result<ChecklistItem> {
    Ok(ChecklistItem {
        id: row.get(0)?,
        checklist_id: row.get(1)?,
        title: row.get(2)?,
        completed: row.get::<_, i32>(3)? != 0,
        position: row.get(4)?,
    })
}

pub struct ChecklistRepository<'c> {
    conn: &'c Connection,
}

impl<'c> ChecklistRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn find(&self, id: ChecklistId) -> DomainResult<Option<Checklist>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, card_id, title FROM checklists WHERE id = ?1",
                params![id],
                row_to_checklist,
            )
            .optional()?)
    }

    pub fn get(&self, id: ChecklistId) -> DomainResult<Checklist> {
        self.find(id)?.ok_or_else(|| DomainError::missing::<Checklist>(id))
    }

    pub fn list_for_card(&self, card_id: CardId) -> DomainResult<Vec<Checklist>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, card_id, title FROM checklists WHERE card_id = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![card_id], row_to_checklist)?;
        let checklists = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(checklists)
    }

    pub fn insert(&self, card_id: CardId, title: &str) -> DomainResult<Checklist> {
        self.conn.execute(
            "INSERT INTO checklists (card_id, title) VALUES (?1, ?2)",
            params![card_id, title],
        )?;
        Ok(Checklist {
            id: inserted_id(self.conn)?,
            card_id,
            title: title.to_string(),
        })
    }

    /// Items go with it through `ON DELETE CASCADE`
    pub fn delete(&self, id: ChecklistId) -> DomainResult<bool> {
        Ok(self.conn.execute("DELETE FROM checklists WHERE id = ?1", params![id])? > 0)
    }

    /// Items of a checklist in display order
    pub fn items(&self, checklist_id: ChecklistId) -> DomainResult<Vec<ChecklistItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, checklist_id, title, completed, position FROM checklist_items
             WHERE checklist_id = ?1 ORDER BY position, id",
        )?;
        let rows = stmt.query_map(params![checklist_id], row_to_item)?;
        let items = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    pub fn get_item(&self, id: ChecklistItemId) -> DomainResult<ChecklistItem> {
        self.conn
            .query_row(
                "SELECT id, checklist_id, title, completed, position FROM checklist_items WHERE id = ?1",
                params![id],
                row_to_item,
            )
            .optional()?
            .ok_or_else(|| DomainError::missing::<ChecklistItem>(id))
    }

    /// Insert at an already-reserved slot
    pub fn insert_item_row(&self, checklist_id: ChecklistId, title: &str, position: Position) -> DomainResult<ChecklistItem> {
        self.conn.execute(
            "INSERT INTO checklist_items (checklist_id, title, completed, position) VALUES (?1, ?2, 0, ?3)",
            params![checklist_id, title, position],
        )?;
        Ok(ChecklistItem {
            id: inserted_id(self.conn)?,
            checklist_id,
            title: title.to_string(),
            completed: false,
            position,
        })
    }

    pub fn set_completed(&self, id: ChecklistItemId, completed: bool) -> DomainResult<ChecklistItem> {
        let changed = self.conn.execute(
            "UPDATE checklist_items SET completed = ?1 WHERE id = ?2",
            params![completed as i32, id],
        )?;
        if changed == 0 {
            return Err(DomainError::missing::<ChecklistItem>(id));
        }
        self.get_item(id)
    }
}
