//! Column Rows
//!
//! Plain reads and writes of `board_columns`. Nothing here moves siblings;
//! see `column_ordering` for that.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{BoardId, Column, ColumnId, DomainError, DomainResult, Position};
use crate::repository::db::{inserted_id, now_millis};

const COLUMN_FIELDS: &str = "id, board_id, title, position, created_at, updated_at";

/// Convert a database row to Column
pub(crate) fn row_to_column(row: &Row) -> rusqlite::Result<Column> {
    Ok(Column {
        id: row.get(0)?,
        board_id: row.get(1)?,
        title: row.get(2)?,
        position: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub struct ColumnRepository<'c> {
    conn: &'c Connection,
}

impl<'c> ColumnRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn find(&self, id: ColumnId) -> DomainResult<Option<Column>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM board_columns WHERE id = ?1", COLUMN_FIELDS),
                params![id],
                row_to_column,
            )
            .optional()?)
    }

    pub fn get(&self, id: ColumnId) -> DomainResult<Column> {
        self.find(id)?.ok_or_else(|| DomainError::missing::<Column>(id))
    }

    /// Columns of a board in display order
    pub fn list(&self, board_id: BoardId) -> DomainResult<Vec<Column>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM board_columns WHERE board_id = ?1 ORDER BY position, id",
            COLUMN_FIELDS
        ))?;
        let rows = stmt.query_map(params![board_id], row_to_column)?;
        let columns = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Insert at an already-reserved slot
    pub fn insert_row(&self, board_id: BoardId, title: &str, position: Position) -> DomainResult<Column> {
        let now = now_millis();
        self.conn.execute(
            "INSERT INTO board_columns (board_id, title, position, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
            params![board_id, title, position, now],
        )?;

        Ok(Column {
            id: inserted_id(self.conn)?,
            board_id,
            title: title.to_string(),
            position,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_title(&self, id: ColumnId, title: &str) -> DomainResult<()> {
        let changed = self.conn.execute(
            "UPDATE board_columns SET title = ?1, updated_at = ?2 WHERE id = ?3",
            params![title, now_millis(), id],
        )?;
        if changed == 0 {
            return Err(DomainError::missing::<Column>(id));
        }
        Ok(())
    }
}
