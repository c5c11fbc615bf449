//! Column Ordering
//!
//! Sequencing rules for the columns of one board. Every method expects to
//! run inside the caller's write transaction.

use rusqlite::Connection;

use crate::domain::{
    BoardId, Column, ColumnId, ColumnPatch, DomainError, DomainResult, NewColumn, Position,
};
use crate::repository::board_repo::ensure_board;
use crate::repository::position_store::SiblingSet;
use crate::repository::sequence::Sequence;
use super::column_repo::ColumnRepository;

pub struct ColumnOrdering<'c> {
    rows: ColumnRepository<'c>,
    seq: Sequence<'c>,
    conn: &'c Connection,
}

impl<'c> ColumnOrdering<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            rows: ColumnRepository::new(conn),
            seq: Sequence::new(conn, SiblingSet::BoardColumns),
            conn,
        }
    }

    /// Create a column at the requested slot (appended when absent)
    pub fn insert(&self, board_id: BoardId, new: &NewColumn) -> DomainResult<Column> {
        require_title(&new.title)?;
        ensure_board(self.conn, board_id)?;

        let slot = self.seq.open_slot(board_id, new.position)?;
        let column = self.rows.insert_row(board_id, new.title.trim(), slot)?;
        log::debug!("column {} inserted into board {} at {}", column.id, board_id, slot);
        Ok(column)
    }

    /// Field edits only; a position in the patch is refused
    pub fn update(&self, column_id: ColumnId, patch: &ColumnPatch) -> DomainResult<Column> {
        if patch.position.is_some() {
            return Err(DomainError::InvalidArgument(
                "column position can only change through move".to_string(),
            ));
        }
        if let Some(title) = &patch.title {
            require_title(title)?;
            self.rows.update_title(column_id, title.trim())?;
        }
        self.rows.get(column_id)
    }

    /// Remove a column with its cards, compacting the board.
    ///
    /// `Ok(false)` when the column was already gone.
    pub fn delete(&self, column_id: ColumnId) -> DomainResult<bool> {
        match self.seq.remove(column_id)? {
            Some(at) => {
                log::debug!("column {} removed from board {} at {}", column_id, at.parent_id, at.position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Reorder a column inside its board
    pub fn move_to(&self, column_id: ColumnId, new_position: Position) -> DomainResult<Column> {
        let placed = self.seq.move_within(column_id, new_position)?;
        log::debug!("column {} now at {}", column_id, placed);
        self.rows.get(column_id)
    }

    pub fn list(&self, board_id: BoardId) -> DomainResult<Vec<Column>> {
        self.rows.list(board_id)
    }

    pub fn check_dense(&self, board_id: BoardId) -> DomainResult<()> {
        self.seq.store().check_dense(board_id)
    }
}

pub(crate) fn require_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvalidArgument("title must not be empty".to_string()));
    }
    Ok(())
}
