//! Board Repository
//!
//! SQLite-backed board CRUD. Deleting a board cascades to its columns and
//! everything under them.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::Mutex;

use crate::domain::{Board, BoardId, DomainError, DomainResult};
use super::db::{inserted_id, now_millis};
use super::traits::Repository;

const BOARD_FIELDS: &str = "id, name, color, background_image, owner_id, created_at, updated_at";

/// SQLite implementation of Board repository
pub struct BoardRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BoardRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Boards owned by one user
    pub async fn list_by_owner(&self, owner_id: u32) -> DomainResult<Vec<Board>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM boards WHERE owner_id = ?1 ORDER BY id",
            BOARD_FIELDS
        ))?;
        let rows = stmt.query_map(params![owner_id], row_to_board)?;
        let boards = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(boards)
    }
}

#[async_trait]
impl Repository<Board> for BoardRepository {
    async fn create(&self, entity: &Board) -> DomainResult<Board> {
        if entity.name.trim().is_empty() {
            return Err(DomainError::InvalidArgument("board name must not be empty".to_string()));
        }
        let conn = self.conn.lock().await;
        let now = now_millis();

        conn.execute(
            "INSERT INTO boards (name, color, background_image, owner_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![entity.name, entity.color, entity.background_image, entity.owner_id, now],
        )?;

        let mut board = entity.clone();
        board.id = inserted_id(&conn)?;
        board.created_at = now;
        board.updated_at = now;
        Ok(board)
    }

    async fn find_by_id(&self, id: BoardId) -> DomainResult<Option<Board>> {
        let conn = self.conn.lock().await;
        find_board(&conn, id)
    }

    async fn list(&self) -> DomainResult<Vec<Board>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM boards ORDER BY id", BOARD_FIELDS))?;
        let rows = stmt.query_map([], row_to_board)?;
        let boards = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(boards)
    }

    async fn update(&self, entity: &Board) -> DomainResult<Board> {
        let conn = self.conn.lock().await;
        let now = now_millis();

        let changed = conn.execute(
            "UPDATE boards SET name = ?1, color = ?2, background_image = ?3, owner_id = ?4, updated_at = ?5 WHERE id = ?6",
            params![entity.name, entity.color, entity.background_image, entity.owner_id, now, entity.id],
        )?;
        if changed == 0 {
            return Err(DomainError::missing::<Board>(entity.id));
        }

        find_board(&conn, entity.id)?.ok_or_else(|| DomainError::missing::<Board>(entity.id))
    }

    async fn delete(&self, id: BoardId) -> DomainResult<bool> {
        let conn = self.conn.lock().await;
        let removed = conn.execute("DELETE FROM boards WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}

pub(crate) fn find_board(conn: &Connection, id: BoardId) -> DomainResult<Option<Board>> {
    Ok(conn
        .query_row(
            &format!("SELECT {} FROM boards WHERE id = ?1", BOARD_FIELDS),
            params![id],
            row_to_board,
        )
        .optional()?)
}

/// `NotFound` unless the board exists
pub(crate) fn ensure_board(conn: &Connection, id: BoardId) -> DomainResult<()> {
    match find_board(conn, id)? {
        Some(_) => Ok(()),
        None => Err(DomainError::missing::<Board>(id)),
    }
}

/// Convert a database row to Board
fn row_to_board(row: &Row) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        background_image: row.get(3)?,
        owner_id: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
