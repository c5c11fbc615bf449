//! Card Rows
//!
//! Plain reads and writes of `cards`. Position changes live in
//! `card_ordering`.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{Card, CardId, ColumnId, DomainError, DomainResult, NewCard, Position};
use crate::repository::db::{inserted_id, now_millis};

const CARD_FIELDS: &str =
    "id, column_id, title, description, cover_image, due_date, task_id, position, created_at, updated_at";

/// Convert a database row to Card
pub(crate) fn row_to_card(row: &Row) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        column_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        cover_image: row.get(4)?,
        due_date: row.get(5)?,
        task_id: row.get(6)?,
        position: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

pub struct CardRepository<'c> {
    conn: &'c Connection,
}

impl<'c> CardRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn find(&self, id: CardId) -> DomainResult<Option<Card>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM cards WHERE id = ?1", CARD_FIELDS),
                params![id],
                row_to_card,
            )
            .optional()?)
    }

    pub fn get(&self, id: CardId) -> DomainResult<Card> {
        self.find(id)?.ok_or_else(|| DomainError::missing::<Card>(id))
    }

    /// Cards of a column in display order
    pub fn list(&self, column_id: ColumnId) -> DomainResult<Vec<Card>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM cards WHERE column_id = ?1 ORDER BY position, id",
            CARD_FIELDS
        ))?;
        let rows = stmt.query_map(params![column_id], row_to_card)?;
        let cards = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(cards)
    }

    /// Insert at an already-reserved slot; `new.position` is ignored
    pub fn insert_row(&self, column_id: ColumnId, new: &NewCard, position: Position) -> DomainResult<Card> {
        let now = now_millis();
        self.conn.execute(
            "INSERT INTO cards (column_id, title, description, cover_image, due_date, task_id, position, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                column_id,
                new.title.trim(),
                new.description,
                new.cover_image,
                new.due_date,
                new.task_id,
                position,
                now
            ],
        )?;

        Ok(Card {
            id: inserted_id(self.conn)?,
            column_id,
            title: new.title.trim().to_string(),
            description: new.description.clone(),
            cover_image: new.cover_image.clone(),
            due_date: new.due_date,
            task_id: new.task_id,
            position,
            created_at: now,
            updated_at: now,
        })
    }

    /// Write every non-position field of `card`
    pub fn update_fields(&self, card: &Card) -> DomainResult<()> {
        let changed = self.conn.execute(
            "UPDATE cards SET title = ?1, description = ?2, cover_image = ?3, due_date = ?4, task_id = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                card.title,
                card.description,
                card.cover_image,
                card.due_date,
                card.task_id,
                now_millis(),
                card.id
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::missing::<Card>(card.id));
        }
        Ok(())
    }
}
