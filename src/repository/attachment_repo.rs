//! Attachment Repository
//!
//! Attachment metadata for a card. Attachments are not ordered, so there
//! is no sequencing here; they list oldest first.

use rusqlite::{params, Connection, Row};

use crate::domain::{Attachment, AttachmentId, CardId, DomainError, DomainResult, NewAttachment};
use super::card::CardRepository;
use super::db::{inserted_id, now_millis};

fn row_to_attachment(row: &Row) -> rusqlite::Result<Attachment> {
    Ok(Attachment {
        id: row.get(0)?,
        card_id: row.get(1)?,
        file_name: row.get(2)?,
        mime_type: row.get(3)?,
        size_bytes: row.get(4)?,
        url: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub struct AttachmentRepository<'c> {
    conn: &'c Connection,
}

impl<'c> AttachmentRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn add(&self, card_id: CardId, new: &NewAttachment) -> DomainResult<Attachment> {
        if new.file_name.trim().is_empty() {
            return Err(DomainError::InvalidArgument("attachment file name must not be empty".to_string()));
        }
        if new.size_bytes < 0 {
            return Err(DomainError::InvalidArgument(format!(
                "attachment size must not be negative, got {}",
                new.size_bytes
            )));
        }
        CardRepository::new(self.conn).get(card_id)?;

        let now = now_millis();
        self.conn.execute(
            "INSERT INTO attachments (card_id, file_name, mime_type, size_bytes, url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![card_id, new.file_name, new.mime_type, new.size_bytes, new.url, now],
        )?;
        Ok(Attachment {
            id: inserted_id(self.conn)?,
            card_id,
            file_name: new.file_name.clone(),
            mime_type: new.mime_type.clone(),
            size_bytes: new.size_bytes,
            url: new.url.clone(),
            created_at: now,
        })
    }

    pub fn delete(&self, id: AttachmentId) -> DomainResult<bool> {
        Ok(self.conn.execute("DELETE FROM attachments WHERE id = ?1", params![id])? > 0)
    }

    pub fn list_by_card(&self, card_id: CardId) -> DomainResult<Vec<Attachment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, card_id, file_name, mime_type, size_bytes, url, created_at
             FROM attachments WHERE card_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![card_id], row_to_attachment)?;
        let attachments = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(attachments)
    }
}
