//! Card Ordering
//!
//! Sequencing rules for the cards of a column, including moves between
//! columns and duplication. Every method expects to run inside the caller's
//! write transaction; a cross-column move touches both columns in it.

use rusqlite::Connection;

use crate::domain::{
    Card, CardId, CardPatch, Column, ColumnId, DomainError, DomainResult, NewCard, Position,
};
use crate::repository::column::{require_title, ColumnRepository};
use crate::repository::position_store::SiblingSet;
use crate::repository::sequence::Sequence;
use super::card_repo::CardRepository;

pub struct CardOrdering<'c> {
    rows: CardRepository<'c>,
    columns: ColumnRepository<'c>,
    seq: Sequence<'c>,
}

impl<'c> CardOrdering<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            rows: CardRepository::new(conn),
            columns: ColumnRepository::new(conn),
            seq: Sequence::new(conn, SiblingSet::ColumnCards),
        }
    }

    /// Create a card at the requested slot (appended when absent)
    pub fn insert(&self, column_id: ColumnId, new: &NewCard) -> DomainResult<Card> {
        require_title(&new.title)?;
        self.ensure_column(column_id)?;

        let slot = self.seq.open_slot(column_id, new.position)?;
        let card = self.rows.insert_row(column_id, new, slot)?;
        log::debug!("card {} inserted into column {} at {}", card.id, column_id, slot);
        Ok(card)
    }

    /// Field edits only. A position in the patch is refused so that plain
    /// edits can never break the column's sequence.
    pub fn update(&self, card_id: CardId, patch: &CardPatch) -> DomainResult<Card> {
        if patch.position.is_some() {
            return Err(DomainError::InvalidArgument(
                "card position can only change through move".to_string(),
            ));
        }
        if let Some(title) = &patch.title {
            require_title(title)?;
        }

        let mut card = self.rows.get(card_id)?;
        patch.apply_to(&mut card);
        card.title = card.title.trim().to_string();
        self.rows.update_fields(&card)?;
        self.rows.get(card_id)
    }

    /// Relocate a card, within its column or into another one
    pub fn move_to(&self, card_id: CardId, new_column_id: ColumnId, new_position: Position) -> DomainResult<Card> {
        self.ensure_column(new_column_id)?;
        let placed = self.seq.move_across(card_id, new_column_id, new_position)?;
        log::debug!("card {} now at {} in column {}", card_id, placed, new_column_id);
        self.rows.get(card_id)
    }

    /// Shallow duplicate appended to `target_column_id`.
    ///
    /// Checklists and attachments stay with the source.
    pub fn copy(&self, card_id: CardId, target_column_id: ColumnId) -> DomainResult<Card> {
        let source = self.rows.get(card_id)?;
        self.ensure_column(target_column_id)?;

        let slot = self.seq.open_slot(target_column_id, None)?;
        let copy = self.rows.insert_row(target_column_id, &NewCard::copy_of(&source), slot)?;
        log::debug!("card {} copied to {} in column {} at {}", card_id, copy.id, target_column_id, slot);
        Ok(copy)
    }

    /// Remove a card with its checklists and attachments, compacting the
    /// column. `Ok(false)` when the card was already gone.
    pub fn delete(&self, card_id: CardId) -> DomainResult<bool> {
        Ok(self.seq.remove(card_id)?.is_some())
    }

    pub fn list(&self, column_id: ColumnId) -> DomainResult<Vec<Card>> {
        self.rows.list(column_id)
    }

    pub fn get(&self, card_id: CardId) -> DomainResult<Card> {
        self.rows.get(card_id)
    }

    pub fn check_dense(&self, column_id: ColumnId) -> DomainResult<()> {
        self.seq.store().check_dense(column_id)
    }

    fn ensure_column(&self, column_id: ColumnId) -> DomainResult<Column> {
        self.columns.get(column_id)
    }
}
