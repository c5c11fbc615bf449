//! Sequence Operations
//!
//! Insert, remove and move for one sibling set, written once in terms of
//! `PositionStore` calls. Columns, cards and checklist items all sequence
//! through here.

use std::ops::Bound;

use rusqlite::Connection;

use crate::domain::position::{self, Position, Shift};
use crate::domain::{DomainError, DomainResult};
use super::position_store::{Placement, PositionStore, SiblingSet};

pub struct Sequence<'c> {
    store: PositionStore<'c>,
}

impl<'c> Sequence<'c> {
    pub fn new(conn: &'c Connection, set: SiblingSet) -> Self {
        Self {
            store: PositionStore::new(conn, set),
        }
    }

    pub fn store(&self) -> &PositionStore<'c> {
        &self.store
    }

    /// Reserve the slot a new sibling will occupy.
    ///
    /// Absent `requested` appends; otherwise the slot is clamped into
    /// `[0, n]` and every sibling at or after it moves forward by one.
    pub fn open_slot(&self, parent_id: u32, requested: Option<Position>) -> DomainResult<Position> {
        let count = self.store.count_siblings(parent_id)?;
        let slot = position::insert_slot(requested, count);
        if slot < count {
            self.store.shift_range(parent_id, slot.., Shift::Forward)?;
        }
        Ok(slot)
    }

    /// Pull every sibling after a vacated `position` back by one
    pub fn close_gap(&self, parent_id: u32, position: Position) -> DomainResult<usize> {
        self.store
            .shift_range(parent_id, (Bound::Excluded(position), Bound::Unbounded), Shift::Back)
    }

    /// Delete a row and compact its former siblings.
    ///
    /// `Ok(None)` when the row does not exist.
    pub fn remove(&self, id: u32) -> DomainResult<Option<Placement>> {
        let Some(at) = self.store.find_placement(id)? else {
            return Ok(None);
        };
        self.store.remove_row(id)?;
        self.close_gap(at.parent_id, at.position)?;
        Ok(Some(at))
    }

    /// Move a row inside its current parent; returns the final position.
    ///
    /// The target is clamped into `[0, n - 1]`. Only the siblings between
    /// the old and new slot shift, all in one range update.
    pub fn move_within(&self, id: u32, requested: Position) -> DomainResult<Position> {
        let (at, count) = self.placed(id)?;
        let target = position::move_slot(requested, count);
        let Some(plan) = position::reorder_within(at.position, target) else {
            return Ok(at.position);
        };

        self.store.park(id)?;
        self.store.shift_range(at.parent_id, plan.range, plan.shift)?;
        self.store.set_position(id, target, None)?;
        Ok(target)
    }

    /// Move a row under `new_parent`; returns the final position.
    ///
    /// Closes the gap in the old parent, opens a slot (clamped into
    /// `[0, n]`) in the new one, then rewrites the row's parent and
    /// position. Same-parent requests fall through to `move_within`.
    pub fn move_across(&self, id: u32, new_parent: u32, requested: Position) -> DomainResult<Position> {
        let (at, _) = self.placed(id)?;
        if at.parent_id == new_parent {
            return self.move_within(id, requested);
        }

        self.store.park(id)?;
        self.close_gap(at.parent_id, at.position)?;
        let slot = self.open_slot(new_parent, Some(requested))?;
        self.store.set_position(id, slot, Some(new_parent))?;
        Ok(slot)
    }

    /// Current placement plus sibling count, refusing rows whose stored
    /// position is already outside `[0, n - 1]`
    fn placed(&self, id: u32) -> DomainResult<(Placement, i32)> {
        let at = self.store.placement(id)?;
        let count = self.store.count_siblings(at.parent_id)?;
        if at.position < 0 || at.position >= count {
            return Err(DomainError::InvalidPosition(format!(
                "{} {} sits at {} but {} {} has {} {}s",
                self.store.set().kind(),
                id,
                at.position,
                self.store.set().parent_kind(),
                at.parent_id,
                count,
                self.store.set().kind()
            )));
        }
        Ok((at, count))
    }
}
