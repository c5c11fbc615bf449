//! Position Store
//!
//! Row-level access to one ordered sibling set (a board's columns, a
//! column's cards, a checklist's items). Every call runs on the caller's
//! connection, so inside a transaction it is part of that transaction.

use std::ops::{Bound, RangeBounds};

use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::position::{self, Position, Shift};
use crate::domain::{DomainError, DomainResult};
use super::db::now_millis;

/// Off-sequence slot held by a row while its siblings shift around it
pub const PARKED: Position = -1;

/// Shifted rows are lifted this far above any real position first, so the
/// `(parent, position)` unique index never sees two rows on one slot.
const LIFT: i64 = 1 << 32;

/// Which ordered collection a store works on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingSet {
    BoardColumns,
    ColumnCards,
    ChecklistItems,
}

impl SiblingSet {
    fn table(self) -> &'static str {
        match self {
            SiblingSet::BoardColumns => "board_columns",
            SiblingSet::ColumnCards => "cards",
            SiblingSet::ChecklistItems => "checklist_items",
        }
    }

    fn parent_key(self) -> &'static str {
        match self {
            SiblingSet::BoardColumns => "board_id",
            SiblingSet::ColumnCards => "column_id",
            SiblingSet::ChecklistItems => "checklist_id",
        }
    }

    fn has_timestamps(self) -> bool {
        !matches!(self, SiblingSet::ChecklistItems)
    }

    /// Entity kind of the members
    pub fn kind(self) -> &'static str {
        match self {
            SiblingSet::BoardColumns => "column",
            SiblingSet::ColumnCards => "card",
            SiblingSet::ChecklistItems => "checklist item",
        }
    }

    /// Entity kind of the parent
    pub fn parent_kind(self) -> &'static str {
        match self {
            SiblingSet::BoardColumns => "board",
            SiblingSet::ColumnCards => "column",
            SiblingSet::ChecklistItems => "checklist",
        }
    }
}

/// Where one row currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub parent_id: u32,
    pub position: Position,
}

pub struct PositionStore<'c> {
    conn: &'c Connection,
    set: SiblingSet,
}

impl<'c> PositionStore<'c> {
    pub fn new(conn: &'c Connection, set: SiblingSet) -> Self {
        Self { conn, set }
    }

    pub fn set(&self) -> SiblingSet {
        self.set
    }

    /// Number of placed siblings under `parent_id` (a parked row is not counted)
    pub fn count_siblings(&self, parent_id: u32) -> DomainResult<i32> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = ?1 AND position >= 0",
            self.set.table(),
            self.set.parent_key()
        );
        let count: i64 = self.conn.query_row(&sql, params![parent_id], |row| row.get(0))?;
        i32::try_from(count).map_err(|_| {
            DomainError::InvalidPosition(format!(
                "{} {} reports {} {}s",
                self.set.parent_kind(),
                parent_id,
                count,
                self.set.kind()
            ))
        })
    }

    /// Parent and position of one row
    pub fn placement(&self, id: u32) -> DomainResult<Placement> {
        self.find_placement(id)?
            .ok_or_else(|| DomainError::not_found(self.set.kind(), id))
    }

    pub fn find_placement(&self, id: u32) -> DomainResult<Option<Placement>> {
        let sql = format!(
            "SELECT {}, position FROM {} WHERE id = ?1",
            self.set.parent_key(),
            self.set.table()
        );
        Ok(self
            .conn
            .query_row(&sql, params![id], |row| {
                Ok(Placement {
                    parent_id: row.get(0)?,
                    position: row.get(1)?,
                })
            })
            .optional()?)
    }

    /// Delete one row; children go with it through `ON DELETE CASCADE`
    pub fn remove_row(&self, id: u32) -> DomainResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", self.set.table());
        Ok(self.conn.execute(&sql, params![id])? > 0)
    }

    /// Add `shift` to every placed sibling of `parent_id` inside `range`.
    ///
    /// Returns how many rows moved. The caller must already have vacated
    /// (parked or deleted) whatever row the shifted block slides onto.
    pub fn shift_range<R>(&self, parent_id: u32, range: R, shift: Shift) -> DomainResult<usize>
    where
        R: RangeBounds<Position>,
    {
        let (low, high) = inclusive_bounds(&range);
        if low > high {
            return Ok(0);
        }
        let delta = shift.delta() as i64;
        if low + delta < 0 {
            return Err(DomainError::InvalidPosition(format!(
                "shifting {}s of {} {} from {} by {} leaves the sequence",
                self.set.kind(),
                self.set.parent_kind(),
                parent_id,
                low,
                delta
            )));
        }

        let table = self.set.table();
        let parent_key = self.set.parent_key();

        let lifted = self.conn.execute(
            &format!(
                "UPDATE {} SET position = position + ?1 WHERE {} = ?2 AND position >= ?3 AND position <= ?4",
                table, parent_key
            ),
            params![LIFT + delta, parent_id, low, high],
        )?;
        if lifted > 0 {
            self.conn.execute(
                &format!(
                    "UPDATE {} SET position = position - ?1 WHERE {} = ?2 AND position >= ?1",
                    table, parent_key
                ),
                params![LIFT, parent_id],
            )?;
        }

        log::debug!(
            "shifted {} {}s of {} {} in [{}, {}] by {}",
            lifted,
            self.set.kind(),
            self.set.parent_kind(),
            parent_id,
            low,
            high,
            delta
        );
        Ok(lifted)
    }

    /// Write the final position (and parent, for cross-parent moves) of one row
    pub fn set_position(&self, id: u32, position: Position, new_parent: Option<u32>) -> DomainResult<()> {
        if position < 0 {
            return Err(DomainError::InvalidPosition(format!(
                "{} {} cannot be placed at {}",
                self.set.kind(),
                id,
                position
            )));
        }
        self.write_position(id, position, new_parent)
    }

    /// Take a row out of the sequence until `set_position` places it again
    pub fn park(&self, id: u32) -> DomainResult<()> {
        self.write_position(id, PARKED, None)
    }

    fn write_position(&self, id: u32, position: Position, new_parent: Option<u32>) -> DomainResult<()> {
        let table = self.set.table();
        let key = self.set.parent_key();
        let now = now_millis();

        let changed = match (new_parent, self.set.has_timestamps()) {
            (Some(parent_id), true) => self.conn.execute(
                &format!("UPDATE {} SET position = ?1, {} = ?2, updated_at = ?3 WHERE id = ?4", table, key),
                params![position, parent_id, now, id],
            )?,
            (Some(parent_id), false) => self.conn.execute(
                &format!("UPDATE {} SET position = ?1, {} = ?2 WHERE id = ?3", table, key),
                params![position, parent_id, id],
            )?,
            (None, true) => self.conn.execute(
                &format!("UPDATE {} SET position = ?1, updated_at = ?2 WHERE id = ?3", table),
                params![position, now, id],
            )?,
            (None, false) => self.conn.execute(
                &format!("UPDATE {} SET position = ?1 WHERE id = ?2", table),
                params![position, id],
            )?,
        };

        if changed == 0 {
            return Err(DomainError::not_found(self.set.kind(), id));
        }
        Ok(())
    }

    /// `(id, position)` of every sibling, in display order
    pub fn siblings(&self, parent_id: u32) -> DomainResult<Vec<(u32, Position)>> {
        let sql = format!(
            "SELECT id, position FROM {} WHERE {} = ?1 ORDER BY position, id",
            self.set.table(),
            self.set.parent_key()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![parent_id], |row| {
            Ok((row.get::<_, u32>(0)?, row.get::<_, Position>(1)?))
        })?;
        let siblings = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(siblings)
    }

    /// Fails with `InvalidPosition` unless positions are exactly `0..n`
    pub fn check_dense(&self, parent_id: u32) -> DomainResult<()> {
        let positions: Vec<Position> = self.siblings(parent_id)?.into_iter().map(|(_, p)| p).collect();
        position::check_dense(&positions).map_err(|v| {
            DomainError::InvalidPosition(format!(
                "{}s of {} {}: expected position {}, found {}",
                self.set.kind(),
                self.set.parent_kind(),
                parent_id,
                v.index,
                v.found
            ))
        })
    }
}

/// Inclusive `[low, high]` over real positions; the parked slot is never in range
fn inclusive_bounds<R: RangeBounds<Position>>(range: &R) -> (i64, i64) {
    let low = match range.start_bound() {
        Bound::Included(&p) => p as i64,
        Bound::Excluded(&p) => p as i64 + 1,
        Bound::Unbounded => 0,
    };
    let high = match range.end_bound() {
        Bound::Included(&p) => p as i64,
        Bound::Excluded(&p) => p as i64 - 1,
        Bound::Unbounded => Position::MAX as i64,
    };
    (low.max(0), high)
}
