//! Position Arithmetic
//!
//! Pure rules for dense 0-based sibling positions. Storage code asks these
//! functions where things go and which range shifts; it never does the
//! arithmetic inline.

use std::ops::RangeInclusive;

/// Dense 0-based slot among siblings
pub type Position = i32;

/// Direction of a shift-range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    /// +1: opens a slot
    Forward,
    /// -1: closes a gap
    Back,
}

impl Shift {
    pub fn delta(self) -> i32 {
        match self {
            Shift::Forward => 1,
            Shift::Back => -1,
        }
    }
}

/// Slot for a new sibling among `count` existing ones.
///
/// Absent means append; anything else is clamped into `[0, count]`.
pub fn insert_slot(requested: Option<Position>, count: i32) -> Position {
    let count = count.max(0);
    match requested {
        None => count,
        Some(p) => p.clamp(0, count),
    }
}

/// Slot for an entity that is already one of `count` siblings,
/// clamped into `[0, count - 1]`.
pub fn move_slot(requested: Position, count: i32) -> Position {
    requested.clamp(0, (count - 1).max(0))
}

/// Shift needed to move one sibling from `old` to `new` inside its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reorder {
    /// Siblings in this inclusive range move by `shift`
    pub range: RangeInclusive<Position>,
    pub shift: Shift,
}

/// `None` when the move is a no-op.
///
/// Earlier: `[new, old)` shifts forward. Later: `(old, new]` shifts back.
pub fn reorder_within(old: Position, new: Position) -> Option<Reorder> {
    if new < old {
        Some(Reorder {
            range: new..=old - 1,
            shift: Shift::Forward,
        })
    } else if new > old {
        Some(Reorder {
            range: old + 1..=new,
            shift: Shift::Back,
        })
    } else {
        None
    }
}

/// First place where sorted `positions` stop being `0, 1, 2, ...`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensityViolation {
    pub index: usize,
    pub found: Position,
}

pub fn check_dense(sorted_positions: &[Position]) -> Result<(), DensityViolation> {
    for (index, &found) in sorted_positions.iter().enumerate() {
        if found != index as Position {
            return Err(DensityViolation { index, found });
        }
    }
    Ok(())
}
