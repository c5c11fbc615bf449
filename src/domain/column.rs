//! Column Entity

use serde::{Deserialize, Serialize};
use super::entity::Entity;
use super::position::Position;
use super::{BoardId, ColumnId};

/// A column within a board; `position` is dense per board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub title: String,
    pub position: Position,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Entity for Column {
    type Id = ColumnId;
    const KIND: &'static str = "column";

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Input for creating a column
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewColumn {
    pub title: String,
    /// Absent = append at the end of the board
    pub position: Option<Position>,
}

impl NewColumn {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            position: None,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

/// Field edits for an existing column.
///
/// `position` exists so a stray value from a caller is rejected rather than
/// silently written; reordering goes through `move_column`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnPatch {
    pub title: Option<String>,
    pub position: Option<Position>,
}
