//! Read Models
//!
//! Assembled after commit for callers that render a whole card or board.

use serde::{Deserialize, Serialize};
use super::{Attachment, Board, Card, Checklist, ChecklistItem, Column};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistView {
    pub checklist: Checklist,
    /// Ordered by position
    pub items: Vec<ChecklistItem>,
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub card: Card,
    pub checklists: Vec<ChecklistView>,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnView {
    pub column: Column,
    /// Ordered by position
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub board: Board,
    /// Ordered by position
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    /// Card titles per column, left to right
    pub fn titles(&self) -> Vec<Vec<String>> {
        self.columns
            .iter()
            .map(|c| c.cards.iter().map(|card| card.title.clone()).collect())
            .collect()
    }
}
