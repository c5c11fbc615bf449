//! Card Entity
//!
//! A card lives in exactly one column; `position` is dense per column.

use serde::{Deserialize, Serialize};
use super::entity::Entity;
use super::position::Position;
use super::{CardId, ColumnId, TaskId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub column_id: ColumnId,
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    /// Unix milliseconds
    pub due_date: Option<i64>,
    /// Link to a task owned by the external task service
    pub task_id: Option<TaskId>,
    pub position: Position,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Entity for Card {
    type Id = CardId;
    const KIND: &'static str = "card";

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Input for creating a card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCard {
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub due_date: Option<i64>,
    pub task_id: Option<TaskId>,
    /// Absent = append at the end of the column
    pub position: Option<Position>,
}

impl NewCard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// The copyable fields of `source`, appended wherever it lands
    pub fn copy_of(source: &Card) -> Self {
        Self {
            title: source.title.clone(),
            description: source.description.clone(),
            cover_image: source.cover_image.clone(),
            due_date: source.due_date,
            task_id: source.task_id,
            position: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_cover_image(mut self, image: impl Into<String>) -> Self {
        self.cover_image = Some(image.into());
        self
    }

    pub fn with_due_date(mut self, due_ms: i64) -> Self {
        self.due_date = Some(due_ms);
        self
    }

    pub fn linked_to(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

/// Field edits for an existing card.
///
/// Nullable fields use `Some(None)` to clear. A `position` is never applied
/// here; see `move_card`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub cover_image: Option<Option<String>>,
    pub due_date: Option<Option<i64>>,
    pub task_id: Option<Option<TaskId>>,
    pub position: Option<Position>,
}

impl CardPatch {
    /// Copy every supplied field except `position` onto `card`
    pub fn apply_to(&self, card: &mut Card) {
        if let Some(title) = &self.title {
            card.title = title.clone();
        }
        if let Some(description) = &self.description {
            card.description = description.clone();
        }
        if let Some(cover_image) = &self.cover_image {
            card.cover_image = cover_image.clone();
        }
        if let Some(due_date) = self.due_date {
            card.due_date = due_date;
        }
        if let Some(task_id) = self.task_id {
            card.task_id = task_id;
        }
    }
}
