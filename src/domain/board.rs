//! Board Entity
//!
//! A board owns an ordered set of columns. Board fields carry no ordering
//! invariant of their own.

use serde::{Deserialize, Serialize};
use super::entity::Entity;
use super::BoardId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    /// Color (hex, e.g., "#FF5733")
    pub color: String,
    pub background_image: Option<String>,
    /// Owning user, resolved by the auth layer
    pub owner_id: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Board {
    /// Unsaved board; `id` and timestamps are assigned on create
    pub fn new(name: impl Into<String>, color: impl Into<String>, owner_id: u32) -> Self {
        Self {
            id: 0,
            name: name.into(),
            color: color.into(),
            background_image: None,
            owner_id,
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn with_background(mut self, image: impl Into<String>) -> Self {
        self.background_image = Some(image.into());
        self
    }
}

impl Entity for Board {
    type Id = BoardId;
    const KIND: &'static str = "board";

    fn id(&self) -> Self::Id {
        self.id
    }
}
