//! Domain Layer
//!
//! Entities, read models and the pure position rules.
//! This layer does no I/O.

mod entity;
mod board;
mod column;
mod card;
mod checklist;
mod attachment;
mod view;
pub mod position;

pub use entity::{Entity, DomainError, DomainResult};
pub use board::Board;
pub use column::{Column, ColumnPatch, NewColumn};
pub use card::{Card, CardPatch, NewCard};
pub use checklist::{progress_of, progress_percent, Checklist, ChecklistItem};
pub use attachment::{Attachment, NewAttachment};
pub use view::{BoardView, CardView, ChecklistView, ColumnView};
pub use position::Position;

pub type BoardId = u32;
pub type ColumnId = u32;
pub type CardId = u32;
pub type ChecklistId = u32;
pub type ChecklistItemId = u32;
pub type AttachmentId = u32;
/// Id of a task in the external task service
pub type TaskId = u32;
