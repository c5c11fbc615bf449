//! Repository Layer
//!
//! Data access for boards and the ordered collections under them.
//!
//! - position_store / sequence: dense-position primitives shared by every
//!   ordered collection
//! - column, card, checklist: per-collection ordering components
//! - board_repo, attachment_repo: unordered CRUD

mod traits;
mod db;
mod board_repo;
mod attachment_repo;
pub mod position_store;
pub mod sequence;
pub mod column;
pub mod card;
pub mod checklist;


pub use traits::Repository;
pub use db::{init_db, open_in_memory, DbState, SCHEMA_VERSION};
pub use board_repo::BoardRepository;
pub(crate) use board_repo::find_board;
pub use attachment_repo::AttachmentRepository;
pub use position_store::{Placement, PositionStore, SiblingSet};
pub use sequence::Sequence;
pub use column::{ColumnOrdering, ColumnRepository};
pub use card::{CardOrdering, CardRepository};
pub use checklist::{ChecklistItemOrdering, ChecklistProgress, ChecklistRepository};
