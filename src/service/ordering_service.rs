//! Ordering Service
//!
//! The one entry point for every position-affecting operation. Each call
//! opens a single transaction, hands it to the ordering components and
//! returns the refreshed entity after commit. Board CRUD goes through the
//! async `Repository` trait since boards carry no ordering.

use crate::domain::{
    progress_of, Attachment, AttachmentId, Board, BoardId, BoardView, Card, CardId, CardPatch, CardView,
    Checklist, ChecklistId, ChecklistItem, ChecklistItemId, ChecklistView, Column, ColumnId, ColumnPatch,
    ColumnView, DomainError, DomainResult, NewAttachment, NewCard, NewColumn, Position,
};
use crate::repository::column::require_title;
use crate::repository::{
    find_board, AttachmentRepository, BoardRepository, CardOrdering, CardRepository, ChecklistItemOrdering,
    ChecklistProgress, ChecklistRepository, ColumnOrdering, ColumnRepository, DbState, Repository,
};

/// Log rejected requests at `warn`, storage faults at `error`
fn logged<T>(op: &str, result: DomainResult<T>) -> DomainResult<T> {
    if let Err(e) = &result {
        if e.is_client_error() {
            log::warn!("{} rejected: {}", op, e);
        } else {
            log::error!("{} failed: {}", op, e);
        }
    }
    result
}

/// Facade over the ordering components.
///
/// Cheap to clone; clones share the underlying connection.
#[derive(Clone)]
pub struct OrderingService {
    db: DbState,
}

impl OrderingService {
    pub fn new(db: DbState) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DbState {
        &self.db
    }

    fn boards(&self) -> BoardRepository {
        BoardRepository::new(self.db.connection())
    }

    // ========================
    // Boards
    // ========================

    pub async fn create_board(&self, board: &Board) -> DomainResult<Board> {
        let created = logged("create_board", self.boards().create(board).await)?;
        log::info!("board {} created for owner {}", created.id, created.owner_id);
        Ok(created)
    }

    pub async fn get_board(&self, board_id: BoardId) -> DomainResult<Board> {
        self.boards()
            .find_by_id(board_id)
            .await?
            .ok_or_else(|| DomainError::missing::<Board>(board_id))
    }

    /// All boards, or only those of `owner_id`
    pub async fn list_boards(&self, owner_id: Option<u32>) -> DomainResult<Vec<Board>> {
        match owner_id {
            Some(owner) => self.boards().list_by_owner(owner).await,
            None => self.boards().list().await,
        }
    }

    pub async fn update_board(&self, board: &Board) -> DomainResult<Board> {
        if board.name.trim().is_empty() {
            return logged(
                "update_board",
                Err(DomainError::InvalidArgument("board name must not be empty".to_string())),
            );
        }
        let updated = logged("update_board", self.boards().update(board).await)?;
        log::info!("board {} updated", updated.id);
        Ok(updated)
    }

    /// Removes the board with all of its columns and cards
    pub async fn delete_board(&self, board_id: BoardId) -> DomainResult<bool> {
        let removed = logged("delete_board", self.boards().delete(board_id).await)?;
        if removed {
            log::info!("board {} deleted", board_id);
        }
        Ok(removed)
    }

    // ========================
    // Columns
    // ========================

    pub async fn create_column(&self, board_id: BoardId, title: &str, position: Option<Position>) -> DomainResult<Column> {
        let new = NewColumn {
            title: title.to_string(),
            position,
        };
        let column = logged(
            "create_column",
            self.db.write(|tx| ColumnOrdering::new(tx).insert(board_id, &new)).await,
        )?;
        log::info!("column {} created in board {} at {}", column.id, board_id, column.position);
        Ok(column)
    }

    pub async fn update_column(&self, column_id: ColumnId, patch: &ColumnPatch) -> DomainResult<Column> {
        logged(
            "update_column",
            self.db.write(|tx| ColumnOrdering::new(tx).update(column_id, patch)).await,
        )
    }

    pub async fn move_column(&self, column_id: ColumnId, new_position: Position) -> DomainResult<Column> {
        let column = logged(
            "move_column",
            self.db.write(|tx| ColumnOrdering::new(tx).move_to(column_id, new_position)).await,
        )?;
        log::info!("column {} moved to {}", column_id, column.position);
        Ok(column)
    }

    /// `Ok(false)` when the column was already gone
    pub async fn delete_column(&self, column_id: ColumnId) -> DomainResult<bool> {
        let removed = logged(
            "delete_column",
            self.db.write(|tx| ColumnOrdering::new(tx).delete(column_id)).await,
        )?;
        if removed {
            log::info!("column {} deleted", column_id);
        }
        Ok(removed)
    }

    pub async fn list_columns(&self, board_id: BoardId) -> DomainResult<Vec<Column>> {
        self.db
            .read(|tx| {
                find_board(tx, board_id)?.ok_or_else(|| DomainError::missing::<Board>(board_id))?;
                ColumnOrdering::new(tx).list(board_id)
            })
            .await
    }

    // ========================
    // Cards
    // ========================

    pub async fn create_card(&self, column_id: ColumnId, new: &NewCard) -> DomainResult<Card> {
        let card = logged(
            "create_card",
            self.db.write(|tx| CardOrdering::new(tx).insert(column_id, new)).await,
        )?;
        log::info!("card {} created in column {} at {}", card.id, column_id, card.position);
        Ok(card)
    }

    /// Field edits; a patch carrying a position is refused
    pub async fn update_card(&self, card_id: CardId, patch: &CardPatch) -> DomainResult<Card> {
        logged(
            "update_card",
            self.db.write(|tx| CardOrdering::new(tx).update(card_id, patch)).await,
        )
    }

    /// Reorder within a column or relocate to another one.
    ///
    /// Both columns change in the same transaction, so no other reader ever
    /// sees the card in neither or both.
    pub async fn move_card(&self, card_id: CardId, new_column_id: ColumnId, new_position: Position) -> DomainResult<Card> {
        let card = logged(
            "move_card",
            self.db
                .write(|tx| CardOrdering::new(tx).move_to(card_id, new_column_id, new_position))
                .await,
        )?;
        log::info!("card {} moved to column {} at {}", card_id, card.column_id, card.position);
        Ok(card)
    }

    pub async fn copy_card(&self, card_id: CardId, target_column_id: ColumnId) -> DomainResult<Card> {
        let copy = logged(
            "copy_card",
            self.db.write(|tx| CardOrdering::new(tx).copy(card_id, target_column_id)).await,
        )?;
        log::info!("card {} copied as {} into column {}", card_id, copy.id, target_column_id);
        Ok(copy)
    }

    pub async fn delete_card(&self, card_id: CardId) -> DomainResult<bool> {
        let removed = logged(
            "delete_card",
            self.db.write(|tx| CardOrdering::new(tx).delete(card_id)).await,
        )?;
        if removed {
            log::info!("card {} deleted", card_id);
        }
        Ok(removed)
    }

    pub async fn list_cards(&self, column_id: ColumnId) -> DomainResult<Vec<Card>> {
        self.db
            .read(|tx| {
                ColumnRepository::new(tx).get(column_id)?;
                CardOrdering::new(tx).list(column_id)
            })
            .await
    }

    /// Card with its checklists and attachments, from one snapshot
    pub async fn get_card(&self, card_id: CardId) -> DomainResult<CardView> {
        self.db
            .read(|tx| {
                let card = CardRepository::new(tx).get(card_id)?;
                let checklists = ChecklistRepository::new(tx);

                let mut views = Vec::new();
                for checklist in checklists.list_for_card(card_id)? {
                    let items = checklists.items(checklist.id)?;
                    let progress = progress_of(&items);
                    views.push(ChecklistView {
                        checklist,
                        items,
                        progress,
                    });
                }

                Ok(CardView {
                    card,
                    checklists: views,
                    attachments: AttachmentRepository::new(tx).list_by_card(card_id)?,
                })
            })
            .await
    }

    pub async fn board_view(&self, board_id: BoardId) -> DomainResult<BoardView> {
        self.db
            .read(|tx| {
                let board = find_board(tx, board_id)?.ok_or_else(|| DomainError::missing::<Board>(board_id))?;
                let cards = CardOrdering::new(tx);

                let columns = ColumnOrdering::new(tx)
                    .list(board_id)?
                    .into_iter()
                    .map(|column| -> DomainResult<ColumnView> {
                        let cards = cards.list(column.id)?;
                        Ok(ColumnView { column, cards })
                    })
                    .collect::<DomainResult<Vec<_>>>()?;

                Ok(BoardView { board, columns })
            })
            .await
    }

    // ========================
    // Checklists
    // ========================

    pub async fn create_checklist(&self, card_id: CardId, title: &str) -> DomainResult<Checklist> {
        let checklist = logged(
            "create_checklist",
            self.db
                .write(|tx| {
                    require_title(title)?;
                    CardRepository::new(tx).get(card_id)?;
                    ChecklistRepository::new(tx).insert(card_id, title.trim())
                })
                .await,
        )?;
        log::info!("checklist {} created on card {}", checklist.id, card_id);
        Ok(checklist)
    }

    pub async fn delete_checklist(&self, checklist_id: ChecklistId) -> DomainResult<bool> {
        let removed = logged(
            "delete_checklist",
            self.db.write(|tx| ChecklistRepository::new(tx).delete(checklist_id)).await,
        )?;
        if removed {
            log::info!("checklist {} deleted", checklist_id);
        }
        Ok(removed)
    }

    pub async fn add_checklist_item(
        &self,
        checklist_id: ChecklistId,
        title: &str,
        position: Option<Position>,
    ) -> DomainResult<ChecklistItem> {
        let item = logged(
            "add_checklist_item",
            self.db
                .write(|tx| ChecklistItemOrdering::new(tx).insert(checklist_id, title, position))
                .await,
        )?;
        log::info!("item {} added to checklist {} at {}", item.id, checklist_id, item.position);
        Ok(item)
    }

    pub async fn move_checklist_item(&self, item_id: ChecklistItemId, new_position: Position) -> DomainResult<ChecklistItem> {
        let item = logged(
            "move_checklist_item",
            self.db
                .write(|tx| ChecklistItemOrdering::new(tx).move_to(item_id, new_position))
                .await,
        )?;
        log::info!("item {} moved to {}", item_id, item.position);
        Ok(item)
    }

    pub async fn set_checklist_item_completed(&self, item_id: ChecklistItemId, completed: bool) -> DomainResult<ChecklistItem> {
        logged(
            "set_checklist_item_completed",
            self.db
                .write(|tx| ChecklistRepository::new(tx).set_completed(item_id, completed))
                .await,
        )
    }

    pub async fn delete_checklist_item(&self, item_id: ChecklistItemId) -> DomainResult<bool> {
        let removed = logged(
            "delete_checklist_item",
            self.db.write(|tx| ChecklistItemOrdering::new(tx).delete(item_id)).await,
        )?;
        if removed {
            log::info!("item {} deleted", item_id);
        }
        Ok(removed)
    }

    /// Completion percentage, truncated; 0 for an empty checklist
    pub async fn checklist_progress(&self, checklist_id: ChecklistId) -> DomainResult<u8> {
        self.db
            .read(|tx| ChecklistProgress::new(tx).progress(checklist_id))
            .await
    }

    // ========================
    // Attachments
    // ========================

    pub async fn add_attachment(&self, card_id: CardId, new: &NewAttachment) -> DomainResult<Attachment> {
        let attachment = logged(
            "add_attachment",
            self.db.write(|tx| AttachmentRepository::new(tx).add(card_id, new)).await,
        )?;
        log::info!("attachment {} added to card {}", attachment.id, card_id);
        Ok(attachment)
    }

    pub async fn delete_attachment(&self, attachment_id: AttachmentId) -> DomainResult<bool> {
        logged(
            "delete_attachment",
            self.db
                .write(|tx| AttachmentRepository::new(tx).delete(attachment_id))
                .await,
        )
    }

    // ========================
    // Audit
    // ========================

    /// Verify dense positions for the board's columns and every column's
    /// cards. `InvalidPosition` names the first gap or duplicate found.
    pub async fn check_board(&self, board_id: BoardId) -> DomainResult<()> {
        logged(
            "check_board",
            self.db
                .read(|tx| {
                    find_board(tx, board_id)?.ok_or_else(|| DomainError::missing::<Board>(board_id))?;
                    let columns = ColumnOrdering::new(tx);
                    let cards = CardOrdering::new(tx);

                    columns.check_dense(board_id)?;
                    for column in columns.list(board_id)? {
                        cards.check_dense(column.id)?;
                    }
                    Ok(())
                })
                .await,
        )
    }
}
