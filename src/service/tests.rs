//! Ordering Service Tests
//!
//! End-to-end behavior of the facade: the board scenarios, density under
//! random operation sequences, and concurrent movers.

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::config::BoardConfig;
    use crate::domain::{
        Board, CardPatch, ColumnPatch, DomainError, NewAttachment, NewCard,
    };
    use crate::repository::{init_db, open_in_memory};
    use crate::service::OrderingService;

    async fn setup_service() -> (OrderingService, u32) {
        let db = open_in_memory().await.expect("Failed to init test DB");
        let service = OrderingService::new(db);
        let board = service
            .create_board(&Board::new("Sprint", "#336699", 1))
            .await
            .expect("Failed to create board");
        (service, board.id)
    }

    /// Column with cards titled by `titles`, in order
    async fn column_with(service: &OrderingService, board_id: u32, name: &str, titles: &[&str]) -> (u32, Vec<u32>) {
        let column = service.create_column(board_id, name, None).await.unwrap();
        let mut ids = Vec::new();
        for title in titles {
            ids.push(service.create_card(column.id, &NewCard::new(*title)).await.unwrap().id);
        }
        (column.id, ids)
    }

    async fn card_titles(service: &OrderingService, column_id: u32) -> Vec<String> {
        let cards = service.list_cards(column_id).await.unwrap();
        for (i, card) in cards.iter().enumerate() {
            assert_eq!(card.position, i as i32, "column {} not dense", column_id);
        }
        cards.into_iter().map(|c| c.title).collect()
    }

    // ========================
    // Scenarios
    // ========================

    #[tokio::test]
    async fn test_move_card_earlier_in_column() {
        let (service, board_id) = setup_service().await;
        let (column_id, ids) = column_with(&service, board_id, "Todo", &["A", "B", "C", "D"]).await;

        let moved = service.move_card(ids[2], column_id, 0).await.unwrap();
        assert_eq!(moved.position, 0);
        assert_eq!(card_titles(&service, column_id).await, vec!["C", "A", "B", "D"]);
    }

    #[tokio::test]
    async fn test_move_card_to_other_column() {
        let (service, board_id) = setup_service().await;
        let (x, x_ids) = column_with(&service, board_id, "X", &["A", "B"]).await;
        let (y, _) = column_with(&service, board_id, "Y", &["C"]).await;

        let moved = service.move_card(x_ids[0], y, 0).await.unwrap();
        assert_eq!(moved.column_id, y);
        assert_eq!(card_titles(&service, x).await, vec!["B"]);
        assert_eq!(card_titles(&service, y).await, vec!["A", "C"]);
        service.check_board(board_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_progress_truncates() {
        let (service, board_id) = setup_service().await;
        let (_, ids) = column_with(&service, board_id, "Todo", &["A"]).await;
        let checklist = service.create_checklist(ids[0], "Steps").await.unwrap();

        let first = service.add_checklist_item(checklist.id, "one", None).await.unwrap();
        service.add_checklist_item(checklist.id, "two", None).await.unwrap();
        service.add_checklist_item(checklist.id, "three", None).await.unwrap();
        service.set_checklist_item_completed(first.id, true).await.unwrap();

        assert_eq!(service.checklist_progress(checklist.id).await.unwrap(), 33);
    }

    #[tokio::test]
    async fn test_progress_of_empty_checklist() {
        let (service, board_id) = setup_service().await;
        let (_, ids) = column_with(&service, board_id, "Todo", &["A"]).await;
        let checklist = service.create_checklist(ids[0], "Empty").await.unwrap();

        assert_eq!(service.checklist_progress(checklist.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_middle_column() {
        let (service, board_id) = setup_service().await;
        service.create_column(board_id, "Todo", None).await.unwrap();
        let doing = service.create_column(board_id, "Doing", None).await.unwrap();
        service.create_column(board_id, "Done", None).await.unwrap();

        assert!(service.delete_column(doing.id).await.unwrap());

        let columns = service.list_columns(board_id).await.unwrap();
        let layout: Vec<(String, i32)> = columns.into_iter().map(|c| (c.title, c.position)).collect();
        assert_eq!(layout, vec![("Todo".to_string(), 0), ("Done".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_copy_into_same_column_appends() {
        let (service, board_id) = setup_service().await;
        let (column_id, ids) = column_with(&service, board_id, "Todo", &["A", "B", "C"]).await;

        let copy = service.copy_card(ids[0], column_id).await.unwrap();
        assert_eq!(copy.position, 3);
        assert_ne!(copy.id, ids[0]);

        let source = service.get_card(ids[0]).await.unwrap();
        assert_eq!(source.card.position, 0);
        assert_eq!(card_titles(&service, column_id).await, vec!["A", "B", "C", "A"]);
    }

    // ========================
    // Properties
    // ========================

    #[tokio::test]
    async fn test_copy_keeps_copyable_fields() {
        let (service, board_id) = setup_service().await;
        let (source_column, _) = column_with(&service, board_id, "Todo", &[]).await;
        let (target_column, _) = column_with(&service, board_id, "Done", &["X"]).await;

        let source = service
            .create_card(
                source_column,
                &NewCard::new("Release")
                    .with_description("tag and publish")
                    .with_cover_image("cover.png")
                    .with_due_date(1_800_000_000_000)
                    .linked_to(42),
            )
            .await
            .unwrap();
        let checklist = service.create_checklist(source.id, "Steps").await.unwrap();
        service.add_checklist_item(checklist.id, "tag", None).await.unwrap();
        service
            .add_attachment(source.id, &NewAttachment::new("notes.md", "text/markdown", 12, "/files/notes"))
            .await
            .unwrap();

        let copy = service.copy_card(source.id, target_column).await.unwrap();
        let view = service.get_card(copy.id).await.unwrap();

        assert_eq!(view.card.title, source.title);
        assert_eq!(view.card.description, source.description);
        assert_eq!(view.card.cover_image, source.cover_image);
        assert_eq!(view.card.due_date, source.due_date);
        assert_eq!(view.card.task_id, Some(42));
        assert_eq!(view.card.column_id, target_column);
        assert_eq!(view.card.position, 1);
        assert!(view.checklists.is_empty());
        assert!(view.attachments.is_empty());
    }

    #[tokio::test]
    async fn test_move_preserves_relative_order() {
        let (service, board_id) = setup_service().await;
        let names = ["A", "B", "C", "D", "E", "F"];
        let (column_id, ids) = column_with(&service, board_id, "Todo", &names).await;

        let mut expected: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        for (from, to) in [(0usize, 5usize), (4, 1), (2, 2), (5, 0), (1, 3)] {
            let moving = expected.remove(from);
            expected.insert(to, moving.clone());

            let index = names.iter().position(|n| *n == moving).unwrap();
            service.move_card(ids[index], column_id, to as i32).await.unwrap();
            assert_eq!(card_titles(&service, column_id).await, expected);
        }
    }

    #[tokio::test]
    async fn test_progress_reads_are_stable() {
        let (service, board_id) = setup_service().await;
        let (_, ids) = column_with(&service, board_id, "Todo", &["A"]).await;
        let checklist = service.create_checklist(ids[0], "Steps").await.unwrap();
        let a = service.add_checklist_item(checklist.id, "a", None).await.unwrap();
        service.add_checklist_item(checklist.id, "b", None).await.unwrap();
        service.set_checklist_item_completed(a.id, true).await.unwrap();

        let first = service.checklist_progress(checklist.id).await.unwrap();
        let second = service.checklist_progress(checklist.id).await.unwrap();
        assert_eq!(first, 50);
        assert_eq!(first, second);

        let view = service.get_card(ids[0]).await.unwrap();
        assert_eq!(view.checklists[0].progress, first);
    }

    #[tokio::test]
    async fn test_insert_positions_are_clamped() {
        let (service, board_id) = setup_service().await;
        let (column_id, _) = column_with(&service, board_id, "Todo", &["A", "B"]).await;

        let late = service.create_card(column_id, &NewCard::new("late").at(40)).await.unwrap();
        assert_eq!(late.position, 2);
        let early = service.create_card(column_id, &NewCard::new("early").at(-5)).await.unwrap();
        assert_eq!(early.position, 0);

        assert_eq!(card_titles(&service, column_id).await, vec!["early", "A", "B", "late"]);
    }

    #[tokio::test]
    async fn test_move_targets_are_clamped() {
        let (service, board_id) = setup_service().await;
        let (x, x_ids) = column_with(&service, board_id, "X", &["A", "B", "C"]).await;
        let (y, _) = column_with(&service, board_id, "Y", &["D"]).await;

        let within = service.move_card(x_ids[0], x, 10).await.unwrap();
        assert_eq!(within.position, 2);
        let across = service.move_card(x_ids[1], y, 10).await.unwrap();
        assert_eq!(across.position, 1);

        assert_eq!(card_titles(&service, x).await, vec!["C", "A"]);
        assert_eq!(card_titles(&service, y).await, vec!["D", "B"]);
    }

    #[tokio::test]
    async fn test_update_rejects_position() {
        let (service, board_id) = setup_service().await;
        let (column_id, ids) = column_with(&service, board_id, "Todo", &["A", "B"]).await;

        let patch = CardPatch {
            title: Some("renamed".into()),
            position: Some(0),
            ..Default::default()
        };
        let result = service.update_card(ids[1], &patch).await;
        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
        assert_eq!(card_titles(&service, column_id).await, vec!["A", "B"]);

        let column_patch = ColumnPatch {
            title: None,
            position: Some(3),
        };
        let result = service.update_column(column_id, &column_patch).await;
        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_update_edits_fields() {
        let (service, board_id) = setup_service().await;
        let (column_id, ids) = column_with(&service, board_id, "Todo", &["A"]).await;

        let card = service
            .update_card(
                ids[0],
                &CardPatch {
                    title: Some("Alpha".into()),
                    description: Some(Some("first letter".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(card.title, "Alpha");
        assert_eq!(card.description.as_deref(), Some("first letter"));
        assert_eq!(card.position, 0);

        let column = service
            .update_column(column_id, &ColumnPatch { title: Some("Backlog".into()), position: None })
            .await
            .unwrap();
        assert_eq!(column.title, "Backlog");
    }

    #[tokio::test]
    async fn test_not_found() {
        let (service, board_id) = setup_service().await;
        let (column_id, ids) = column_with(&service, board_id, "Todo", &["A"]).await;

        assert!(matches!(
            service.create_column(999, "Ghost", None).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.create_card(999, &NewCard::new("Ghost")).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(service.move_card(999, column_id, 0).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(service.move_card(ids[0], 999, 0).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(service.move_column(999, 0).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(service.copy_card(ids[0], 999).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(service.checklist_progress(999).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(service.get_card(999).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(service.board_view(999).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(service.get_board(999).await, Err(DomainError::NotFound { .. })));

        assert!(!service.delete_card(999).await.unwrap());
        assert!(!service.delete_column(999).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_title_rejected() {
        let (service, board_id) = setup_service().await;
        let result = service.create_column(board_id, "   ", None).await;
        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
        assert!(service.list_columns(board_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_card_twice() {
        let (service, board_id) = setup_service().await;
        let (column_id, ids) = column_with(&service, board_id, "Todo", &["A", "B", "C"]).await;

        assert!(service.delete_card(ids[0]).await.unwrap());
        assert!(!service.delete_card(ids[0]).await.unwrap());
        assert_eq!(card_titles(&service, column_id).await, vec!["B", "C"]);
    }

    #[tokio::test]
    async fn test_checklist_item_lifecycle() {
        let (service, board_id) = setup_service().await;
        let (_, ids) = column_with(&service, board_id, "Todo", &["A"]).await;
        let checklist = service.create_checklist(ids[0], "Steps").await.unwrap();

        let a = service.add_checklist_item(checklist.id, "a", None).await.unwrap();
        let b = service.add_checklist_item(checklist.id, "b", None).await.unwrap();
        service.add_checklist_item(checklist.id, "c", Some(1)).await.unwrap();
        service.move_checklist_item(a.id, 2).await.unwrap();
        assert!(service.delete_checklist_item(b.id).await.unwrap());

        let view = service.get_card(ids[0]).await.unwrap();
        let items: Vec<(&str, i32)> = view.checklists[0]
            .items
            .iter()
            .map(|i| (i.title.as_str(), i.position))
            .collect();
        assert_eq!(items, vec![("c", 0), ("a", 1)]);

        assert!(service.delete_checklist(checklist.id).await.unwrap());
        assert!(service.get_card(ids[0]).await.unwrap().checklists.is_empty());
    }

    #[tokio::test]
    async fn test_copy_to_column_on_other_board() {
        let (service, first_board) = setup_service().await;
        let second_board = service
            .create_board(&Board::new("Release", "#993366", 1))
            .await
            .unwrap()
            .id;
        let (source_column, _) = column_with(&service, first_board, "Todo", &["A"]).await;
        let (target_column, _) = column_with(&service, second_board, "Inbox", &["X"]).await;

        let source = service
            .create_card(source_column, &NewCard::new("Linked").linked_to(7))
            .await
            .unwrap();
        let copy = service.copy_card(source.id, target_column).await.unwrap();

        assert_eq!(copy.column_id, target_column);
        assert_eq!(copy.position, 1);
        assert_eq!(copy.task_id, Some(7));
        assert_eq!(card_titles(&service, target_column).await, vec!["X", "Linked"]);
        assert_eq!(card_titles(&service, source_column).await, vec!["A", "Linked"]);

        service.check_board(first_board).await.unwrap();
        service.check_board(second_board).await.unwrap();
    }

    #[tokio::test]
    async fn test_move_column_earlier_then_again() {
        let (service, board_id) = setup_service().await;
        service.create_column(board_id, "c1", None).await.unwrap();
        service.create_column(board_id, "c2", None).await.unwrap();
        let src = service.create_column(board_id, "src", None).await.unwrap();

        let moved = service.move_column(src.id, 0).await.unwrap();
        assert_eq!(moved.position, 0);

        let again = service.move_column(src.id, 0).await.unwrap();
        assert_eq!(again.position, 0);

        let layout: Vec<(String, i32)> = service
            .list_columns(board_id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| (c.title, c.position))
            .collect();
        assert_eq!(
            layout,
            vec![("src".to_string(), 0), ("c1".to_string(), 1), ("c2".to_string(), 2)]
        );
        service.check_board(board_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_board_view_and_cascade() {
        let (service, board_id) = setup_service().await;
        let (todo, _) = column_with(&service, board_id, "Todo", &["A", "B"]).await;
        column_with(&service, board_id, "Done", &["C"]).await;
        service.move_column(todo, 1).await.unwrap();

        let view = service.board_view(board_id).await.unwrap();
        assert_eq!(view.board.name, "Sprint");
        assert_eq!(view.titles(), vec![vec!["C"], vec!["A", "B"]]);

        assert!(service.delete_board(board_id).await.unwrap());
        assert!(matches!(service.list_cards(todo).await, Err(DomainError::NotFound { .. })));
        assert!(service.list_boards(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_boards_by_owner() {
        let (service, _) = setup_service().await;
        service.create_board(&Board::new("Other", "#000", 2)).await.unwrap();

        assert_eq!(service.list_boards(None).await.unwrap().len(), 2);
        let mine = service.list_boards(Some(2)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "Other");

        let mut renamed = mine[0].clone();
        renamed.name = "Renamed".to_string();
        assert_eq!(service.update_board(&renamed).await.unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn test_random_operations_stay_dense() {
        let (service, board_id) = setup_service().await;
        let mut rng = StdRng::seed_from_u64(0x6b61_6e62);

        let mut columns = Vec::new();
        for name in ["A", "B", "C"] {
            columns.push(service.create_column(board_id, name, None).await.unwrap().id);
        }
        let mut model: Vec<Vec<u32>> = vec![Vec::new(); columns.len()];

        for step in 0..200 {
            let col = rng.gen_range(0..columns.len());
            let op = rng.gen_range(0..10);

            if op < 4 || model.iter().all(|c| c.is_empty()) {
                let requested = if rng.gen_bool(0.3) { None } else { Some(rng.gen_range(-2..8)) };
                let mut new = NewCard::new(format!("card-{}", step));
                new.position = requested;
                let card = service.create_card(columns[col], &new).await.unwrap();
                let n = model[col].len() as i32;
                let slot = requested.map_or(n, |p| p.clamp(0, n));
                assert_eq!(card.position, slot);
                model[col].insert(slot as usize, card.id);
            } else {
                let from_col = (0..columns.len())
                    .cycle()
                    .skip(col)
                    .find(|c| !model[*c].is_empty())
                    .unwrap();
                let index = rng.gen_range(0..model[from_col].len());
                let card_id = model[from_col][index];

                if op < 6 {
                    assert!(service.delete_card(card_id).await.unwrap());
                    model[from_col].remove(index);
                } else {
                    let to_col = rng.gen_range(0..columns.len());
                    let requested = rng.gen_range(-2..8);
                    let moved = service.move_card(card_id, columns[to_col], requested).await.unwrap();

                    model[from_col].remove(index);
                    // Within a column `n` already excludes the mover, so
                    // both cases clamp into [0, n]
                    let n = model[to_col].len() as i32;
                    let slot = requested.clamp(0, n);
                    assert_eq!(moved.position, slot, "step {}", step);
                    model[to_col].insert(slot as usize, card_id);
                }
            }

            for (c, expected) in model.iter().enumerate() {
                let actual: Vec<u32> = service.list_cards(columns[c]).await.unwrap().iter().map(|card| card.id).collect();
                assert_eq!(&actual, expected, "column {} after step {}", c, step);
            }
        }

        service.check_board(board_id).await.unwrap();
    }

    // ========================
    // Concurrency
    // ========================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_moves_stay_dense() {
        let (service, board_id) = setup_service().await;
        let (x, x_ids) = column_with(&service, board_id, "X", &["A", "B", "C", "D", "E"]).await;
        let (y, y_ids) = column_with(&service, board_id, "Y", &["F", "G", "H"]).await;
        let cards: Vec<u32> = x_ids.into_iter().chain(y_ids).collect();

        let mut handles = Vec::new();
        for worker in 0..8u64 {
            let service = service.clone();
            let cards = cards.clone();
            handles.push(tokio::spawn(async move {
                let mut rng = StdRng::seed_from_u64(worker);
                for _ in 0..25 {
                    let card = cards[rng.gen_range(0..cards.len())];
                    let target = if rng.gen_bool(0.5) { x } else { y };
                    service.move_card(card, target, rng.gen_range(0..6)).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        service.check_board(board_id).await.unwrap();
        let total = service.list_cards(x).await.unwrap().len() + service.list_cards(y).await.unwrap().len();
        assert_eq!(total, cards.len());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_two_connections_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = BoardConfig::with_database(dir.path().join("board.db"));

        let first = OrderingService::new(init_db(&config).await.unwrap());
        let second = OrderingService::new(init_db(&config).await.unwrap());

        let board = first.create_board(&Board::new("Shared", "#abcdef", 1)).await.unwrap();
        let (x, x_ids) = column_with(&first, board.id, "X", &["A", "B", "C", "D"]).await;
        let (y, y_ids) = column_with(&first, board.id, "Y", &["E", "F"]).await;
        let cards: Vec<u32> = x_ids.into_iter().chain(y_ids).collect();

        let mut handles = Vec::new();
        for (seed, service) in [(1u64, first.clone()), (2u64, second.clone())] {
            let cards = cards.clone();
            handles.push(tokio::spawn(async move {
                let mut rng = StdRng::seed_from_u64(seed);
                for _ in 0..30 {
                    let card = cards[rng.gen_range(0..cards.len())];
                    let target = if rng.gen_bool(0.5) { x } else { y };
                    service.move_card(card, target, rng.gen_range(0..5)).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        second.check_board(board.id).await.unwrap();
        let view = first.board_view(board.id).await.unwrap();
        let total: usize = view.columns.iter().map(|c| c.cards.len()).sum();
        assert_eq!(total, cards.len());
    }
}
