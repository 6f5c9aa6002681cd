//! Repository tests against a live MongoDB at `localhost:27017`.
//!
//! Run with `cargo test -- --ignored` once a server is available.

use board_service::models::{Board, ScrabbleBoard, WordPlayBoard};
use board_service::services::{BoardStore, MongoBoardRepository, MongoDb};
use service_core::error::AppError;
use uuid::Uuid;

struct TestDb {
    db: MongoDb,
    name: String,
}

impl TestDb {
    async fn create() -> Self {
        let name = format!("board_test_{}", Uuid::new_v4().simple());
        let db = MongoDb::connect("mongodb://localhost:27017", &name)
            .await
            .expect("Failed to connect to MongoDB");
        db.initialize_collections()
            .await
            .expect("Failed to initialize collections");
        Self { db, name }
    }

    async fn cleanup(&self) {
        let _ = self.db.client().database(&self.name).drop(None).await;
    }
}

#[tokio::test]
#[ignore = "requires MongoDB at localhost:27017"]
async fn initialize_collections_is_idempotent() {
    let test_db = TestDb::create().await;

    test_db
        .db
        .initialize_collections()
        .await
        .expect("Second initialization failed");

    let names = test_db
        .db
        .database()
        .list_collection_names(None)
        .await
        .expect("Failed to list collections");
    assert!(names.contains(&"scrabbleBoard".to_string()));
    assert!(names.contains(&"wordPlayBoard".to_string()));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB at localhost:27017"]
async fn save_and_find_round_trip() {
    let test_db = TestDb::create().await;
    let repo = MongoBoardRepository::new(test_db.db.scrabble_boards());

    repo.save(ScrabbleBoard::new(1, "TW....DL")).await.unwrap();
    repo.save(ScrabbleBoard::new(1, "TW..TL..")).await.unwrap();

    let stored = repo.find_by_id(1).await.unwrap().expect("Board not found");
    assert_eq!(stored.board(), "TW..TL..");
    assert_eq!(repo.count().await.unwrap(), 1);
    assert!(repo.find_by_id(2).await.unwrap().is_none());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB at localhost:27017"]
async fn insert_duplicate_is_conflict() {
    let test_db = TestDb::create().await;
    let repo = MongoBoardRepository::new(test_db.db.word_play_boards());

    repo.insert(WordPlayBoard::new(9, "first")).await.unwrap();
    let err = repo
        .insert(WordPlayBoard::new(9, "second"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB at localhost:27017"]
async fn queries_are_sorted_and_deletes_report_counts() {
    let test_db = TestDb::create().await;
    let repo = MongoBoardRepository::new(test_db.db.scrabble_boards());

    for id in [30, 10, 20] {
        repo.save(ScrabbleBoard::new(id, format!("board-{}", id)))
            .await
            .unwrap();
    }

    let ids: Vec<i64> = repo
        .find_all()
        .await
        .unwrap()
        .iter()
        .map(|b| b.id())
        .collect();
    assert_eq!(ids, vec![10, 20, 30]);

    let ids: Vec<i64> = repo
        .find_all_by_id(&[30, 99, 10])
        .await
        .unwrap()
        .iter()
        .map(|b| b.id())
        .collect();
    assert_eq!(ids, vec![10, 30]);

    assert!(repo.exists_by_id(20).await.unwrap());
    assert!(repo.delete_by_id(20).await.unwrap());
    assert!(!repo.delete_by_id(20).await.unwrap());
    assert_eq!(repo.delete_all().await.unwrap(), 2);
    assert_eq!(repo.count().await.unwrap(), 0);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB at localhost:27017"]
async fn collections_are_independent() {
    let test_db = TestDb::create().await;
    let scrabble = MongoBoardRepository::new(test_db.db.scrabble_boards());
    let word_play = MongoBoardRepository::new(test_db.db.word_play_boards());

    scrabble.save(ScrabbleBoard::new(1, "s")).await.unwrap();

    assert_eq!(scrabble.count().await.unwrap(), 1);
    assert_eq!(word_play.count().await.unwrap(), 0);
    assert!(word_play.find_by_id(1).await.unwrap().is_none());

    test_db.cleanup().await;
}
