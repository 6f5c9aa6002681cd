//! Board persistence.
//!
//! `BoardStore` is the CRUD contract every board collection is accessed through.
//! `MongoBoardRepository` backs it with a MongoDB collection; `InMemoryBoardRepository`
//! keeps the same semantics in process for tests and database-less runs.

use crate::models::Board;
use crate::services::metrics::record_repository_operation;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{FindOptions, ReplaceOptions},
    Collection,
};
use service_core::error::AppError;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Server code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

#[async_trait]
pub trait BoardStore<B: Board>: Send + Sync {
    /// Inserts or replaces the board with the same id.
    async fn save(&self, board: B) -> Result<B, AppError>;

    /// Inserts a new board; fails with `Conflict` if the id is taken.
    async fn insert(&self, board: B) -> Result<B, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<B>, AppError>;

    /// All boards, ascending by id.
    async fn find_all(&self) -> Result<Vec<B>, AppError>;

    /// Boards whose id is in `ids`, ascending by id. Unknown ids are skipped.
    async fn find_all_by_id(&self, ids: &[i64]) -> Result<Vec<B>, AppError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError>;

    async fn count(&self) -> Result<u64, AppError>;

    /// Returns whether a board was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError>;

    /// Returns the number of boards removed.
    async fn delete_all(&self) -> Result<u64, AppError>;
}

pub struct MongoBoardRepository<B: Board> {
    collection: Collection<B>,
}

impl<B: Board> Clone for MongoBoardRepository<B> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
        }
    }
}

impl<B: Board> MongoBoardRepository<B> {
    pub fn new(collection: Collection<B>) -> Self {
        Self { collection }
    }

    async fn find_sorted(&self, filter: Option<Document>) -> Result<Vec<B>, MongoError> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        self.collection.find(filter, options).await?.try_collect().await
    }

    fn observe<T>(
        &self,
        operation: &'static str,
        result: Result<T, MongoError>,
    ) -> Result<T, AppError> {
        record_repository_operation(B::COLLECTION, operation, result.is_ok());
        result.map_err(|e| {
            tracing::error!(
                collection = B::COLLECTION,
                operation = operation,
                "Repository operation failed: {}",
                e
            );
            AppError::from(e)
        })
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl<B: Board> BoardStore<B> for MongoBoardRepository<B> {
    async fn save(&self, board: B) -> Result<B, AppError> {
        let options = ReplaceOptions::builder().upsert(true).build();
        let result = self
            .collection
            .replace_one(doc! { "_id": board.id() }, &board, options)
            .await;
        self.observe("save", result)?;

        tracing::debug!(collection = B::COLLECTION, id = board.id(), "Board saved");
        Ok(board)
    }

    async fn insert(&self, board: B) -> Result<B, AppError> {
        match self.collection.insert_one(&board, None).await {
            Ok(_) => {
                record_repository_operation(B::COLLECTION, "insert", true);
                tracing::debug!(collection = B::COLLECTION, id = board.id(), "Board inserted");
                Ok(board)
            }
            Err(e) if is_duplicate_key(&e) => {
                record_repository_operation(B::COLLECTION, "insert", false);
                Err(AppError::Conflict(anyhow::anyhow!(
                    "{} with id {} already exists",
                    B::COLLECTION,
                    board.id()
                )))
            }
            Err(e) => self.observe("insert", Err(e)),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<B>, AppError> {
        let result = self.collection.find_one(doc! { "_id": id }, None).await;
        self.observe("find_by_id", result)
    }

    async fn find_all(&self) -> Result<Vec<B>, AppError> {
        let result = self.find_sorted(None).await;
        self.observe("find_all", result)
    }

    async fn find_all_by_id(&self, ids: &[i64]) -> Result<Vec<B>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let filter = doc! { "_id": { "$in": ids.to_vec() } };
        let result = self.find_sorted(Some(filter)).await;
        self.observe("find_all_by_id", result)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        let result = self
            .collection
            .count_documents(doc! { "_id": id }, None)
            .await;
        Ok(self.observe("exists_by_id", result)? > 0)
    }

    async fn count(&self) -> Result<u64, AppError> {
        let result = self.collection.count_documents(None, None).await;
        self.observe("count", result)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await;
        let deleted = self.observe("delete_by_id", result)?.deleted_count > 0;

        tracing::debug!(collection = B::COLLECTION, id = id, deleted, "Board delete");
        Ok(deleted)
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let result = self.collection.delete_many(doc! {}, None).await;
        let deleted = self.observe("delete_all", result)?.deleted_count;

        tracing::info!(collection = B::COLLECTION, deleted, "All boards deleted");
        Ok(deleted)
    }
}

/// Process-local store with the same semantics as the MongoDB repository.
pub struct InMemoryBoardRepository<B: Board> {
    boards: RwLock<BTreeMap<i64, B>>,
}

impl<B: Board> InMemoryBoardRepository<B> {
    pub fn new() -> Self {
        Self {
            boards: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<B: Board> Default for InMemoryBoardRepository<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<B: Board> BoardStore<B> for InMemoryBoardRepository<B> {
    async fn save(&self, board: B) -> Result<B, AppError> {
        self.boards.write().await.insert(board.id(), board.clone());
        Ok(board)
    }

    async fn insert(&self, board: B) -> Result<B, AppError> {
        let mut boards = self.boards.write().await;
        if boards.contains_key(&board.id()) {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "{} with id {} already exists",
                B::COLLECTION,
                board.id()
            )));
        }
        boards.insert(board.id(), board.clone());
        Ok(board)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<B>, AppError> {
        Ok(self.boards.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<B>, AppError> {
        Ok(self.boards.read().await.values().cloned().collect())
    }

    async fn find_all_by_id(&self, ids: &[i64]) -> Result<Vec<B>, AppError> {
        let boards = self.boards.read().await;
        let mut found: Vec<B> = ids.iter().filter_map(|id| boards.get(id).cloned()).collect();
        found.sort_by_key(|b| b.id());
        found.dedup_by_key(|b| b.id());
        Ok(found)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.boards.read().await.contains_key(&id))
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.boards.read().await.len() as u64)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.boards.write().await.remove(&id).is_some())
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let mut boards = self.boards.write().await;
        let removed = boards.len() as u64;
        boards.clear();
        Ok(removed)
    }
}
