use crate::models::{Board, ScrabbleBoard, WordPlayBoard};
use mongodb::{
    bson::{doc, Document},
    error::{Error as MongoError, ErrorKind},
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;

/// Server code returned when creating a collection that already exists.
const NAMESPACE_EXISTS: i32 = 48;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "MongoDB client ready");
        Ok(Self { client, db })
    }

    /// Creates the board collections that do not exist yet.
    pub async fn initialize_collections(&self) -> Result<(), AppError> {
        tracing::info!("Ensuring MongoDB collections for board-service");

        let existing = self.db.list_collection_names(None).await.map_err(|e| {
            tracing::error!("Failed to list collections: {}", e);
            AppError::from(e)
        })?;

        for name in [ScrabbleBoard::COLLECTION, WordPlayBoard::COLLECTION] {
            if existing.iter().any(|c| c == name) {
                continue;
            }
            match self.db.create_collection(name, None).await {
                Ok(()) => tracing::info!(collection = %name, "Created collection"),
                // Another replica won the race
                Err(e) if is_namespace_exists(&e) => {}
                Err(e) => {
                    tracing::error!("Failed to create collection {}: {}", name, e);
                    return Err(AppError::from(e));
                }
            }
        }

        Ok(())
    }

    /// Runs `hello` against the service database and returns the server reply.
    pub async fn hello(&self) -> Result<Document, AppError> {
        self.db
            .run_command(doc! { "hello": 1 }, None)
            .await
            .map_err(AppError::from)
    }

    pub fn collection<B: Board>(&self) -> Collection<B> {
        self.db.collection(B::COLLECTION)
    }

    pub fn scrabble_boards(&self) -> Collection<ScrabbleBoard> {
        self.collection()
    }

    pub fn word_play_boards(&self) -> Collection<WordPlayBoard> {
        self.collection()
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

fn is_namespace_exists(err: &MongoError) -> bool {
    matches!(&*err.kind, ErrorKind::Command(cmd) if cmd.code == NAMESPACE_EXISTS)
}
