pub mod database;
pub mod metrics;
pub mod repository;

pub use database::MongoDb;
pub use self::metrics::{get_metrics, init_metrics, record_repository_operation};
pub use repository::{BoardStore, InMemoryBoardRepository, MongoBoardRepository};
