pub mod health;
pub mod index;
pub mod info;
pub mod metrics;

pub use health::{health, health_group};
pub use index::links;
pub use info::info;
pub use self::metrics::prometheus;

use service_core::error::AppError;

pub async fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("No management endpoint at this path"))
}
