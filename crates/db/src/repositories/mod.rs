use async_trait::async_trait;
use thiserror::Error;

use reliefline_core::{AidRequest, InsuranceClaim};

pub mod aid;
pub mod claim;
pub mod memory;

pub use aid::SqlAidRequestRepository;
pub use claim::SqlInsuranceClaimRepository;
pub use memory::{InMemoryAidRequestRepository, InMemoryInsuranceClaimRepository};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Append-only store for aid requests. `insert` performs exactly one write;
/// `list` exists for operational inspection and tests.
#[async_trait]
pub trait AidRequestRepository: Send + Sync {
    async fn insert(&self, record: AidRequest) -> Result<(), RepositoryError>;
    async fn list(&self) -> Result<Vec<AidRequest>, RepositoryError>;
}

#[async_trait]
pub trait InsuranceClaimRepository: Send + Sync {
    async fn insert(&self, record: InsuranceClaim) -> Result<(), RepositoryError>;
    async fn list(&self) -> Result<Vec<InsuranceClaim>, RepositoryError>;
}
