use async_trait::async_trait;

use crate::api::job::Job;

/// Failures raised by a job store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("job {0} not found")]
    NotFound(i64),
    #[error("job {id} was modified concurrently (expected version {expected})")]
    ConcurrencyConflict { id: i64, expected: i64 },
    #[error("job {0} cannot be updated without a version")]
    Unversioned(i64),
}

/// Persistence port for job postings
///
/// `save` inserts when the job has no id and otherwise performs a
/// compare-and-swap on `version`, failing with
/// [`StoreError::ConcurrencyConflict`] when the stored version moved on.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Job>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Job>, StoreError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, StoreError>;

    async fn save(&self, job: Job) -> Result<Job, StoreError>;

    /// Fails with [`StoreError::NotFound`] when no row was removed
    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;

    /// Open a transaction; dropping it without `commit` rolls back
    async fn begin(&self) -> Result<Box<dyn JobTransaction>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Request-scoped unit of work over the job table
#[async_trait]
pub trait JobTransaction: Send {
    async fn find_by_id(&mut self, id: i64) -> Result<Option<Job>, StoreError>;

    async fn exists_by_id(&mut self, id: i64) -> Result<bool, StoreError>;

    async fn save(&mut self, job: Job) -> Result<Job, StoreError>;

    async fn delete_by_id(&mut self, id: i64) -> Result<(), StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
