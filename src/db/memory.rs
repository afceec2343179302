use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api::job::Job;
use crate::db::models::JobRow;
use crate::db::store::{JobStore, JobTransaction, StoreError};

/// In-process job store with the same id, version and rollback rules as
/// the PostgreSQL store. Transactions hold the table lock until they end.
#[derive(Clone, Default)]
pub struct InMemoryJobStore {
    state: Arc<Mutex<Table>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Clone, Default)]
struct Table {
    rows: BTreeMap<i64, JobRow>,
    last_id: i64,
}

/// Build the row a job occupies under the given identity and version
fn row_from_job(id: i64, version: i64, job: Job) -> JobRow {
    JobRow {
        id,
        title: job.title,
        description: job.description,
        min_salary: job.min_salary,
        max_salary: job.max_salary,
        location: job.location,
        company_id: job.company_id,
        version,
    }
}

impl Table {
    fn find(&self, id: i64) -> Option<Job> {
        self.rows.get(&id).cloned().map(Job::from)
    }

    fn save(&mut self, job: Job) -> Result<Job, StoreError> {
        let Some(id) = job.id else {
            self.last_id += 1;
            let row = row_from_job(self.last_id, 0, job);
            self.rows.insert(row.id, row.clone());
            return Ok(row.into());
        };

        let expected = job.version.ok_or(StoreError::Unversioned(id))?;
        let current = self.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if current.version != expected {
            return Err(StoreError::ConcurrencyConflict { id, expected });
        }

        *current = row_from_job(id, expected + 1, job);
        Ok(current.clone().into())
    }

    fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        self.rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn find_all(&self) -> Result<Vec<Job>, StoreError> {
        let table = self.state.lock().await;
        Ok(table.rows.values().cloned().map(Job::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Job>, StoreError> {
        Ok(self.state.lock().await.find(id))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.state.lock().await.rows.contains_key(&id))
    }

    async fn save(&self, job: Job) -> Result<Job, StoreError> {
        self.state.lock().await.save(job)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        self.state.lock().await.delete(id)
    }

    async fn begin(&self) -> Result<Box<dyn JobTransaction>, StoreError> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryTransaction { guard, staged }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Works on a staged copy of the table; `commit` publishes it
struct InMemoryTransaction {
    guard: OwnedMutexGuard<Table>,
    staged: Table,
}

#[async_trait]
impl JobTransaction for InMemoryTransaction {
    async fn find_by_id(&mut self, id: i64) -> Result<Option<Job>, StoreError> {
        Ok(self.staged.find(id))
    }

    async fn exists_by_id(&mut self, id: i64) -> Result<bool, StoreError> {
        Ok(self.staged.rows.contains_key(&id))
    }

    async fn save(&mut self, job: Job) -> Result<Job, StoreError> {
        self.staged.save(job)
    }

    async fn delete_by_id(&mut self, id: i64) -> Result<(), StoreError> {
        self.staged.delete(id)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let InMemoryTransaction { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn posting(title: &str) -> Job {
        Job {
            title: Some(title.to_string()),
            description: Some("Builds things".to_string()),
            min_salary: Some(Decimal::from(50_000)),
            max_salary: Some(Decimal::from(90_000)),
            location: Some("Remote".to_string()),
            company_id: Some(7),
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn insert_assigns_sequential_ids_and_version_zero() {
        let store = InMemoryJobStore::new();

        let first = store.save(posting("Engineer")).await.unwrap();
        let second = store.save(posting("Designer")).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(first.version, Some(0));
        assert_eq!(store.find_all().await.unwrap().len(), 2);
        assert!(store.exists_by_id(2).await.unwrap());
        assert!(!store.exists_by_id(3).await.unwrap());
    }

    #[actix_web::test]
    async fn stale_version_is_rejected() {
        let store = InMemoryJobStore::new();
        let created = store.save(posting("Engineer")).await.unwrap();

        let mut first = store.find_by_id(1).await.unwrap().unwrap();
        let mut second = store.find_by_id(1).await.unwrap().unwrap();

        first.title = Some("first".into());
        let saved = store.save(first).await.unwrap();
        assert_eq!(saved.version, Some(1));

        second.title = Some("second".into());
        let err = store.save(second).await.unwrap_err();
        assert!(matches!(err, StoreError::ConcurrencyConflict { id: 1, expected: 0 }));

        let stored = store.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.title.as_deref(), Some("first"));
        assert_eq!(stored.description, created.description);
    }

    #[actix_web::test]
    async fn update_requires_version_and_existing_row() {
        let store = InMemoryJobStore::new();

        let unversioned = Job { id: Some(1), ..posting("x") };
        assert!(matches!(
            store.save(unversioned).await,
            Err(StoreError::Unversioned(1))
        ));

        let missing = Job { id: Some(5), version: Some(0), ..posting("x") };
        assert!(matches!(store.save(missing).await, Err(StoreError::NotFound(5))));
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn delete_of_missing_row_is_not_found() {
        let store = InMemoryJobStore::new();
        store.save(posting("Engineer")).await.unwrap();

        store.delete_by_id(1).await.unwrap();
        assert!(matches!(store.delete_by_id(1).await, Err(StoreError::NotFound(1))));
    }

    #[actix_web::test]
    async fn dropped_transaction_rolls_back() {
        let store = InMemoryJobStore::new();
        store.save(posting("Engineer")).await.unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            tx.delete_by_id(1).await.unwrap();
            assert!(!tx.exists_by_id(1).await.unwrap());
        }
        assert!(store.exists_by_id(1).await.unwrap());

        let mut tx = store.begin().await.unwrap();
        tx.delete_by_id(1).await.unwrap();
        tx.commit().await.unwrap();
        assert!(!store.exists_by_id(1).await.unwrap());
    }
}
