use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres, Transaction};
use tracing::debug;

use crate::api::job::Job;
use crate::db::models::JobRow;
use crate::db::store::{JobStore, JobTransaction, StoreError};

/// PostgreSQL-backed job store
pub struct PgJobStore {
    pool: Pool<Postgres>,
}

impl PgJobStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn find_all(&self) -> Result<Vec<Job>, StoreError> {
        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, title, description, min_salary, max_salary, location, company_id, version
            FROM jobs
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Loaded {} jobs", rows.len());
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Job>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        find_row(&mut conn, id).await
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        row_exists(&mut conn, id).await
    }

    async fn save(&self, job: Job) -> Result<Job, StoreError> {
        let mut conn = self.pool.acquire().await?;
        save_row(&mut conn, job).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        delete_row(&mut conn, id).await
    }

    async fn begin(&self) -> Result<Box<dyn JobTransaction>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgJobTransaction { tx }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Open PostgreSQL transaction; rolled back by sqlx when dropped uncommitted
pub struct PgJobTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl JobTransaction for PgJobTransaction {
    async fn find_by_id(&mut self, id: i64) -> Result<Option<Job>, StoreError> {
        find_row(&mut self.tx, id).await
    }

    async fn exists_by_id(&mut self, id: i64) -> Result<bool, StoreError> {
        row_exists(&mut self.tx, id).await
    }

    async fn save(&mut self, job: Job) -> Result<Job, StoreError> {
        save_row(&mut self.tx, job).await
    }

    async fn delete_by_id(&mut self, id: i64) -> Result<(), StoreError> {
        delete_row(&mut self.tx, id).await
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}

async fn find_row(conn: &mut PgConnection, id: i64) -> Result<Option<Job>, StoreError> {
    let row = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, title, description, min_salary, max_salary, location, company_id, version
        FROM jobs
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(Job::from))
}

async fn row_exists(conn: &mut PgConnection, id: i64) -> Result<bool, StoreError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM jobs WHERE id = $1)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(exists)
}

/// Insert a new job or compare-and-swap an existing one on its version
async fn save_row(conn: &mut PgConnection, job: Job) -> Result<Job, StoreError> {
    let Some(id) = job.id else {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (title, description, min_salary, max_salary, location, company_id, version)
            VALUES ($1, $2, $3, $4, $5, $6, 0)
            RETURNING id, title, description, min_salary, max_salary, location, company_id, version
            "#,
        )
        .bind(job.title)
        .bind(job.description)
        .bind(job.min_salary)
        .bind(job.max_salary)
        .bind(job.location)
        .bind(job.company_id)
        .fetch_one(&mut *conn)
        .await?;

        debug!("Job inserted with id={}", row.id);
        return Ok(row.into());
    };

    let expected = job.version.ok_or(StoreError::Unversioned(id))?;

    let updated = sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs
        SET title = $1, description = $2, min_salary = $3, max_salary = $4,
            location = $5, company_id = $6, version = version + 1
        WHERE id = $7 AND version = $8
        RETURNING id, title, description, min_salary, max_salary, location, company_id, version
        "#,
    )
    .bind(job.title)
    .bind(job.description)
    .bind(job.min_salary)
    .bind(job.max_salary)
    .bind(job.location)
    .bind(job.company_id)
    .bind(id)
    .bind(expected)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(row) = updated {
        debug!("Job {} updated to version {}", row.id, row.version);
        return Ok(row.into());
    }

    // zero rows: either the version moved on or the row is gone
    if row_exists(conn, id).await? {
        Err(StoreError::ConcurrencyConflict { id, expected })
    } else {
        Err(StoreError::NotFound(id))
    }
}

async fn delete_row(conn: &mut PgConnection, id: i64) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(id));
    }

    debug!("Job {} deleted", id);
    Ok(())
}
