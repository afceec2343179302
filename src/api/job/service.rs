use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::validation::ErrorResponse;
use crate::db::{JobStore, StoreError};
use super::models::{Job, JobPatch};

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Database operation failed
    DatabaseError(StoreError),

    /// Request payload could not be read
    ValidationError(String),

    /// Job not found
    NotFound(i64),

    /// Job was changed by someone else since it was read
    ConcurrencyConflict(i64),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::NotFound(id) => write!(f, "Job not found: {}", id),
            ServiceError::ConcurrencyConflict(id) => write!(f, "Job modified concurrently: {}", id),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            StoreError::ConcurrencyConflict { id, .. } => ServiceError::ConcurrencyConflict(id),
            other => ServiceError::DatabaseError(other),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::ConcurrencyConflict(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ServiceError::DatabaseError(e) => {
                error!("Database error: {}", e);
                ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Database error occurred"}),
                }
            }
            ServiceError::ValidationError(msg) => {
                warn!("Validation error: {}", msg);
                ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: serde_json::json!({"message": msg}),
                }
            }
            ServiceError::NotFound(id) => {
                warn!("Job not found: {}", id);
                ErrorResponse {
                    error: "Not found".to_string(),
                    fields: serde_json::json!({"message": format!("Job with id {} not found", id)}),
                }
            }
            ServiceError::ConcurrencyConflict(id) => {
                warn!("Concurrent modification of job {}", id);
                ErrorResponse {
                    error: "Conflict".to_string(),
                    fields: serde_json::json!({
                        "message": format!("Job with id {} was modified by another request", id)
                    }),
                }
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Job service containing business logic
pub struct JobService {
    store: Arc<dyn JobStore>,
}

impl JobService {
    /// Create a new JobService over the given store
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> Result<Vec<Job>, ServiceError> {
        let jobs = self.store.find_all().await?;
        info!("Service: Listed {} jobs", jobs.len());
        Ok(jobs)
    }

    /// Persist a new job posting
    ///
    /// Any id or version in the payload is discarded; the store assigns both.
    pub async fn create(&self, job: Job) -> Result<Job, ServiceError> {
        if job.has_inverted_salary_range() {
            warn!("Service: Creating job with minSalary above maxSalary");
        }

        let job = Job {
            id: None,
            version: None,
            ..job
        };
        let created = self.store.save(job).await?;

        info!("Service: Job created successfully with id={:?}", created.id);
        Ok(created)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Job>, ServiceError> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Delete a job if it exists
    ///
    /// # Returns
    /// - `Ok(true)` - Job existed and was removed
    /// - `Ok(false)` - Nothing matched; no mutation happened
    pub async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        let mut tx = self.store.begin().await?;

        if !tx.exists_by_id(id).await? {
            info!("Service: Delete skipped, job {} does not exist", id);
            return Ok(false);
        }

        match tx.delete_by_id(id).await {
            Ok(()) => {}
            // removed by a concurrent request after the existence check
            Err(StoreError::NotFound(_)) => {
                info!("Service: Job {} disappeared before it could be deleted", id);
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        }
        tx.commit().await?;

        info!("Service: Job {} deleted", id);
        Ok(true)
    }

    /// Apply a patch to an existing job
    ///
    /// # Business Logic
    /// - Loads the job inside a transaction
    /// - Rejects the patch if it carries a version other than the stored one
    /// - Copies the patched fields and saves with a version check
    ///
    /// # Returns
    /// - `Ok(true)` - Job updated
    /// - `Ok(false)` - Job does not exist; nothing is created
    /// - `Err(ServiceError::ConcurrencyConflict)` - Stale version
    pub async fn update(&self, id: i64, patch: JobPatch) -> Result<bool, ServiceError> {
        let mut tx = self.store.begin().await?;

        let Some(mut job) = tx.find_by_id(id).await? else {
            info!("Service: Update skipped, job {} does not exist", id);
            return Ok(false);
        };

        if let Some(expected) = patch.expected_version {
            if job.version != Some(expected) {
                return Err(ServiceError::ConcurrencyConflict(id));
            }
        }

        patch.apply_to(&mut job);
        if job.has_inverted_salary_range() {
            warn!("Service: Job {} now has minSalary above maxSalary", id);
        }

        let saved = tx.save(job).await?;
        tx.commit().await?;

        info!("Service: Job {} updated to version {:?}", id, saved.version);
        Ok(true)
    }

    /// Round-trip to the store for health probes
    pub async fn ping(&self) -> Result<(), ServiceError> {
        Ok(self.store.ping().await?)
    }
}
