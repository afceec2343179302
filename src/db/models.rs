use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::api::job::Job;

/// Database representation of a job with all fields
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct JobRow {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub min_salary: Option<Decimal>,
    pub max_salary: Option<Decimal>,
    pub location: Option<String>,
    pub company_id: Option<i64>,
    pub version: i64,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: Some(row.id),
            title: row.title,
            description: row.description,
            min_salary: row.min_salary,
            max_salary: row.max_salary,
            location: row.location,
            company_id: row.company_id,
            version: Some(row.version),
        }
    }
}
