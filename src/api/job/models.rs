use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Job posting as exchanged over HTTP and returned by the store
///
/// `id` and `version` are unset until the store persists the record.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub min_salary: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub max_salary: Option<Decimal>,
    pub location: Option<String>,
    /// Company the posting belongs to, by value only
    pub company_id: Option<i64>,
    pub version: Option<i64>,
}

impl Job {
    /// True when both bounds are set and the minimum exceeds the maximum
    pub fn has_inverted_salary_range(&self) -> bool {
        matches!((self.min_salary, self.max_salary), (Some(min), Some(max)) if min > max)
    }
}

/// Mutable subset of a job accepted by an update
///
/// A `None` field keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub min_salary: Option<Decimal>,
    pub max_salary: Option<Decimal>,
    pub location: Option<String>,
    /// Version the client last saw; compared against the stored version
    pub expected_version: Option<i64>,
}

impl JobPatch {
    pub fn apply_to(self, job: &mut Job) {
        if let Some(title) = self.title {
            job.title = Some(title);
        }
        if let Some(description) = self.description {
            job.description = Some(description);
        }
        if let Some(min_salary) = self.min_salary {
            job.min_salary = Some(min_salary);
        }
        if let Some(max_salary) = self.max_salary {
            job.max_salary = Some(max_salary);
        }
        if let Some(location) = self.location {
            job.location = Some(location);
        }
    }
}

impl From<Job> for JobPatch {
    fn from(job: Job) -> Self {
        // id and company_id are identity, never patched
        Self {
            title: job.title,
            description: job.description,
            min_salary: job.min_salary,
            max_salary: job.max_salary,
            location: job.location,
            expected_version: job.version,
        }
    }
}
