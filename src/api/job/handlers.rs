use actix_web::{
    HttpResponse, delete, get,
    http::header::{self, ContentType},
    post, put,
    web::{Data, Json, Path, ServiceConfig, scope},
};

use super::models::{Job, JobPatch};
use super::service::{JobService, ServiceError};

const JOB_ADDED: &str = "Job added successfully";
const JOB_DELETED: &str = "Job deleted successfully";
const JOB_NOT_DELETED: &str = "Job posting was not found to be deleted.";
const JOB_UPDATED: &str = "Job updated successfully";

fn text(mut builder: actix_web::HttpResponseBuilder, body: &'static str) -> HttpResponse {
    builder.content_type(ContentType::plaintext()).body(body)
}

#[get("")]
async fn list_jobs(service: Data<JobService>) -> Result<HttpResponse, ServiceError> {
    let jobs = service.find_all().await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// Answers with confirmation text; the new id travels in `Location`
#[post("")]
async fn create_job(
    service: Data<JobService>,
    job: Json<Job>,
) -> Result<HttpResponse, ServiceError> {
    let created = service.create(job.into_inner()).await?;

    let mut builder = HttpResponse::Ok();
    if let Some(id) = created.id {
        builder.insert_header((header::LOCATION, format!("/jobs/{}", id)));
    }
    Ok(text(builder, JOB_ADDED))
}

#[get("/{id}")]
async fn get_job(
    service: Data<JobService>,
    path: Path<i64>,
) -> Result<HttpResponse, ServiceError> {
    match service.get_by_id(path.into_inner()).await? {
        Some(job) => Ok(HttpResponse::Ok().json(job)),
        None => Ok(HttpResponse::NotFound().finish()),
    }
}

#[delete("/{id}")]
async fn delete_job(
    service: Data<JobService>,
    path: Path<i64>,
) -> Result<HttpResponse, ServiceError> {
    if service.delete_by_id(path.into_inner()).await? {
        Ok(text(HttpResponse::Ok(), JOB_DELETED))
    } else {
        Ok(text(HttpResponse::NotFound(), JOB_NOT_DELETED))
    }
}

#[put("/{id}")]
async fn update_job(
    service: Data<JobService>,
    path: Path<i64>,
    job: Json<Job>,
) -> Result<HttpResponse, ServiceError> {
    let patch = JobPatch::from(job.into_inner());
    if service.update(path.into_inner(), patch).await? {
        Ok(text(HttpResponse::Ok(), JOB_UPDATED))
    } else {
        Ok(HttpResponse::NotFound().finish())
    }
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/jobs")
            .service(list_jobs)
            .service(create_job)
            .service(get_job)
            .service(delete_job)
            .service(update_job),
    );
}
