use actix_web::{App, HttpServer, web};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

mod api;
mod cli;
mod config;
mod db;
mod logging;
mod shutdown;

use crate::api::{
    health::health_config,
    job::{JobService, handlers::job_config},
    validation,
};
use crate::cli::{Cli, Command};
use crate::db::PgJobStore;
use crate::shutdown::ShutdownCoordinator;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment
    let config::Config {
        database_url,
        host,
        port,
        max_payload_size,
        max_db_connections,
        log_dir,
    } = config::Config::from_env().map_err(std::io::Error::other)?;

    logging::init(&log_dir)?;

    info!("Starting job-board application");
    info!("Configuration loaded successfully:");
    info!("  - Max payload size: {} bytes", max_payload_size);
    info!("  - Max database connections: {}", max_db_connections);

    let pool = db::connection::get_connection(&database_url, max_db_connections)
        .await
        .map_err(std::io::Error::other)?;

    db::migrations::run_migrations(&pool)
        .await
        .map_err(std::io::Error::other)?;

    if cli.command.unwrap_or_default() == Command::Migrate {
        pool.close().await;
        return Ok(());
    }

    // Store and service are built once and injected into every worker
    let store = Arc::new(PgJobStore::new(pool.clone()));
    let job_service = web::Data::new(JobService::new(store));

    let server = HttpServer::new(move || {
        // Configure payload size limits globally
        let payload_config = web::PayloadConfig::default().limit(max_payload_size);

        App::new()
            .app_data(job_service.clone())
            .app_data(payload_config)
            .app_data(validation::json_config(max_payload_size))
            .configure(health_config)
            .configure(job_config)
    })
    .disable_signals();

    info!("Server starting on http://{}:{}", host, port);

    let server = server.bind((host.as_str(), port))?.run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();
    let server_task = actix_web::rt::spawn(server);

    let coordinator = ShutdownCoordinator::new(server_handle, server_task, pool);
    coordinator.wait_for_shutdown().await
}
