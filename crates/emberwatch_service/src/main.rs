mod config;
mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use crate::config::ServiceConfig;
use emberwatch_postgres::{
    MigrationRunner, PostgresAlertRepository, PostgresClient, PostgresOperatorRepository,
    PostgresTelemetryRepository,
};
use emberwatch_runner::Runner;
use ingest_worker::ingest_worker::{IngestWorker, IngestWorkerConfig};
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    let config = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = telemetry::init_telemetry(&config.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(feed_url = %config.feed_url, "Starting emberwatch ingest service");
    debug!("Configuration: {:?}", config);

    if let Err(e) = run_postgres_migrations(&config).await {
        error!("Failed to run migrations: {:#}", e);
        std::process::exit(1);
    }

    let postgres_client = match create_postgres_client(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to initialize PostgreSQL: {:#}", e);
            std::process::exit(1);
        }
    };

    let operator_repository = Arc::new(PostgresOperatorRepository::new(postgres_client.clone()));
    let telemetry_repository = Arc::new(PostgresTelemetryRepository::new(postgres_client.clone()));
    let alert_repository = Arc::new(PostgresAlertRepository::new(postgres_client));

    let ingest_worker = IngestWorker::new(
        operator_repository,
        telemetry_repository,
        alert_repository,
        IngestWorkerConfig {
            feed_url: config.feed_url.clone(),
            ping_interval_secs: config.feed_ping_interval_secs,
            ping_timeout_secs: config.feed_ping_timeout_secs,
            reconnect_delay_secs: config.feed_reconnect_delay_secs,
        },
    );

    Runner::new()
        .with_named_process("ingest_worker", ingest_worker.into_runner_process())
        .with_closer(|| async {
            info!("Cleanup complete");
            Ok(())
        })
        .with_closer_timeout(Duration::from_secs(10))
        .run()
        .await;
}

async fn run_postgres_migrations(config: &ServiceConfig) -> anyhow::Result<()> {
    let postgres_dsn = format!(
        "postgres://{}:{}@{}:{}/{}?sslmode=disable",
        config.postgres_username,
        config.postgres_password,
        config.postgres_host,
        config.postgres_port,
        config.postgres_database
    );
    let runner = MigrationRunner::new(
        config.goose_binary_path.clone(),
        config.postgres_migrations_dir.clone(),
        postgres_dsn,
    );
    runner.run_migrations().await
}

fn create_postgres_client(config: &ServiceConfig) -> anyhow::Result<PostgresClient> {
    PostgresClient::new(
        &config.postgres_host,
        config.postgres_port,
        &config.postgres_database,
        &config.postgres_username,
        &config.postgres_password,
        config.postgres_max_connections,
    )
}
