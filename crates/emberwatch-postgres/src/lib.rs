mod alert_repository;
mod client;
mod migrations;
mod models;
mod operator_repository;
mod telemetry_repository;

pub use alert_repository::PostgresAlertRepository;
pub use client::PostgresClient;
pub use migrations::MigrationRunner;
pub use models::OperatorRow;
pub use operator_repository::PostgresOperatorRepository;
pub use telemetry_repository::PostgresTelemetryRepository;
