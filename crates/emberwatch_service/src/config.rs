use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // Feed configuration
    /// WebSocket URL of the telemetry feed
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Seconds between liveness probes
    #[serde(default = "default_feed_ping_interval_secs")]
    pub feed_ping_interval_secs: u64,

    /// Seconds to wait for a probe response
    #[serde(default = "default_feed_ping_timeout_secs")]
    pub feed_ping_timeout_secs: u64,

    /// Seconds to wait between reconnect attempts
    #[serde(default = "default_feed_reconnect_delay_secs")]
    pub feed_reconnect_delay_secs: u64,

    // PostgreSQL configuration
    /// PostgreSQL host
    #[serde(default = "default_postgres_host")]
    pub postgres_host: String,

    /// PostgreSQL port
    #[serde(default = "default_postgres_port")]
    pub postgres_port: u16,

    /// PostgreSQL database name
    #[serde(default = "default_postgres_database")]
    pub postgres_database: String,

    /// PostgreSQL username
    #[serde(default = "default_postgres_username")]
    pub postgres_username: String,

    /// PostgreSQL password
    #[serde(default = "default_postgres_password")]
    pub postgres_password: String,

    /// Maximum pooled PostgreSQL connections
    #[serde(default = "default_postgres_max_connections")]
    pub postgres_max_connections: usize,

    /// Path to the SQL migrations directory
    #[serde(default = "default_postgres_migrations_dir")]
    pub postgres_migrations_dir: String,

    /// Path to the goose binary
    #[serde(default = "default_goose_binary_path")]
    pub goose_binary_path: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

// Feed defaults
fn default_feed_url() -> String {
    "ws://localhost:8765/ws".to_string()
}

fn default_feed_ping_interval_secs() -> u64 {
    30
}

fn default_feed_ping_timeout_secs() -> u64 {
    10
}

fn default_feed_reconnect_delay_secs() -> u64 {
    5
}

// PostgreSQL defaults
fn default_postgres_host() -> String {
    "localhost".to_string()
}

fn default_postgres_port() -> u16 {
    5432
}

fn default_postgres_database() -> String {
    "emberwatch".to_string()
}

fn default_postgres_username() -> String {
    "emberwatch".to_string()
}

fn default_postgres_password() -> String {
    "emberwatch".to_string()
}

fn default_postgres_max_connections() -> usize {
    5
}

fn default_postgres_migrations_dir() -> String {
    "crates/emberwatch-postgres/migrations".to_string()
}

fn default_goose_binary_path() -> String {
    "goose".to_string()
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("EMBERWATCH"))
            .build()?
            .try_deserialize()
    }
}
