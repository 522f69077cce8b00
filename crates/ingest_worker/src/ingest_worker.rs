use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use emberwatch_domain::{AlertRepository, OperatorRepository, TelemetryRepository};

use crate::domain::{AlertService, MessageRouter, RosterService, TelemetryService};
use crate::feed::{FeedListener, FeedListenerConfig};

pub struct IngestWorkerConfig {
    pub feed_url: String,
    pub ping_interval_secs: u64,
    pub ping_timeout_secs: u64,
    pub reconnect_delay_secs: u64,
}

/// The stream ingestion module: wires the handler services into a router
/// and runs the feed listener as a single long-lived process.
pub struct IngestWorker {
    listener: FeedListener,
}

impl IngestWorker {
    pub fn new(
        operator_repository: Arc<dyn OperatorRepository>,
        telemetry_repository: Arc<dyn TelemetryRepository>,
        alert_repository: Arc<dyn AlertRepository>,
        config: IngestWorkerConfig,
    ) -> Self {
        info!("Initializing ingest worker module");

        let router = MessageRouter::new(
            RosterService::new(operator_repository.clone()),
            TelemetryService::new(operator_repository.clone(), telemetry_repository),
            AlertService::new(operator_repository, alert_repository),
        );

        let listener = FeedListener::new(
            FeedListenerConfig {
                url: config.feed_url,
                ping_interval: Duration::from_secs(config.ping_interval_secs),
                ping_timeout: Duration::from_secs(config.ping_timeout_secs),
                reconnect_delay: Duration::from_secs(config.reconnect_delay_secs),
            },
            router,
        );

        Self { listener }
    }

    #[allow(clippy::type_complexity)]
    pub fn into_runner_process(
        self,
    ) -> Box<
        dyn FnOnce(
                CancellationToken,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = anyhow::Result<()>> + Send>,
            > + Send,
    > {
        Box::new({
            let listener = self.listener;
            move |ctx| Box::pin(async move { listener.run(ctx).await })
        })
    }
}
