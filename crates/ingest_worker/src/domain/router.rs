use tracing::{debug, error, info};

use crate::domain::{AlertService, RosterService, TelemetryService};
use crate::feed::DecodedEnvelope;

/// Dispatches each decoded envelope to the handler for its kind.
///
/// The match is exhaustive over the closed envelope enum, and handlers run
/// sequentially on the caller's read loop: an operator roster update is
/// always visible to the event writes routed after it. Every handler
/// failure is logged and swallowed here so no single message can take down
/// the session.
pub struct MessageRouter {
    roster: RosterService,
    telemetry: TelemetryService,
    alerts: AlertService,
}

impl MessageRouter {
    pub fn new(roster: RosterService, telemetry: TelemetryService, alerts: AlertService) -> Self {
        Self {
            roster,
            telemetry,
            alerts,
        }
    }

    pub async fn route(&self, envelope: DecodedEnvelope) {
        match envelope {
            DecodedEnvelope::Welcome { simulator_version } => {
                info!(
                    simulator_version = simulator_version.as_deref().unwrap_or("unknown"),
                    "feed welcome received"
                );
            }
            DecodedEnvelope::BeaconsConfig { beacon_count } => {
                info!(beacon_count, "received beacon configuration");
            }
            DecodedEnvelope::Roster(payload) => match self.roster.apply_roster(payload).await {
                Ok(outcome) => debug!(
                    created = outcome.created,
                    updated = outcome.updated,
                    skipped = outcome.skipped,
                    "operator roster applied"
                ),
                Err(e) => error!(error = %e, "failed to apply operator roster"),
            },
            DecodedEnvelope::Telemetry(payload) => {
                if let Err(e) = self.telemetry.ingest(payload).await {
                    error!(error = %e, "failed to ingest telemetry message");
                }
            }
            DecodedEnvelope::Alert(payload) => {
                if let Err(e) = self.alerts.ingest(payload).await {
                    error!(error = %e, "failed to ingest alert message");
                }
            }
            DecodedEnvelope::Unrecognized => {}
        }
    }
}
