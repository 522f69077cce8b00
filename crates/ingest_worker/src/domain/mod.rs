mod alert_service;
mod roster_service;
mod router;
mod telemetry_service;

pub use alert_service::AlertService;
pub use roster_service::{RosterOutcome, RosterService};
pub use router::MessageRouter;
pub use telemetry_service::TelemetryService;
