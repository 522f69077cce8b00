use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use emberwatch_domain::{
    Alert, AlertDetails, AlertPosition, AlertRepository, CreateAlertInput, DomainError,
    DomainResult, OperatorRepository,
};

use crate::feed::{AlertDetailsPayload, AlertMessage};

/// Handles `alert` messages: builds the optional position/details
/// sub-records and persists the alert under its external id.
pub struct AlertService {
    operators: Arc<dyn OperatorRepository>,
    alerts: Arc<dyn AlertRepository>,
}

impl AlertService {
    pub fn new(operators: Arc<dyn OperatorRepository>, alerts: Arc<dyn AlertRepository>) -> Self {
        Self { operators, alerts }
    }

    #[instrument(skip_all)]
    pub async fn ingest(&self, payload: Value) -> DomainResult<Alert> {
        let message: AlertMessage =
            serde_json::from_value(payload).map_err(|e| DomainError::MalformedPayload {
                kind: "alert",
                detail: e.to_string(),
            })?;

        let operator_id = match &message.firefighter {
            Some(reference) => {
                let operator = self.operators.get_operator(&reference.id).await?;
                if operator.is_none() {
                    debug!(
                        operator_id = %reference.id,
                        "alert references an unknown operator, storing without reference"
                    );
                }
                operator.map(|operator| operator.operator_id)
            }
            None => None,
        };

        // A position sub-record exists only when the source carries an x
        // coordinate; y falls back to 0.0 and z stays nullable.
        let position = message.position.as_ref().and_then(|p| {
            p.x.map(|x| AlertPosition {
                x,
                y: p.y.unwrap_or(0.0),
                z: p.z,
                floor: p.floor,
            })
        });

        // A details sub-record exists only for a non-empty details object.
        let details = match message.details {
            Some(map) if !map.is_empty() => {
                let parsed: AlertDetailsPayload = serde_json::from_value(Value::Object(map))
                    .map_err(|e| DomainError::MalformedPayload {
                        kind: "alert",
                        detail: e.to_string(),
                    })?;
                Some(AlertDetails {
                    stationary_duration_s: parsed.stationary_duration_s,
                    last_motion_state: parsed.last_motion_state,
                    last_heart_rate: parsed.last_heart_rate,
                })
            }
            _ => None,
        };

        let alert = self
            .alerts
            .create_alert(CreateAlertInput {
                external_id: message.id,
                alert_type: message.alert_type,
                severity: message.severity,
                timestamp: message.timestamp,
                tag_id: message.tag_id,
                operator_id,
                position,
                details,
                resolved: message.resolved,
                acknowledged: message.acknowledged,
            })
            .await?;

        warn!(
            external_id = %alert.external_id,
            alert_type = %alert.alert_type,
            severity = %alert.severity,
            "safety alert persisted"
        );

        Ok(alert)
    }
}
