use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use emberwatch_domain::{
    CreateTelemetryInput, DomainError, DomainResult, OperatorRepository, Position,
    TelemetryRecord, TelemetryRepository, Vitals,
};

use crate::feed::TelemetryMessage;

/// Handles `tag_telemetry` messages: flattens the nested payload into one
/// record and persists it.
pub struct TelemetryService {
    operators: Arc<dyn OperatorRepository>,
    telemetry: Arc<dyn TelemetryRepository>,
}

impl TelemetryService {
    pub fn new(
        operators: Arc<dyn OperatorRepository>,
        telemetry: Arc<dyn TelemetryRepository>,
    ) -> Self {
        Self {
            operators,
            telemetry,
        }
    }

    #[instrument(skip_all)]
    pub async fn ingest(&self, payload: Value) -> DomainResult<TelemetryRecord> {
        let message: TelemetryMessage =
            serde_json::from_value(payload).map_err(|e| DomainError::MalformedPayload {
                kind: "telemetry",
                detail: e.to_string(),
            })?;

        // An unknown operator never blocks the write; the reference is
        // simply left null.
        let operator_id = match self.operators.get_operator(&message.firefighter.id).await? {
            Some(operator) => Some(operator.operator_id),
            None => {
                debug!(
                    operator_id = %message.firefighter.id,
                    "telemetry references an unknown operator, storing without reference"
                );
                None
            }
        };

        let record = self
            .telemetry
            .create_telemetry(CreateTelemetryInput {
                tag_id: message.tag_id,
                timestamp: message.timestamp,
                sequence: message.sequence,
                operator_id,
                position: Position::from_stream(
                    message.position.x,
                    message.position.y,
                    message.position.z,
                    message.position.floor,
                ),
                heading_deg: message.heading_deg,
                vitals: Vitals::from_stream(
                    message.vitals.heart_rate_bpm,
                    message.vitals.motion_state,
                ),
                scba_pressure_bar: message.scba.cylinder_pressure_bar,
                battery_percent: message.device.battery_percent,
                temperature_c: message.environment.temperature_c,
            })
            .await?;

        debug!(
            telemetry_id = record.id,
            tag_id = %record.tag_id,
            sequence = record.sequence,
            "telemetry record persisted"
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emberwatch_domain::{MockOperatorRepository, MockTelemetryRepository, Operator};
    use serde_json::json;

    fn telemetry_payload() -> Value {
        json!({
            "type": "tag_telemetry",
            "firefighter": {"id": "ff-01", "name": "Jan Kowalski"},
            "tag_id": "TAG-01",
            "timestamp": "2025-06-01T12:00:00Z",
            "sequence": 7,
            "position": {"x": 1.0, "y": 2.0, "z": 0.5, "floor": 2},
            "heading_deg": 45.0,
            "vitals": {"heart_rate_bpm": 110, "motion_state": "walking"},
            "scba": {"cylinder_pressure_bar": 250.0},
            "device": {"battery_percent": 92},
            "environment": {"temperature_c": 38.5}
        })
    }

    fn record_from(input: CreateTelemetryInput) -> TelemetryRecord {
        TelemetryRecord {
            id: 1,
            tag_id: input.tag_id,
            timestamp: input.timestamp,
            sequence: input.sequence,
            operator_id: input.operator_id,
            position: input.position,
            heading_deg: input.heading_deg,
            vitals: input.vitals,
            scba_pressure_bar: input.scba_pressure_bar,
            battery_percent: input.battery_percent,
            temperature_c: input.temperature_c,
        }
    }

    #[tokio::test]
    async fn test_ingest_resolves_known_operator() {
        // Arrange
        let mut mock_operators = MockOperatorRepository::new();
        let mut mock_telemetry = MockTelemetryRepository::new();

        mock_operators
            .expect_get_operator()
            .withf(|operator_id| operator_id == "ff-01")
            .times(1)
            .returning(|_| {
                Ok(Some(Operator {
                    operator_id: "ff-01".to_string(),
                    tag_id: Some("TAG-01".to_string()),
                    name: "Jan Kowalski".to_string(),
                    rank: String::new(),
                    role: String::new(),
                    team: String::new(),
                    created_at: None,
                    updated_at: None,
                }))
            });

        mock_telemetry
            .expect_create_telemetry()
            .withf(|input: &CreateTelemetryInput| {
                input.operator_id.as_deref() == Some("ff-01")
                    && input.tag_id == "TAG-01"
                    && input.sequence == 7
                    && input.position.floor == 2
                    && input.position.source == "stream"
                    && input.position.confidence == 1.0
                    && input.vitals.heart_rate_bpm == 110
                    && input.vitals.motion_state == "walking"
                    && input.scba_pressure_bar == 250.0
                    && input.battery_percent == 92
                    && input.temperature_c == 38.5
            })
            .times(1)
            .returning(|input| Ok(record_from(input)));

        let service = TelemetryService::new(Arc::new(mock_operators), Arc::new(mock_telemetry));

        // Act
        let record = service.ingest(telemetry_payload()).await.unwrap();

        // Assert
        assert_eq!(record.operator_id.as_deref(), Some("ff-01"));
    }

    #[tokio::test]
    async fn test_ingest_unknown_operator_stores_null_reference() {
        // Arrange
        let mut mock_operators = MockOperatorRepository::new();
        let mut mock_telemetry = MockTelemetryRepository::new();

        mock_operators
            .expect_get_operator()
            .times(1)
            .returning(|_| Ok(None));

        mock_telemetry
            .expect_create_telemetry()
            .withf(|input: &CreateTelemetryInput| input.operator_id.is_none())
            .times(1)
            .returning(|input| Ok(record_from(input)));

        let service = TelemetryService::new(Arc::new(mock_operators), Arc::new(mock_telemetry));

        // Act
        let record = service.ingest(telemetry_payload()).await.unwrap();

        // Assert
        assert_eq!(record.operator_id, None);
    }

    #[tokio::test]
    async fn test_ingest_missing_required_field_is_structural_error() {
        // Arrange: no repository call may happen for a malformed message
        let mut mock_operators = MockOperatorRepository::new();
        let mut mock_telemetry = MockTelemetryRepository::new();
        mock_operators.expect_get_operator().times(0);
        mock_telemetry.expect_create_telemetry().times(0);

        let service = TelemetryService::new(Arc::new(mock_operators), Arc::new(mock_telemetry));

        let mut payload = telemetry_payload();
        payload["position"].as_object_mut().unwrap().remove("floor");

        // Act
        let result = service.ingest(payload).await;

        // Assert
        match result {
            Err(DomainError::MalformedPayload { kind, detail }) => {
                assert_eq!(kind, "telemetry");
                assert!(detail.contains("floor"), "detail should name the key: {detail}");
            }
            other => panic!("expected MalformedPayload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ingest_defaults_sequence_and_heading() {
        // Arrange
        let mut mock_operators = MockOperatorRepository::new();
        let mut mock_telemetry = MockTelemetryRepository::new();

        mock_operators
            .expect_get_operator()
            .times(1)
            .returning(|_| Ok(None));

        mock_telemetry
            .expect_create_telemetry()
            .withf(|input: &CreateTelemetryInput| input.sequence == 0 && input.heading_deg == 0.0)
            .times(1)
            .returning(|input| Ok(record_from(input)));

        let service = TelemetryService::new(Arc::new(mock_operators), Arc::new(mock_telemetry));

        let mut payload = telemetry_payload();
        payload.as_object_mut().unwrap().remove("sequence");
        payload.as_object_mut().unwrap().remove("heading_deg");

        // Act
        let record = service.ingest(payload).await.unwrap();

        // Assert
        assert_eq!(record.sequence, 0);
        assert_eq!(record.heading_deg, 0.0);
    }
}
