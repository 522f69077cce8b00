use async_trait::async_trait;
use tracing::debug;

use emberwatch_domain::{
    CreateTelemetryInput, DomainError, DomainResult, TelemetryRecord, TelemetryRepository,
};

use crate::client::PostgresClient;

/// PostgreSQL implementation of the TelemetryRepository trait.
///
/// A telemetry record spans three tables (positions, vitals, telemetry);
/// the insert runs in one transaction so a partial write never survives.
#[derive(Clone)]
pub struct PostgresTelemetryRepository {
    client: PostgresClient,
}

impl PostgresTelemetryRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TelemetryRepository for PostgresTelemetryRepository {
    async fn create_telemetry(
        &self,
        input: CreateTelemetryInput,
    ) -> DomainResult<TelemetryRecord> {
        let mut conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let tx = conn
            .transaction()
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        let position_id: i64 = tx
            .query_one(
                "INSERT INTO positions (x, y, z, floor, confidence, source, beacons_used, accuracy_m)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 RETURNING id",
                &[
                    &input.position.x,
                    &input.position.y,
                    &input.position.z,
                    &input.position.floor,
                    &input.position.confidence,
                    &input.position.source,
                    &input.position.beacons_used,
                    &input.position.accuracy_m,
                ],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?
            .get(0);

        let vitals_id: i64 = tx
            .query_one(
                "INSERT INTO vitals (heart_rate_bpm, heart_rate_variability_ms, hr_zone,
                                     skin_temperature_c, motion_state, step_count,
                                     stress_level, stationary_duration_s)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 RETURNING id",
                &[
                    &input.vitals.heart_rate_bpm,
                    &input.vitals.heart_rate_variability_ms,
                    &input.vitals.hr_zone,
                    &input.vitals.skin_temperature_c,
                    &input.vitals.motion_state,
                    &input.vitals.step_count,
                    &input.vitals.stress_level,
                    &input.vitals.stationary_duration_s,
                ],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?
            .get(0);

        let id: i64 = tx
            .query_one(
                "INSERT INTO telemetry (tag_id, recorded_at, sequence, operator_id, position_id,
                                        heading_deg, vitals_id, scba_pressure_bar,
                                        battery_percent, temperature_c)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                 RETURNING id",
                &[
                    &input.tag_id,
                    &input.timestamp,
                    &input.sequence,
                    &input.operator_id,
                    &position_id,
                    &input.heading_deg,
                    &vitals_id,
                    &input.scba_pressure_bar,
                    &input.battery_percent,
                    &input.temperature_c,
                ],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?
            .get(0);

        tx.commit()
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        debug!(telemetry_id = id, tag_id = %input.tag_id, "Telemetry record created in database");

        Ok(TelemetryRecord {
            id,
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
        })
    }
}
