use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use emberwatch_domain::{Alert, AlertRepository, CreateAlertInput, DomainError, DomainResult};

use crate::client::PostgresClient;

/// PostgreSQL implementation of the AlertRepository trait.
///
/// The alert row and its optional position/details sub-rows are written in
/// one transaction; a duplicate external id aborts the whole write and is
/// surfaced as `AlertAlreadyExists`.
#[derive(Clone)]
pub struct PostgresAlertRepository {
    client: PostgresClient,
}

impl PostgresAlertRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AlertRepository for PostgresAlertRepository {
    async fn create_alert(&self, input: CreateAlertInput) -> DomainResult<Alert> {
        let mut conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let tx = conn
            .transaction()
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        let position_id: Option<i64> = match &input.position {
            Some(position) => {
                let id = tx
                    .query_one(
                        "INSERT INTO alert_positions (x, y, z, floor)
                         VALUES ($1, $2, $3, $4)
                         RETURNING id",
                        &[&position.x, &position.y, &position.z, &position.floor],
                    )
                    .await
                    .map_err(|e| DomainError::RepositoryError(e.into()))?
                    .get(0);
                Some(id)
            }
            None => None,
        };

        let details_id: Option<i64> = match &input.details {
            Some(details) => {
                let id = tx
                    .query_one(
                        "INSERT INTO alert_details (stationary_duration_s, last_motion_state, last_heart_rate)
                         VALUES ($1, $2, $3)
                         RETURNING id",
                        &[
                            &details.stationary_duration_s,
                            &details.last_motion_state,
                            &details.last_heart_rate,
                        ],
                    )
                    .await
                    .map_err(|e| DomainError::RepositoryError(e.into()))?
                    .get(0);
                Some(id)
            }
            None => None,
        };

        let now = Utc::now();

        let result = tx
            .execute(
                "INSERT INTO alerts (external_id, alert_type, severity, recorded_at, tag_id,
                                     operator_id, position_id, details_id, resolved,
                                     acknowledged, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
                &[
                    &input.external_id,
                    &input.alert_type,
                    &input.severity,
                    &input.timestamp,
                    &input.tag_id,
                    &input.operator_id,
                    &position_id,
                    &details_id,
                    &input.resolved,
                    &input.acknowledged,
                    &now,
                ],
            )
            .await;

        // A duplicate external id rolls back the sub-rows with the failed
        // transaction. PostgreSQL error code 23505 is unique_violation.
        if let Err(e) = result {
            if let Some(db_err) = e.as_db_error() {
                if db_err.code().code() == "23505" {
                    return Err(DomainError::AlertAlreadyExists(input.external_id));
                }
            }
            return Err(DomainError::RepositoryError(e.into()));
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        info!(
            external_id = %input.external_id,
            alert_type = %input.alert_type,
            "Alert created in database"
        );

        Ok(Alert {
            external_id: input.external_id,
            alert_type: input.alert_type,
            severity: input.severity,
            timestamp: input.timestamp,
            tag_id: input.tag_id,
            operator_id: input.operator_id,
            position: input.position,
            details: input.details,
            resolved: input.resolved,
            acknowledged: input.acknowledged,
            created_at: Some(now),
        })
    }
}
