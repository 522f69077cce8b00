use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, instrument, warn};

use emberwatch_domain::{
    CreateOperatorInput, DomainError, DomainResult, Operator, OperatorRepository,
    UpdateOperatorInput,
};

use crate::feed::OperatorPayload;

/// Summary of one applied roster message.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RosterOutcome {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

enum Upserted {
    Created(Operator),
    Updated(Operator),
}

/// Handles `firefighters_list` messages: upserts each operator payload
/// independently so one bad entry never blocks the rest.
pub struct RosterService {
    operators: Arc<dyn OperatorRepository>,
}

impl RosterService {
    pub fn new(operators: Arc<dyn OperatorRepository>) -> Self {
        Self { operators }
    }

    #[instrument(skip_all)]
    pub async fn apply_roster(&self, payload: Value) -> DomainResult<RosterOutcome> {
        let entries = payload
            .get("firefighters")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        if entries.is_empty() {
            warn!("received an empty operator roster");
            return Ok(RosterOutcome::default());
        }

        let mut outcome = RosterOutcome::default();
        for entry in entries {
            match self.apply_entry(entry).await {
                Ok(Upserted::Created(operator)) => {
                    outcome.created += 1;
                    info!(
                        operator_id = %operator.operator_id,
                        name = %operator.name,
                        "operator created from roster"
                    );
                }
                Ok(Upserted::Updated(operator)) => {
                    outcome.updated += 1;
                    info!(
                        operator_id = %operator.operator_id,
                        name = %operator.name,
                        "operator updated from roster"
                    );
                }
                Err(e) => {
                    outcome.skipped += 1;
                    error!(error = %e, "skipping roster entry");
                }
            }
        }

        Ok(outcome)
    }

    /// Upsert one roster entry. Present fields overwrite, absent fields
    /// are left untouched on update and defaulted to empty on create.
    async fn apply_entry(&self, entry: Value) -> DomainResult<Upserted> {
        let payload: OperatorPayload =
            serde_json::from_value(entry).map_err(|e| DomainError::MalformedPayload {
                kind: "roster",
                detail: e.to_string(),
            })?;

        match self.operators.get_operator(&payload.id).await? {
            Some(_) => {
                let updated = self
                    .operators
                    .update_operator(UpdateOperatorInput {
                        operator_id: payload.id,
                        tag_id: payload.tag_id,
                        name: payload.name,
                        rank: payload.rank,
                        role: payload.role,
                        team: payload.team,
                    })
                    .await?;
                Ok(Upserted::Updated(updated))
            }
            None => {
                let created = self
                    .operators
                    .create_operator(CreateOperatorInput {
                        operator_id: payload.id,
                        tag_id: payload.tag_id,
                        name: payload.name.unwrap_or_default(),
                        rank: payload.rank.unwrap_or_default(),
                        role: payload.role.unwrap_or_default(),
                        team: payload.team.unwrap_or_default(),
                    })
                    .await?;
                Ok(Upserted::Created(created))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emberwatch_domain::MockOperatorRepository;
    use serde_json::json;

    fn operator(operator_id: &str, name: &str, team: &str) -> Operator {
        Operator {
            operator_id: operator_id.to_string(),
            tag_id: Some("TAG-01".to_string()),
            name: name.to_string(),
            rank: "sekc.".to_string(),
            role: "nozzle".to_string(),
            team: team.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_unknown_operator_is_created_with_defaults() {
        // Arrange
        let mut mock_operators = MockOperatorRepository::new();

        mock_operators
            .expect_get_operator()
            .withf(|operator_id| operator_id == "ff-01")
            .times(1)
            .returning(|_| Ok(None));

        mock_operators
            .expect_create_operator()
            .withf(|input: &CreateOperatorInput| {
                input.operator_id == "ff-01"
                    && input.name == "Jan Kowalski"
                    && input.rank.is_empty()
                    && input.team.is_empty()
            })
            .times(1)
            .returning(|input| {
                Ok(Operator {
                    operator_id: input.operator_id,
                    tag_id: input.tag_id,
                    name: input.name,
                    rank: input.rank,
                    role: input.role,
                    team: input.team,
                    created_at: None,
                    updated_at: None,
                })
            });

        let service = RosterService::new(Arc::new(mock_operators));

        let payload = json!({
            "type": "firefighters_list",
            "firefighters": [{"id": "ff-01", "name": "Jan Kowalski"}]
        });

        // Act
        let outcome = service.apply_roster(payload).await.unwrap();

        // Assert
        assert_eq!(
            outcome,
            RosterOutcome {
                created: 1,
                updated: 0,
                skipped: 0
            }
        );
    }

    #[tokio::test]
    async fn test_known_operator_gets_partial_update() {
        // Arrange
        let mut mock_operators = MockOperatorRepository::new();

        mock_operators
            .expect_get_operator()
            .times(1)
            .returning(|_| Ok(Some(operator("ff-01", "Jan Kowalski", "alpha"))));

        // Only the team is present in the payload, so only the team may be
        // set in the update input.
        mock_operators
            .expect_update_operator()
            .withf(|input: &UpdateOperatorInput| {
                input.operator_id == "ff-01"
                    && input.team.as_deref() == Some("bravo")
                    && input.name.is_none()
                    && input.rank.is_none()
                    && input.role.is_none()
                    && input.tag_id.is_none()
            })
            .times(1)
            .returning(|_| Ok(operator("ff-01", "Jan Kowalski", "bravo")));

        let service = RosterService::new(Arc::new(mock_operators));

        let payload = json!({
            "type": "firefighters_list",
            "firefighters": [{"id": "ff-01", "team": "bravo"}]
        });

        // Act
        let outcome = service.apply_roster(payload).await.unwrap();

        // Assert
        assert_eq!(
            outcome,
            RosterOutcome {
                created: 0,
                updated: 1,
                skipped: 0
            }
        );
    }

    #[tokio::test]
    async fn test_empty_roster_is_a_warned_noop() {
        // Arrange: any repository call would fail the test
        let mut mock_operators = MockOperatorRepository::new();
        mock_operators.expect_get_operator().times(0);
        mock_operators.expect_create_operator().times(0);
        mock_operators.expect_update_operator().times(0);

        let service = RosterService::new(Arc::new(mock_operators));

        let payload = json!({"type": "firefighters_list", "firefighters": []});

        // Act
        let outcome = service.apply_roster(payload).await.unwrap();

        // Assert
        assert_eq!(outcome, RosterOutcome::default());
    }

    #[tokio::test]
    async fn test_invalid_entry_is_skipped_and_rest_processed() {
        // Arrange
        let mut mock_operators = MockOperatorRepository::new();

        mock_operators
            .expect_get_operator()
            .withf(|operator_id| operator_id == "ff-02")
            .times(1)
            .returning(|_| Ok(None));

        mock_operators
            .expect_create_operator()
            .withf(|input: &CreateOperatorInput| input.operator_id == "ff-02")
            .times(1)
            .returning(|input| {
                Ok(Operator {
                    operator_id: input.operator_id,
                    tag_id: None,
                    name: input.name,
                    rank: input.rank,
                    role: input.role,
                    team: input.team,
                    created_at: None,
                    updated_at: None,
                })
            });

        let service = RosterService::new(Arc::new(mock_operators));

        // First entry has no id and must not abort the second one
        let payload = json!({
            "type": "firefighters_list",
            "firefighters": [
                {"name": "No Id"},
                {"id": "ff-02", "name": "Anna Nowak"}
            ]
        });

        // Act
        let outcome = service.apply_roster(payload).await.unwrap();

        // Assert
        assert_eq!(
            outcome,
            RosterOutcome {
                created: 1,
                updated: 0,
                skipped: 1
            }
        );
    }
}
