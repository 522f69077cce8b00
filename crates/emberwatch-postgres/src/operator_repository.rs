use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use emberwatch_domain::{
    CreateOperatorInput, DomainError, DomainResult, Operator, OperatorRepository,
    UpdateOperatorInput,
};

use crate::client::PostgresClient;
use crate::models::OperatorRow;

const OPERATOR_COLUMNS: &str =
    "operator_id, tag_id, name, rank, role, team, created_at, updated_at";

/// PostgreSQL implementation of the OperatorRepository trait.
#[derive(Clone)]
pub struct PostgresOperatorRepository {
    client: PostgresClient,
}

impl PostgresOperatorRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OperatorRepository for PostgresOperatorRepository {
    async fn get_operator(&self, operator_id: &str) -> DomainResult<Option<Operator>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let row = conn
            .query_opt(
                &format!(
                    "SELECT {OPERATOR_COLUMNS}
                     FROM operators
                     WHERE operator_id = $1"
                ),
                &[&operator_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        Ok(row.map(|row| OperatorRow::from_row(&row).into()))
    }

    async fn create_operator(&self, input: CreateOperatorInput) -> DomainResult<Operator> {
        debug!(operator_id = %input.operator_id, "Creating operator in database");

        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let now = Utc::now();

        conn.execute(
            "INSERT INTO operators (operator_id, tag_id, name, rank, role, team, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            &[
                &input.operator_id,
                &input.tag_id,
                &input.name,
                &input.rank,
                &input.role,
                &input.team,
                &now,
                &now,
            ],
        )
        .await
        .map_err(|e| DomainError::RepositoryError(e.into()))?;

        info!(operator_id = %input.operator_id, "Operator created in database");

        Ok(Operator {
            operator_id: input.operator_id,
            tag_id: input.tag_id,
            name: input.name,
            rank: input.rank,
            role: input.role,
            team: input.team,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }

    async fn update_operator(&self, input: UpdateOperatorInput) -> DomainResult<Operator> {
        debug!(operator_id = %input.operator_id, "Updating operator in database");

        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let now = Utc::now();

        // Build the UPDATE dynamically so absent fields keep their stored
        // values; the single statement keeps the partial update atomic.
        let mut query = String::from("UPDATE operators SET updated_at = $1");
        let mut params: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> = vec![&now];
        let mut param_idx = 2;

        if let Some(ref tag_id) = input.tag_id {
            query.push_str(&format!(", tag_id = ${param_idx}"));
            params.push(tag_id);
            param_idx += 1;
        }
        if let Some(ref name) = input.name {
            query.push_str(&format!(", name = ${param_idx}"));
            params.push(name);
            param_idx += 1;
        }
        if let Some(ref rank) = input.rank {
            query.push_str(&format!(", rank = ${param_idx}"));
            params.push(rank);
            param_idx += 1;
        }
        if let Some(ref role) = input.role {
            query.push_str(&format!(", role = ${param_idx}"));
            params.push(role);
            param_idx += 1;
        }
        if let Some(ref team) = input.team {
            query.push_str(&format!(", team = ${param_idx}"));
            params.push(team);
            param_idx += 1;
        }

        query.push_str(&format!(
            " WHERE operator_id = ${param_idx} RETURNING {OPERATOR_COLUMNS}"
        ));
        params.push(&input.operator_id);

        let row = conn
            .query_opt(&query, &params[..])
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        match row {
            Some(row) => {
                let operator_row = OperatorRow::from_row(&row);
                info!(operator_id = %operator_row.operator_id, "Operator updated in database");
                Ok(operator_row.into())
            }
            None => Err(DomainError::OperatorNotFound(input.operator_id)),
        }
    }
}
