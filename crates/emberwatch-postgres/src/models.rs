use chrono::{DateTime, Utc};
use emberwatch_domain::Operator;

/// Operator row as stored in PostgreSQL.
#[derive(Debug, Clone)]
pub struct OperatorRow {
    pub operator_id: String,
    pub tag_id: Option<String>,
    pub name: String,
    pub rank: String,
    pub role: String,
    pub team: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OperatorRow> for Operator {
    fn from(row: OperatorRow) -> Self {
        Operator {
            operator_id: row.operator_id,
            tag_id: row.tag_id,
            name: row.name,
            rank: row.rank,
            role: row.role,
            team: row.team,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

impl OperatorRow {
    /// Build a row from a tokio-postgres row produced by the canonical
    /// eight-column operator SELECT/RETURNING list.
    pub fn from_row(row: &tokio_postgres::Row) -> Self {
        Self {
            operator_id: row.get(0),
            tag_id: row.get(1),
            name: row.get(2),
            rank: row.get(3),
            role: row.get(4),
            team: row.get(5),
            created_at: row.get(6),
            updated_at: row.get(7),
        }
    }
}
