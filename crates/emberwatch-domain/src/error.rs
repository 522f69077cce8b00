use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Malformed {kind} payload: {detail}")]
    MalformedPayload { kind: &'static str, detail: String },

    #[error("Alert already exists: {0}")]
    AlertAlreadyExists(String),

    #[error("Operator not found: {0}")]
    OperatorNotFound(String),

    #[error("Repository error: {0}")]
    RepositoryError(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
