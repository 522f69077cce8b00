use async_trait::async_trait;

use crate::alert::{Alert, CreateAlertInput};
use crate::error::DomainResult;
use crate::operator::{CreateOperatorInput, Operator, UpdateOperatorInput};
use crate::telemetry::{CreateTelemetryInput, TelemetryRecord};

/// Repository trait for operator storage operations.
/// Infrastructure layer (emberwatch-postgres) implements this trait.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait OperatorRepository: Send + Sync {
    /// Get an operator by id.
    async fn get_operator(&self, operator_id: &str) -> DomainResult<Option<Operator>>;

    /// Create a new operator.
    async fn create_operator(&self, input: CreateOperatorInput) -> DomainResult<Operator>;

    /// Apply a partial update to an existing operator. Fields left `None`
    /// in the input keep their stored values.
    async fn update_operator(&self, input: UpdateOperatorInput) -> DomainResult<Operator>;
}

/// Repository trait for telemetry storage. Telemetry rows are insert-only.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    /// Persist one telemetry record with its position and vitals
    /// sub-records atomically.
    async fn create_telemetry(&self, input: CreateTelemetryInput)
        -> DomainResult<TelemetryRecord>;
}

/// Repository trait for alert storage. Alert rows are insert-only; a
/// duplicate external id surfaces as `DomainError::AlertAlreadyExists`.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Persist one alert with its optional sub-records atomically.
    async fn create_alert(&self, input: CreateAlertInput) -> DomainResult<Alert>;
}
