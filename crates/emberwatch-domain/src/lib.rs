pub mod alert;
pub mod error;
pub mod operator;
pub mod repository;
pub mod telemetry;

pub use alert::{Alert, AlertDetails, AlertPosition, CreateAlertInput};
pub use error::{DomainError, DomainResult};
pub use operator::{CreateOperatorInput, Operator, UpdateOperatorInput};
pub use repository::{AlertRepository, OperatorRepository, TelemetryRepository};
pub use telemetry::{CreateTelemetryInput, Position, TelemetryRecord, Vitals};

#[cfg(feature = "mocks")]
pub use repository::{MockAlertRepository, MockOperatorRepository, MockTelemetryRepository};
