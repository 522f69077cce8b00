mod envelope;
mod error;
mod listener;
mod messages;

pub use envelope::{decode, DecodedEnvelope};
pub use error::FeedError;
pub use listener::{FeedListener, FeedListenerConfig};
pub use messages::{
    AlertDetailsPayload, AlertMessage, AlertPositionPayload, OperatorPayload, OperatorRef,
    TelemetryMessage,
};
