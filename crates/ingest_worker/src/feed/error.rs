use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Transport-level failures of one feed session. Every variant is
/// recovered by the listener's fixed-delay reconnect.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("failed to connect to feed: {0}")]
    Connect(#[source] tungstenite::Error),

    #[error("feed transport error: {0}")]
    Transport(#[source] tungstenite::Error),

    #[error("liveness probe timed out")]
    ProbeTimeout,

    #[error("feed closed the connection")]
    Closed,
}
