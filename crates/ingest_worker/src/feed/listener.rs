use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::domain::MessageRouter;
use crate::feed::envelope::decode;
use crate::feed::error::FeedError;

type FeedSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone)]
pub struct FeedListenerConfig {
    pub url: String,
    /// Interval between liveness probes (WebSocket pings).
    pub ping_interval: Duration,
    /// A pong must arrive within this window or the session is torn down.
    pub ping_timeout: Duration,
    /// Fixed wait between sessions; the delay never grows.
    pub reconnect_delay: Duration,
}

/// Session lifecycle of the feed connection.
///
/// Failure from any state leads back to `Disconnected { retry: true }`;
/// `Draining` is entered only on cancellation and ends the listener.
enum SessionState {
    Disconnected { retry: bool },
    Connecting,
    Connected(Box<FeedSocket>),
    Draining(Box<FeedSocket>),
}

enum SessionEnd {
    Cancelled(Box<FeedSocket>),
    Failed(FeedError),
}

/// What the read loop decided to do after one wakeup. Actions run outside
/// the select so the socket is borrowed once at a time.
enum LoopAction {
    Route(String),
    ReplyPing(Message),
    PongReceived,
    Ignore,
    SendProbe,
    ProbeTimedOut,
    Cancelled,
    Ended(FeedError),
}

/// Long-lived feed client: owns the session lifecycle and feeds every
/// received message synchronously through the router before the next read.
pub struct FeedListener {
    config: FeedListenerConfig,
    router: MessageRouter,
}

impl FeedListener {
    pub fn new(config: FeedListenerConfig, router: MessageRouter) -> Self {
        Self { config, router }
    }

    /// Supervise the feed connection until cancelled. Never returns under
    /// normal operation; transport failures reconnect forever with a
    /// fixed delay.
    pub async fn run(&self, ctx: CancellationToken) -> anyhow::Result<()> {
        let mut state = SessionState::Disconnected { retry: false };

        loop {
            state = match state {
                SessionState::Disconnected { retry } => {
                    if ctx.is_cancelled() {
                        return Ok(());
                    }
                    if retry {
                        info!(
                            delay = ?self.config.reconnect_delay,
                            "waiting before reconnecting to feed"
                        );
                        tokio::select! {
                            _ = ctx.cancelled() => return Ok(()),
                            _ = tokio::time::sleep(self.config.reconnect_delay) => {}
                        }
                    }
                    SessionState::Connecting
                }
                SessionState::Connecting => match connect_async(&self.config.url).await {
                    Ok((socket, response)) => {
                        info!(
                            url = %self.config.url,
                            status = %response.status(),
                            "connected to feed"
                        );
                        SessionState::Connected(Box::new(socket))
                    }
                    Err(e) => {
                        error!(
                            url = %self.config.url,
                            error = %FeedError::Connect(e),
                            "failed to connect to feed"
                        );
                        SessionState::Disconnected { retry: true }
                    }
                },
                SessionState::Connected(socket) => {
                    match self.read_session(*socket, &ctx).await {
                        SessionEnd::Cancelled(socket) => SessionState::Draining(socket),
                        SessionEnd::Failed(e) => {
                            error!(error = %e, "feed session lost");
                            SessionState::Disconnected { retry: true }
                        }
                    }
                }
                SessionState::Draining(mut socket) => {
                    if let Err(e) = socket.close().await {
                        debug!(error = %e, "error while closing feed session");
                    }
                    info!("feed session closed");
                    return Ok(());
                }
            };
        }
    }

    /// Read loop of one established session. Returns when the session
    /// fails (any transport error, probe timeout, or remote close) or the
    /// listener is cancelled.
    async fn read_session(&self, mut socket: FeedSocket, ctx: &CancellationToken) -> SessionEnd {
        let mut probe_timer = tokio::time::interval(self.config.ping_interval);
        probe_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Skip the interval's immediate first tick
        probe_timer.reset();

        let mut awaiting_pong = false;
        let pong_deadline = tokio::time::sleep(Duration::ZERO);
        tokio::pin!(pong_deadline);

        loop {
            let action = tokio::select! {
                _ = ctx.cancelled() => LoopAction::Cancelled,
                _ = &mut pong_deadline, if awaiting_pong => LoopAction::ProbeTimedOut,
                _ = probe_timer.tick() => LoopAction::SendProbe,
                message = socket.next() => match message {
                    Some(Ok(Message::Text(text))) => LoopAction::Route(text.to_string()),
                    Some(Ok(Message::Pong(_))) => LoopAction::PongReceived,
                    Some(Ok(Message::Ping(payload))) => {
                        LoopAction::ReplyPing(Message::Pong(payload))
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        LoopAction::Ended(FeedError::Closed)
                    }
                    Some(Ok(_)) => LoopAction::Ignore,
                    Some(Err(e)) => LoopAction::Ended(FeedError::Transport(e)),
                },
            };

            match action {
                LoopAction::Route(text) => self.router.route(decode(&text)).await,
                LoopAction::ReplyPing(pong) => {
                    if let Err(e) = socket.send(pong).await {
                        return SessionEnd::Failed(FeedError::Transport(e));
                    }
                }
                LoopAction::PongReceived => {
                    awaiting_pong = false;
                }
                LoopAction::Ignore => {}
                LoopAction::SendProbe => {
                    if let Err(e) = socket.send(Message::Ping(Vec::new().into())).await {
                        return SessionEnd::Failed(FeedError::Transport(e));
                    }
                    awaiting_pong = true;
                    pong_deadline
                        .as_mut()
                        .reset(tokio::time::Instant::now() + self.config.ping_timeout);
                }
                LoopAction::ProbeTimedOut => {
                    return SessionEnd::Failed(FeedError::ProbeTimeout);
                }
                LoopAction::Cancelled => return SessionEnd::Cancelled(Box::new(socket)),
                LoopAction::Ended(e) => return SessionEnd::Failed(e),
            }
        }
    }
}
