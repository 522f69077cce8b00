//! Runs the service's long-lived processes with graceful shutdown.
//!
//! Processes are registered by name, run concurrently, and receive a shared
//! [`CancellationToken`]. The token is cancelled on SIGINT/SIGTERM or when
//! any process fails; closers then run (with a timeout) regardless of how
//! the processes stopped.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// A named long-lived process: takes the shared cancellation token and runs
/// until cancelled or failed.
pub type AppProcess = Box<
    dyn FnOnce(CancellationToken) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>
        + Send,
>;

/// A cleanup function executed after all processes have stopped.
pub type Closer = Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>> + Send>;

pub struct Runner {
    processes: Vec<(String, AppProcess)>,
    closers: Vec<Closer>,
    closer_timeout: Duration,
    cancellation_token: CancellationToken,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self {
            processes: Vec::new(),
            closers: Vec::new(),
            closer_timeout: Duration::from_secs(10),
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Register a named process. If any registered process returns an
    /// error, every other process is cancelled.
    pub fn with_named_process(mut self, name: impl Into<String>, process: AppProcess) -> Self {
        self.processes.push((name.into(), process));
        self
    }

    /// Register a cleanup function. Closers run after all processes have
    /// stopped, whether they stopped cleanly or not.
    pub fn with_closer<F, Fut>(mut self, closer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.closers.push(Box::new(|| Box::pin(closer())));
        self
    }

    pub fn with_closer_timeout(mut self, timeout: Duration) -> Self {
        self.closer_timeout = timeout;
        self
    }

    /// Use an externally owned cancellation token instead of an internal one.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Run every registered process until shutdown, then run closers and
    /// exit the process with an appropriate code. Does not return.
    pub async fn run(self) {
        let token = self.cancellation_token;
        let mut join_set = JoinSet::new();

        for (name, process) in self.processes {
            let process_token = token.clone();
            join_set.spawn(async move {
                info!(process = %name, "starting process");
                let result = process(process_token).await;
                (name, result)
            });
        }

        spawn_signal_handlers(token.clone());

        let mut first_error = None;
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((name, Ok(()))) => {
                    debug!(process = %name, "process completed");
                }
                Ok((name, Err(err))) => {
                    if !token.is_cancelled() {
                        error!(process = %name, error = %format!("{err:#}"), "process failed");
                        first_error = Some(err);
                        token.cancel();
                    }
                }
                Err(err) => {
                    error!(error = %err, "process panicked");
                    if !token.is_cancelled() {
                        token.cancel();
                    }
                }
            }

            if token.is_cancelled() {
                break;
            }
        }

        // Let the remaining processes observe the cancellation
        join_set.shutdown().await;

        if !self.closers.is_empty() {
            info!(timeout = ?self.closer_timeout, "running closers");
            match tokio::time::timeout(self.closer_timeout, run_closers(self.closers)).await {
                Ok(()) => info!("all closers completed"),
                Err(_) => error!(timeout = ?self.closer_timeout, "closers timed out"),
            }
        }

        if let Some(err) = first_error {
            error!(error = %format!("{err:#}"), "exiting with error");
            std::process::exit(1);
        } else {
            info!("exiting normally");
            std::process::exit(0);
        }
    }
}

fn spawn_signal_handlers(token: CancellationToken) {
    let interrupt_token = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received interrupt signal, shutting down");
                interrupt_token.cancel();
            }
            Err(err) => {
                error!(error = %err, "failed to listen for interrupt signal");
            }
        }
    });

    #[cfg(unix)]
    tokio::spawn(async move {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("received SIGTERM, shutting down");
                token.cancel();
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
            }
        }
    });
}

async fn run_closers(closers: Vec<Closer>) {
    let mut closer_set = JoinSet::new();

    for closer in closers {
        closer_set.spawn(async move { closer().await });
    }

    while let Some(result) = closer_set.join_next().await {
        match result {
            Ok(Ok(())) => debug!("closer completed"),
            Ok(Err(err)) => error!(error = %format!("{err:#}"), "closer failed"),
            Err(err) => error!(error = %err, "closer panicked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_closers_all_run_even_when_one_fails() {
        let completed = Arc::new(AtomicUsize::new(0));

        let ok_flag = completed.clone();
        let failing: Closer = Box::new(|| Box::pin(async { anyhow::bail!("cleanup failed") }));
        let succeeding: Closer = Box::new(move || {
            Box::pin(async move {
                ok_flag.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        });

        run_closers(vec![failing, succeeding]).await;

        assert_eq!(completed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_process_observes_cancellation() {
        let token = CancellationToken::new();
        let stopped = Arc::new(AtomicUsize::new(0));

        let process_token = token.clone();
        let process_stopped = stopped.clone();
        let handle = tokio::spawn(async move {
            process_token.cancelled().await;
            process_stopped.fetch_add(1, Ordering::SeqCst);
        });

        token.cancel();
        handle.await.unwrap();

        assert_eq!(stopped.load(Ordering::SeqCst), 1);
    }
}
