//! Graceful shutdown plumbing for the HTTP server task.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

/// Cloneable stop flag. Every clone observes the same trigger.
#[derive(Clone, Debug)]
pub struct ShutdownSignal {
    tx: std::sync::Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            tx: std::sync::Arc::new(tx),
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Idempotent; only the first call is logged.
    pub fn trigger(&self) {
        let first = self.tx.send_if_modified(|stopped| !std::mem::replace(stopped, true));
        if first {
            info!("Shutdown signal triggered");
        }
    }

    /// Resolves once the signal is triggered, immediately if it already was.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve on SIGTERM or SIGINT (Ctrl+C elsewhere). Returns `false` when no
/// handler could be installed.
async fn os_stop_requested() -> bool {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "Cannot listen for SIGTERM");
                return false;
            }
        };

        tokio::select! {
            _ = term.recv() => info!("Received SIGTERM"),
            res = tokio::signal::ctrl_c() => match res {
                Ok(()) => info!("Received SIGINT (Ctrl+C)"),
                Err(e) => {
                    error!(error = %e, "Cannot listen for SIGINT");
                    return false;
                }
            },
        }
        true
    }

    #[cfg(not(unix))]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C");
                true
            }
            Err(e) => {
                error!(error = %e, "Cannot listen for Ctrl+C");
                false
            }
        }
    }
}

/// Owns the process-wide stop signal and the drain grace period.
pub struct ShutdownCoordinator {
    signal: ShutdownSignal,
    grace: Duration,
}

impl ShutdownCoordinator {
    pub fn new(grace_secs: u64) -> Self {
        Self {
            signal: ShutdownSignal::new(),
            grace: Duration::from_secs(grace_secs),
        }
    }

    pub fn signal(&self) -> ShutdownSignal {
        self.signal.clone()
    }

    /// How long in-flight requests may take once shutdown begins.
    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Spawn a task that triggers the signal on SIGTERM/SIGINT.
    pub fn start_signal_listener(&self) {
        let signal = self.signal.clone();
        tokio::spawn(async move {
            if os_stop_requested().await {
                signal.trigger();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn waiters_wake_on_trigger() {
        let signal = ShutdownSignal::new();
        let waiter = signal.clone();
        let task = tokio::spawn(async move { waiter.wait().await });

        signal.trigger();

        tokio::time::timeout(Duration::from_millis(200), task)
            .await
            .expect("waiter not woken")
            .expect("waiter panicked");
        assert!(signal.is_triggered());
    }

    #[tokio::test]
    async fn late_waiter_returns_at_once() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        signal.trigger();
        tokio::time::timeout(Duration::from_millis(100), signal.wait())
            .await
            .expect("late waiter blocked");
    }

    #[test]
    fn coordinator_keeps_grace_period() {
        let coordinator = ShutdownCoordinator::new(7);
        assert_eq!(coordinator.grace(), Duration::from_secs(7));
        assert!(!coordinator.signal().is_triggered());
    }
}
