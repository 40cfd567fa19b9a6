//! Graceful shutdown handling
//!
//! `ParkingServer::run` races each line read against
//! [`ShutdownSignal::wait`], so a SIGINT/SIGTERM stops the loop between
//! commands and never in the middle of one. The CLI spawns
//! [`listen_for_shutdown_signals`] to trigger it; tests call
//! [`ShutdownSignal::trigger`] directly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};

/// Shutdown signal that can be cloned and shared across tasks
#[derive(Clone)]
pub struct ShutdownSignal {
    sender: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            sender,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    pub fn trigger(&self) {
        if !self.triggered.swap(true, Ordering::SeqCst) {
            info!("Shutdown signal triggered");
            let _ = self.sender.send(());
        }
    }

    /// Resolves once [`trigger`](Self::trigger) has been called, including
    /// when it was called before this future was created.
    pub async fn wait(&self) {
        let mut rx = self.sender.subscribe();
        if self.is_triggered() {
            return;
        }
        let _ = rx.recv().await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Listen for OS shutdown signals (SIGTERM, SIGINT) and trigger `shutdown`.
pub async fn listen_for_shutdown_signals(shutdown: ShutdownSignal) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    warn!("Failed to install signal handlers: {}", e);
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM signal");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT signal (Ctrl+C)");
            }
        }

        shutdown.trigger();
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            return;
        }
        info!("Received Ctrl+C signal");
        shutdown.trigger();
    }
}
