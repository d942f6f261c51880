use crate::registry::PollRegistry;
use crate::tasks::poll_lifecycle::cancel_all;
use log::info;
use std::future::Future;
use std::io;

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// The stop signals a hosted bot can receive: SIGINT and SIGTERM on unix,
/// Ctrl-C elsewhere. Handlers are installed on construction.
#[cfg(unix)]
pub struct ShutdownSignal {
    interrupt: Signal,
    terminate: Signal,
}

#[cfg(unix)]
impl ShutdownSignal {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Waits for the first stop signal and returns its name.
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        }
    }
}

#[cfg(not(unix))]
pub struct ShutdownSignal;

#[cfg(not(unix))]
impl ShutdownSignal {
    pub fn new() -> io::Result<Self> {
        Ok(Self)
    }

    pub async fn recv(&mut self) -> &'static str {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        "Ctrl-C"
    }
}

/// Waits for `signal`, then tears down every active poll. Returns how many
/// were cancelled.
pub async fn drain_on(
    signal: impl Future<Output = &'static str>,
    registry: &PollRegistry,
) -> usize {
    let name = signal.await;
    info!("Received {}, shutting down gracefully...", name);
    let cancelled = cancel_all(registry).await;
    info!("Cancelled {} active vote(s)", cancelled);
    cancelled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PollError;
    use crate::models::{Poll, PollDuration, Tier};
    use std::time::Duration;

    fn poll_in(channel_id: &str) -> Poll {
        Poll::new(
            None,
            channel_id.to_string(),
            "owner".to_string(),
            "Owner".to_string(),
            "Topic".to_string(),
            PollDuration::parse("1m").unwrap(),
        )
    }

    #[tokio::test]
    async fn drain_cancels_every_poll() {
        let registry = PollRegistry::new();
        registry.try_start(poll_in("c1")).await.unwrap();
        registry.try_start(poll_in("c2")).await.unwrap();

        assert_eq!(drain_on(std::future::ready("SIGTERM"), &registry).await, 2);
        assert_eq!(registry.active_count().await, 0);
        assert_eq!(
            registry.submit_vote("c1", "u1", Tier::S).await,
            Err(PollError::Expired)
        );
    }

    #[tokio::test]
    async fn drain_waits_for_the_signal() {
        let registry = PollRegistry::new();
        registry.try_start(poll_in("c1")).await.unwrap();

        let drained = tokio::time::timeout(
            Duration::from_millis(50),
            drain_on(std::future::pending(), &registry),
        )
        .await;
        assert!(drained.is_err());
        assert_eq!(registry.active_count().await, 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn sigterm_is_a_stop_signal() {
        let mut shutdown = ShutdownSignal::new().unwrap();
        let status = std::process::Command::new("sh")
            .arg("-c")
            .arg(format!("kill -TERM {}", std::process::id()))
            .status()
            .unwrap();
        assert!(status.success());

        let name = tokio::time::timeout(Duration::from_secs(5), shutdown.recv())
            .await
            .unwrap();
        assert_eq!(name, "SIGTERM");
    }
}
