//! Periodic expiry of idle sessions

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::session::SessionStore;

pub struct SessionSweeper {
    sessions: Arc<SessionStore>,
    interval: Duration,
}

impl SessionSweeper {
    pub fn new(sessions: Arc<SessionStore>, interval: Duration) -> Self {
        Self { sessions, interval }
    }

    /// Start sweeping on a background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(self) {
        tracing::info!("Session sweeper started (every {:?})", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        // First tick fires immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let purged = self.sessions.purge_expired();
            tracing::debug!("Sweep done: {} purged, {} live", purged, self.sessions.len());
        }
    }
}
