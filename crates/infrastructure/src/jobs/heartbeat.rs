use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Background job that periodically logs that the forwarder is alive
pub struct HeartbeatJob {
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl HeartbeatJob {
    pub fn new() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            shutdown: CancellationToken::new(),
        }
    }

    /// An interval of 0 disables the heartbeat.
    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn start(self) -> Option<JoinHandle<()>> {
        if self.interval_secs == 0 {
            info!("Heartbeat disabled");
            return None;
        }

        info!(interval_secs = self.interval_secs, "Starting heartbeat job");

        Some(tokio::spawn(async move {
            let period = Duration::from_secs(self.interval_secs);
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            let mut beats: u64 = 0;
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("HeartbeatJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        beats += 1;
                        info!(beats, "DNS forwarder is running");
                    }
                }
            }
        }))
    }
}

impl Default for HeartbeatJob {
    fn default() -> Self {
        Self::new()
    }
}
