//! Injectable delay seam for request pacing.
//!
//! The orchestrator never calls `tokio::time::sleep` directly; it goes
//! through this trait so tests observe pacing without real timers.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Suspends an orchestration run between provider calls.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait out one pacing delay.
    async fn pause(&self, delay: Duration);
}

/// Production pacer backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Test pacer that records requested delays instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    /// A pacer with no recorded pauses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in order.
    #[must_use]
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().expect("pacer lock").clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        self.pauses.lock().expect("pacer lock").push(delay);
    }
}
