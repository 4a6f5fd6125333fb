//! Write pacing
//!
//! A fixed, configurable pause between source files and an optional minimum
//! spacing between individual writes. Nothing here reacts to store errors.

use std::time::Duration;
use tokio::time::Instant;

/// Pacing settings for a batch load
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Throttle {
    between_files: Duration,
    min_write_interval: Option<Duration>,
}

impl Throttle {
    pub const DEFAULT_FILE_PAUSE: Duration = Duration::from_secs(1);

    pub fn new(between_files: Duration) -> Self {
        Self {
            between_files,
            min_write_interval: None,
        }
    }

    /// No pauses at all
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Keep at least `interval` between the start of consecutive writes
    pub fn with_min_write_interval(mut self, interval: Duration) -> Self {
        self.min_write_interval = (!interval.is_zero()).then_some(interval);
        self
    }

    pub fn between_files(&self) -> Duration {
        self.between_files
    }

    pub fn min_write_interval(&self) -> Option<Duration> {
        self.min_write_interval
    }

    /// Start pacing a run
    pub fn pacer(&self) -> Pacer {
        Pacer {
            throttle: self.clone(),
            last_write: None,
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILE_PAUSE)
    }
}

/// Per-run pacing state
#[derive(Debug)]
pub struct Pacer {
    throttle: Throttle,
    last_write: Option<Instant>,
}

impl Pacer {
    /// Wait, if needed, so writes are no closer than the minimum interval
    pub async fn before_write(&mut self) {
        if let (Some(interval), Some(last)) = (self.throttle.min_write_interval, self.last_write) {
            let elapsed = last.elapsed();
            if elapsed < interval {
                let wait = interval - elapsed;
                log::debug!("Waiting {:?} before next write", wait);
                tokio::time::sleep(wait).await;
            }
        }
        self.last_write = Some(Instant::now());
    }

    /// Pause between two source files
    pub async fn between_files(&self) {
        let pause = self.throttle.between_files;
        if pause.is_zero() {
            return;
        }
        log::debug!("Pausing {:?} before next file", pause);
        tokio::time::sleep(pause).await;
    }
}
