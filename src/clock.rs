//! Injectable time source
//!
//! Retry backoff and the submit debounce window both measure time through
//! this trait so the bounds and delay schedule are testable without real
//! timers.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Time source for delays and elapsed-time checks
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Wall-clock implementation backed by tokio timers
#[derive(Debug, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Test clock that advances instantly and records requested sleeps
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
    slept: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
            slept: Mutex::new(Vec::new()),
        }
    }

    /// Move the clock forward without sleeping
    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += duration;
    }

    /// Every duration passed to `sleep`, in call order
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().expect("clock lock poisoned").clone()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().expect("clock lock poisoned")
    }

    async fn sleep(&self, duration: Duration) {
        self.slept.lock().expect("clock lock poisoned").push(duration);
        self.advance(duration);
    }
}
