//! Overall benchmark deadline

use std::future::Future;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use wirebench_core::{Error, Result};

/// A fixed point in time every backend round-trip must finish before
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    /// Start a deadline that expires `budget` from now
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    /// The total budget this deadline was created with
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left before expiry
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Drive `fut` to completion or fail with a timeout error once the
    /// deadline passes; the future is dropped on expiry
    pub async fn run<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match timeout_at(self.at, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::timeout(self.budget)),
        }
    }
}
