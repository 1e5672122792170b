//! Simulated work for exercising the supervisor end to end.
//!
//! Each iteration picks one of four jobs at random: one that succeeds, one
//! that returns an error, one that panics, and one that ends the run.

use crate::core::Iteration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::future::Future;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Good,
    Bad,
    Panic,
    Stop,
}

impl Job {
    /// Runs the job after `delay`.
    ///
    /// The returned future owns everything it needs, so a picker can hand it
    /// to `Supervisor::run` without borrowing from itself.
    pub fn run(self, delay: Duration) -> impl Future<Output = Iteration> + Send + 'static {
        async move {
            match self {
                Job::Good => {
                    info!("Entering nominal code");
                    tokio::time::sleep(delay).await;
                    info!("Finished");
                    Iteration::ok()
                }
                Job::Bad => {
                    info!("Entering error code");
                    tokio::time::sleep(delay).await;
                    Iteration::failed(anyhow::anyhow!("something bad has happened!"))
                }
                Job::Panic => {
                    info!("Preparing to panic");
                    tokio::time::sleep(delay).await;
                    panic!("this is really happening!");
                }
                Job::Stop => {
                    info!("Returning");
                    Iteration::stop()
                }
            }
        }
    }
}

/// Picks jobs uniformly at random.
pub struct JobPicker {
    rng: StdRng,
}

impl JobPicker {
    /// A picker seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// A picker that always produces the same sequence for the same seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_job(&mut self) -> Job {
        match self.rng.random_range(0..4) {
            0 => Job::Good,
            1 => Job::Bad,
            2 => Job::Panic,
            _ => Job::Stop,
        }
    }
}

impl Default for JobPicker {
    fn default() -> Self {
        Self::new()
    }
}
