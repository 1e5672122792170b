//! Runs the supervised work and isolates the process from its failures.
use crate::core::{Failure, FailureKind, Iteration};
use crate::notification::NotificationDispatcher;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Counters for a completed `Supervisor::run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of times the work was invoked.
    pub iterations: u64,
    /// Invocations that returned an error or panicked.
    pub failures: u64,
    /// The subset of `failures` that were panics.
    pub recovered_panics: u64,
    /// Channel sends that failed while reporting those failures.
    pub send_errors: u64,
}

/// Invokes a unit of work, turning errors and panics into notifications.
///
/// A panic inside the work is caught at the boundary of each invocation and
/// never unwinds past the supervisor. Only the work itself decides when the
/// loop ends, by returning an `Iteration` with `Flow::Stop`.
#[derive(Clone)]
pub struct Supervisor {
    dispatcher: Arc<NotificationDispatcher>,
}

impl Supervisor {
    pub fn new(dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Arc<NotificationDispatcher> {
        &self.dispatcher
    }

    /// Invokes `work` repeatedly until it signals `Flow::Stop`.
    pub async fn run<F, Fut>(&self, mut work: F) -> RunSummary
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Iteration>,
    {
        info!("Entering run loop");
        let mut summary = RunSummary::default();

        loop {
            summary.iterations += 1;
            metrics::counter!("supervisor_iterations_total").increment(1);
            debug!(iteration = summary.iterations, "Running work");

            let (failure, stop) = match AssertUnwindSafe(async { work().await })
                .catch_unwind()
                .await
            {
                Ok(iteration) => {
                    let stop = iteration.should_stop();
                    (iteration.result.err().map(|e| Failure::error(&e)), stop)
                }
                Err(payload) => (Some(Failure::panic(payload)), false),
            };

            match failure {
                Some(failure) => {
                    summary.failures += 1;
                    if failure.kind == FailureKind::Panic {
                        summary.recovered_panics += 1;
                    }
                    summary.send_errors += self.report(&failure).await as u64;
                }
                None => debug!(iteration = summary.iterations, "No errors"),
            }

            if stop {
                info!(iteration = summary.iterations, "Work signalled stop");
                break;
            }
        }

        info!(
            iterations = summary.iterations,
            failures = summary.failures,
            recovered_panics = summary.recovered_panics,
            "Run loop finished"
        );
        summary
    }

    /// Invokes `work` exactly once.
    ///
    /// Returns the failure that was reported, if any.
    pub async fn run_once<F, Fut>(&self, work: F) -> Option<Failure>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        let failure = match AssertUnwindSafe(async move { work().await })
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(Failure::error(&e)),
            Err(payload) => Some(Failure::panic(payload)),
        };

        if let Some(failure) = &failure {
            self.report(failure).await;
        }
        failure
    }

    /// Logs `failure` and hands it to the dispatcher. Returns the number of
    /// channels that failed to deliver it.
    async fn report(&self, failure: &Failure) -> usize {
        metrics::counter!("supervisor_failures_total", "kind" => failure.kind.as_str())
            .increment(1);
        match failure.kind {
            FailureKind::Panic => {
                error!(message = %failure.message, "Panic recovered in supervised work")
            }
            FailureKind::Error => {
                warn!(message = %failure.message, "Error detected in supervised work")
            }
        }

        let errors = self.dispatcher.notify(failure).await;
        if !errors.is_empty() {
            warn!(count = errors.len(), "Some notifications could not be delivered");
        }
        errors.len()
    }
}
