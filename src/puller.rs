//! Bounded image puller
//!
//! Walks an image list in order and fetches every image that is not already
//! present locally, with at most `max_concurrent` fetches in flight.
//!
//! A worker holds a semaphore permit from its presence check until its fetch
//! resolves, so the submission loop blocks on `acquire` instead of polling.
//! Workers return their outcome through the `JoinSet`; only the submission
//! loop touches the counters.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::fetcher::Fetcher;
use crate::image::ImageRef;
use crate::image_list::ListEntry;
use crate::summary::{FetchOutcome, PullSummary};

/// Default number of concurrent fetches
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Puller tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullOptions {
    /// Maximum in-flight fetches (values below 1 are raised to 1)
    pub max_concurrent: usize,
    /// Per-fetch deadline; `None` waits indefinitely.
    ///
    /// Only the client side gives up: the Docker daemon keeps pulling after
    /// the stream is dropped, so the slot is reused while that pull may
    /// still be running. With a timeout set, daemon-side pulls can briefly
    /// exceed `max_concurrent`.
    pub fetch_timeout: Option<Duration>,
}

impl Default for PullOptions {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            fetch_timeout: None,
        }
    }
}

/// Live progress for one image
#[derive(Debug, Clone, Copy)]
pub enum PullEvent<'a> {
    Skipped(&'a ImageRef),
    Pulling(&'a ImageRef),
    Pulled(&'a ImageRef),
    Failed(&'a ImageRef, &'a FetchError),
    /// A list line that is not a valid reference; never fetched
    Invalid { raw: &'a str, reason: &'a str },
}

/// Receives live progress events.
///
/// Called from worker tasks concurrently, so events for different images
/// interleave in completion order.
pub trait PullReporter: Send + Sync {
    fn report(&self, event: PullEvent<'_>);
}

/// Reporter that discards all events
pub struct NoopReporter;

impl PullReporter for NoopReporter {
    fn report(&self, _event: PullEvent<'_>) {}
}

/// Fetches a list of images with bounded concurrency
#[derive(Clone)]
pub struct ImagePuller {
    fetcher: Arc<dyn Fetcher>,
    reporter: Arc<dyn PullReporter>,
    slots: Arc<Semaphore>,
    options: PullOptions,
}

impl ImagePuller {
    pub fn new(fetcher: Arc<dyn Fetcher>, options: PullOptions) -> Self {
        let options = PullOptions {
            max_concurrent: options.max_concurrent.max(1),
            ..options
        };

        Self {
            fetcher,
            reporter: Arc::new(NoopReporter),
            slots: Arc::new(Semaphore::new(options.max_concurrent)),
            options,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn PullReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn options(&self) -> PullOptions {
        self.options
    }

    /// Process one image inside a concurrency slot
    pub async fn fetch_one(&self, image: &ImageRef) -> FetchOutcome {
        match self.slots.acquire().await {
            Ok(_permit) => self.fetch_in_slot(image).await,
            Err(_) => {
                warn!("Concurrency slots closed, cannot fetch {}", image);
                FetchOutcome::Failed
            }
        }
    }

    /// Process every entry in order and wait for all of them to resolve.
    ///
    /// Failures never abort the batch and are not retried. Invalid entries
    /// are counted as failed without taking a slot.
    pub async fn pull_all<I>(&self, entries: I) -> PullSummary
    where
        I: IntoIterator,
        I::Item: Into<ListEntry>,
    {
        let mut summary = PullSummary::default();
        let mut workers = JoinSet::new();
        let mut submitted = 0usize;

        info!(
            "Pulling images with up to {} concurrent fetches",
            self.options.max_concurrent
        );

        for entry in entries {
            let image = match entry.into() {
                ListEntry::Image(image) => image,
                ListEntry::Invalid { line, raw, reason } => {
                    warn!("Not pulling line {} ({}): {}", line, raw, reason);
                    self.reporter.report(PullEvent::Invalid {
                        raw: &raw,
                        reason: &reason,
                    });
                    summary.record(FetchOutcome::Failed);
                    continue;
                }
            };

            let permit = match self.slots.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("Concurrency slots closed, cannot fetch {}", image);
                    summary.record(FetchOutcome::Failed);
                    continue;
                }
            };

            let puller = self.clone();
            workers.spawn(async move {
                let outcome = puller.fetch_in_slot(&image).await;
                drop(permit);
                outcome
            });
            submitted += 1;

            while let Some(joined) = workers.try_join_next() {
                summary.record(outcome_of(joined));
            }
        }

        debug!("Submitted {} fetches, waiting for completion", submitted);

        while let Some(joined) = workers.join_next().await {
            summary.record(outcome_of(joined));
        }

        info!(
            "Pull finished: {} pulled, {} skipped, {} failed",
            summary.success, summary.skipped, summary.failed
        );
        summary
    }

    async fn fetch_in_slot(&self, image: &ImageRef) -> FetchOutcome {
        // Best effort: another worker may be pulling the same image right now.
        match self.fetcher.is_present(image).await {
            Ok(true) => {
                self.reporter.report(PullEvent::Skipped(image));
                return FetchOutcome::Skipped;
            }
            Ok(false) => {}
            Err(e) => debug!("Presence check for {} failed, pulling: {}", image, e),
        }

        self.reporter.report(PullEvent::Pulling(image));

        let result = match self.options.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, self.fetcher.fetch(image))
                .await
                .unwrap_or(Err(FetchError::Timeout(limit))),
            None => self.fetcher.fetch(image).await,
        };

        match result {
            Ok(()) => {
                self.reporter.report(PullEvent::Pulled(image));
                FetchOutcome::Succeeded
            }
            Err(e) => {
                warn!("Failed to pull {}: {}", image, e);
                self.reporter.report(PullEvent::Failed(image, &e));
                FetchOutcome::Failed
            }
        }
    }
}

fn outcome_of(joined: Result<FetchOutcome, JoinError>) -> FetchOutcome {
    joined.unwrap_or_else(|e| {
        warn!("Fetch worker aborted: {}", e);
        FetchOutcome::Failed
    })
}
