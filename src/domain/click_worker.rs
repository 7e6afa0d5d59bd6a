//! Asynchronous click recording.
//!
//! The redirect path only ever calls [`ClickRecorder::record`], which never
//! blocks: events go onto a bounded queue and are dropped when it is full.
//! [`run_click_worker`] drains the queue and hands each event to a
//! [`ClickPipeline`] task, with at most `concurrency` tasks in flight.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::sync::{
    Semaphore,
    mpsc::{self, error::TrySendError},
};
use tokio::task::JoinHandle;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::NewClickLog;
use crate::domain::geo::GeoLocator;
use crate::domain::probe::TargetProbe;
use crate::domain::repositories::ClickLogRepository;
use crate::error::AppError;

/// Extra write attempts after the first one fails.
const WRITE_RETRIES: usize = 2;

/// Base of the exponential backoff between write attempts, in milliseconds.
const RETRY_BASE_MILLIS: u64 = 10;

/// Producer half of the click queue, shared through application state.
#[derive(Clone, Debug)]
pub struct ClickRecorder {
    sender: mpsc::Sender<ClickEvent>,
}

impl ClickRecorder {
    /// Creates a recorder and the receiver to hand to [`run_click_worker`].
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ClickEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Enqueues an event without waiting.
    ///
    /// Returns `false` when the event was dropped because the queue is full
    /// or the worker is gone.
    pub fn record(&self, event: ClickEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                warn!(link_id = %event.link_id, "Click queue is full, dropping event");
                counter!("clicks_dropped_total", "reason" => "full").increment(1);
                false
            }
            Err(TrySendError::Closed(event)) => {
                warn!(link_id = %event.link_id, "Click queue is closed, dropping event");
                counter!("clicks_dropped_total", "reason" => "closed").increment(1);
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots currently left in the queue.
    pub fn available(&self) -> usize {
        self.sender.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}

/// Turns one click event into a persisted click log.
#[derive(Clone)]
pub struct ClickPipeline {
    click_logs: Arc<dyn ClickLogRepository>,
    geo: Arc<dyn GeoLocator>,
    probe: Option<Arc<dyn TargetProbe>>,
    write_retries: usize,
    retry_base_millis: u64,
}

impl ClickPipeline {
    pub fn new(click_logs: Arc<dyn ClickLogRepository>, geo: Arc<dyn GeoLocator>) -> Self {
        Self {
            click_logs,
            geo,
            probe: None,
            write_retries: WRITE_RETRIES,
            retry_base_millis: RETRY_BASE_MILLIS,
        }
    }

    /// Enables probing the destination of every recorded click.
    pub fn with_probe(mut self, probe: Arc<dyn TargetProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn with_retry(mut self, write_retries: usize, retry_base_millis: u64) -> Self {
        self.write_retries = write_retries;
        self.retry_base_millis = retry_base_millis.max(1);
        self
    }

    /// Enriches and persists a single event.
    ///
    /// Geo lookup and probing are best-effort. The write is retried with
    /// exponential backoff; the same log id is used on every attempt.
    ///
    /// # Errors
    ///
    /// Returns the last storage error once all attempts are exhausted.
    pub async fn process(&self, event: ClickEvent) -> Result<(), AppError> {
        let geo = match event.client_ip.as_deref() {
            Some(ip) => self.geo.resolve(ip).await,
            None => None,
        };

        let outcome = match &self.probe {
            Some(probe) => Some(probe.probe(&event.long_url).await),
            None => None,
        };

        let new_log = NewClickLog {
            id: event.id,
            link_id: event.link_id,
            visited_at: event.visited_at,
            client_ip: event.client_ip,
            geo: geo.filter(|g| !g.is_empty()),
            outcome,
        };

        let strategy = ExponentialBackoff::from_millis(self.retry_base_millis)
            .map(jitter)
            .take(self.write_retries);

        Retry::start(strategy, || {
            let repository = Arc::clone(&self.click_logs);
            let log = new_log.clone();
            async move { repository.create(log).await }
        })
        .await
    }
}

/// Drains the click queue until every sender is dropped.
///
/// Each event runs on its own task; a semaphore caps how many run at once.
/// Failures are logged and counted, never propagated. Once the queue closes
/// the worker waits for in-flight tasks before returning.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    pipeline: ClickPipeline,
    concurrency: usize,
) {
    let concurrency = concurrency.clamp(1, u32::MAX as usize);
    let permits = Arc::new(Semaphore::new(concurrency));

    info!(concurrency, "Click worker started");

    while let Some(event) = rx.recv().await {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };

        let pipeline = pipeline.clone();
        tokio::spawn(async move {
            let _permit = permit;
            let click_id = event.id;
            let link_id = event.link_id;

            match pipeline.process(event).await {
                Ok(()) => {
                    counter!("clicks_recorded_total").increment(1);
                    debug!(%click_id, %link_id, "Click recorded");
                }
                Err(e) => {
                    counter!("clicks_failed_total").increment(1);
                    error!(%click_id, %link_id, error = %e, "Failed to record click, event lost");
                }
            }
        });
    }

    let _ = permits.acquire_many(concurrency as u32).await;
    info!("Click queue closed, worker stopped");
}

/// Waits up to `grace` for a spawned [`run_click_worker`] to finish.
///
/// The worker only finishes once every [`ClickRecorder`] is dropped, so call
/// this after the HTTP server (and its state) is gone. Returns `true` when
/// the queue drained in time; otherwise the remaining clicks are abandoned.
pub async fn wait_for_drain(worker: JoinHandle<()>, grace: Duration) -> bool {
    match tokio::time::timeout(grace, worker).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            error!(error = %e, "Click worker task failed");
            false
        }
        Err(_) => {
            warn!(
                grace_secs = grace.as_secs(),
                "Click worker did not drain in time, pending clicks dropped"
            );
            false
        }
    }
}
