//! Real-time Feedback Channel - progress of submissions being judged
//!
//! A secondary path next to the request/response flow. It owns its own
//! connection status and update stream and never writes the store.
//!
//! **Ordering contract, per submission id:**
//! `queued` → `processing`* (non-decreasing progress) → `completed`, at most
//! one `completed`, nothing after it. A source that cannot finish ends the
//! sequence with `failed` instead. Updates that break the order are dropped
//! before any subscriber sees them.
//!
//! The first update seen for an id opens its sequence whatever its stage,
//! so a subscriber that joins mid-judging still gets the tail.

use arena_common::types::{ProgressStatus, ProgressUpdate};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::gateway::GatewayError;

const UPDATE_BUFFER: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
            ConnectionStatus::Connecting => write!(f, "connecting"),
            ConnectionStatus::Connected => write!(f, "connected"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FeedbackError {
    #[error("feedback channel is disconnected")]
    Disconnected,
}

/// Where progress updates come from.
pub trait ProgressSource: Send + Sync + 'static {
    /// Establish the transport
    fn open(&self) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Emit updates for one submission into `sink` until it completes
    fn track(&self, submission_id: i64, sink: ProgressSink) -> impl Future<Output = ()> + Send;
}

/// Enforces the per-submission ordering contract
#[derive(Debug, Default)]
pub struct ProgressSequencer {
    last: HashMap<i64, (ProgressStatus, u8)>,
}

impl ProgressSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `update` if it extends its submission's sequence
    pub fn admit(&mut self, update: &ProgressUpdate) -> bool {
        let previous = self.last.get(&update.submission_id).copied();
        let progress = match update.status {
            ProgressStatus::Queued => 0,
            ProgressStatus::Completed => 100,
            ProgressStatus::Processing | ProgressStatus::Failed => update
                .progress
                .unwrap_or_else(|| previous.map(|(_, p)| p).unwrap_or(0)),
        };

        let admitted = match previous {
            None => true,
            Some((ProgressStatus::Completed | ProgressStatus::Failed, _)) => false,
            Some((last_status, last_progress)) => match update.status {
                ProgressStatus::Queued => false,
                ProgressStatus::Processing => {
                    last_status == ProgressStatus::Queued || progress >= last_progress
                }
                ProgressStatus::Completed | ProgressStatus::Failed => true,
            },
        };

        if admitted {
            self.last
                .insert(update.submission_id, (update.status, progress));
        }
        admitted
    }

    pub fn is_completed(&self, submission_id: i64) -> bool {
        matches!(
            self.last.get(&submission_id),
            Some((ProgressStatus::Completed, _))
        )
    }

    /// Completed or failed; no further update will be admitted
    pub fn is_finished(&self, submission_id: i64) -> bool {
        matches!(
            self.last.get(&submission_id),
            Some((ProgressStatus::Completed | ProgressStatus::Failed, _))
        )
    }
}

struct Shared {
    status: watch::Sender<ConnectionStatus>,
    updates: broadcast::Sender<ProgressUpdate>,
    sequencer: Mutex<ProgressSequencer>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Shared {
    fn push_task(&self, handle: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|t| !t.is_finished());
        tasks.push(handle);
    }

    fn abort_tasks(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

/// Write end handed to a [`ProgressSource`]
#[derive(Clone)]
pub struct ProgressSink {
    shared: Arc<Shared>,
}

impl ProgressSink {
    /// Publish an update; false when it breaks the ordering contract
    pub fn publish(&self, update: ProgressUpdate) -> bool {
        let admitted = self
            .shared
            .sequencer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .admit(&update);

        if !admitted {
            warn!(
                submission_id = update.submission_id,
                status = %update.status,
                "Dropping out-of-order progress update"
            );
            return false;
        }

        debug!(
            submission_id = update.submission_id,
            status = %update.status,
            progress = ?update.progress,
            "Progress update"
        );
        // No subscribers is fine
        let _ = self.shared.updates.send(update);
        true
    }
}

/// A consumer's view of the update stream. Dropping it unsubscribes.
pub struct Subscription {
    receiver: broadcast::Receiver<ProgressUpdate>,
    filter: Option<i64>,
}

impl Subscription {
    pub fn filter(&self) -> Option<i64> {
        self.filter
    }

    /// Next update matching the filter; `None` once the channel is gone
    pub async fn recv(&mut self) -> Option<ProgressUpdate> {
        loop {
            match self.receiver.recv().await {
                Ok(update) => {
                    if self.filter.map_or(true, |id| id == update.submission_id) {
                        return Some(update);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Progress subscriber lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

pub struct FeedbackChannel<S> {
    shared: Arc<Shared>,
    source: Arc<S>,
}

impl<S: ProgressSource> FeedbackChannel<S> {
    pub fn new(source: S) -> Self {
        let (status, _) = watch::channel(ConnectionStatus::Disconnected);
        let (updates, _) = broadcast::channel(UPDATE_BUFFER);

        Self {
            shared: Arc::new(Shared {
                status,
                updates,
                sequencer: Mutex::new(ProgressSequencer::new()),
                tasks: Mutex::new(Vec::new()),
            }),
            source: Arc::new(source),
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.shared.status.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.status() == ConnectionStatus::Connected
    }

    pub fn status_changes(&self) -> watch::Receiver<ConnectionStatus> {
        self.shared.status.subscribe()
    }

    /// Start connecting. A no-op while connecting or connected.
    pub fn connect(&self) -> ConnectionStatus {
        let current = self.status();
        if current != ConnectionStatus::Disconnected {
            return current;
        }

        self.shared.status.send_replace(ConnectionStatus::Connecting);
        info!("Feedback channel connecting");

        let shared = Arc::clone(&self.shared);
        let source = Arc::clone(&self.source);
        let handle = tokio::spawn(async move {
            match source.open().await {
                Ok(()) => {
                    shared.status.send_if_modified(|status| {
                        if *status == ConnectionStatus::Connecting {
                            *status = ConnectionStatus::Connected;
                            true
                        } else {
                            false
                        }
                    });
                    info!("Feedback channel connected");
                }
                Err(e) => {
                    warn!(error = %e, "Feedback channel failed to connect");
                    shared.status.send_replace(ConnectionStatus::Disconnected);
                }
            }
        });
        self.shared.push_task(handle);

        ConnectionStatus::Connecting
    }

    /// Wait until connected; false if the attempt ends disconnected
    pub async fn wait_connected(&self) -> bool {
        let mut changes = self.status_changes();
        changes
            .wait_for(|status| *status != ConnectionStatus::Connecting)
            .await
            .map(|status| *status == ConnectionStatus::Connected)
            .unwrap_or(false)
    }

    /// Stop every tracking task and drop the connection
    pub fn disconnect(&self) {
        self.shared.abort_tasks();
        let previous = self.shared.status.send_replace(ConnectionStatus::Disconnected);
        if previous != ConnectionStatus::Disconnected {
            info!("Feedback channel disconnected");
        }
    }

    /// Updates for one submission, or for all when `submission_id` is `None`
    pub fn subscribe(&self, submission_id: Option<i64>) -> Subscription {
        Subscription {
            receiver: self.shared.updates.subscribe(),
            filter: submission_id,
        }
    }

    /// Ask the source to report on a submission. Starts once connected.
    pub fn track(&self, submission_id: i64) -> Result<(), FeedbackError> {
        if self.status() == ConnectionStatus::Disconnected {
            return Err(FeedbackError::Disconnected);
        }

        let sink = ProgressSink {
            shared: Arc::clone(&self.shared),
        };
        let source = Arc::clone(&self.source);
        let mut changes = self.status_changes();

        let handle = tokio::spawn(async move {
            let connected = changes
                .wait_for(|status| *status != ConnectionStatus::Connecting)
                .await
                .map(|status| *status == ConnectionStatus::Connected)
                .unwrap_or(false);
            if !connected {
                debug!(submission_id, "Tracking abandoned, channel not connected");
                return;
            }
            source.track(submission_id, sink).await;
        });
        self.shared.push_task(handle);

        debug!(submission_id, "Tracking submission");
        Ok(())
    }

    pub fn is_completed(&self, submission_id: i64) -> bool {
        self.shared
            .sequencer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_completed(submission_id)
    }

    pub fn is_finished(&self, submission_id: i64) -> bool {
        self.shared
            .sequencer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_finished(submission_id)
    }

    /// Direct write access, for sources driven from outside the channel
    pub fn sink(&self) -> ProgressSink {
        ProgressSink {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S> Drop for FeedbackChannel<S> {
    fn drop(&mut self) {
        self.shared.abort_tasks();
    }
}
