//! One editor session: store, coordinator and progress feeds behind a
//! single-consumer event loop.
//!
//! Gateway completions are the only thing that writes the store. Progress
//! updates pass through for display and are flagged `superseded` once the
//! store already holds the terminal result for that submission.

use arena_common::types::{ProgressUpdate, SubmissionIntent};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::ConcurrencyPolicy;
use crate::coordinator::{Applied, EffectCoordinator, GatewayEvent, IntentRejected, Ticket};
use crate::feedback::Subscription;
use crate::gateway::ExecutionGateway;
use crate::presenter::{present, View};
use crate::store::SubmissionStore;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Transition(Applied),
    Progress {
        update: ProgressUpdate,
        superseded: bool,
    },
}

pub struct Session<G> {
    id: Uuid,
    store: SubmissionStore,
    coordinator: EffectCoordinator<G>,
    events: mpsc::UnboundedReceiver<GatewayEvent>,
    progress_tx: mpsc::UnboundedSender<ProgressUpdate>,
    progress_rx: mpsc::UnboundedReceiver<ProgressUpdate>,
    followers: Vec<JoinHandle<()>>,
    snapshot: watch::Sender<View>,
    closed: bool,
}

impl<G: ExecutionGateway> Session<G> {
    pub fn new(gateway: Arc<G>, policy: ConcurrencyPolicy) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        let (progress_tx, progress_rx) = mpsc::unbounded_channel();
        let store = SubmissionStore::new();
        let (snapshot, _) = watch::channel(present(&store));
        let id = Uuid::new_v4();

        debug!(session_id = %id, policy = %policy, "Session opened");

        Self {
            id,
            store,
            coordinator: EffectCoordinator::new(gateway, policy, events_tx),
            events,
            progress_tx,
            progress_rx,
            followers: Vec::new(),
            snapshot,
            closed: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn store(&self) -> &SubmissionStore {
        &self.store
    }

    pub fn view(&self) -> View {
        present(&self.store)
    }

    /// Receives a fresh [`View`] after every store change
    pub fn watch(&self) -> watch::Receiver<View> {
        self.snapshot.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[instrument(skip(self, intent), fields(session_id = %self.id, kind = %intent.kind()))]
    pub fn dispatch(&mut self, intent: SubmissionIntent) -> Result<Ticket, IntentRejected> {
        if self.closed {
            return Err(IntentRejected::Closed);
        }
        let ticket = self.coordinator.dispatch(&mut self.store, intent)?;
        self.publish();
        Ok(ticket)
    }

    pub fn run(&mut self, intent: SubmissionIntent) -> Result<Ticket, IntentRejected> {
        self.dispatch(SubmissionIntent {
            is_submission: false,
            ..intent
        })
    }

    pub fn submit(&mut self, intent: SubmissionIntent) -> Result<Ticket, IntentRejected> {
        self.dispatch(SubmissionIntent {
            is_submission: true,
            ..intent
        })
    }

    /// Drop the last result or error
    pub fn clear(&mut self) {
        self.store.clear();
        self.publish();
    }

    /// Feed a progress subscription into this session's event loop
    pub fn follow(&mut self, mut subscription: Subscription) {
        if self.closed {
            return;
        }
        let tx = self.progress_tx.clone();
        let handle = tokio::spawn(async move {
            while let Some(update) = subscription.recv().await {
                let terminal = update.is_terminal();
                if tx.send(update).is_err() || (terminal && subscription.filter().is_some()) {
                    break;
                }
            }
        });
        self.followers.retain(|f| !f.is_finished());
        self.followers.push(handle);
    }

    /// Wait for the next thing that happened. `None` once torn down.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        if self.closed {
            return None;
        }

        tokio::select! {
            biased;

            Some(event) = self.events.recv() => {
                let applied = self.coordinator.apply(&mut self.store, event);
                if !applied.is_stale() {
                    self.publish();
                }
                Some(SessionEvent::Transition(applied))
            }
            Some(update) = self.progress_rx.recv() => {
                let superseded = self
                    .store
                    .execution_result()
                    .and_then(|r| r.submission_id)
                    .map_or(false, |id| id == update.submission_id);
                debug!(
                    session_id = %self.id,
                    submission_id = update.submission_id,
                    status = %update.status,
                    superseded,
                    "Progress received"
                );
                Some(SessionEvent::Progress { update, superseded })
            }
            else => None,
        }
    }

    /// Wait for the outstanding intent to land in the store.
    /// Progress arriving meanwhile is skipped. `None` when nothing is in flight.
    pub async fn settle(&mut self) -> Option<Applied> {
        while self.coordinator.is_busy() {
            match self.next_event().await? {
                SessionEvent::Transition(applied) if !applied.is_stale() => return Some(applied),
                _ => continue,
            }
        }
        None
    }

    /// Abort everything in flight and reset. Later completions are never applied.
    pub fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let cancelled = self.coordinator.cancel(&mut self.store);
        for follower in self.followers.drain(..) {
            follower.abort();
        }
        self.store = SubmissionStore::new();
        self.publish();

        info!(session_id = %self.id, cancelled = ?cancelled, "Session torn down");
    }

    fn publish(&self) {
        self.snapshot.send_replace(present(&self.store));
    }
}

impl<G> Drop for Session<G> {
    fn drop(&mut self) {
        for follower in self.followers.drain(..) {
            follower.abort();
        }
    }
}
