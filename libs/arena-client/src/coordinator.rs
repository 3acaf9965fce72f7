//! Effect Coordinator - turns intents into gateway requests
//!
//! **Responsibility:**
//! Issue exactly one gateway request per intent and convert its outcome into
//! a store transition.
//!
//! **Concurrency discipline:**
//! - At most one request is outstanding per session
//! - Every request carries a [`Ticket`]; completions for any ticket other than
//!   the outstanding one are stale and never reach the store
//! - A new intent while busy either replaces the outstanding request or is
//!   rejected, per [`ConcurrencyPolicy`]
//!
//! **Error boundary:**
//! Gateway failures never propagate past this module. They become a `fail`
//! transition carrying the gateway's own message or the per-intent fallback.

use arena_common::types::{ExecutionResult, IntentKind, SubmissionIntent};
use arena_common::verdict::Verdict;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::ConcurrencyPolicy;
use crate::gateway::{ExecutionGateway, GatewayError};
use crate::store::{SubmissionStore, TransitionError};

pub type Ticket = u64;

/// Completion of one gateway request, delivered back to the session loop
#[derive(Debug)]
pub struct GatewayEvent {
    pub ticket: Ticket,
    pub kind: IntentKind,
    pub outcome: Result<ExecutionResult, GatewayError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntentRejected {
    #[error("a {0} is already in flight")]
    Busy(IntentKind),

    #[error("the session has been closed")]
    Closed,
}

/// What applying a gateway completion did to the store
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Completed {
        ticket: Ticket,
        kind: IntentKind,
        verdict: Verdict,
    },
    Failed {
        ticket: Ticket,
        kind: IntentKind,
        message: String,
    },
    /// Superseded or torn down before it arrived
    Stale { ticket: Ticket },
}

impl Applied {
    pub fn is_stale(&self) -> bool {
        matches!(self, Applied::Stale { .. })
    }
}

struct Outstanding {
    ticket: Ticket,
    kind: IntentKind,
    handle: JoinHandle<()>,
}

pub struct EffectCoordinator<G> {
    gateway: Arc<G>,
    policy: ConcurrencyPolicy,
    next_ticket: Ticket,
    outstanding: Option<Outstanding>,
    events: mpsc::UnboundedSender<GatewayEvent>,
}

impl<G: ExecutionGateway> EffectCoordinator<G> {
    pub fn new(
        gateway: Arc<G>,
        policy: ConcurrencyPolicy,
        events: mpsc::UnboundedSender<GatewayEvent>,
    ) -> Self {
        Self {
            gateway,
            policy,
            next_ticket: 1,
            outstanding: None,
            events,
        }
    }

    pub fn policy(&self) -> ConcurrencyPolicy {
        self.policy
    }

    pub fn is_busy(&self) -> bool {
        self.outstanding.is_some()
    }

    pub fn outstanding_ticket(&self) -> Option<Ticket> {
        self.outstanding.as_ref().map(|o| o.ticket)
    }

    /// Begin the intent in the store and fire its request
    pub fn dispatch(
        &mut self,
        store: &mut SubmissionStore,
        intent: SubmissionIntent,
    ) -> Result<Ticket, IntentRejected> {
        let kind = intent.kind();

        if let Some((active_ticket, active_kind)) =
            self.outstanding.as_ref().map(|o| (o.ticket, o.kind))
        {
            match self.policy {
                ConcurrencyPolicy::Reject => {
                    debug!(ticket = active_ticket, requested = %kind, "Intent rejected while busy");
                    return Err(IntentRejected::Busy(active_kind));
                }
                ConcurrencyPolicy::Replace => {
                    info!(ticket = active_ticket, requested = %kind, "Superseding outstanding request");
                    self.cancel(store);
                }
            }
        }

        store.begin(kind).map_err(|e| match e {
            TransitionError::Busy { phase, .. } => {
                IntentRejected::Busy(phase.in_flight().unwrap_or(kind))
            }
            TransitionError::Unexpected { .. } => IntentRejected::Busy(kind),
        })?;

        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let gateway = Arc::clone(&self.gateway);
        let events = self.events.clone();
        let request = intent.to_request();

        info!(
            ticket,
            kind = %kind,
            language = %intent.language,
            problem_id = intent.problem_id,
            source_size = intent.code.len(),
            "Dispatching intent"
        );

        let handle = tokio::spawn(async move {
            let outcome = match kind {
                IntentKind::Run => gateway.run_code(request).await,
                IntentKind::Submit => gateway.submit_code(request).await,
            };
            // Receiver gone means the session was torn down
            let _ = events.send(GatewayEvent {
                ticket,
                kind,
                outcome,
            });
        });

        self.outstanding = Some(Outstanding {
            ticket,
            kind,
            handle,
        });

        Ok(ticket)
    }

    /// Map a completion onto the store, dropping it if it is stale
    pub fn apply(&mut self, store: &mut SubmissionStore, event: GatewayEvent) -> Applied {
        let GatewayEvent {
            ticket,
            kind,
            outcome,
        } = event;

        match &self.outstanding {
            Some(current) if current.ticket == ticket => {}
            _ => {
                debug!(ticket, kind = %kind, "Dropping stale completion");
                return Applied::Stale { ticket };
            }
        }
        self.outstanding = None;

        match outcome {
            Ok(result) => {
                let verdict = result.verdict();
                if let Err(e) = store.complete(kind, result) {
                    error!(ticket, error = %e, "Store rejected completion");
                    return Applied::Stale { ticket };
                }
                info!(ticket, kind = %kind, verdict = %verdict, "Intent completed");
                Applied::Completed {
                    ticket,
                    kind,
                    verdict,
                }
            }
            Err(err) => {
                let message = err
                    .user_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| kind.fallback_error().to_string());
                warn!(ticket, kind = %kind, error = %err, "Intent failed");
                if let Err(e) = store.fail(message.clone()) {
                    error!(ticket, error = %e, "Store rejected failure");
                    return Applied::Stale { ticket };
                }
                Applied::Failed {
                    ticket,
                    kind,
                    message,
                }
            }
        }
    }

    /// Abort the outstanding request; its completion, if already queued, goes stale
    pub fn cancel(&mut self, store: &mut SubmissionStore) -> Option<Ticket> {
        let current = self.outstanding.take()?;
        current.handle.abort();
        store.abandon();
        debug!(ticket = current.ticket, kind = %current.kind, "Outstanding request cancelled");
        Some(current.ticket)
    }
}

impl<G> Drop for EffectCoordinator<G> {
    fn drop(&mut self) {
        if let Some(current) = self.outstanding.take() {
            current.handle.abort();
        }
    }
}
