//! Submission State Store - the lifecycle of one editor session
//!
//! **Invariants:**
//! - At most one of running/submitting is active ([`Phase`] is a single value)
//! - Result and error are mutually exclusive ([`Outcome`] is a single value)
//! - Starting an intent clears the previous outcome
//! - A transition that does not fit the current phase is rejected and leaves
//!   the store untouched

use arena_common::types::{ExecutionResult, IntentKind};
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Submitting,
}

impl Phase {
    /// Intent kind currently in flight
    pub fn in_flight(&self) -> Option<IntentKind> {
        match self {
            Phase::Idle => None,
            Phase::Running => Some(IntentKind::Run),
            Phase::Submitting => Some(IntentKind::Submit),
        }
    }
}

impl From<IntentKind> for Phase {
    fn from(kind: IntentKind) -> Self {
        match kind {
            IntentKind::Run => Phase::Running,
            IntentKind::Submit => Phase::Submitting,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Running => write!(f, "running"),
            Phase::Submitting => write!(f, "submitting"),
        }
    }
}

/// Terminal payload of the last intent
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Result(ExecutionResult),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot begin a {requested} while {phase}")]
    Busy { requested: IntentKind, phase: Phase },

    #[error("cannot apply {trigger} while {phase}")]
    Unexpected { trigger: &'static str, phase: Phase },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionStore {
    phase: Phase,
    outcome: Option<Outcome>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn execution_result(&self) -> Option<&ExecutionResult> {
        match &self.outcome {
            Some(Outcome::Result(result)) => Some(result),
            _ => None,
        }
    }

    pub fn execution_error(&self) -> Option<&str> {
        match &self.outcome {
            Some(Outcome::Error(error)) => Some(error.as_str()),
            _ => None,
        }
    }

    pub fn begin(&mut self, kind: IntentKind) -> Result<(), TransitionError> {
        if self.phase != Phase::Idle {
            return Err(TransitionError::Busy {
                requested: kind,
                phase: self.phase,
            });
        }

        self.phase = Phase::from(kind);
        self.outcome = None;
        debug!(phase = %self.phase, "Intent started");
        Ok(())
    }

    pub fn begin_run(&mut self) -> Result<(), TransitionError> {
        self.begin(IntentKind::Run)
    }

    pub fn begin_submit(&mut self) -> Result<(), TransitionError> {
        self.begin(IntentKind::Submit)
    }

    pub fn complete(
        &mut self,
        kind: IntentKind,
        result: ExecutionResult,
    ) -> Result<(), TransitionError> {
        if self.phase != Phase::from(kind) {
            return Err(TransitionError::Unexpected {
                trigger: match kind {
                    IntentKind::Run => "completeRun",
                    IntentKind::Submit => "completeSubmit",
                },
                phase: self.phase,
            });
        }

        debug!(kind = %kind, success = result.success, "Intent completed");
        self.phase = Phase::Idle;
        self.outcome = Some(Outcome::Result(result));
        Ok(())
    }

    pub fn complete_run(&mut self, result: ExecutionResult) -> Result<(), TransitionError> {
        self.complete(IntentKind::Run, result)
    }

    pub fn complete_submit(&mut self, result: ExecutionResult) -> Result<(), TransitionError> {
        self.complete(IntentKind::Submit, result)
    }

    /// Clears whichever flag is active and records the error
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), TransitionError> {
        if self.phase == Phase::Idle {
            return Err(TransitionError::Unexpected {
                trigger: "fail",
                phase: self.phase,
            });
        }

        let error = error.into();
        debug!(phase = %self.phase, error = %error, "Intent failed");
        self.phase = Phase::Idle;
        self.outcome = Some(Outcome::Error(error));
        Ok(())
    }

    /// Drops result and error; in-flight flags are left alone
    pub fn clear(&mut self) {
        self.outcome = None;
    }

    /// Drops the in-flight flag without producing an outcome.
    /// Only the coordinator calls this, when it supersedes or tears down a request.
    pub fn abandon(&mut self) -> Option<IntentKind> {
        let abandoned = self.phase.in_flight();
        self.phase = Phase::Idle;
        abandoned
    }
}
