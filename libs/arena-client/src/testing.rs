// In-memory gateway for unit tests
use arena_common::types::{ExecuteRequest, ExecutionResult, Submission};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::gateway::{ExecutionGateway, GatewayError};

pub(crate) struct Scripted {
    pub delay: Duration,
    pub outcome: Result<ExecutionResult, GatewayError>,
}

/// Answers requests in order from a script; each answer waits `delay` first
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    answers: Mutex<VecDeque<Scripted>>,
    lookups: Mutex<VecDeque<Result<Option<Submission>, GatewayError>>>,
    requests: Mutex<Vec<ExecuteRequest>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, delay_ms: u64, outcome: Result<ExecutionResult, GatewayError>) -> Self {
        self.answers.lock().unwrap().push_back(Scripted {
            delay: Duration::from_millis(delay_ms),
            outcome,
        });
        self
    }

    pub fn lookup(self, outcome: Result<Option<Submission>, GatewayError>) -> Self {
        self.lookups.lock().unwrap().push_back(outcome);
        self
    }

    pub fn requests(&self) -> Vec<ExecuteRequest> {
        self.requests.lock().unwrap().clone()
    }

    async fn next(&self, request: ExecuteRequest) -> Result<ExecutionResult, GatewayError> {
        self.requests.lock().unwrap().push(request);
        let scripted = self.answers.lock().unwrap().pop_front();
        match scripted {
            Some(scripted) => {
                tokio::time::sleep(scripted.delay).await;
                scripted.outcome
            }
            None => Err(GatewayError::Status {
                status: 500,
                message: None,
            }),
        }
    }
}

impl ExecutionGateway for ScriptedGateway {
    async fn run_code(&self, request: ExecuteRequest) -> Result<ExecutionResult, GatewayError> {
        self.next(request).await
    }

    async fn submit_code(&self, request: ExecuteRequest) -> Result<ExecutionResult, GatewayError> {
        self.next(request).await
    }

    async fn fetch_submission(
        &self,
        _submission_id: i64,
    ) -> Result<Option<Submission>, GatewayError> {
        let next = self.lookups.lock().unwrap().pop_front();
        next.unwrap_or(Ok(None))
    }
}

pub(crate) fn passing_result(submission_id: Option<i64>) -> ExecutionResult {
    ExecutionResult {
        success: true,
        runtime_ms: Some(42),
        memory_kb: Some(12_800),
        test_cases_passed: Some(10),
        total_test_cases: Some(10),
        submission_id,
        ..Default::default()
    }
}
