// Progress sources behind the feedback channel
use arena_common::types::{ExecutionResult, ProgressUpdate};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, FeedbackMode};
use crate::feedback::{ProgressSink, ProgressSource};
use crate::gateway::{ExecutionGateway, GatewayError};

const QUEUED_MESSAGE: &str = "Submission queued for processing";

/// Processing stages reported between `queued` and `completed`
const STAGES: [(u8, &str); 3] = [
    (25, "Compiling code..."),
    (50, "Running test cases..."),
    (75, "Evaluating results..."),
];

/// Timer-driven demo sequence, one stage per `step`
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    step: Duration,
    result: ExecutionResult,
}

impl SimulatedSource {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            result: ExecutionResult {
                success: true,
                runtime_ms: Some(45),
                memory_kb: Some(12_800),
                test_cases_passed: Some(10),
                total_test_cases: Some(10),
                ..Default::default()
            },
        }
    }

    /// Result carried by the final `completed` update
    pub fn with_result(mut self, result: ExecutionResult) -> Self {
        self.result = result;
        self
    }
}

impl ProgressSource for SimulatedSource {
    /// Handshake takes one step, so `Connecting` is observable
    async fn open(&self) -> Result<(), GatewayError> {
        tokio::time::sleep(self.step).await;
        Ok(())
    }

    async fn track(&self, submission_id: i64, sink: ProgressSink) {
        sink.publish(ProgressUpdate::queued(submission_id, QUEUED_MESSAGE));

        for (progress, message) in STAGES {
            tokio::time::sleep(self.step).await;
            sink.publish(ProgressUpdate::processing(submission_id, progress, message));
        }

        tokio::time::sleep(self.step).await;
        let result = ExecutionResult {
            submission_id: Some(submission_id),
            ..self.result.clone()
        };
        sink.publish(ProgressUpdate::completed(submission_id, result));
    }
}

/// Polls `GET /submissions/{id}` until the judge has stored a verdict
pub struct PollingSource<G> {
    gateway: Arc<G>,
    interval: Duration,
    max_failures: u32,
}

impl<G: ExecutionGateway> PollingSource<G> {
    pub const DEFAULT_MAX_FAILURES: u32 = 5;

    pub fn new(gateway: Arc<G>, interval: Duration) -> Self {
        Self {
            gateway,
            interval,
            max_failures: Self::DEFAULT_MAX_FAILURES,
        }
    }

    /// Consecutive lookup failures tolerated before tracking gives up
    pub fn with_max_failures(mut self, max_failures: u32) -> Self {
        self.max_failures = max_failures.max(1);
        self
    }
}

impl<G: ExecutionGateway> ProgressSource for PollingSource<G> {
    async fn open(&self) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn track(&self, submission_id: i64, sink: ProgressSink) {
        sink.publish(ProgressUpdate::queued(submission_id, QUEUED_MESSAGE));

        let mut stage = 0;
        let mut failures = 0;

        loop {
            tokio::time::sleep(self.interval).await;

            match self.gateway.fetch_submission(submission_id).await {
                Ok(Some(submission)) => {
                    info!(
                        submission_id,
                        status = %submission.status,
                        "Submission judged"
                    );
                    sink.publish(ProgressUpdate::completed(
                        submission_id,
                        submission.to_execution_result(),
                    ));
                    return;
                }
                Ok(None) => {
                    failures = 0;
                    if let Some((progress, message)) = STAGES.get(stage) {
                        sink.publish(ProgressUpdate::processing(
                            submission_id,
                            *progress,
                            *message,
                        ));
                        stage += 1;
                    } else {
                        debug!(submission_id, "Still pending");
                    }
                }
                Err(e) => {
                    failures += 1;
                    warn!(submission_id, failures, error = %e, "Submission lookup failed");
                    if failures >= self.max_failures {
                        warn!(submission_id, "Giving up on progress tracking");
                        sink.publish(ProgressUpdate::failed(
                            submission_id,
                            format!("Progress tracking failed after {} lookups", failures),
                        ));
                        return;
                    }
                }
            }
        }
    }
}

/// Source chosen by [`FeedbackMode`]
pub enum FeedbackSource<G> {
    Simulated(SimulatedSource),
    Polling(PollingSource<G>),
}

impl<G: ExecutionGateway> FeedbackSource<G> {
    /// `None` when feedback is switched off
    pub fn from_config(config: &ClientConfig, gateway: Arc<G>) -> Option<Self> {
        match config.feedback {
            FeedbackMode::Polling => Some(FeedbackSource::Polling(PollingSource::new(
                gateway,
                config.poll_interval(),
            ))),
            FeedbackMode::Simulated => Some(FeedbackSource::Simulated(SimulatedSource::new(
                config.simulated_step(),
            ))),
            FeedbackMode::Off => None,
        }
    }
}

impl<G: ExecutionGateway> ProgressSource for FeedbackSource<G> {
    async fn open(&self) -> Result<(), GatewayError> {
        match self {
            FeedbackSource::Simulated(source) => source.open().await,
            FeedbackSource::Polling(source) => source.open().await,
        }
    }

    async fn track(&self, submission_id: i64, sink: ProgressSink) {
        match self {
            FeedbackSource::Simulated(source) => source.track(submission_id, sink).await,
            FeedbackSource::Polling(source) => source.track(submission_id, sink).await,
        }
    }
}
