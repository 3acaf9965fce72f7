//! Execution Gateway - HTTP access to the remote judge
//!
//! The judge compiles, runs and scores code; this module only knows the
//! routes and payloads. Failures come back as [`GatewayError`] and are never
//! retried here: a retry is a new user intent.

use arena_common::endpoints;
use arena_common::types::{
    DetailedSubmissionResult, ExecuteRequest, ExecutionResult, Problem, ProblemFilters,
    ProblemListResponse, Submission, SubmissionFilters, SubmissionListResponse, SubmissionStats,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ClientConfig;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid bearer token")]
    InvalidToken,

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("gateway answered {status}{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Status {
        status: u16,
        message: Option<String>,
    },

    #[error("unexpected response body from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl GatewayError {
    /// Message the gateway itself put in the error body, if any
    pub fn user_message(&self) -> Option<&str> {
        match self {
            GatewayError::Status {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The seam between the session and the remote judge.
pub trait ExecutionGateway: Send + Sync + 'static {
    /// `POST /execute`: run against public test cases, nothing persisted
    fn run_code(
        &self,
        request: ExecuteRequest,
    ) -> impl Future<Output = Result<ExecutionResult, GatewayError>> + Send;

    /// `POST /submissions`: judged run, result carries a submission id
    fn submit_code(
        &self,
        request: ExecuteRequest,
    ) -> impl Future<Output = Result<ExecutionResult, GatewayError>> + Send;

    /// `GET /submissions/{id}`; `None` while the judge has not stored it yet
    fn fetch_submission(
        &self,
        submission_id: i64,
    ) -> impl Future<Output = Result<Option<Submission>, GatewayError>> + Send;
}

/// Gateway backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| GatewayError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /submissions` with filters and pagination
    pub async fn list_submissions(
        &self,
        filters: &SubmissionFilters,
        page: u32,
        limit: u32,
    ) -> Result<SubmissionListResponse, GatewayError> {
        let query = filters.to_query(page, limit);
        self.get_json(&endpoints::submissions_path(), &query).await
    }

    /// `GET /submissions/{id}/details`
    pub async fn submission_details(
        &self,
        submission_id: i64,
    ) -> Result<DetailedSubmissionResult, GatewayError> {
        self.get_json(&endpoints::submission_details_path(submission_id), &[])
            .await
    }

    /// `GET /submissions/stats`, optionally narrowed to one problem
    pub async fn submission_stats(
        &self,
        problem_id: Option<i64>,
    ) -> Result<SubmissionStats, GatewayError> {
        let query: Vec<(&str, String)> = problem_id
            .map(|id| vec![("problemId", id.to_string())])
            .unwrap_or_default();
        self.get_json(&endpoints::submission_stats_path(), &query)
            .await
    }

    /// `GET /problems` with catalogue filters and pagination
    pub async fn list_problems(
        &self,
        filters: &ProblemFilters,
        page: u32,
        limit: u32,
    ) -> Result<ProblemListResponse, GatewayError> {
        let query = filters.to_query(page, limit);
        self.get_json(&endpoints::problems_path(), &query).await
    }

    pub async fn get_problem(&self, problem_id: i64) -> Result<Problem, GatewayError> {
        self.get_json(&endpoints::problem_path(problem_id), &[])
            .await
    }

    pub async fn get_problem_by_slug(&self, slug: &str) -> Result<Problem, GatewayError> {
        self.get_json(&endpoints::problem_slug_path(slug), &[])
            .await
    }

    /// Every tag used across the catalogue
    pub async fn problem_tags(&self) -> Result<Vec<String>, GatewayError> {
        self.get_json(&endpoints::problem_tags_path(), &[]).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = endpoints::join(&self.base_url, path);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                url: url.clone(),
                source,
            })?;

        decode(url, response).await
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let url = endpoints::join(&self.base_url, path);
        debug!(%url, params = query.len(), "GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                url: url.clone(),
                source,
            })?;

        decode(url, response).await
    }
}

impl ExecutionGateway for HttpGateway {
    async fn run_code(&self, request: ExecuteRequest) -> Result<ExecutionResult, GatewayError> {
        self.post_json(&endpoints::execute_path(), &request).await
    }

    async fn submit_code(&self, request: ExecuteRequest) -> Result<ExecutionResult, GatewayError> {
        self.post_json(&endpoints::submissions_path(), &request)
            .await
    }

    async fn fetch_submission(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>, GatewayError> {
        let url = endpoints::join(&self.base_url, &endpoints::submission_path(submission_id));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                url: url.clone(),
                source,
            })?;

        // 202: stored but still being judged; 404: not stored yet
        match response.status() {
            StatusCode::ACCEPTED | StatusCode::NOT_FOUND => Ok(None),
            _ => decode(url, response).await.map(Some),
        }
    }
}

async fn decode<T: DeserializeOwned>(
    url: String,
    response: reqwest::Response,
) -> Result<T, GatewayError> {
    let status = response.status();

    if status.is_success() {
        return response.json::<T>().await.map_err(|e| GatewayError::Decode {
            url,
            reason: e.to_string(),
        });
    }

    // Body is best effort; a failure to read it still reports the status
    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body);
    warn!(%url, status = status.as_u16(), message = ?message, "Gateway returned an error");

    Err(GatewayError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Pull a human-readable message out of an error body like `{"error": "..."}`
pub fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .filter_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}
