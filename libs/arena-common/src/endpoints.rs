//! Gateway path semantics - defines only paths, not transport
//! Keeps the client, the CLI and test fakes agreeing on every route

pub const API_PREFIX: &str = "/api/v1";

/// Non-persisting run
pub fn execute_path() -> String {
    format!("{}/execute", API_PREFIX)
}

/// Persisting judged run (POST) and submission history (GET)
pub fn submissions_path() -> String {
    format!("{}/submissions", API_PREFIX)
}

pub fn submission_path(submission_id: i64) -> String {
    format!("{}/{}", submissions_path(), submission_id)
}

/// Per-test-case breakdown of a judged submission
pub fn submission_details_path(submission_id: i64) -> String {
    format!("{}/details", submission_path(submission_id))
}

pub fn submission_stats_path() -> String {
    format!("{}/stats", submissions_path())
}

/// Problem catalogue listing
pub fn problems_path() -> String {
    format!("{}/problems", API_PREFIX)
}

pub fn problem_path(problem_id: i64) -> String {
    format!("{}/{}", problems_path(), problem_id)
}

pub fn problem_slug_path(slug: &str) -> String {
    format!("{}/slug/{}", problems_path(), slug)
}

pub fn problem_tags_path() -> String {
    format!("{}/tags", problems_path())
}

/// Join a base URL and an API path without doubling the slash
pub fn join(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
