use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::verdict::Verdict;

/// Languages the editor can run and submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Python,
    Java,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::JavaScript, Language::Python, Language::Java];

    /// Human readable label for selectors and tables
    pub fn label(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Java => "Java",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            Language::JavaScript => ".js",
            Language::Python => ".py",
            Language::Java => ".java",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::JavaScript => write!(f, "javascript"),
            Language::Python => write!(f, "python"),
            Language::Java => write!(f, "java"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "javascript" | "js" => Ok(Language::JavaScript),
            "python" | "py" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            other => Err(format!(
                "unsupported language '{}' (expected javascript, python or java)",
                other
            )),
        }
    }
}

/// Which kind of request an intent turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    /// Non-persisting run against the public test cases
    Run,
    /// Persisting, judged run against every test case
    Submit,
}

impl IntentKind {
    /// Message used when a failed request carries nothing more specific
    pub fn fallback_error(&self) -> &'static str {
        match self {
            IntentKind::Run => "Failed to run code",
            IntentKind::Submit => "Failed to submit code",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentKind::Run => write!(f, "run"),
            IntentKind::Submit => write!(f, "submit"),
        }
    }
}

/// A user-triggered request to run or submit code.
/// Consumed by the coordinator as soon as it is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionIntent {
    pub code: String,
    pub language: Language,
    pub problem_id: i64,
    pub is_submission: bool,
}

impl SubmissionIntent {
    pub fn run(code: impl Into<String>, language: Language, problem_id: i64) -> Self {
        Self {
            code: code.into(),
            language,
            problem_id,
            is_submission: false,
        }
    }

    pub fn submit(code: impl Into<String>, language: Language, problem_id: i64) -> Self {
        Self {
            code: code.into(),
            language,
            problem_id,
            is_submission: true,
        }
    }

    pub fn kind(&self) -> IntentKind {
        if self.is_submission {
            IntentKind::Submit
        } else {
            IntentKind::Run
        }
    }

    /// Body sent to the execution endpoints
    pub fn to_request(&self) -> ExecuteRequest {
        ExecuteRequest {
            code: self.code.clone(),
            language: self.language,
            problem_id: self.problem_id,
        }
    }
}

/// Wire body for `POST /execute` and `POST /submissions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub code: String,
    pub language: Language,
    #[serde(alias = "problem_id")]
    pub problem_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, alias = "runtime", skip_serializing_if = "Option::is_none")]
    pub runtime_ms: Option<u64>,
    #[serde(default, alias = "memory", skip_serializing_if = "Option::is_none")]
    pub memory_kb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_cases_passed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_test_cases: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<i64>,
    /// Verdict already decided by the judge; wins over classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
}

impl ExecutionResult {
    /// The judge's verdict when it sent one, else [`Verdict::classify`]
    pub fn verdict(&self) -> Verdict {
        self.verdict
            .unwrap_or_else(|| Verdict::classify(self.success, self.error.as_deref()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Queued,
    Processing,
    Completed,
    /// The feed ended without a verdict
    Failed,
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressStatus::Queued => write!(f, "queued"),
            ProgressStatus::Processing => write!(f, "processing"),
            ProgressStatus::Completed => write!(f, "completed"),
            ProgressStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Incremental status of a submission being judged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub submission_id: i64,
    pub status: ProgressStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ExecutionResult>,
}

impl ProgressUpdate {
    pub fn queued(submission_id: i64, message: impl Into<String>) -> Self {
        Self {
            submission_id,
            status: ProgressStatus::Queued,
            progress: Some(0),
            message: Some(message.into()),
            result: None,
        }
    }

    pub fn processing(submission_id: i64, progress: u8, message: impl Into<String>) -> Self {
        Self {
            submission_id,
            status: ProgressStatus::Processing,
            progress: Some(progress.min(100)),
            message: Some(message.into()),
            result: None,
        }
    }

    pub fn completed(submission_id: i64, result: ExecutionResult) -> Self {
        Self {
            submission_id,
            status: ProgressStatus::Completed,
            progress: Some(100),
            message: Some("Submission completed".to_string()),
            result: Some(result),
        }
    }

    /// Tracking gave up; carries no result
    pub fn failed(submission_id: i64, message: impl Into<String>) -> Self {
        Self {
            submission_id,
            status: ProgressStatus::Failed,
            progress: None,
            message: Some(message.into()),
            result: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            ProgressStatus::Completed | ProgressStatus::Failed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn color(&self) -> &'static str {
        match self {
            Difficulty::Easy => "green",
            Difficulty::Medium => "orange",
            Difficulty::Hard => "red",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("invalid difficulty '{}' (easy, medium, hard)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub input: String,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A practice problem as served by the problem catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub constraints: String,
    /// Starter code keyed by language name
    #[serde(default)]
    pub template_code: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_solved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_rate: Option<f64>,
}

impl Problem {
    pub fn template_for(&self, language: Language) -> Option<&str> {
        self.template_code
            .get(&language.to_string())
            .map(String::as_str)
    }

    pub fn is_solved(&self) -> bool {
        self.is_solved == Some(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolvedFilter {
    #[default]
    All,
    Solved,
    Unsolved,
}

impl FromStr for SolvedFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(SolvedFilter::All),
            "solved" => Ok(SolvedFilter::Solved),
            "unsolved" => Ok(SolvedFilter::Unsolved),
            other => Err(format!("invalid status '{}' (all, solved, unsolved)", other)),
        }
    }
}

impl fmt::Display for SolvedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolvedFilter::All => write!(f, "all"),
            SolvedFilter::Solved => write!(f, "solved"),
            SolvedFilter::Unsolved => write!(f, "unsolved"),
        }
    }
}

/// Catalogue filters. Empty lists and `All` mean no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemFilters {
    pub difficulty: Vec<Difficulty>,
    pub tags: Vec<String>,
    pub status: SolvedFilter,
    pub search: Option<String>,
}

impl ProblemFilters {
    /// Query parameters for `GET /problems`
    pub fn to_query(&self, page: u32, limit: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", page.to_string()), ("limit", limit.to_string())];

        if !self.difficulty.is_empty() {
            let joined: Vec<String> = self.difficulty.iter().map(|d| d.to_string()).collect();
            params.push(("difficulty", joined.join(",")));
        }
        if !self.tags.is_empty() {
            params.push(("tags", self.tags.join(",")));
        }
        if self.status != SolvedFilter::All {
            params.push(("status", self.status.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|q| !q.is_empty()) {
            params.push(("search", search.to_string()));
        }

        params
    }

    /// Same filtering applied locally, e.g. to an already fetched page.
    /// Tags match when any tag is shared; search looks at title,
    /// description and tags, case-insensitively.
    pub fn matches(&self, problem: &Problem) -> bool {
        if !self.difficulty.is_empty() && !self.difficulty.contains(&problem.difficulty) {
            return false;
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|t| problem.tags.contains(t)) {
            return false;
        }
        match self.status {
            SolvedFilter::Solved if !problem.is_solved() => return false,
            SolvedFilter::Unsolved if problem.is_solved() => return false,
            _ => {}
        }
        if let Some(query) = self.search.as_deref().filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            let hit = problem.title.to_lowercase().contains(&query)
                || problem.description.to_lowercase().contains(&query)
                || problem
                    .tags
                    .iter()
                    .any(|t| t.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemListResponse {
    pub problems: Vec<Problem>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemRef {
    pub id: i64,
    pub title: String,
    pub difficulty: Difficulty,
}

/// A persisted, judged submission as listed in the history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    pub user_id: i64,
    pub problem_id: i64,
    pub language: Language,
    pub code: String,
    pub status: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_kb: Option<u64>,
    pub test_cases_passed: u32,
    pub total_test_cases: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<ProblemRef>,
}

impl Submission {
    /// Synthesize the execution result a judged submission corresponds to
    pub fn to_execution_result(&self) -> ExecutionResult {
        ExecutionResult {
            success: self.status == Verdict::Accepted,
            output: None,
            error: self.error_message.clone(),
            runtime_ms: self.runtime_ms,
            memory_kb: self.memory_kb,
            test_cases_passed: Some(self.test_cases_passed),
            total_test_cases: Some(self.total_test_cases),
            submission_id: Some(self.id),
            verdict: Some(self.status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// History filters. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilters {
    pub status: Option<Verdict>,
    pub language: Option<Language>,
    pub problem_id: Option<i64>,
    pub date_range: Option<DateRange>,
}

impl SubmissionFilters {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 20;

    /// Query parameters for `GET /submissions`
    pub fn to_query(&self, page: u32, limit: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", page.to_string()), ("limit", limit.to_string())];

        if let Some(status) = self.status {
            params.push(("status", status.label().to_string()));
        }
        if let Some(language) = self.language {
            params.push(("language", language.to_string()));
        }
        if let Some(problem_id) = self.problem_id {
            params.push(("problemId", problem_id.to_string()));
        }
        if let Some(range) = &self.date_range {
            params.push(("startDate", range.start.clone()));
            params.push(("endDate", range.end.clone()));
        }

        params
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionListResponse {
    pub submissions: Vec<Submission>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    pub input: String,
    pub expected_output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_output: Option<String>,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_kb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub runtime_ms: u64,
    pub memory_kb: u64,
    pub test_cases_passed: u32,
    pub total_test_cases: u32,
}

impl OverallStats {
    /// Passed share of test cases, rounded to a whole percent
    pub fn pass_percentage(&self) -> u32 {
        if self.total_test_cases == 0 {
            return 0;
        }
        ((self.test_cases_passed as f64 / self.total_test_cases as f64) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedSubmissionResult {
    pub submission: Submission,
    pub test_case_results: Vec<TestCaseResult>,
    pub overall_stats: OverallStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStats {
    pub total_submissions: u64,
    pub accepted_submissions: u64,
    pub acceptance_rate: f64,
    #[serde(default)]
    pub language_stats: HashMap<String, u64>,
    #[serde(default)]
    pub status_stats: HashMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_language_parsing() {
        assert_eq!("python".parse::<Language>(), Ok(Language::Python));
        assert_eq!("JS".parse::<Language>(), Ok(Language::JavaScript));
        assert!("cobol".parse::<Language>().is_err());
        assert_eq!(Language::Java.to_string(), "java");
    }

    #[test]
    fn test_intent_kind_fallbacks() {
        let run = SubmissionIntent::run("print(1)", Language::Python, 7);
        let submit = SubmissionIntent::submit("print(1)", Language::Python, 7);
        assert_eq!(run.kind().fallback_error(), "Failed to run code");
        assert_eq!(submit.kind().fallback_error(), "Failed to submit code");
    }

    #[test]
    fn test_execute_request_wire_shape() {
        let intent = SubmissionIntent::run("x = 1", Language::Python, 42);
        let body = serde_json::to_value(intent.to_request()).unwrap();
        assert_eq!(
            body,
            json!({ "code": "x = 1", "language": "python", "problemId": 42 })
        );
    }

    #[test]
    fn test_execution_result_accepts_legacy_field_names() {
        let result: ExecutionResult = serde_json::from_value(json!({
            "success": true,
            "runtime": 45,
            "memory": 12800,
            "testCasesPassed": 10,
            "totalTestCases": 10
        }))
        .unwrap();

        assert_eq!(result.runtime_ms, Some(45));
        assert_eq!(result.memory_kb, Some(12800));
        assert_eq!(result.submission_id, None);
    }

    #[test]
    fn test_filters_query_skips_all() {
        let filters = SubmissionFilters {
            status: Some(Verdict::WrongAnswer),
            problem_id: Some(3),
            ..Default::default()
        };
        let query = filters.to_query(2, 50);

        assert_eq!(query[0], ("page", "2".to_string()));
        assert_eq!(query[1], ("limit", "50".to_string()));
        assert!(query.contains(&("status", "Wrong Answer".to_string())));
        assert!(query.contains(&("problemId", "3".to_string())));
        assert!(!query.iter().any(|(k, _)| *k == "language"));
    }

    #[test]
    fn test_submission_to_execution_result() {
        let submission: Submission = serde_json::from_value(json!({
            "id": 9,
            "userId": 1,
            "problemId": 2,
            "language": "java",
            "code": "class Main {}",
            "status": "Time Limit Exceeded",
            "testCasesPassed": 3,
            "totalTestCases": 10,
            "errorMessage": "Execution timeout after 2000ms",
            "submittedAt": "2026-10-01T12:00:00Z"
        }))
        .unwrap();

        let result = submission.to_execution_result();
        assert!(!result.success);
        assert_eq!(result.submission_id, Some(9));
        assert_eq!(result.verdict(), Verdict::TimeLimitExceeded);
    }

    #[test]
    fn test_judged_status_survives_without_message() {
        for status in [
            "Memory Limit Exceeded",
            "Runtime Error",
            "Time Limit Exceeded",
            "Internal Error",
            "Compile Error",
            "Wrong Answer",
            "Accepted",
        ] {
            let submission: Submission = serde_json::from_value(json!({
                "id": 5,
                "userId": 1,
                "problemId": 2,
                "language": "python",
                "code": "pass",
                "status": status,
                "testCasesPassed": 0,
                "totalTestCases": 4,
                "submittedAt": "2026-10-01T12:00:00Z"
            }))
            .unwrap();

            let result = submission.to_execution_result();
            assert_eq!(result.verdict(), submission.status, "status {}", status);
        }
    }

    #[test]
    fn test_explicit_verdict_beats_classifier() {
        let result = ExecutionResult {
            success: false,
            error: Some("Execution timeout".to_string()),
            verdict: Some(Verdict::InternalError),
            ..Default::default()
        };
        assert_eq!(result.verdict(), Verdict::InternalError);

        let unjudged = ExecutionResult {
            verdict: None,
            ..result
        };
        assert_eq!(unjudged.verdict(), Verdict::TimeLimitExceeded);
    }

    fn problem(title: &str, difficulty: Difficulty, tags: &[&str], solved: bool) -> Problem {
        Problem {
            id: 1,
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            description: "Given an array of integers...".to_string(),
            difficulty,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            examples: Vec::new(),
            constraints: String::new(),
            template_code: HashMap::new(),
            created_at: Utc::now(),
            is_solved: Some(solved),
            acceptance_rate: None,
        }
    }

    #[test]
    fn test_problem_filters_query() {
        let filters = ProblemFilters {
            difficulty: vec![Difficulty::Easy, Difficulty::Hard],
            tags: vec!["array".to_string(), "dp".to_string()],
            status: SolvedFilter::Unsolved,
            search: Some("sum".to_string()),
        };
        let query = filters.to_query(1, 20);

        assert!(query.contains(&("difficulty", "Easy,Hard".to_string())));
        assert!(query.contains(&("tags", "array,dp".to_string())));
        assert!(query.contains(&("status", "unsolved".to_string())));
        assert!(query.contains(&("search", "sum".to_string())));

        let open = ProblemFilters::default().to_query(1, 20);
        assert_eq!(open.len(), 2);
    }

    #[test]
    fn test_problem_filters_match_locally() {
        let two_sum = problem("Two Sum", Difficulty::Easy, &["array", "hash-table"], true);
        let edit = problem("Edit Distance", Difficulty::Hard, &["dp"], false);

        let easy = ProblemFilters {
            difficulty: vec![Difficulty::Easy],
            ..Default::default()
        };
        assert!(easy.matches(&two_sum));
        assert!(!easy.matches(&edit));

        let unsolved = ProblemFilters {
            status: SolvedFilter::Unsolved,
            ..Default::default()
        };
        assert!(!unsolved.matches(&two_sum));
        assert!(unsolved.matches(&edit));

        let by_tag_text = ProblemFilters {
            search: Some("HASH".to_string()),
            ..Default::default()
        };
        assert!(by_tag_text.matches(&two_sum));
        assert!(!by_tag_text.matches(&edit));

        let any_tag = ProblemFilters {
            tags: vec!["dp".to_string(), "graph".to_string()],
            ..Default::default()
        };
        assert!(any_tag.matches(&edit));
    }

    #[test]
    fn test_problem_template_lookup() {
        let mut p = problem("Two Sum", Difficulty::Easy, &[], false);
        p.template_code
            .insert("python".to_string(), "def two_sum(nums, target):".to_string());
        assert_eq!(
            p.template_for(Language::Python),
            Some("def two_sum(nums, target):")
        );
        assert_eq!(p.template_for(Language::Java), None);
    }

    #[test]
    fn test_pass_percentage_rounds() {
        let stats = OverallStats {
            runtime_ms: 10,
            memory_kb: 100,
            test_cases_passed: 2,
            total_test_cases: 3,
        };
        assert_eq!(stats.pass_percentage(), 67);
    }
}
