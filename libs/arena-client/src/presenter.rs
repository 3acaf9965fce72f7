//! Result Presenter - what the editor shows for the current store state
//!
//! Pure functions over [`SubmissionStore`]. Nothing here is cached: every
//! render reads the store again, so the view can never disagree with it.

use arena_common::types::{
    ExecutionResult, Language, OverallStats, ProgressStatus, ProgressUpdate, SubmissionStats,
};
use std::collections::HashMap;
use arena_common::verdict::{Hint, Severity, Verdict};
use serde::Serialize;

use crate::store::{Outcome, Phase, SubmissionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Good,
    Fair,
    Poor,
}

impl Grade {
    pub fn color(&self) -> &'static str {
        match self {
            Grade::Good => "green",
            Grade::Fair => "orange",
            Grade::Poor => "red",
        }
    }
}

pub fn grade_runtime(runtime_ms: u64) -> Grade {
    match runtime_ms {
        0..=99 => Grade::Good,
        100..=499 => Grade::Fair,
        _ => Grade::Poor,
    }
}

pub fn grade_memory(memory_kb: u64) -> Grade {
    match memory_kb {
        0..=9_999 => Grade::Good,
        10_000..=49_999 => Grade::Fair,
        _ => Grade::Poor,
    }
}

/// Status of the pass-count progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressTone {
    Success,
    Exception,
    Normal,
}

pub fn progress_tone(stats: &OverallStats, verdict: Verdict) -> ProgressTone {
    if stats.pass_percentage() == 100 {
        ProgressTone::Success
    } else if !verdict.is_accepted() {
        ProgressTone::Exception
    } else {
        ProgressTone::Normal
    }
}

/// Band color for an acceptance rate in percent
pub fn acceptance_color(rate: f64) -> &'static str {
    if rate >= 80.0 {
        "green"
    } else if rate >= 60.0 {
        "gold"
    } else if rate >= 40.0 {
        "orange"
    } else {
        "red"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub name: String,
    pub count: u64,
    /// Percent of all submissions, rounded
    pub percentage: u32,
}

/// Figures derived from [`SubmissionStats`] for the stats screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total: u64,
    pub accepted: u64,
    pub success_rate: u32,
    pub acceptance_color: &'static str,
    pub most_used_language: Option<String>,
    /// Submissions per accepted one; `None` before the first accept
    pub average_attempts: Option<f64>,
    pub languages: Vec<Share>,
    pub statuses: Vec<Share>,
}

pub fn stats_summary(stats: &SubmissionStats) -> StatsSummary {
    let total = stats.total_submissions;
    let success_rate = if total == 0 {
        0
    } else {
        stats.acceptance_rate.round() as u32
    };

    let languages = shares(&stats.language_stats, total, language_label);
    let statuses = shares(&stats.status_stats, total, str::to_string);
    let most_used_language = languages.first().map(|share| share.name.clone());

    let average_attempts = (stats.accepted_submissions > 0).then(|| {
        let ratio = total as f64 / stats.accepted_submissions as f64;
        (ratio * 10.0).round() / 10.0
    });

    StatsSummary {
        total,
        accepted: stats.accepted_submissions,
        success_rate,
        acceptance_color: acceptance_color(stats.acceptance_rate),
        most_used_language,
        average_attempts,
        languages,
        statuses,
    }
}

fn language_label(name: &str) -> String {
    if let Ok(language) = name.parse::<Language>() {
        return language.label().to_string();
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Largest count first, ties by name
fn shares(
    counts: &HashMap<String, u64>,
    total: u64,
    label: impl Fn(&str) -> String,
) -> Vec<Share> {
    let mut shares: Vec<Share> = counts
        .iter()
        .map(|(name, &count)| Share {
            name: label(name),
            count,
            percentage: if total == 0 {
                0
            } else {
                (count as f64 * 100.0 / total as f64).round() as u32
            },
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    shares
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessSummary {
    pub submission_id: Option<i64>,
    pub runtime_ms: Option<u64>,
    pub runtime_grade: Option<Grade>,
    pub memory_kb: Option<u64>,
    pub memory_grade: Option<Grade>,
    pub passed: u32,
    pub total: u32,
    pub output: Option<String>,
}

impl SuccessSummary {
    fn from_result(result: &ExecutionResult) -> Self {
        Self {
            submission_id: result.submission_id,
            runtime_ms: result.runtime_ms,
            runtime_grade: result.runtime_ms.map(grade_runtime),
            memory_kb: result.memory_kb,
            memory_grade: result.memory_kb.map(grade_memory),
            passed: result.test_cases_passed.unwrap_or(0),
            total: result.total_test_cases.unwrap_or(0),
            output: result.output.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureBreakdown {
    pub verdict: Verdict,
    pub title: &'static str,
    pub description: String,
    pub message: Option<String>,
    #[serde(skip)]
    pub severity: Severity,
    #[serde(skip)]
    pub hints: &'static [Hint],
    pub passed: Option<u32>,
    pub total: Option<u32>,
    pub submission_id: Option<i64>,
}

impl FailureBreakdown {
    fn new(verdict: Verdict, message: Option<String>, result: Option<&ExecutionResult>) -> Self {
        let passed = result.and_then(|r| r.test_cases_passed);
        let total = result.and_then(|r| r.total_test_cases);
        Self {
            verdict,
            title: verdict.label(),
            description: verdict.description(passed.unwrap_or(0), total.unwrap_or(0)),
            message,
            severity: verdict.severity(),
            hints: verdict.hints(),
            passed,
            total,
            submission_id: result.and_then(|r| r.submission_id),
        }
    }
}

/// Exactly one of these is on screen at any time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum View {
    Idle,
    Running,
    Submitting,
    Success(SuccessSummary),
    Failure(FailureBreakdown),
}

pub fn present(store: &SubmissionStore) -> View {
    match store.phase() {
        Phase::Running => return View::Running,
        Phase::Submitting => return View::Submitting,
        Phase::Idle => {}
    }

    match store.outcome() {
        None => View::Idle,
        Some(Outcome::Result(result)) => match result.verdict() {
            Verdict::Accepted => View::Success(SuccessSummary::from_result(result)),
            verdict => View::Failure(FailureBreakdown::new(
                verdict,
                result.error.clone(),
                Some(result),
            )),
        },
        Some(Outcome::Error(message)) => View::Failure(FailureBreakdown::new(
            Verdict::classify(false, Some(message)),
            Some(message.clone()),
            None,
        )),
    }
}

/// Run and submit buttons are live exactly when nothing is in flight
pub fn controls_enabled(store: &SubmissionStore) -> bool {
    !store.is_running() && !store.is_submitting()
}

/// One-line rendering of a progress update
pub fn describe_progress(update: &ProgressUpdate) -> String {
    let message = update.message.as_deref().unwrap_or("");
    match update.status {
        ProgressStatus::Queued => format!("[queued] {}", message),
        ProgressStatus::Processing => {
            format!("[{:>3}%] {}", update.progress.unwrap_or(0), message)
        }
        ProgressStatus::Completed => match &update.result {
            Some(result) => format!("[done] {}", result.verdict()),
            None => format!("[done] {}", message),
        },
        ProgressStatus::Failed => format!("[failed] {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::passing_result;

    #[test]
    fn test_idle_and_spinners() {
        let mut store = SubmissionStore::new();
        assert_eq!(present(&store), View::Idle);
        assert!(controls_enabled(&store));

        store.begin_run().unwrap();
        assert_eq!(present(&store), View::Running);
        assert!(!controls_enabled(&store));

        store.abandon();
        store.begin_submit().unwrap();
        assert_eq!(present(&store), View::Submitting);
        assert!(!controls_enabled(&store));
    }

    #[test]
    fn test_run_success_scenario() {
        let mut store = SubmissionStore::new();
        store.begin_run().unwrap();
        store
            .complete_run(ExecutionResult {
                success: true,
                test_cases_passed: Some(10),
                total_test_cases: Some(10),
                runtime_ms: Some(42),
                ..Default::default()
            })
            .unwrap();

        match present(&store) {
            View::Success(summary) => {
                assert_eq!(summary.passed, 10);
                assert_eq!(summary.total, 10);
                assert_eq!(summary.runtime_ms, Some(42));
                assert_eq!(summary.runtime_grade, Some(Grade::Good));
                assert_eq!(summary.memory_grade, None);
            }
            other => panic!("expected success, got {:?}", other),
        }
        assert!(controls_enabled(&store));
    }

    #[test]
    fn test_submit_network_failure_scenario() {
        let mut store = SubmissionStore::new();
        store.begin_submit().unwrap();
        store.fail("Failed to submit code").unwrap();

        match present(&store) {
            View::Failure(breakdown) => {
                assert_eq!(breakdown.message.as_deref(), Some("Failed to submit code"));
                assert_eq!(breakdown.verdict, Verdict::RuntimeError);
                assert_eq!(breakdown.passed, None);
                assert!(!breakdown.hints.is_empty());
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_result_is_classified() {
        let mut store = SubmissionStore::new();
        store.begin_submit().unwrap();
        store
            .complete_submit(ExecutionResult {
                success: false,
                error: Some("Execution timed out after 2000ms".to_string()),
                test_cases_passed: Some(3),
                total_test_cases: Some(10),
                submission_id: Some(77),
                ..Default::default()
            })
            .unwrap();

        match present(&store) {
            View::Failure(breakdown) => {
                assert_eq!(breakdown.verdict, Verdict::TimeLimitExceeded);
                assert_eq!(breakdown.title, "Time Limit Exceeded");
                assert_eq!(breakdown.severity, Severity::Warning);
                assert_eq!(breakdown.submission_id, Some(77));
                assert_eq!(breakdown.passed, Some(3));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_answer_description_has_counts() {
        let mut store = SubmissionStore::new();
        store.begin_submit().unwrap();
        store
            .complete_submit(ExecutionResult {
                success: false,
                test_cases_passed: Some(7),
                total_test_cases: Some(10),
                ..Default::default()
            })
            .unwrap();

        let View::Failure(breakdown) = present(&store) else {
            panic!("expected failure");
        };
        assert_eq!(breakdown.verdict, Verdict::WrongAnswer);
        assert!(breakdown.description.contains("7/10"));
        assert_eq!(breakdown.severity, Severity::Info);
    }

    #[test]
    fn test_view_follows_store_after_clear() {
        let mut store = SubmissionStore::new();
        store.begin_run().unwrap();
        store.complete_run(passing_result(None)).unwrap();
        assert!(matches!(present(&store), View::Success(_)));

        store.clear();
        assert_eq!(present(&store), View::Idle);
    }

    #[test]
    fn test_grades() {
        assert_eq!(grade_runtime(99), Grade::Good);
        assert_eq!(grade_runtime(100), Grade::Fair);
        assert_eq!(grade_runtime(500), Grade::Poor);
        assert_eq!(grade_memory(9_999), Grade::Good);
        assert_eq!(grade_memory(49_999), Grade::Fair);
        assert_eq!(grade_memory(50_000), Grade::Poor);
        assert_eq!(Grade::Fair.color(), "orange");
    }

    #[test]
    fn test_progress_tone() {
        let stats = |passed, total| OverallStats {
            runtime_ms: 10,
            memory_kb: 100,
            test_cases_passed: passed,
            total_test_cases: total,
        };
        assert_eq!(
            progress_tone(&stats(10, 10), Verdict::Accepted),
            ProgressTone::Success
        );
        assert_eq!(
            progress_tone(&stats(4, 10), Verdict::WrongAnswer),
            ProgressTone::Exception
        );
        assert_eq!(
            progress_tone(&stats(0, 0), Verdict::Accepted),
            ProgressTone::Normal
        );
    }

    #[test]
    fn test_describe_progress() {
        assert_eq!(
            describe_progress(&ProgressUpdate::processing(1, 50, "Running test cases...")),
            "[ 50%] Running test cases..."
        );
        assert_eq!(
            describe_progress(&ProgressUpdate::completed(1, passing_result(Some(1)))),
            "[done] Accepted"
        );
        assert_eq!(
            describe_progress(&ProgressUpdate::failed(1, "Progress tracking failed after 5 lookups")),
            "[failed] Progress tracking failed after 5 lookups"
        );
    }

    fn submission_stats(
        total: u64,
        accepted: u64,
        languages: &[(&str, u64)],
        statuses: &[(&str, u64)],
    ) -> SubmissionStats {
        let rate = if total == 0 {
            0.0
        } else {
            accepted as f64 * 100.0 / total as f64
        };
        SubmissionStats {
            total_submissions: total,
            accepted_submissions: accepted,
            acceptance_rate: rate,
            language_stats: languages.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            status_stats: statuses.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn test_stats_summary() {
        let stats = submission_stats(
            12,
            5,
            &[("python", 7), ("javascript", 4), ("rust", 1)],
            &[("Accepted", 5), ("Wrong Answer", 6), ("Runtime Error", 1)],
        );
        let summary = stats_summary(&stats);

        assert_eq!(summary.success_rate, 42);
        assert_eq!(summary.acceptance_color, "orange");
        assert_eq!(summary.most_used_language.as_deref(), Some("Python"));
        assert_eq!(summary.average_attempts, Some(2.4));

        let names: Vec<_> = summary.languages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Python", "JavaScript", "Rust"]);
        assert_eq!(summary.languages[0].percentage, 58);
        assert_eq!(summary.statuses[0].name, "Wrong Answer");
        assert_eq!(summary.statuses[0].percentage, 50);
    }

    #[test]
    fn test_stats_summary_without_submissions() {
        let summary = stats_summary(&submission_stats(0, 0, &[], &[]));
        assert_eq!(summary.success_rate, 0);
        assert_eq!(summary.most_used_language, None);
        assert_eq!(summary.average_attempts, None);
        assert_eq!(summary.acceptance_color, "red");
        assert!(summary.languages.is_empty());
    }

    #[test]
    fn test_acceptance_color_bands() {
        assert_eq!(acceptance_color(80.0), "green");
        assert_eq!(acceptance_color(79.9), "gold");
        assert_eq!(acceptance_color(60.0), "gold");
        assert_eq!(acceptance_color(45.0), "orange");
        assert_eq!(acceptance_color(39.9), "red");
    }
}
