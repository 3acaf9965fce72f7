// CLI commands for the Arena client
use anyhow::{bail, Context, Result};
use arena_client::feedback::FeedbackChannel;
use arena_client::presenter::{
    describe_progress, grade_memory, grade_runtime, progress_tone, stats_summary,
};
use arena_client::sources::FeedbackSource;
use arena_client::{ClientConfig, HttpGateway, Session, SessionEvent, View};
use arena_common::types::{
    DateRange, Difficulty, ExecutionResult, Language, Problem, ProblemFilters, ProgressStatus,
    SolvedFilter, SubmissionFilters, SubmissionIntent,
};
use arena_common::verdict::Verdict;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

/// Where results go: plain text or one JSON document per result
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce()) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text();
        }
        Ok(())
    }
}

fn gateway(config: &ClientConfig) -> Result<Arc<HttpGateway>> {
    let gateway = HttpGateway::new(config).context("Failed to create gateway client")?;
    Ok(Arc::new(gateway))
}

fn infer_language(file: &Path) -> Result<Language> {
    let name = file.to_string_lossy();
    Language::ALL
        .into_iter()
        .find(|language| name.ends_with(language.file_extension()))
        .with_context(|| {
            format!(
                "Cannot infer language from {}, pass --language",
                file.display()
            )
        })
}

/// Accepts a verdict label ("Wrong Answer") or its short code ("WA")
pub fn parse_verdict(s: &str) -> Result<Verdict> {
    Verdict::ALL
        .into_iter()
        .find(|v| v.label().eq_ignore_ascii_case(s) || v.short_code().eq_ignore_ascii_case(s))
        .with_context(|| format!("Unknown verdict '{}'", s))
}

pub fn build_filters(
    status: Option<&str>,
    language: Option<Language>,
    problem_id: Option<i64>,
    from: Option<String>,
    to: Option<String>,
) -> Result<SubmissionFilters> {
    let date_range = match (from, to) {
        (Some(start), Some(end)) => Some(DateRange { start, end }),
        (None, None) => None,
        _ => bail!("--from and --to must be given together"),
    };

    Ok(SubmissionFilters {
        status: status.map(parse_verdict).transpose()?,
        language,
        problem_id,
        date_range,
    })
}

pub fn build_problem_filters(
    difficulty: Vec<Difficulty>,
    tags: Vec<String>,
    status: Option<SolvedFilter>,
    search: Option<String>,
) -> ProblemFilters {
    ProblemFilters {
        difficulty,
        tags,
        status: status.unwrap_or_default(),
        search: search.filter(|q| !q.trim().is_empty()),
    }
}

/// How `arena-cli problem` names a problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemKey {
    Id(i64),
    Slug(String),
}

impl ProblemKey {
    pub fn parse(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(id) => ProblemKey::Id(id),
            Err(_) => ProblemKey::Slug(s.to_string()),
        }
    }
}

/// Run or submit a source file and render the verdict
pub async fn execute(
    config: &ClientConfig,
    output: &Output,
    is_submission: bool,
    problem_id: i64,
    language: Option<Language>,
    file: &Path,
    follow: bool,
) -> Result<()> {
    let language = match language {
        Some(language) => language,
        None => infer_language(file)?,
    };
    let code = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let gateway = gateway(config)?;
    let mut session = Session::new(Arc::clone(&gateway), config.concurrency);
    let intent = if is_submission {
        SubmissionIntent::submit(code, language, problem_id)
    } else {
        SubmissionIntent::run(code, language, problem_id)
    };

    session.dispatch(intent)?;
    if !output.json {
        render_view(&session.view());
    }

    tokio::select! {
        _ = session.settle() => {}
        _ = signal::ctrl_c() => {
            warn!("Interrupted, abandoning request");
            session.teardown();
            return Ok(());
        }
    }

    let view = session.view();
    output.emit(&view, || render_view(&view))?;

    let submission_id = session
        .store()
        .execution_result()
        .and_then(|r| r.submission_id);

    match (follow, submission_id) {
        (true, Some(id)) => {
            follow_progress(config, gateway, &mut session, id, output).await?;
            Ok(())
        }
        (true, None) => {
            warn!("No submission id in the result, nothing to follow");
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Stream progress for `submission_id` through the session until it completes
async fn follow_progress(
    config: &ClientConfig,
    gateway: Arc<HttpGateway>,
    session: &mut Session<HttpGateway>,
    submission_id: i64,
    output: &Output,
) -> Result<Option<ExecutionResult>> {
    let source = match FeedbackSource::from_config(config, gateway) {
        Some(source) => source,
        None => {
            info!("Feedback is off");
            return Ok(None);
        }
    };

    let channel = FeedbackChannel::new(source);
    channel.connect();
    session.follow(channel.subscribe(Some(submission_id)));
    channel.track(submission_id)?;

    loop {
        let event = tokio::select! {
            event = session.next_event() => event,
            _ = signal::ctrl_c() => {
                warn!("Interrupted, stopping progress feed");
                channel.disconnect();
                session.teardown();
                return Ok(None);
            }
        };

        match event {
            Some(SessionEvent::Progress { update, superseded }) => {
                if output.json {
                    output.emit(&update, || {})?;
                } else if superseded {
                    println!("  {} (already shown)", describe_progress(&update));
                } else {
                    println!("  {}", describe_progress(&update));
                }
                if update.is_terminal() {
                    if update.status == ProgressStatus::Failed {
                        warn!(submission_id, "Progress feed ended without a verdict");
                    }
                    channel.disconnect();
                    return Ok(update.result);
                }
            }
            Some(SessionEvent::Transition(_)) => {}
            None => return Ok(None),
        }
    }
}

pub async fn watch(config: &ClientConfig, output: &Output, submission_id: i64) -> Result<()> {
    let gateway = gateway(config)?;
    let mut session = Session::new(Arc::clone(&gateway), config.concurrency);

    match follow_progress(config, gateway, &mut session, submission_id, output).await? {
        Some(result) => {
            let verdict = result.verdict();
            if !output.json {
                println!("{} {}", verdict.short_code(), verdict);
                print_metrics(&result);
            }
        }
        None if !output.json => {
            println!("No verdict for submission #{}", submission_id);
        }
        None => {}
    }
    Ok(())
}

pub async fn history(
    config: &ClientConfig,
    output: &Output,
    filters: &SubmissionFilters,
    page: u32,
    limit: u32,
) -> Result<()> {
    let gateway = gateway(config)?;
    let response = gateway
        .list_submissions(filters, page, limit)
        .await
        .context("Failed to fetch submissions")?;

    output.emit(&response, || {
        println!(
            "{:>8}  {:<22} {:<11} {:>9} {:>10}  {:<24} {}",
            "ID", "STATUS", "LANGUAGE", "RUNTIME", "MEMORY", "PROBLEM", "SUBMITTED"
        );
        for submission in &response.submissions {
            let problem = submission
                .problem
                .as_ref()
                .map(|p| format!("{} ({})", p.title, p.difficulty))
                .unwrap_or_else(|| format!("#{}", submission.problem_id));
            println!(
                "{:>8}  {:<22} {:<11} {:>9} {:>10}  {:<24} {}",
                submission.id,
                submission.status.label(),
                submission.language.label(),
                submission
                    .runtime_ms
                    .map(|ms| format!("{}ms", ms))
                    .unwrap_or_else(|| "-".to_string()),
                submission
                    .memory_kb
                    .map(|kb| format!("{}KB", kb))
                    .unwrap_or_else(|| "-".to_string()),
                problem,
                submission.submitted_at.format("%Y-%m-%d %H:%M"),
            );
        }
        let pages = response.total.div_ceil(u64::from(response.limit.max(1)));
        println!(
            "page {} of {} ({} submissions)",
            response.page,
            pages.max(1),
            response.total
        );
    })
}

pub async fn details(config: &ClientConfig, output: &Output, submission_id: i64) -> Result<()> {
    let gateway = gateway(config)?;
    let detailed = gateway
        .submission_details(submission_id)
        .await
        .with_context(|| format!("Failed to fetch submission {}", submission_id))?;

    output.emit(&detailed, || {
        let submission = &detailed.submission;
        let stats = &detailed.overall_stats;
        let verdict = submission.status;

        println!(
            "Submission #{}  {} {}  [{}]",
            submission.id,
            verdict.short_code(),
            verdict,
            verdict.color()
        );
        println!(
            "  {}",
            verdict.description(stats.test_cases_passed, stats.total_test_cases)
        );
        println!(
            "  runtime {}ms ({:?}), memory {}KB ({:?})",
            stats.runtime_ms,
            grade_runtime(stats.runtime_ms),
            stats.memory_kb,
            grade_memory(stats.memory_kb)
        );
        println!(
            "  {}/{} test cases passed ({}%, {:?})",
            stats.test_cases_passed,
            stats.total_test_cases,
            stats.pass_percentage(),
            progress_tone(stats, verdict)
        );
        if let Some(error) = &submission.error_message {
            println!("  error: {}", error);
        }

        for (idx, case) in detailed.test_case_results.iter().enumerate() {
            let mark = if case.passed { "pass" } else { "FAIL" };
            println!("  #{:<3} {}", idx + 1, mark);
            if !case.passed {
                println!("       input:    {}", case.input);
                println!("       expected: {}", case.expected_output);
                println!(
                    "       actual:   {}",
                    case.actual_output.as_deref().unwrap_or("-")
                );
                if let Some(error) = &case.error {
                    println!("       error:    {}", error);
                }
            }
        }
        for hint in verdict.hints() {
            println!("  hint: {} - {}", hint.title, hint.description);
        }
    })
}

pub async fn stats(config: &ClientConfig, output: &Output, problem_id: Option<i64>) -> Result<()> {
    let gateway = gateway(config)?;
    let stats = gateway
        .submission_stats(problem_id)
        .await
        .context("Failed to fetch submission stats")?;

    let summary = stats_summary(&stats);
    output.emit(&summary, || {
        println!(
            "{} submissions, {} accepted, success rate {}% [{}]",
            summary.total, summary.accepted, summary.success_rate, summary.acceptance_color
        );
        println!(
            "  most used language: {}",
            summary.most_used_language.as_deref().unwrap_or("N/A")
        );
        match summary.average_attempts {
            Some(avg) => println!("  average attempts:   {:.1}", avg),
            None => println!("  average attempts:   N/A"),
        }
        println!("languages");
        for share in &summary.languages {
            println!("  {:<12} {:>5} {:>4}%", share.name, share.count, share.percentage);
        }
        println!("statuses");
        for share in &summary.statuses {
            println!("  {:<22} {:>5} {:>4}%", share.name, share.count, share.percentage);
        }
    })
}

pub async fn problems(
    config: &ClientConfig,
    output: &Output,
    filters: &ProblemFilters,
    page: u32,
    limit: u32,
) -> Result<()> {
    let gateway = gateway(config)?;
    let response = gateway
        .list_problems(filters, page, limit)
        .await
        .context("Failed to fetch problems")?;

    output.emit(&response, || {
        println!(
            "{:>6}  {:<32} {:<8} {:>7}  {:<6} {}",
            "ID", "TITLE", "LEVEL", "ACCEPT", "SOLVED", "TAGS"
        );
        for problem in &response.problems {
            println!(
                "{:>6}  {:<32} {:<8} {:>7}  {:<6} {}",
                problem.id,
                problem.title,
                problem.difficulty.to_string(),
                problem
                    .acceptance_rate
                    .map(|rate| format!("{:.0}%", rate))
                    .unwrap_or_else(|| "-".to_string()),
                if problem.is_solved() { "yes" } else { "" },
                problem.tags.join(", "),
            );
        }
        let pages = response.total.div_ceil(u64::from(response.limit.max(1)));
        println!(
            "page {} of {} ({} problems)",
            response.page,
            pages.max(1),
            response.total
        );
    })
}

pub async fn problem(
    config: &ClientConfig,
    output: &Output,
    key: &ProblemKey,
    template: Option<Language>,
) -> Result<()> {
    let gateway = gateway(config)?;
    let problem = match key {
        ProblemKey::Id(id) => gateway.get_problem(*id).await,
        ProblemKey::Slug(slug) => gateway.get_problem_by_slug(slug).await,
    }
    .with_context(|| format!("Failed to fetch problem {:?}", key))?;

    if let Some(language) = template {
        let code = problem.template_for(language).with_context(|| {
            format!("Problem {} has no {} template", problem.slug, language.label())
        })?;
        println!("{}", code);
        return Ok(());
    }

    output.emit(&problem, || print_problem(&problem))
}

pub async fn tags(config: &ClientConfig, output: &Output) -> Result<()> {
    let gateway = gateway(config)?;
    let tags = gateway
        .problem_tags()
        .await
        .context("Failed to fetch problem tags")?;

    output.emit(&tags, || {
        for tag in &tags {
            println!("{}", tag);
        }
    })
}

fn print_problem(problem: &Problem) {
    println!(
        "#{} {}  [{}, {}]",
        problem.id,
        problem.title,
        problem.difficulty,
        problem.difficulty.color()
    );
    if !problem.tags.is_empty() {
        println!("  tags: {}", problem.tags.join(", "));
    }
    if let Some(rate) = problem.acceptance_rate {
        println!("  acceptance: {:.1}%", rate);
    }
    println!();
    println!("{}", problem.description);
    for (idx, example) in problem.examples.iter().enumerate() {
        println!();
        println!("Example {}:", idx + 1);
        println!("  input:  {}", example.input);
        println!("  output: {}", example.output);
        if let Some(explanation) = &example.explanation {
            println!("  {}", explanation);
        }
    }
    if !problem.constraints.is_empty() {
        println!();
        println!("Constraints:");
        println!("{}", problem.constraints);
    }
    let mut languages: Vec<&str> = problem.template_code.keys().map(String::as_str).collect();
    languages.sort_unstable();
    if !languages.is_empty() {
        println!();
        println!("templates: {}", languages.join(", "));
    }
}

fn print_metrics(result: &ExecutionResult) {
    if let Some(ms) = result.runtime_ms {
        println!("  runtime: {}ms ({:?})", ms, grade_runtime(ms));
    }
    if let Some(kb) = result.memory_kb {
        println!("  memory:  {}KB ({:?})", kb, grade_memory(kb));
    }
    if let (Some(passed), Some(total)) = (result.test_cases_passed, result.total_test_cases) {
        println!("  tests:   {}/{}", passed, total);
    }
}

fn render_view(view: &View) {
    match view {
        View::Idle => {}
        View::Running => println!("Running..."),
        View::Submitting => println!("Submitting..."),
        View::Success(summary) => {
            println!("AC Accepted");
            if let Some(id) = summary.submission_id {
                println!("  submission #{}", id);
            }
            if let Some(ms) = summary.runtime_ms {
                println!("  runtime: {}ms ({:?})", ms, grade_runtime(ms));
            }
            if let Some(kb) = summary.memory_kb {
                println!("  memory:  {}KB ({:?})", kb, grade_memory(kb));
            }
            println!("  tests:   {}/{}", summary.passed, summary.total);
            if let Some(out) = &summary.output {
                println!("  output:\n{}", out);
            }
        }
        View::Failure(breakdown) => {
            println!("{} {}", breakdown.verdict.short_code(), breakdown.title);
            println!("  {}", breakdown.description);
            if let Some(message) = &breakdown.message {
                println!("  message: {}", message);
            }
            for hint in breakdown.hints {
                println!("  hint: {} - {}", hint.title, hint.description);
                if let Some(example) = hint.example {
                    println!("        {}", example);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verdict_label_or_code() {
        assert_eq!(parse_verdict("Wrong Answer").unwrap(), Verdict::WrongAnswer);
        assert_eq!(parse_verdict("tle").unwrap(), Verdict::TimeLimitExceeded);
        assert!(parse_verdict("Partial").is_err());
    }

    #[test]
    fn test_infer_language_from_extension() {
        assert_eq!(
            infer_language(Path::new("solutions/two_sum.py")).unwrap(),
            Language::Python
        );
        assert_eq!(
            infer_language(Path::new("Main.java")).unwrap(),
            Language::Java
        );
        assert_eq!(infer_language(Path::new("a.js")).unwrap(), Language::JavaScript);
        assert!(infer_language(Path::new("main.rs")).is_err());
    }

    #[test]
    fn test_problem_key_id_or_slug() {
        assert_eq!(ProblemKey::parse("42"), ProblemKey::Id(42));
        assert_eq!(
            ProblemKey::parse("two-sum"),
            ProblemKey::Slug("two-sum".to_string())
        );
    }

    #[test]
    fn test_build_problem_filters_drops_blank_search() {
        let filters = build_problem_filters(
            vec![Difficulty::Medium],
            vec!["graph".to_string()],
            Some(SolvedFilter::Solved),
            Some("   ".to_string()),
        );
        assert_eq!(filters.search, None);
        assert_eq!(filters.status, SolvedFilter::Solved);
        assert_eq!(
            build_problem_filters(Vec::new(), Vec::new(), None, None),
            ProblemFilters::default()
        );
    }

    #[test]
    fn test_build_filters_requires_full_date_range() {
        let filters = build_filters(
            Some("AC"),
            Some(Language::Python),
            Some(3),
            Some("2026-01-01".to_string()),
            Some("2026-02-01".to_string()),
        )
        .unwrap();
        assert_eq!(filters.status, Some(Verdict::Accepted));
        assert!(filters.date_range.is_some());

        assert!(build_filters(None, None, None, Some("2026-01-01".to_string()), None).is_err());
        assert_eq!(
            build_filters(None, None, None, None, None).unwrap(),
            SubmissionFilters::default()
        );
    }
}
