mod commands;

use anyhow::Result;
use arena_client::{ClientConfig, ConcurrencyPolicy, FeedbackMode};
use arena_common::types::{Difficulty, Language, SolvedFilter};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "arena-cli")]
#[command(about = "Arena CLI - Browse problems, run and submit solutions, review submissions", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Client config file (defaults to config/client.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Execution gateway base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token attached to every request
    #[arg(long, global = true)]
    token: Option<String>,

    /// Progress transport: polling, simulated, off
    #[arg(long, global = true)]
    feedback: Option<FeedbackMode>,

    /// Intent issued while busy: replace, reject
    #[arg(long, global = true)]
    concurrency: Option<ConcurrencyPolicy>,

    /// JSON logs and JSON output
    #[arg(long, global = true, default_value = "false")]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run code against the public test cases
    Run {
        /// Problem id
        #[arg(short, long)]
        problem: i64,

        /// Language (javascript, python, java); inferred from the file extension when omitted
        #[arg(short, long)]
        language: Option<Language>,

        /// Source file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Submit code for judging
    Submit {
        /// Problem id
        #[arg(short, long)]
        problem: i64,

        /// Language (javascript, python, java); inferred from the file extension when omitted
        #[arg(short, long)]
        language: Option<Language>,

        /// Source file
        #[arg(short, long)]
        file: PathBuf,

        /// Stream judge progress after the verdict arrives
        #[arg(long, default_value = "false")]
        follow: bool,
    },

    /// List past submissions
    History {
        /// Verdict label or short code (e.g. "Wrong Answer", WA)
        #[arg(short, long)]
        status: Option<String>,

        #[arg(short, long)]
        language: Option<Language>,

        #[arg(short, long)]
        problem: Option<i64>,

        /// Start date (YYYY-MM-DD), requires --to
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// End date (YYYY-MM-DD), requires --from
        #[arg(long, requires = "from")]
        to: Option<String>,

        #[arg(long, default_value = "1")]
        page: u32,

        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Show one submission with per-test-case results
    Details {
        /// Submission id
        id: i64,
    },

    /// Submission statistics, optionally for one problem
    Stats {
        #[arg(short, long)]
        problem: Option<i64>,
    },

    /// Follow the judge's progress on a submission
    Watch {
        /// Submission id
        id: i64,
    },

    /// Browse the problem catalogue
    Problems {
        /// easy, medium, hard; repeat for several
        #[arg(short, long)]
        difficulty: Vec<Difficulty>,

        /// Repeat for several; a problem matches any of them
        #[arg(short, long)]
        tag: Vec<String>,

        /// all, solved, unsolved
        #[arg(short, long)]
        status: Option<SolvedFilter>,

        /// Text to look for in titles, descriptions and tags
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value = "1")]
        page: u32,

        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Show one problem by id or slug
    Problem {
        /// Numeric id or slug (e.g. two-sum)
        key: String,

        /// Print only the starter code for this language
        #[arg(long)]
        template: Option<Language>,
    },

    /// List every problem tag
    Tags,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// File, then environment, then flags
fn resolve_config(args: &GlobalArgs) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)?.with_env_overrides(|k| std::env::var(k).ok())?,
        None => ClientConfig::load_default()?,
    };

    if let Some(url) = &args.api_url {
        config.api_url = url.clone();
    }
    if let Some(token) = &args.token {
        config.token = Some(token.clone());
    }
    if let Some(feedback) = args.feedback {
        config.feedback = feedback;
    }
    if let Some(policy) = args.concurrency {
        config.concurrency = policy;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.json);

    let config = resolve_config(&cli.global)?;
    debug!(
        api_url = %config.api_url,
        feedback = %config.feedback,
        concurrency = %config.concurrency,
        "Configuration resolved"
    );
    let output = commands::Output::new(cli.global.json);

    match cli.command {
        Commands::Run {
            problem,
            language,
            file,
        } => {
            commands::execute(&config, &output, false, problem, language, &file, false).await?;
        }
        Commands::Submit {
            problem,
            language,
            file,
            follow,
        } => {
            commands::execute(&config, &output, true, problem, language, &file, follow).await?;
        }
        Commands::History {
            status,
            language,
            problem,
            from,
            to,
            page,
            limit,
        } => {
            let filters =
                commands::build_filters(status.as_deref(), language, problem, from, to)?;
            commands::history(&config, &output, &filters, page, limit).await?;
        }
        Commands::Details { id } => {
            commands::details(&config, &output, id).await?;
        }
        Commands::Stats { problem } => {
            commands::stats(&config, &output, problem).await?;
        }
        Commands::Watch { id } => {
            commands::watch(&config, &output, id).await?;
        }
        Commands::Problems {
            difficulty,
            tag,
            status,
            search,
            page,
            limit,
        } => {
            let filters = commands::build_problem_filters(difficulty, tag, status, search);
            commands::problems(&config, &output, &filters, page, limit).await?;
        }
        Commands::Problem { key, template } => {
            let key = commands::ProblemKey::parse(&key);
            commands::problem(&config, &output, &key, template).await?;
        }
        Commands::Tags => {
            commands::tags(&config, &output).await?;
        }
    }

    Ok(())
}
