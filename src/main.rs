//! mentor — a tutor that picks its expertise from your question
//!
//! Usage:
//!   mentor ask "What is a closure?"     → one explanation
//!   mentor ask                          → explains the recursion demo question
//!   mentor chat                         → questions line by line from stdin
//!   mentor chat --per-question          → re-clarify the persona for every question
//!
//! Configuration comes from the environment (or a `.env` file):
//! MODEL_ID, TEMPERATURE, AMOUNT_BEFORE_SUMMARIZING, OPENAI_API_KEY,
//! MENTOR_BACKEND (openai | ollama), MENTOR_BASE_URL.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mentor_agent::{AgentSettings, PersonaPolicy, Tutor};
use mentor_core::MentorConfig;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::AsyncBufReadExt;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_QUESTION: &str = "Can you explain the concept of recursion in programming?";

#[derive(Parser)]
#[command(
    name = "mentor",
    about = "Tutor that infers the subject of a question and answers as an expert in it",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Clarify the tutor persona for every question instead of keeping the first one
    #[arg(long, global = true, default_value_t = false)]
    per_question: bool,

    /// Write logs to a file (in addition to stderr)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question and print the explanation
    Ask {
        /// The question (words are joined with spaces)
        question: Vec<String>,
    },
    /// Ask questions line by line; `/reset` forgets the persona, `exit` quits
    Chat,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Version) = cli.command {
        println!("mentor v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // A missing .env is fine; the variables may come from the real environment.
    let _ = dotenvy::dotenv();
    let _log_guard = init_tracing(cli.log_file.as_deref())?;

    let config = MentorConfig::from_env().context("failed to load configuration")?;

    let provider = mentor_llm::provider_from_config(&config)?;
    let policy = if cli.per_question {
        PersonaPolicy::PerQuestion
    } else {
        PersonaPolicy::Sticky
    };
    let mut tutor = Tutor::new(provider, AgentSettings::from_config(&config))?.with_policy(policy);

    match cli.command {
        Some(Commands::Ask { question }) => {
            let question = if question.is_empty() {
                DEMO_QUESTION.to_string()
            } else {
                question.join(" ")
            };
            let explanation = tutor.explain_this(&question).await?;
            println!("{}", explanation);
        }
        Some(Commands::Chat) | None => run_chat(&mut tutor).await?,
        Some(Commands::Version) => {}
    }

    Ok(())
}

async fn run_chat(tutor: &mut Tutor) -> anyhow::Result<()> {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    info!("Chat started ({:?} persona)", tutor.policy());

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();

        match question {
            "" => continue,
            "exit" | "quit" => break,
            "/reset" => {
                tutor.reset_persona();
                println!("(persona reset)");
                continue;
            }
            _ => {}
        }

        match tutor.explain_this(question).await {
            Ok(explanation) => println!("{}\n", explanation),
            Err(e) => {
                error!("Question failed: {}", e);
                eprintln!("error: {}", e);
            }
        }
    }

    Ok(())
}

fn init_tracing(
    log_file: Option<&std::path::Path>,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mentor=info,mentor_agent=info,mentor_llm=info".into());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(std::path::Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("log file path has no file name: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
