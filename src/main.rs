use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use selfjudge::config::parse_timeout;
use selfjudge::{
    load_cases, save_case, ConsolePrompt, ConsoleReporter, HarnessConfig, Judger, LanguageRegistry,
    LocalRunner, ProblemSlug, Prompt, Reporter, Session,
};

#[derive(Parser)]
#[command(name = "selfjudge")]
#[command(about = "Run a solution file against locally stored test cases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Judge a solution against every stored case of a problem
    Run {
        /// Problem URL or slug (asked for when omitted)
        #[arg(short, long)]
        problem: Option<String>,

        /// Solution source file (asked for when omitted)
        #[arg(short, long)]
        solution: Option<PathBuf>,

        /// Directory holding test_cases/<slug>/
        #[arg(short, long)]
        workspace: Option<PathBuf>,

        /// Per-case timeout in seconds, 0 disables it
        #[arg(short, long)]
        timeout: Option<String>,

        /// Language table replacing the built-in one
        #[arg(short, long)]
        languages: Option<PathBuf>,

        /// Compile into a scratch directory removed after the run
        #[arg(long, default_value = "false")]
        scoped_artifacts: bool,

        /// Also print the verdicts as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Store one more input/output pair for a problem
    AddCase {
        /// Problem URL or slug
        #[arg(short, long)]
        problem: String,

        /// Case input
        #[arg(short, long)]
        input: String,

        /// Expected output
        #[arg(short, long)]
        output: String,

        /// Directory holding test_cases/<slug>/
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },

    /// List registered languages and their extensions
    Languages {
        /// Language table replacing the built-in one
        #[arg(short, long)]
        languages: Option<PathBuf>,
    },
}

const EXIT_FAILED_CASES: u8 = 1;
const EXIT_ABORTED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize logging: {:#}", e);
    }

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match execute(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ABORTED)
        }
    }
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("selfjudge=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn execute(command: Commands) -> Result<ExitCode> {
    let mut config = HarnessConfig::from_env()?;

    match command {
        Commands::Run {
            problem,
            solution,
            workspace,
            timeout,
            languages,
            scoped_artifacts,
            json,
        } => {
            if let Some(workspace) = workspace {
                config.workspace = workspace;
            }
            if let Some(secs) = timeout {
                config.run_timeout =
                    parse_timeout(&secs).with_context(|| format!("Invalid --timeout: {}", secs))?;
            }
            if languages.is_some() {
                config.languages_path = languages;
            }
            if scoped_artifacts {
                config.keep_artifacts = false;
            }
            run(config, problem, solution, json).await
        }
        Commands::AddCase {
            problem,
            input,
            output,
            workspace,
        } => {
            if let Some(workspace) = workspace {
                config.workspace = workspace;
            }
            let session = Session::new(&config.workspace, ProblemSlug::parse(&problem)?);
            let number = save_case(&session.case_dir(), &input, &output).await?;
            println!("Saved test case {} for {}", number, session.problem);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Languages { languages } => {
            let registry = LanguageRegistry::load_or_builtin(languages.or(config.languages_path).as_deref())?;
            for name in registry.supported_languages() {
                if let Some(lang) = registry.get(&name) {
                    let extensions = lang
                        .extensions
                        .iter()
                        .map(|ext| format!(".{}", ext))
                        .collect::<Vec<_>>()
                        .join(", ");
                    let kind = if lang.needs_compile() { "compiled" } else { "interpreted" };
                    println!("{:<12} {:<20} {}", name, extensions, kind);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run(
    config: HarnessConfig,
    problem: Option<String>,
    solution: Option<PathBuf>,
    json: bool,
) -> Result<ExitCode> {
    let registry = LanguageRegistry::load_or_builtin(config.languages_path.as_deref())?;
    let prompt = ConsolePrompt;
    let reporter = ConsoleReporter;

    let problem = match problem {
        Some(problem) => problem,
        None => match prompt.ask_text("Problem URL or slug")? {
            Some(problem) => problem,
            None => bail!("No problem given"),
        },
    };
    let session = Session::new(&config.workspace, ProblemSlug::parse(&problem)?);

    let solution = match solution {
        Some(solution) => solution,
        None => match prompt.pick_file("Solution file", &registry.extensions())? {
            Some(path) => path,
            None => bail!("No solution file selected"),
        },
    };

    let files = match load_cases(&session.case_dir()).await {
        Ok(files) => files,
        Err(e) => {
            reporter.line(&e.to_string());
            return Ok(ExitCode::from(EXIT_ABORTED));
        }
    };

    info!("Running {} for {}", solution.display(), session.problem);

    let judger = Judger::new(registry, Arc::new(LocalRunner::new()), config);
    let verdicts = match judger.run(&solution, files, &reporter).await {
        Ok(verdicts) => verdicts,
        // already reported as a single line
        Err(_) => return Ok(ExitCode::from(EXIT_ABORTED)),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&verdicts)?);
    }

    if verdicts.iter().all(|v| v.passed) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_FAILED_CASES))
    }
}
