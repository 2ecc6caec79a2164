//! mean-linter runs as a git pre-commit hook. It reads the staged diff,
//! checks every added line against a catalog of bad habits and rejects the
//! commit, loudly, when anything turns up. `mean-linter init` wires it into
//! a Node.js project through Husky.
use clap::{Parser, Subcommand};
use colored::Colorize;
use mean_linter::utils::{self, OutputFormat};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mean-linter")]
#[command(version, about = "A pre-commit hook that judges your staged changes")]
struct Cli {
    /// Report format for the scan
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Log what the linter is doing to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install the pre-commit hook and a default .meanlintrc in this project
    Init,
    /// Show every built-in rule
    ListRules,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("MEAN_LINTER_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Init) => match utils::initialize_repository() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{}", "❌ Failed to set up Husky hook:".red());
                eprintln!("{}", format!("{err:#}").red());
                ExitCode::FAILURE
            }
        },
        Some(Commands::ListRules) => match utils::list_rules() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{}", format!("{err:#}").red());
                ExitCode::FAILURE
            }
        },
        None => match utils::run_scan(cli.format) {
            Ok(verdict) if verdict.ok => ExitCode::SUCCESS,
            Ok(_) => ExitCode::FAILURE,
            Err(err) => {
                eprintln!("{}", "❌ Error running mean-linter:".red());
                eprintln!("{}", format!("{err:#}").red());
                ExitCode::FAILURE
            }
        },
    }
}
