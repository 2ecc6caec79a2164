use crate::builders::hooks::{HookInstaller, SystemRunner};
use crate::builders::reporter::{ConsoleReporter, JsonReporter, VerdictReporter};
use crate::builders::rules::RuleCatalog;
use crate::core::config::ConfigManager;
use crate::core::engine::{LintEngine, Verdict};
use crate::core::git::{Git2Client, GitClient};
use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};

/// How the scan result is printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// The colored report meant for people.
    #[default]
    Human,
    /// The verdict as JSON.
    Json,
}

/// Scans the staged changes of the repository in the current directory,
/// prints the report and returns the verdict.
pub fn run_scan(format: OutputFormat) -> Result<Verdict> {
    let config_manager = ConfigManager::new()?;
    let config = config_manager.load_validated();
    let engine = LintEngine::new(&config)?;

    let git = Git2Client::discover(config_manager.get_root())?;
    let diff = git.staged_diff()?;

    let verdict = engine.scan(&diff);
    let reporter: Box<dyn VerdictReporter> = match format {
        OutputFormat::Human => Box::new(ConsoleReporter::new()),
        OutputFormat::Json => Box::new(JsonReporter),
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    reporter.report(&verdict, &mut out)?;
    out.flush()?;
    Ok(verdict)
}

/// Installs the pre-commit hook into the project in the current directory.
pub fn initialize_repository() -> Result<()> {
    let config_manager = ConfigManager::new()?;
    let root = config_manager.get_root();
    let runner = SystemRunner::new(root);
    HookInstaller::new(root, &runner).install()?;
    Ok(())
}

/// Prints every built-in rule with its pattern and message.
pub fn list_rules() -> Result<()> {
    let catalog = RuleCatalog::builtin()?;
    for rule in catalog.rules() {
        println!("{} {}", rule.id.cyan().bold(), rule.pattern().bright_black());
        println!("  └─ {}", rule.message);
    }
    Ok(())
}
