use colored::Colorize;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::info;

use crate::core::config::{CONFIG_FILE_NAME, ConfigManager};

const HOOKS_DIR: &str = ".husky";
const PRE_COMMIT_HOOK: &str = "pre-commit";
const PRE_COMMIT_CONTENT: &str = "mean-linter\n";
const PACKAGE_JSON: &str = "package.json";
const PREPARE_SCRIPT: &str = "husky install";

const NPM: &str = if cfg!(windows) { "npm.cmd" } else { "npm" };
const NPX: &str = if cfg!(windows) { "npx.cmd" } else { "npx" };

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("No package.json found. Please run this in a Node.js project directory.")]
    MissingManifest,
    #[error("`{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },
    #[error("Failed to start `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("Could not update {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} is not a valid package manifest: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },
    #[error(transparent)]
    Config(#[from] anyhow::Error),
}

/// Captured result of a command whose output we inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
}

/// Runs the package-manager commands the installer depends on.
pub trait CommandRunner {
    /// Runs a command quietly and returns its status and stdout.
    fn capture(&self, program: &str, args: &[&str]) -> Result<CommandOutput, InstallError>;

    /// Runs a command attached to the terminal. A non-zero exit is an error.
    fn run(&self, program: &str, args: &[&str]) -> Result<(), InstallError>;
}

/// Spawns real processes in the project directory.
pub struct SystemRunner {
    cwd: PathBuf,
}

impl SystemRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> InstallError {
    let path = path.to_path_buf();
    move |source| InstallError::Io { path, source }
}

fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

impl CommandRunner for SystemRunner {
    fn capture(&self, program: &str, args: &[&str]) -> Result<CommandOutput, InstallError> {
        let output = Command::new(program)
            .args(args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| InstallError::CommandSpawn {
                command: command_line(program, args),
                source,
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<(), InstallError> {
        let command = command_line(program, args);
        let status = Command::new(program)
            .args(args)
            .current_dir(&self.cwd)
            .status()
            .map_err(|source| InstallError::CommandSpawn {
                command: command.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(InstallError::CommandFailed {
                command,
                reason: status.to_string(),
            })
        }
    }
}

/// Sets up Husky and the mean-linter pre-commit hook in a Node.js project.
///
/// Steps run in order and stop at the first failure; completed steps are
/// left in place.
pub struct HookInstaller<'r> {
    root: PathBuf,
    runner: &'r dyn CommandRunner,
}

impl<'r> HookInstaller<'r> {
    pub fn new(root: impl Into<PathBuf>, runner: &'r dyn CommandRunner) -> Self {
        Self {
            root: root.into(),
            runner,
        }
    }

    pub fn install(&self) -> Result<(), InstallError> {
        println!(
            "{}",
            "\n🛠 Setting up mean-linter pre-commit hook using Husky...".cyan()
        );

        let manifest = self.root.join(PACKAGE_JSON);
        if !manifest.exists() {
            return Err(InstallError::MissingManifest);
        }

        self.ensure_husky()?;
        self.runner.run(NPX, &["husky", "install"])?;

        let hook_path = self.write_hook()?;
        info!(hook = %hook_path.display(), "pre-commit hook written");

        if ensure_prepare_script(&manifest)? {
            info!("added `prepare` script to package.json");
        }

        let config = ConfigManager::new_at(&self.root);
        if config.initialize()? {
            println!("{}", format!("✅ Created default {CONFIG_FILE_NAME} config file.").green());
        } else {
            println!(
                "{}",
                format!("⚠️ {CONFIG_FILE_NAME} already exists. Skipping config creation.").yellow()
            );
        }

        println!("{}", "\n✅ mean-linter hook installed successfully!".green());
        println!(
            "{}",
            "\nFrom now on, your commits will be checked by the mean-linter.".blue()
        );
        Ok(())
    }

    fn ensure_husky(&self) -> Result<(), InstallError> {
        let query = self
            .runner
            .capture(NPM, &["pkg", "get", "devDependencies.husky"])?;
        // `npm pkg get` prints `{}` for a missing key.
        let declared = query.success && !matches!(query.stdout.trim(), "" | "{}");
        if declared {
            return Ok(());
        }

        info!("husky not declared, installing it");
        self.runner.run(NPM, &["install", "husky", "--save-dev"])
    }

    fn write_hook(&self) -> Result<PathBuf, InstallError> {
        let hooks_dir = self.root.join(HOOKS_DIR);
        fs::create_dir_all(&hooks_dir).map_err(io_error(&hooks_dir))?;

        let hook_path = hooks_dir.join(PRE_COMMIT_HOOK);
        fs::write(&hook_path, PRE_COMMIT_CONTENT).map_err(io_error(&hook_path))?;

        // Make executable on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&hook_path, fs::Permissions::from_mode(0o755))
                .map_err(io_error(&hook_path))?;
        }

        Ok(hook_path)
    }
}

/// Adds `scripts.prepare` to `package.json` when it is missing.
/// Returns whether the file was rewritten.
pub fn ensure_prepare_script(manifest: &Path) -> Result<bool, InstallError> {
    let invalid = |reason: String| InstallError::InvalidManifest {
        path: manifest.to_path_buf(),
        reason,
    };

    let raw = fs::read_to_string(manifest).map_err(io_error(manifest))?;
    let mut pkg: Value = serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))?;
    let pkg_obj = pkg
        .as_object_mut()
        .ok_or_else(|| invalid("top level is not an object".to_string()))?;

    let scripts = pkg_obj
        .entry("scripts")
        .or_insert_with(|| Value::Object(Map::new()));
    let scripts = scripts
        .as_object_mut()
        .ok_or_else(|| invalid("`scripts` is not an object".to_string()))?;

    if scripts.contains_key("prepare") {
        return Ok(false);
    }
    scripts.insert("prepare".to_string(), Value::String(PREPARE_SCRIPT.to_string()));

    let content = serde_json::to_string_pretty(&pkg).map_err(|e| invalid(e.to_string()))?;
    fs::write(manifest, content).map_err(io_error(manifest))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::tempdir;

    /// Records every command and pretends they all succeed.
    struct FakeRunner {
        husky_declared: bool,
        calls: RefCell<Vec<String>>,
    }

    impl FakeRunner {
        fn new(husky_declared: bool) -> Self {
            Self {
                husky_declared,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for FakeRunner {
        fn capture(&self, program: &str, args: &[&str]) -> Result<CommandOutput, InstallError> {
            self.calls.borrow_mut().push(command_line(program, args));
            let stdout = if self.husky_declared { "\"^9.0.0\"\n" } else { "{}\n" };
            Ok(CommandOutput {
                success: true,
                stdout: stdout.to_string(),
            })
        }

        fn run(&self, program: &str, args: &[&str]) -> Result<(), InstallError> {
            self.calls.borrow_mut().push(command_line(program, args));
            Ok(())
        }
    }

    #[test]
    fn test_missing_manifest_is_fatal() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner::new(true);
        let err = HookInstaller::new(dir.path(), &runner).install().unwrap_err();
        assert!(matches!(err, InstallError::MissingManifest));
        assert!(runner.calls.borrow().is_empty());
        assert!(!dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_install_sets_up_everything() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(PACKAGE_JSON),
            r#"{ "name": "demo", "version": "1.0.0" }"#,
        )
        .unwrap();

        let runner = FakeRunner::new(false);
        HookInstaller::new(dir.path(), &runner).install().unwrap();

        assert_eq!(
            *runner.calls.borrow(),
            vec![
                format!("{NPM} pkg get devDependencies.husky"),
                format!("{NPM} install husky --save-dev"),
                format!("{NPX} husky install"),
            ]
        );

        let hook = dir.path().join(HOOKS_DIR).join(PRE_COMMIT_HOOK);
        assert_eq!(fs::read_to_string(&hook).unwrap(), "mean-linter\n");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            assert_eq!(fs::metadata(&hook).unwrap().permissions().mode() & 0o777, 0o755);
        }

        let pkg: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(PACKAGE_JSON)).unwrap())
                .unwrap();
        assert_eq!(pkg["scripts"]["prepare"], "husky install");
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_declared_husky_is_not_reinstalled() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PACKAGE_JSON), "{}").unwrap();

        let runner = FakeRunner::new(true);
        HookInstaller::new(dir.path(), &runner).install().unwrap();
        assert!(
            !runner
                .calls
                .borrow()
                .iter()
                .any(|c| c.contains("install husky"))
        );
    }

    #[test]
    fn test_existing_prepare_script_is_kept() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join(PACKAGE_JSON);
        let original = r#"{"name":"demo","scripts":{"prepare":"make"}}"#;
        fs::write(&manifest, original).unwrap();

        assert!(!ensure_prepare_script(&manifest).unwrap());
        assert_eq!(fs::read_to_string(&manifest).unwrap(), original);
    }

    #[test]
    fn test_prepare_script_preserves_key_order() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join(PACKAGE_JSON);
        fs::write(
            &manifest,
            r#"{"version":"1.0.0","name":"demo","scripts":{"test":"jest"}}"#,
        )
        .unwrap();

        assert!(ensure_prepare_script(&manifest).unwrap());
        let written = fs::read_to_string(&manifest).unwrap();
        assert!(written.find("\"version\"").unwrap() < written.find("\"name\"").unwrap());
        assert!(written.contains("\"test\": \"jest\""));
        assert!(written.contains("\"prepare\": \"husky install\""));
    }

    #[test]
    fn test_existing_config_is_not_overwritten() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PACKAGE_JSON), "{}").unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, r#"{"disableRules":["var"]}"#).unwrap();

        let runner = FakeRunner::new(true);
        HookInstaller::new(dir.path(), &runner).install().unwrap();
        assert_eq!(
            fs::read_to_string(&config_path).unwrap(),
            r#"{"disableRules":["var"]}"#
        );
    }
}
