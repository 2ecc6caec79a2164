// The `core` module holds the scan itself: reading `.meanlintrc`, getting
// the staged diff out of git, walking it line by line and turning rule hits
// into a verdict.

// `config` module:
// Defines `MeanLintConfig` (the `.meanlintrc` contents) and the
// `ConfigManager` that loads it, falling back to defaults when the file is
// missing or broken.
pub mod config;

// `diff` module:
// Parses unified diff text into the lines each file gained, tracking file
// and line number across hunk headers.
pub mod diff;

// `engine` module:
// Evaluates the active rules against every added line and aggregates the
// findings into a `Verdict`.
pub mod engine;

// `git` module:
// The `GitClient` trait and its git2-backed implementation producing the
// staged diff.
pub mod git;
