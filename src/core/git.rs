use anyhow::{Context, Result};
use git2::{DiffFindOptions, DiffFormat, DiffOptions, ErrorCode, Repository};
use std::path::Path;

/// Trait defining the Git operations the linter needs.
/// This abstraction keeps the scan independent of how the diff is obtained.
pub trait GitClient {
    /// Returns the staged changes as unified diff text with zero context
    /// lines, the same shape as `git diff --cached --unified=0`.
    fn staged_diff(&self) -> Result<String>;
}

/// Concrete implementation of GitClient using the git2 crate.
pub struct Git2Client {
    repo: Repository,
}

impl Git2Client {
    /// Opens the repository containing `path`, searching parent directories.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::discover(path)
            .with_context(|| format!("Not a git repository: {}", path.display()))?;
        Ok(Self { repo })
    }
}

impl GitClient for Git2Client {
    fn staged_diff(&self) -> Result<String> {
        let index = self.repo.index().context("Failed to read the git index")?;

        // Before the first commit there is no HEAD; diff against the empty tree.
        let head_tree = match self.repo.head() {
            Ok(head) => Some(head.peel_to_tree().context("Failed to resolve HEAD tree")?),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
            Err(e) => return Err(e).context("Failed to read HEAD"),
        };

        let mut options = DiffOptions::new();
        options.context_lines(0);
        let mut diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), Some(&mut options))
            .context("Failed to diff HEAD against the index")?;

        // A moved file shows only its edits, as `git diff --cached` does.
        let mut find = DiffFindOptions::new();
        find.renames(true);
        diff.find_similar(Some(&mut find))
            .context("Failed to detect renamed files")?;

        let mut text = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            // Content lines come without their marker; headers carry their own text.
            if matches!(line.origin(), '+' | '-' | ' ') {
                text.push(line.origin());
            }
            text.push_str(&String::from_utf8_lossy(line.content()));
            true
        })
        .context("Failed to render the staged diff")?;

        Ok(text)
    }
}
