use regex::{Regex, RegexSet};

/// Paths whose additions are never linted: package manifests, lockfiles and
/// anything the hook manager owns.
const SKIP_FILES: &[&str] = &[
    r"package\.json$",
    r"package-lock\.json$",
    r"yarn\.lock$",
    r"pnpm-lock\.yaml$",
    r"\.husky/",
];

const FILE_HEADER: &str = "+++ b/";

/// One line that was added to a file in the new version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedLine<'a> {
    pub file: &'a str,
    /// 1-based line number in the new version of `file`.
    pub line_number: usize,
    /// The line content without its leading `+`.
    pub text: &'a str,
}

/// Scan state carried from one diff line to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ScanState<'a> {
    current_file: Option<&'a str>,
    line_number: usize,
    skip_file: bool,
}

/// Splits unified diff text (as produced with zero context lines) into the
/// lines each file gained.
pub struct DiffParser {
    skip_files: RegexSet,
    hunk_start: Regex,
}

impl DiffParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            skip_files: RegexSet::new(SKIP_FILES)?,
            hunk_start: Regex::new(r"\+(\d+)")?,
        })
    }

    /// Whether additions to `path` are excluded from linting.
    pub fn is_skipped(&self, path: &str) -> bool {
        self.skip_files.is_match(path)
    }

    /// Yields every added line of every non-skipped file, in diff order.
    pub fn added_lines<'a>(&'a self, diff: &'a str) -> impl Iterator<Item = AddedLine<'a>> + 'a {
        diff.lines()
            .scan(ScanState::default(), move |state, line| {
                let (next, added) = self.step(*state, line);
                *state = next;
                Some(added)
            })
            .flatten()
    }

    /// Advances the scan state over one diff line.
    fn step<'a>(&self, state: ScanState<'a>, line: &'a str) -> (ScanState<'a>, Option<AddedLine<'a>>) {
        if let Some(path) = line.strip_prefix(FILE_HEADER) {
            let next = ScanState {
                current_file: Some(path),
                skip_file: self.is_skipped(path),
                ..state
            };
            return (next, None);
        }

        if state.skip_file {
            return (state, None);
        }

        if line.starts_with("@@") {
            let line_number = self
                .hunk_start
                .captures(line)
                .and_then(|caps| caps[1].parse().ok())
                .unwrap_or(state.line_number);
            return (ScanState { line_number, ..state }, None);
        }

        if !line.starts_with('+') || line.starts_with("+++") {
            return (state, None);
        }

        let next = ScanState {
            line_number: state.line_number.saturating_add(1),
            ..state
        };
        // Added lines ahead of any file header have nothing to be reported against.
        let added = state.current_file.map(|file| AddedLine {
            file,
            line_number: state.line_number,
            text: &line[1..],
        });
        (next, added)
    }
}
