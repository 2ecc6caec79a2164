use crate::builders::rules::{Rule, RuleCatalog};
use crate::core::config::MeanLintConfig;
use crate::core::diff::{AddedLine, DiffParser};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

/// One rule firing on one added line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub file: String,
    pub line_number: usize,
    pub rule: String,
    /// The added line, trimmed.
    pub code: String,
    pub message: String,
    /// The first match of the rule in the line, trimmed.
    pub matched_text: String,
}

/// Outcome of a scan: `ok` exactly when nothing was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub ok: bool,
    pub issues: Vec<Finding>,
}

impl Verdict {
    pub fn from_findings(issues: Vec<Finding>) -> Self {
        Self {
            ok: issues.is_empty(),
            issues,
        }
    }
}

/// Tests one added line against every active rule. Each matching rule
/// contributes its own finding, in rule order.
pub fn evaluate(line: &AddedLine<'_>, rules: &[Rule]) -> Vec<Finding> {
    rules
        .iter()
        .filter_map(|rule| {
            rule.find(line.text).map(|hit| Finding {
                file: line.file.to_string(),
                line_number: line.line_number,
                rule: rule.id.to_string(),
                code: line.text.trim().to_string(),
                message: rule.message.to_string(),
                matched_text: hit.trim().to_string(),
            })
        })
        .collect()
}

/// Runs the active rule set over the additions of a unified diff.
pub struct LintEngine {
    catalog: RuleCatalog,
    parser: DiffParser,
}

impl LintEngine {
    /// Builds an engine with every built-in rule except those the
    /// configuration disables.
    pub fn new(config: &MeanLintConfig) -> Result<Self> {
        let catalog = RuleCatalog::builtin()?.without(&config.disabled_rules());
        let parser = DiffParser::new().context("Failed to compile the diff skip-list")?;
        debug!(active_rules = catalog.len(), "rule catalog ready");
        Ok(Self { catalog, parser })
    }

    /// Scans `diff` and collects every finding. Never stops at the first hit.
    pub fn scan(&self, diff: &str) -> Verdict {
        let issues: Vec<Finding> = self
            .parser
            .added_lines(diff)
            .flat_map(|line| evaluate(&line, self.catalog.rules()))
            .collect();
        debug!(findings = issues.len(), "scan complete");
        Verdict::from_findings(issues)
    }
}
