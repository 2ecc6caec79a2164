use anyhow::{Context, Result};
use colored::Colorize;
use indexmap::IndexMap;
use std::io::Write;

use crate::core::engine::{Finding, Verdict};

/// Groups findings by file, keeping the order files were first seen and the
/// scan order within each file.
pub fn group_by_file(issues: &[Finding]) -> IndexMap<&str, Vec<&Finding>> {
    let mut groups: IndexMap<&str, Vec<&Finding>> = IndexMap::new();
    for issue in issues {
        groups.entry(issue.file.as_str()).or_default().push(issue);
    }
    groups
}

/// Renders a finished scan somewhere a human or a script can read it.
pub trait VerdictReporter {
    fn report(&self, verdict: &Verdict, out: &mut dyn Write) -> Result<()>;
}

/// The mean, colorful report printed by the pre-commit hook.
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    fn write_finding(&self, finding: &Finding, out: &mut dyn Write) -> Result<()> {
        writeln!(
            out,
            "{}",
            format!("  Line {}: {}", finding.line_number, finding.code).bright_black()
        )?;
        writeln!(out, "{}", format!("  ❌ {}", finding.message).red())?;
        if !finding.matched_text.is_empty() {
            writeln!(
                out,
                "{}",
                format!("     Found: \"{}\"", finding.matched_text).red()
            )?;
        }
        writeln!(out)?;
        Ok(())
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl VerdictReporter for ConsoleReporter {
    fn report(&self, verdict: &Verdict, out: &mut dyn Write) -> Result<()> {
        if verdict.ok {
            writeln!(
                out,
                "{}",
                "\n✅ Your code passed the mean-linter... this time. 😈\n".green()
            )?;
            return Ok(());
        }

        writeln!(out, "{}", "\n🚨 MEAN LINTER REPORT 🚨\n".red().bold())?;

        for (file, findings) in group_by_file(&verdict.issues) {
            writeln!(out, "{}", format!("\nFile: {file}").yellow().bold())?;
            for finding in findings {
                self.write_finding(finding, out)?;
            }
        }

        writeln!(
            out,
            "{}",
            "\n😬 Nice try. But no. Clean your code and come back stronger. Commit rejected.\n"
                .red()
                .bold()
        )?;
        Ok(())
    }
}

/// Machine-readable output: the serialized verdict.
pub struct JsonReporter;

impl VerdictReporter for JsonReporter {
    fn report(&self, verdict: &Verdict, out: &mut dyn Write) -> Result<()> {
        let json = serde_json::to_string_pretty(verdict).context("Failed to serialize report")?;
        writeln!(out, "{json}")?;
        Ok(())
    }
}
