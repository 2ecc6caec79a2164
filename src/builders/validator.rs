use std::collections::HashSet;

use crate::builders::rules;
use crate::core::config::MeanLintConfig;

/// The `ConfigValidator` trait defines the public interface for checking a
/// loaded `.meanlintrc`.
///
/// Validation never rejects a configuration: the linter always runs, and the
/// issues returned here are only surfaced as warnings.
pub trait ConfigValidator {
    /// Returns one human-readable line per problem found.
    fn validate_config(&self, config: &MeanLintConfig) -> Vec<String>;
}

/// Checks `disableRules` against the built-in catalog.
pub struct StandardValidator {
    known_ids: HashSet<&'static str>,
}

impl StandardValidator {
    pub fn new() -> Self {
        Self {
            known_ids: rules::known_rule_ids().collect(),
        }
    }

    /// Flags ids that appear more than once in `disableRules`.
    fn check_duplicates(&self, disabled: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        disabled
            .iter()
            .filter(|id| !seen.insert(id.as_str()) && reported.insert(id.as_str()))
            .map(|id| format!("Rule '{id}' is disabled more than once"))
            .collect()
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator for StandardValidator {
    fn validate_config(&self, config: &MeanLintConfig) -> Vec<String> {
        // A typo here means the rule the user meant to silence is still active.
        let mut issues: Vec<String> = config
            .disable_rules
            .iter()
            .filter(|id| !self.known_ids.contains(id.as_str()))
            .map(|id| format!("Unknown rule '{id}' in disableRules"))
            .collect();

        issues.extend(self.check_duplicates(&config.disable_rules));
        issues
    }
}
