use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;

/// Name of the capture group a rule pattern may use to narrow the reported
/// match. Patterns without it report the whole match.
const HIT_GROUP: &str = "hit";

/// How a catalog entry decides whether a line is bad.
///
/// Word characters and word boundaries are ASCII-only, and lengths are
/// counted in UTF-16 code units, so a line is judged the same way a
/// JavaScript engine would judge it.
#[derive(Debug, Clone, Copy)]
enum Check {
    Pattern(&'static str),
    MinLength(usize),
}

#[derive(Debug, Clone)]
enum Matcher {
    Regex(Regex),
    MinLength(usize),
}

/// The built-in rule table, in report order: `(id, check, message)`.
///
/// Identifiers are referenced by users' `.meanlintrc` files, so renaming one
/// silently re-enables it for everybody who disabled it.
const CATALOG: &[(&str, Check, &str)] = &[
    (
        "console",
        Check::Pattern(r"console\.(log|warn|error|info|debug)\("),
        "Busted! Console statements left behind. Clean up your mess before going to prod.",
    ),
    (
        "var",
        Check::Pattern(r"var\s+"),
        "'var'? Really? It's 2025. Use 'let' or 'const' like a grown-up.",
    ),
    (
        "empty-catch",
        Check::Pattern(r"catch\s*\([^)]*\)\s*\{\s*(?://[^\n]*\n*|/\*[\s\S]*?\*/|\s*)*\}"),
        "Empty catch block spotted. Just ignoring errors, huh? Bold strategy.",
    ),
    (
        "long-lines",
        Check::MinLength(120),
        "Whoa there! Line's too long. Code isn't a bedtime story — break it up.",
    ),
    (
        "single-letter-vars",
        Check::Pattern(r"(?-u:\b)(?:let|const|var)\s+(a|b|c|x|y|z)(?-u:\b)"),
        "Single-letter variables? What is this, algebra class? Be descriptive.",
    ),
    (
        "todo-comment",
        Check::Pattern(r"(?i)//\s*(TODO|FIXME|HACK)"),
        "Found a TODO/FIXME. Future you is judging you already.",
    ),
    (
        "loose-eq",
        // `==` not preceded by `=`/`!` and not followed by `=`.
        Check::Pattern(r"(?:^|[^=!])(?P<hit>==)(?:[^=]|$)"),
        "Loose equality? That’s how bugs sneak in. Use `===` and stay sharp.",
    ),
    (
        "eval",
        Check::Pattern(r"eval\("),
        "`eval()`? Are you trying to summon demons? Don’t.",
    ),
    (
        "for-loop",
        Check::Pattern(r"[^0-9A-Za-z_]for\([^;]*;[^;]*;[^)]*\)"),
        "Classic for-loop detected. Are we stuck in 2009? Use modern methods.",
    ),
    (
        "while-true",
        Check::Pattern(r"[^0-9A-Za-z_]while\(true\)"),
        "Infinite loop? Better have snacks. Or better yet, a break condition.",
    ),
    (
        "alert",
        Check::Pattern(r"[^0-9A-Za-z_]alert\("),
        "alert() detected. This isn't 1999.",
    ),
    (
        "document-write",
        Check::Pattern(r"[^0-9A-Za-z_]document\.write\("),
        "document.write() detected. This is considered harmful.",
    ),
    (
        "new-array",
        Check::Pattern(r"(?-u:\b)new\s+Array\(\)"),
        "`new Array()`? Nah. Use `[]` and move on with your life",
    ),
    (
        "new-object",
        Check::Pattern(r"(?-u:\b)new\s+Object\(\)"),
        "`new Object()` spotted. Use `{}` like everyone else.",
    ),
];

/// Returns the identifiers of every built-in rule, in catalog order.
pub fn known_rule_ids() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(id, _, _)| *id)
}

/// A single named check applied to every added line of a diff.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Stable identifier, as used in `disableRules`.
    pub id: &'static str,
    /// The human-readable complaint shown when the rule fires.
    pub message: &'static str,
    matcher: Matcher,
}

impl Rule {
    fn compile(id: &'static str, check: Check, message: &'static str) -> Result<Self> {
        let matcher = match check {
            Check::Pattern(pattern) => Matcher::Regex(
                Regex::new(pattern).with_context(|| format!("Invalid pattern for rule '{id}'"))?,
            ),
            Check::MinLength(min) => Matcher::MinLength(min),
        };
        Ok(Self { id, message, matcher })
    }

    /// Returns the text of the first match of this rule in `line`, if any.
    ///
    /// The match is unanchored: the rule fires when the line *contains* a
    /// match anywhere.
    pub fn find<'t>(&self, line: &'t str) -> Option<&'t str> {
        match &self.matcher {
            Matcher::Regex(regex) => {
                let caps = regex.captures(line)?;
                caps.name(HIT_GROUP)
                    .or_else(|| caps.get(0))
                    .map(|m| m.as_str())
            }
            // Lines carry no newline, so the whole line is the match.
            Matcher::MinLength(min) => (line.encode_utf16().count() >= *min).then_some(line),
        }
    }

    /// The pattern source, for `list-rules`.
    pub fn pattern(&self) -> String {
        match &self.matcher {
            Matcher::Regex(regex) => regex.as_str().to_string(),
            Matcher::MinLength(min) => format!("[^\\n]{{{min},}}"),
        }
    }
}

/// The ordered set of rules a scan runs with.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl RuleCatalog {
    /// Compiles the full built-in catalog.
    pub fn builtin() -> Result<Self> {
        let rules = CATALOG
            .iter()
            .map(|&(id, check, message)| Rule::compile(id, check, message))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Drops every rule whose id is in `disabled`, keeping catalog order.
    pub fn without(self, disabled: &HashSet<&str>) -> Self {
        let rules = self
            .rules
            .into_iter()
            .filter(|rule| !disabled.contains(rule.id))
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str) -> Rule {
        RuleCatalog::builtin()
            .unwrap()
            .rules()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_builtin_catalog_compiles_in_order() {
        let catalog = RuleCatalog::builtin().unwrap();
        let ids: Vec<&str> = catalog.rules().iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec![
                "console",
                "var",
                "empty-catch",
                "long-lines",
                "single-letter-vars",
                "todo-comment",
                "loose-eq",
                "eval",
                "for-loop",
                "while-true",
                "alert",
                "document-write",
                "new-array",
                "new-object",
            ]
        );
    }

    #[test]
    fn test_without_preserves_order() {
        let disabled: HashSet<&str> = ["var", "eval", "not-a-rule"].into_iter().collect();
        let catalog = RuleCatalog::builtin().unwrap().without(&disabled);
        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog.rules()[0].id, "console");
        assert_eq!(catalog.rules()[1].id, "empty-catch");
        assert!(catalog.rules().iter().all(|r| r.id != "var" && r.id != "eval"));
    }

    #[test]
    fn test_console_matching() {
        let console = rule("console");
        assert_eq!(
            console.find(r#"  console.log("debug");"#),
            Some("console.log(")
        );
        assert_eq!(console.find("console.table(rows)"), None);
    }

    #[test]
    fn test_loose_eq_skips_strict_operators() {
        let loose = rule("loose-eq");
        assert_eq!(loose.find("if (a == b) {"), Some("=="));
        assert_eq!(loose.find("a==b"), Some("=="));
        assert_eq!(loose.find("==b"), Some("=="));
        assert_eq!(loose.find("if (a === b) {"), None);
        assert_eq!(loose.find("if (a !== b) {"), None);
        assert_eq!(loose.find("if (a != b) {"), None);
        assert_eq!(loose.find("a === b || c == d"), Some("=="));
    }

    #[test]
    fn test_empty_catch_tolerates_comments() {
        let empty = rule("empty-catch");
        assert!(empty.find("} catch (e) {}").is_some());
        assert!(empty.find("} catch (err) {   }").is_some());
        assert!(empty.find("} catch (err) { // ignore }").is_some());
        assert!(empty.find("} catch (err) { /* nothing */ }").is_some());
        assert!(empty.find("} catch (err) { handle(err); }").is_none());
    }

    #[test]
    fn test_single_letter_vars_reports_declaration() {
        let single = rule("single-letter-vars");
        assert_eq!(single.find("let x = 1;"), Some("let x"));
        assert_eq!(single.find("const z=2"), Some("const z"));
        assert_eq!(single.find("let xy = 1;"), None);
        assert_eq!(single.find("let q = 1;"), None);
    }

    #[test]
    fn test_todo_comment_is_case_insensitive() {
        let todo = rule("todo-comment");
        assert_eq!(todo.find("// todo: later"), Some("// todo"));
        assert_eq!(todo.find("x(); //FIXME"), Some("//FIXME"));
        assert_eq!(todo.find("/* TODO */"), None);
    }

    #[test]
    fn test_keyword_rules_need_non_word_prefix() {
        assert!(rule("alert").find(" alert('hi')").is_some());
        assert!(rule("alert").find("myalert('hi')").is_none());
        assert!(rule("while-true").find(" while(true) {").is_some());
        assert!(rule("for-loop").find(" for(let i = 0; i < n; i++) {").is_some());
        assert!(rule("for-loop").find(" for(const v of list) {").is_none());
        assert!(rule("document-write").find(";document.write('x')").is_some());
    }

    #[test]
    fn test_long_lines_threshold() {
        let long = rule("long-lines");
        assert!(long.find(&"a".repeat(119)).is_none());
        assert!(long.find(&"a".repeat(120)).is_some());
    }

    #[test]
    fn test_long_lines_counts_utf16_units() {
        let long = rule("long-lines");
        let emoji = "😈".repeat(60);
        assert_eq!(long.find(&emoji), Some(emoji.as_str()));
        assert!(long.find(&"é".repeat(119)).is_none());
        assert_eq!(long.pattern(), r"[^\n]{120,}");
    }

    #[test]
    fn test_word_characters_are_ascii_only() {
        assert_eq!(rule("single-letter-vars").find("let xé = 1"), Some("let x"));
        assert_eq!(rule("alert").find("éalert(1)"), Some("éalert("));
        assert!(rule("while-true").find("ñwhile(true) {").is_some());
        assert!(rule("for-loop").find("üfor(;;)").is_some());
        assert!(rule("document-write").find("ßdocument.write(x)").is_some());
        assert_eq!(rule("new-array").find("énew Array()"), Some("new Array()"));
        assert_eq!(rule("new-object").find("x=new Object()"), Some("new Object()"));
        assert!(rule("alert").find("_alert(1)").is_none());
    }

    #[test]
    fn test_constructor_rules() {
        assert_eq!(rule("new-array").find("const list = new Array();"), Some("new Array()"));
        assert_eq!(rule("new-object").find("const o = new  Object();"), Some("new  Object()"));
        assert!(rule("new-array").find("new Array(5)").is_none());
    }
}
