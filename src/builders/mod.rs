// The `builders` module collects the pieces assembled around the scan:
// the rule table, the config validator, the report renderers and the hook
// installer.

// `hooks` module:
// Installs the Husky pre-commit hook that runs `mean-linter`, adds the
// `prepare` script to `package.json` and writes a default `.meanlintrc`.
pub mod hooks;

// `reporter` module:
// Groups findings by file and renders a `Verdict`, either as the colored
// console report or as JSON.
pub mod reporter;

// `rules` module:
// The built-in rule catalog: identifier, pattern and message for every
// check, plus filtering by disabled identifiers.
pub mod rules;

// `validator` module:
// Flags unknown or duplicated rule identifiers in `.meanlintrc`. Issues are
// warnings only.
pub mod validator;
