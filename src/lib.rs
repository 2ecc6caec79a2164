//! mean-linter: a pre-commit gate that scans the staged diff for sloppy
//! code and refuses the commit when it finds any.
//!
//! Only lines *added* by the diff are inspected, one at a time, against a
//! fixed catalog of regular-expression rules. Rules can be switched off
//! per project through `.meanlintrc`.

pub mod builders;
pub mod core;
pub mod utils;
