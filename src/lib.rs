//! Static checks for Go source built on `go125_parser`.
//!
//! - `astwalk`: expression and function-local comment walkers.
//! - `lint`: checker trait, registry, reporting context and the `Linter`
//!   that runs checkers over one file.
//! - `params`: `checker.param=value` configuration.
//! - `checkers`: the checkers themselves.

pub mod astwalk;
pub mod checkers;
pub mod lint;
pub mod params;

pub use lint::{Checker, CheckerInfo, Context, LintError, Linter, ParamInfo, Registry, Warning};
pub use params::{CheckerParams, ParamError, ParamValue};
