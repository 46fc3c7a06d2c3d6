//! Checker trait, registry and the per-file lint driver.

use std::fmt;
use std::path::PathBuf;

use go125_parser::ast::{ExprId, Span};
use go125_parser::error::Diag;
use go125_parser::{check_file, parse_source, ParsedFile, TypesInfo};
use thiserror::Error;
use tracing::debug;

use crate::astwalk::{ExprVisitor, ExprWalker};
use crate::checkers;
use crate::params::{CheckerParams, ParamError};

/// A documented checker parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamInfo {
    pub name: &'static str,
    pub default: &'static str,
    pub doc: &'static str,
}

/// Static documentation attached to every checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerInfo {
    pub name: &'static str,
    pub tags: &'static [&'static str],
    pub summary: &'static str,
    /// Code that triggers a warning.
    pub before: &'static str,
    /// The same code after applying the suggestion.
    pub after: &'static str,
    pub params: &'static [ParamInfo],
}

impl CheckerInfo {
    pub fn param(&self, name: &str) -> Option<&'static ParamInfo> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// A check run on every expression of a file.
///
/// Checkers are configured once at construction and never mutated while
/// linting, so one instance can serve many files.
pub trait Checker: Send + Sync {
    fn info(&self) -> &'static CheckerInfo;

    fn visit_expr(&self, ctx: &mut Context<'_>, expr: ExprId);
}

/// What a checker sees while visiting one file.
pub struct Context<'a> {
    pub file: &'a ParsedFile,
    pub types: &'a TypesInfo,
    file_name: &'a str,
    checker: &'static str,
    warnings: &'a mut Vec<Warning>,
}

impl<'a> Context<'a> {
    /// Source text of an expression.
    #[inline]
    pub fn text(&self, expr: ExprId) -> &'a str {
        self.file.expr_text(expr)
    }

    #[inline]
    pub fn span(&self, expr: ExprId) -> Span {
        self.file.arena.exprs.span(expr)
    }

    /// Reports `message` at the start of `span`.
    pub fn warn(&mut self, span: Span, message: impl Into<String>) {
        let (line, col) = self.file.line_col(span.start);
        self.warnings.push(Warning {
            checker: self.checker,
            file: self.file_name.to_string(),
            line,
            col,
            span,
            text: message.into(),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub checker: &'static str,
    pub file: String,
    pub line: u32,
    pub col: u32,
    pub span: Span,
    pub text: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.file, self.line, self.col, self.checker, self.text
        )
    }
}

#[derive(Debug, Error)]
pub enum LintError {
    #[error("{file}: {} parse error(s), first: {}", .diags.len(), first_diag(.diags))]
    Parse { file: String, diags: Vec<Diag> },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Params(#[from] ParamError),
}

fn first_diag(diags: &[Diag]) -> String {
    diags.first().map_or_else(String::new, |d| d.message.clone())
}

pub type Constructor = fn(&CheckerParams) -> Result<Box<dyn Checker>, ParamError>;

/// The set of known checkers and how to build them.
pub struct Registry {
    entries: Vec<(&'static CheckerInfo, Constructor)>,
}

impl Registry {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Every checker this crate ships.
    pub fn default_checkers() -> Self {
        let mut r = Self::empty();
        checkers::register_all(&mut r);
        r
    }

    pub fn register(&mut self, info: &'static CheckerInfo, ctor: Constructor) {
        self.entries.push((info, ctor));
    }

    pub fn infos(&self) -> impl Iterator<Item = &'static CheckerInfo> + '_ {
        self.entries.iter().map(|(info, _)| *info)
    }

    pub fn get(&self, name: &str) -> Option<&'static CheckerInfo> {
        self.infos().find(|info| info.name == name)
    }

    /// Builds every checker accepted by `enabled`.
    ///
    /// Parameters naming an unknown checker or parameter are rejected up
    /// front, as are values of the wrong type.
    pub fn new_checkers<F>(
        &self,
        params: &CheckerParams,
        mut enabled: F,
    ) -> Result<Vec<Box<dyn Checker>>, ParamError>
    where
        F: FnMut(&CheckerInfo) -> bool,
    {
        for (checker, param) in params.keys() {
            if self.get(checker).and_then(|i| i.param(param)).is_none() {
                return Err(ParamError::Unknown {
                    checker: checker.to_string(),
                    param: param.to_string(),
                });
            }
        }

        let mut out = Vec::with_capacity(self.entries.len());
        for (info, ctor) in &self.entries {
            if enabled(info) {
                out.push(ctor(params)?);
            }
        }
        Ok(out)
    }
}

/// Runs a fixed set of checkers over files.
pub struct Linter {
    checkers: Vec<Box<dyn Checker>>,
}

impl Linter {
    /// All default checkers with default parameters.
    pub fn new() -> Result<Self, LintError> {
        let checkers = Registry::default_checkers().new_checkers(&CheckerParams::new(), |_| true)?;
        Ok(Self::with_checkers(checkers))
    }

    pub fn with_checkers(checkers: Vec<Box<dyn Checker>>) -> Self {
        Self { checkers }
    }

    pub fn checkers(&self) -> impl Iterator<Item = &dyn Checker> {
        self.checkers.iter().map(|c| c.as_ref())
    }

    /// Parses, type-checks and lints one file. Warnings come out in
    /// traversal order.
    #[tracing::instrument(level = "debug", skip(self, src), fields(bytes = src.len()))]
    pub fn lint_file(&self, name: &str, src: &str) -> Result<Vec<Warning>, LintError> {
        let file = parse_source(src).map_err(|failure| LintError::Parse {
            file: name.to_string(),
            diags: failure.diags,
        })?;
        let types = check_file(&file);
        debug!(typed_exprs = types.len(), "type check done");

        let mut warnings = Vec::new();
        let mut run = RunCheckers {
            checkers: &self.checkers,
            types: &types,
            file_name: name,
            warnings: &mut warnings,
        };
        ExprWalker::new(&mut run).walk_file(&file);

        debug!(warnings = warnings.len(), "lint done");
        Ok(warnings)
    }
}

struct RunCheckers<'a> {
    checkers: &'a [Box<dyn Checker>],
    types: &'a TypesInfo,
    file_name: &'a str,
    warnings: &'a mut Vec<Warning>,
}

impl ExprVisitor for RunCheckers<'_> {
    fn visit_expr(&mut self, file: &ParsedFile, expr: ExprId) {
        for checker in self.checkers {
            let mut ctx = Context {
                file,
                types: self.types,
                file_name: self.file_name,
                checker: checker.info().name,
                warnings: &mut *self.warnings,
            };
            checker.visit_expr(&mut ctx, expr);
        }
    }
}
