//! Go 1.25 front end for static analysis.
//!
//! - `lexer`: logos-based scanner with Go semicolon insertion and comment capture.
//! - `parser`: recursive-descent parser producing the arena AST in `ast`.
//! - `walk`: visitor infrastructure over the AST.
//! - `types` / `check`: best-effort, single-file type checking that resolves
//!   expression types for analysis passes.

pub mod ast;
pub mod check;
pub mod error;
pub mod lexer;
pub mod parser;
mod parser_support;
pub mod types;
pub mod walk;

pub use check::{check_file, Selection, SelectionKind, TypesInfo};
pub use lexer::Lexer;
pub use parser::parse_source;

use crate::ast::{
    AstArena, CommentGroupId, CommentId, ExprId, Interner, SourceFile, Span, Symbol,
};

/// A parsed Go file: its tree, interned names and the source text that
/// spans point into.
#[derive(Debug)]
pub struct ParsedFile {
    pub arena: AstArena,
    pub interner: Interner,
    pub file: SourceFile,
    source: String,
    line_starts: Vec<u32>,
}

impl ParsedFile {
    /// Assembles a file from an already built tree. `parse_source` is the
    /// usual way to get one; this exists for trees built by hand.
    pub fn new(
        arena: AstArena,
        interner: Interner,
        file: SourceFile,
        source: &str,
    ) -> Self {
        let line_starts = std::iter::once(0)
            .chain(memchr::memchr_iter(b'\n', source.as_bytes()).map(|i| i as u32 + 1))
            .collect();
        Self {
            arena,
            interner,
            file,
            source: source.to_owned(),
            line_starts,
        }
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source text covered by `span`; out-of-range spans yield `""`.
    pub fn text(&self, span: Span) -> &str {
        self.source
            .get(span.start as usize..span.end as usize)
            .unwrap_or("")
    }

    #[inline]
    pub fn expr_text(&self, id: ExprId) -> &str {
        self.text(self.arena.exprs.span(id))
    }

    #[inline]
    pub fn comment_text(&self, id: CommentId) -> &str {
        self.text(self.arena.comments.span(id))
    }

    /// The comments of a group, one entry per comment.
    pub fn comment_group_texts(&self, id: CommentGroupId) -> Vec<&str> {
        let group = self.arena.comment_groups[id];
        self.arena
            .comment_ids(group.comments)
            .iter()
            .map(|&c| self.comment_text(c))
            .collect()
    }

    #[inline]
    pub fn name(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    /// 1-based line and column (in bytes) of a byte offset.
    pub fn line_col(&self, pos: u32) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&pos) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let start = self.line_starts.get(line).copied().unwrap_or(0);
        (line as u32 + 1, pos - start + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_is_one_based() {
        let f = parse_source("package p\n\nvar x = 1\n").expect("parse");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(11), (3, 1));
        assert_eq!(f.line_col(15), (3, 5));
    }
}
