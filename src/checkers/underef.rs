//! Finds explicit dereferences that Go would insert on its own:
//!
//! ```go
//! (*k).field = 5   // k.field = 5
//! v := (*a)[5]     // v := a[5], only when a points to an array
//! ```

use go125_parser::ast::{Expr, ExprId, UnaryOp};
use go125_parser::types::TypeKind;
use go125_parser::SelectionKind;
use tracing::trace;

use crate::lint::{Checker, CheckerInfo, Context, ParamInfo};
use crate::params::{CheckerParams, ParamError};

pub const NAME: &str = "underef";

pub static INFO: CheckerInfo = CheckerInfo {
    name: NAME,
    tags: &["style"],
    summary: "Detects dereference expressions that can be omitted",
    before: "(*k).field = 5\nv := (*a)[5] // only if a is array",
    after: "k.field = 5\nv := a[5]",
    params: &[ParamInfo {
        name: "skipRecvCopy",
        default: "true",
        doc: "whether to skip (*x).method() calls where *x is a pointer receiver",
    }],
};

pub struct Underef {
    skip_recv_copy: bool,
}

impl Underef {
    pub fn new(skip_recv_copy: bool) -> Self {
        Self { skip_recv_copy }
    }

    pub fn construct(params: &CheckerParams) -> Result<Box<dyn Checker>, ParamError> {
        let skip = params.bool_param(NAME, "skipRecvCopy", true)?;
        Ok(Box::new(Self::new(skip)))
    }

    fn check_selector(&self, ctx: &mut Context<'_>, sel: ExprId, x: ExprId, field: &str) {
        let Some(star) = deref_operand(ctx, x) else {
            return;
        };
        if self.skip_recv_copy && selects_pointer_method(ctx, sel) {
            trace!(expr = ctx.text(sel), "pointer receiver method, skipped");
            return;
        }
        if !is_redundant_deref(ctx, star) {
            return;
        }

        let msg = format!(
            "could simplify {} to {}.{}",
            ctx.text(sel),
            underef_text(ctx, star),
            field
        );
        ctx.warn(ctx.span(sel), msg);
    }

    fn check_index(&self, ctx: &mut Context<'_>, expr: ExprId, x: ExprId, index: ExprId) {
        let Some(star) = deref_operand(ctx, x) else {
            return;
        };
        if !is_redundant_deref(ctx, star) || !points_to_array(ctx, star) {
            return;
        }

        let msg = format!(
            "could simplify {} to {}[{}]",
            ctx.text(expr),
            underef_text(ctx, star),
            ctx.text(index)
        );
        ctx.warn(ctx.span(expr), msg);
    }
}

impl Checker for Underef {
    fn info(&self) -> &'static CheckerInfo {
        &INFO
    }

    fn visit_expr(&self, ctx: &mut Context<'_>, expr: ExprId) {
        let file = ctx.file;
        match file.arena.exprs[expr] {
            Expr::Selector {
                expr: x, ident_pos, ..
            } => {
                let field = file.text(ident_pos);
                self.check_selector(ctx, expr, x, field);
            }
            Expr::Index { expr: x, index, .. } => self.check_index(ctx, expr, x, index),
            _ => {}
        }
    }
}

/// For `(*p)` returns `p`. Exactly one pair of parentheses is looked through.
fn deref_operand(ctx: &Context<'_>, x: ExprId) -> Option<ExprId> {
    let exprs = &ctx.file.arena.exprs;
    let Expr::Paren { expr: inner, .. } = exprs[x] else {
        return None;
    };
    match exprs[inner] {
        Expr::Unary {
            op: UnaryOp::Deref,
            expr,
            ..
        } => Some(expr),
        _ => None,
    }
}

/// `p` in `(*p)` is a pointer whose target is neither a pointer nor an
/// interface, so the selector or index would dereference it implicitly.
fn is_redundant_deref(ctx: &Context<'_>, star: ExprId) -> bool {
    let types = ctx.types;
    let Some(ty) = types.type_of(star) else {
        trace!(
            kind = ctx.file.arena.exprs[star].kind_name(),
            expr = ctx.text(star),
            "untyped operand, skipped"
        );
        return false;
    };
    let TypeKind::Pointer(elem) = *types.kind(types.underlying(ty)) else {
        return false;
    };
    !matches!(
        types.kind(types.underlying(elem)),
        TypeKind::Pointer(_) | TypeKind::Interface { .. } | TypeKind::Invalid
    )
}

/// The operand's own type is `*[N]T`; named array types do not count.
fn points_to_array(ctx: &Context<'_>, star: ExprId) -> bool {
    let types = ctx.types;
    let Some(ty) = types.type_of(star) else {
        return false;
    };
    match *types.kind(ty) {
        TypeKind::Pointer(elem) => matches!(types.kind(elem), TypeKind::Array { .. }),
        _ => false,
    }
}

fn selects_pointer_method(ctx: &Context<'_>, sel: ExprId) -> bool {
    let types = ctx.types;
    let Some(s) = types.selection(sel) else {
        return false;
    };
    if s.kind != SelectionKind::Method {
        return false;
    }
    match types.kind(s.ty) {
        TypeKind::Signature {
            recv: Some(recv), ..
        } => matches!(types.kind(*recv), TypeKind::Pointer(_)),
        _ => false,
    }
}

/// Text of the expression with one dereference removed. A remaining
/// dereference keeps its parentheses: `(**k)` becomes `(*k)`.
fn underef_text(ctx: &Context<'_>, star: ExprId) -> String {
    let text = ctx.text(star);
    match ctx.file.arena.exprs[star] {
        Expr::Unary {
            op: UnaryOp::Deref, ..
        } => format!("({text})"),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Linter;
    use pretty_assertions::assert_eq;

    fn lint(skip_recv_copy: bool, src: &str) -> Vec<String> {
        let linter = Linter::with_checkers(vec![Box::new(Underef::new(skip_recv_copy))]);
        linter
            .lint_file("t.go", src)
            .expect("lint")
            .into_iter()
            .map(|w| w.text)
            .collect()
    }

    #[test]
    fn selector_on_struct_pointer() {
        let src = "package p\ntype T struct{ f int }\nfunc g(k *T) { (*k).f = 5 }\n";
        assert_eq!(lint(true, src), vec!["could simplify (*k).f to k.f"]);
    }

    #[test]
    fn double_pointer_keeps_inner_star() {
        let src = "package p\ntype T struct{ f int }\nfunc g(k **T) int { return (**k).f }\n";
        assert_eq!(lint(true, src), vec!["could simplify (**k).f to (*k).f"]);
    }

    #[test]
    fn parenthesized_twice_is_not_matched() {
        let src = "package p\ntype T struct{ f int }\nfunc g(k *T) int { return ((*k)).f }\n";
        assert!(lint(true, src).is_empty());
    }

    #[test]
    fn index_requires_array_pointee() {
        let src = "\
package p
func g(a *[4]int, s *[]int, m *map[int]int) int {
\treturn (*a)[1] + (*s)[1] + (*m)[1]
}
";
        assert_eq!(lint(true, src), vec!["could simplify (*a)[1] to a[1]"]);
    }
}
