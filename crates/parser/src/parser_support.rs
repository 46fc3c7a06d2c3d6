use crate::ast::{self, ListRef, Span};

/// One comma-separated entry of a parameter list before grouping.
///
/// `a, b int` arrives as `[a]` (no type) followed by `[b] int`; the grouping
/// into fields is only decidable once the whole list is seen.
#[derive(Clone, Debug)]
pub(crate) struct ParamDecl {
    pub names: Vec<ast::IdentName>,
    pub ellipsis_pos: Option<Span>,
    pub typ: Option<ast::TypeId>,
    pub span: Span,
}

/// Groups raw parameter entries into fields.
///
/// Names without a type attach to the next typed entry. If the list ends with
/// untyped names, none of them were names: `func(T1, T2)` lists types only.
pub(crate) fn resolve_param_list(
    arena: &mut ast::AstArena,
    params: Vec<ParamDecl>,
) -> Vec<ast::FieldId> {
    let mut out = Vec::new();
    let mut pending: Vec<ParamDecl> = Vec::new();

    for param in params {
        let Some(typ) = param.typ else {
            pending.push(param);
            continue;
        };

        let start = pending.first().map_or(param.span.start, |p| p.span.start);
        let names: Vec<ast::IdentName> = pending
            .drain(..)
            .flat_map(|p| p.names)
            .chain(param.names)
            .collect();
        let names = if names.is_empty() {
            ListRef::EMPTY
        } else {
            arena.list_ident_names(names)
        };

        let field = ast::Field {
            names,
            ellipsis_pos: param.ellipsis_pos,
            typ,
            tag: None,
            is_embed: false,
        };
        let span = Span {
            start,
            end: param.span.end,
        };
        out.push(arena.fields.alloc(field, span));
    }

    for param in pending {
        for name in param.names {
            let typ = named_type_from_ident(arena, name);
            let field = ast::Field {
                names: ListRef::EMPTY,
                ellipsis_pos: param.ellipsis_pos,
                typ,
                tag: None,
                is_embed: false,
            };
            out.push(arena.fields.alloc(field, name.pos));
        }
    }

    out
}

pub(crate) fn named_type_from_ident(
    arena: &mut ast::AstArena,
    name: ast::IdentName,
) -> ast::TypeId {
    let typ = ast::Type::Named {
        pkg: None,
        name,
        args: ListRef::EMPTY,
    };
    arena.types.alloc(typ, name.pos)
}

/// `T` or `pkg.T` as the parts of a named type.
fn type_name(
    arena: &ast::AstArena,
    id: ast::ExprId,
) -> Option<(Option<ast::IdentName>, ast::IdentName)> {
    let span = arena.exprs.span(id);
    match arena.exprs[id] {
        ast::Expr::Ident(sym) => Some((None, ast::IdentName { sym, pos: span })),
        ast::Expr::Selector {
            expr,
            ident,
            ident_pos,
            ..
        } => {
            let ast::Expr::Ident(pkg) = arena.exprs[expr] else {
                return None;
            };
            let pkg = ast::IdentName {
                sym: pkg,
                pos: arena.exprs.span(expr),
            };
            Some((
                Some(pkg),
                ast::IdentName {
                    sym: ident,
                    pos: ident_pos,
                },
            ))
        }
        _ => None,
    }
}

/// Interprets an already parsed expression as a type, for composite literal
/// types such as `T{}`, `pkg.T{}` or `Pair[K, V]{}`.
pub(crate) fn expr_to_type(arena: &mut ast::AstArena, id: ast::ExprId) -> Option<ast::TypeId> {
    let span = arena.exprs.span(id);
    let typ = match arena.exprs[id] {
        ast::Expr::Type(t) => return Some(t),
        ast::Expr::Unary {
            op: ast::UnaryOp::Deref,
            op_pos,
            expr,
        } => ast::Type::Pointer {
            star_pos: op_pos,
            elem: expr_to_type(arena, expr)?,
        },
        ast::Expr::Index { expr, index, .. } => {
            let (pkg, name) = type_name(arena, expr)?;
            let arg = expr_to_type(arena, index)?;
            let args = arena.list_type_ids([arg]);
            ast::Type::Named { pkg, name, args }
        }
        ast::Expr::Instantiate { expr, args, .. } => {
            let (pkg, name) = type_name(arena, expr)?;
            let exprs = arena.exprs_list(args).to_vec();
            let args = exprs
                .into_iter()
                .map(|e| expr_to_type(arena, e))
                .collect::<Option<Vec<_>>>()?;
            let args = arena.list_type_ids(args);
            ast::Type::Named { pkg, name, args }
        }
        _ => {
            let (pkg, name) = type_name(arena, id)?;
            ast::Type::Named {
                pkg,
                name,
                args: ListRef::EMPTY,
            }
        }
    };
    Some(arena.types.alloc(typ, span))
}
