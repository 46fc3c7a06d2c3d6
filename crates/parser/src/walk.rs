//! Pre-order traversal over the arena AST.
//!
//! `Walk` is implemented for every node type (mostly via `#[derive(WalkAst)]`)
//! and forwards each child id to the matching `Visitor` hook. Default hooks
//! recurse, so a visitor overrides only the hooks it cares about and calls
//! `walk` on the node itself to keep descending.

use crate::ast::*;

pub trait Walk<'ast> {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V);
}

pub trait Visitor<'ast> {
    #[inline(always)]
    fn visit_source_file(&mut self, a: &'ast AstArena, f: &'ast SourceFile) {
        f.walk(a, self);
    }

    #[inline(always)]
    fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) {
        a.decls[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) {
        a.funcs[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) {
        a.stmts[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_simple_stmt(&mut self, a: &'ast AstArena, id: SimpleStmtId) {
        a.simple_stmts[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
        a.exprs[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) {
        a.types[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_field(&mut self, a: &'ast AstArena, id: FieldId) {
        a.fields[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_signature(&mut self, a: &'ast AstArena, id: SignatureId) {
        a.signatures[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_switch_clause(&mut self, a: &'ast AstArena, id: SwitchClauseId) {
        a.switch_clauses[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_comm_clause(&mut self, a: &'ast AstArena, id: CommClauseId) {
        a.comm_clauses[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_type_params(&mut self, a: &'ast AstArena, id: TypeParamsId) {
        a.type_params[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_type_param_decl(&mut self, a: &'ast AstArena, id: TypeParamDeclId) {
        a.type_param_decls[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_comment_group(&mut self, a: &'ast AstArena, id: CommentGroupId) {
        a.comment_groups[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_comment(&mut self, a: &'ast AstArena, id: CommentId) {
        a.comments[id].walk(a, self);
    }
}

macro_rules! impl_walk_for_ids {
    ($($id:ty => $visit:ident),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $id {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
                    v.$visit(a, *self);
                }
            }
        )*
    };
}

impl_walk_for_ids! {
    DeclId => visit_decl,
    FuncDeclId => visit_func_decl,
    StmtId => visit_stmt,
    SimpleStmtId => visit_simple_stmt,
    ExprId => visit_expr,
    TypeId => visit_type,
    FieldId => visit_field,
    SignatureId => visit_signature,
    SwitchClauseId => visit_switch_clause,
    CommClauseId => visit_comm_clause,
    TypeParamsId => visit_type_params,
    TypeParamDeclId => visit_type_param_decl,
    CommentGroupId => visit_comment_group,
    CommentId => visit_comment,
}

/// Resolves a `ListRef<T>` to its backing slice.
pub trait ListSlice<T> {
    fn slice(&self, r: ListRef<T>) -> &[T];
}

impl<'ast, T> Walk<'ast> for ListRef<T>
where
    AstArena: ListSlice<T>,
    T: Walk<'ast> + 'ast,
{
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        for item in a.slice(*self) {
            item.walk(a, v);
        }
    }
}

macro_rules! impl_list_slice {
    ($($t:ty => $getter:ident),* $(,)?) => {
        $(
            impl ListSlice<$t> for AstArena {
                #[inline(always)]
                fn slice(&self, r: ListRef<$t>) -> &[$t] {
                    self.$getter(r)
                }
            }
        )*
    };
}

impl_list_slice! {
    IdentName => ident_names,
    ExprId => exprs_list,
    TypeId => type_ids_list,
    StmtId => stmts_list,
    FieldId => fields_list,
    Spec => specs_list,
    KeyedElement => keyed_elems_list,
    TopLevelDecl => top_decls,
    SwitchClauseId => switch_clause_ids,
    CommClauseId => comm_clause_ids,
    InterfaceElem => interface_elems,
    TypeTerm => type_terms,
    TypeParamDeclId => type_param_decl_ids,
    CommentGroupId => comment_group_ids,
    CommentId => comment_ids,
}

impl<'ast, T: Walk<'ast>> Walk<'ast> for Option<T> {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        if let Some(x) = self {
            x.walk(a, v);
        }
    }
}

impl<'ast> Walk<'ast> for Block {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        self.stmts.walk(a, v);
    }
}

// Leaves: nothing to descend into.
macro_rules! impl_walk_noop {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $ty {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, _: &'ast AstArena, _: &mut V) {}
            }
        )*
    };
}

impl_walk_noop! {
    Span,
    Symbol,
    BasicLit,
    StringLit,
    bool,
    GenDeclKind,
    BasicLitKind,
    ChanDir,
    UnaryOp,
    BinaryOp,
    AssignOp,
    IncDecOp,
    CommentKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;

    #[derive(Default)]
    struct Counter {
        exprs: Vec<&'static str>,
        funcs: usize,
    }

    impl<'ast> Visitor<'ast> for Counter {
        fn visit_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) {
            self.funcs += 1;
            a.funcs[id].walk(a, self);
        }

        fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
            self.exprs.push(a.exprs[id].kind_name());
            a.exprs[id].walk(a, self);
        }
    }

    #[test]
    fn visits_expressions_in_pre_order() {
        let file = parse_source("package p\nfunc f(k *T) { _ = (*k).x }\n").expect("parse");
        let mut c = Counter::default();
        c.visit_source_file(&file.arena, &file.file);

        assert_eq!(c.funcs, 1);
        // `_`, then the selector and its operand chain.
        assert_eq!(
            c.exprs,
            vec!["Ident", "Selector", "Paren", "Unary", "Ident"]
        );
    }

    #[derive(Default)]
    struct TypeParamNames(Vec<String>);

    impl<'ast> Visitor<'ast> for TypeParamNames {
        fn visit_type_param_decl(&mut self, a: &'ast AstArena, id: TypeParamDeclId) {
            self.0.push(format!("{}", a.ident_names(a.type_param_decls[id].names).len()));
            a.type_param_decls[id].walk(a, self);
        }

        fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) {
            self.0.push(a.types[id].kind_name().to_string());
            a.types[id].walk(a, self);
        }
    }

    #[test]
    fn visits_type_parameters_and_constraints() {
        let file = parse_source("package p
func f[K, V any, N ~int | ~int64](m map[K]V, n N) {}
")
            .expect("parse");
        let mut v = TypeParamNames::default();
        v.visit_source_file(&file.arena, &file.file);

        // Two decls (`K, V` then `N`), each followed by its constraint
        // terms, then the parameter types.
        assert_eq!(
            v.0,
            vec!["2", "Named", "1", "Named", "Named", "Map", "Named", "Named", "Named"]
        );
    }
}
