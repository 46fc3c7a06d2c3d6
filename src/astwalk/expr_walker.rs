use go125_parser::ast::{AstArena, ExprId, FuncDeclId};
use go125_parser::walk::{Visitor, Walk};
use go125_parser::ParsedFile;

/// Receives every expression of a file in pre-order.
pub trait ExprVisitor {
    /// Called before descending into a function declaration.
    fn enter_func(&mut self, _file: &ParsedFile, _decl: FuncDeclId) -> bool {
        true
    }

    fn visit_expr(&mut self, file: &ParsedFile, expr: ExprId);
}

/// Drives an `ExprVisitor` over all declarations of a file, in source order.
pub struct ExprWalker<'v, V: ?Sized> {
    visitor: &'v mut V,
}

impl<'v, V: ExprVisitor + ?Sized> ExprWalker<'v, V> {
    pub fn new(visitor: &'v mut V) -> Self {
        Self { visitor }
    }

    pub fn walk_file(&mut self, file: &ParsedFile) {
        let mut driver = Driver {
            file,
            visitor: &mut *self.visitor,
        };
        driver.visit_source_file(&file.arena, &file.file);
    }
}

struct Driver<'f, 'v, V: ?Sized> {
    file: &'f ParsedFile,
    visitor: &'v mut V,
}

impl<'f, V: ExprVisitor + ?Sized> Visitor<'f> for Driver<'f, '_, V> {
    fn visit_func_decl(&mut self, a: &'f AstArena, id: FuncDeclId) {
        if self.visitor.enter_func(self.file, id) {
            a.funcs[id].walk(a, self);
        }
    }

    fn visit_expr(&mut self, a: &'f AstArena, id: ExprId) {
        self.visitor.visit_expr(self.file, id);
        a.exprs[id].walk(a, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use go125_parser::parse_source;

    struct Texts(Vec<String>);

    impl ExprVisitor for Texts {
        fn enter_func(&mut self, file: &ParsedFile, decl: FuncDeclId) -> bool {
            file.name(file.arena.funcs[decl].name.sym) != "skip"
        }

        fn visit_expr(&mut self, file: &ParsedFile, expr: ExprId) {
            self.0.push(file.expr_text(expr).to_string());
        }
    }

    #[test]
    fn visits_in_source_order_and_honors_enter_func() {
        let src = "package p\nvar v = a + b\nfunc skip() { hidden() }\nfunc f() { g(x) }\n";
        let file = parse_source(src).expect("parse");
        let mut t = Texts(Vec::new());
        ExprWalker::new(&mut t).walk_file(&file);
        assert_eq!(t.0, vec!["a + b", "a", "b", "g(x)", "g", "x"]);
    }
}
