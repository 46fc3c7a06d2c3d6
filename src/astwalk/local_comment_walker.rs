use go125_parser::ast::{CommentGroupId, FuncDeclId, TopLevelDecl};
use go125_parser::ParsedFile;

/// Receives the comment groups found inside function declarations.
pub trait LocalCommentVisitor {
    /// Called once per function declaration; returning `false` skips its
    /// comments.
    fn enter_func(&mut self, file: &ParsedFile, decl: FuncDeclId) -> bool;

    fn visit_local_comment(&mut self, file: &ParsedFile, group: CommentGroupId);
}

/// Visits, for each function declaration, every comment group whose start
/// offset lies within the declaration's span (both ends inclusive).
///
/// Each declaration rescans the whole group list, so groups are always
/// delivered in file order.
pub struct LocalCommentWalker<'v, V: ?Sized> {
    visitor: &'v mut V,
}

impl<'v, V: LocalCommentVisitor + ?Sized> LocalCommentWalker<'v, V> {
    pub fn new(visitor: &'v mut V) -> Self {
        Self { visitor }
    }

    pub fn walk_file(&mut self, file: &ParsedFile) {
        let arena = &file.arena;
        let groups = arena.comment_group_ids(file.file.comments);

        for decl in arena.top_decls(file.file.decls) {
            let TopLevelDecl::Func(func) = *decl else {
                continue;
            };
            if !self.visitor.enter_func(file, func) {
                continue;
            }

            let span = arena.funcs.span(func);
            for &group in groups {
                if span.contains_inclusive(arena.comment_groups.span(group).start) {
                    self.visitor.visit_local_comment(file, group);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use go125_parser::parse_source;

    #[derive(Default)]
    struct Collect {
        texts: Vec<String>,
        funcs: Vec<String>,
    }

    impl LocalCommentVisitor for Collect {
        fn enter_func(&mut self, file: &ParsedFile, decl: FuncDeclId) -> bool {
            let name = file.name(file.arena.funcs[decl].name.sym);
            self.funcs.push(name.to_string());
            name != "skipped"
        }

        fn visit_local_comment(&mut self, file: &ParsedFile, group: CommentGroupId) {
            self.texts.push(file.comment_group_texts(group).join("|"));
        }
    }

    #[test]
    fn collects_comments_inside_function_bodies() {
        let src = "\
package p

// doc comment
func f() {
\t// inside f
\tx := 1 /* trailing */
\t// a
\t// b
\t_ = x
}

var v = 1 // package level

func skipped() {
\t// hidden
}

func g() { /* g */ }
";
        let file = parse_source(src).expect("parse");
        let mut c = Collect::default();
        LocalCommentWalker::new(&mut c).walk_file(&file);

        assert_eq!(c.funcs, vec!["f", "skipped", "g"]);
        assert_eq!(
            c.texts,
            vec!["// inside f", "/* trailing */", "// a|// b", "/* g */"]
        );
    }
}
