use go125_lint::astwalk::{LocalCommentVisitor, LocalCommentWalker};
use go125_parser::ast::{
    AstArena, Comment, CommentGroup, CommentGroupId, CommentId, CommentKind, Decl, FieldList,
    FuncDecl, FuncDeclId, GenDecl, GenDeclKind, IdentName, Interner, ListRef, Signature,
    SourceFile, Span, TopLevelDecl,
};
use go125_parser::{parse_source, ParsedFile};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

enum Top {
    Func(&'static str, usize, usize),
    Var(usize, usize),
}

/// Builds a file by hand so declaration and comment offsets can be placed
/// exactly. Every comment is a group of its own.
fn build(decls: &[Top], comment_starts: &[usize]) -> ParsedFile {
    let groups: Vec<Vec<usize>> = comment_starts.iter().map(|&s| vec![s]).collect();
    build_groups(decls, &groups)
}

fn build_groups(decls: &[Top], groups: &[Vec<usize>]) -> ParsedFile {
    let src = " ".repeat(128);
    let mut arena = AstArena::new();
    let mut interner = Interner::new();

    let mut top = Vec::new();
    for d in decls {
        match *d {
            Top::Func(name, start, end) => {
                let params = FieldList {
                    open: Span::empty_at(start),
                    fields: ListRef::EMPTY,
                    close: Span::empty_at(start),
                };
                let signature = arena.signatures.alloc(
                    Signature {
                        params,
                        results: None,
                    },
                    Span::empty_at(start),
                );
                let func = FuncDecl {
                    func_pos: Span::new(start, start + 4),
                    recv: None,
                    name: IdentName {
                        sym: interner.intern(name),
                        pos: Span::empty_at(start),
                    },
                    type_params: None,
                    signature,
                    body: None,
                };
                top.push(TopLevelDecl::Func(
                    arena.funcs.alloc(func, Span::new(start, end)),
                ));
            }
            Top::Var(start, end) => {
                let decl = GenDecl {
                    kw_pos: Span::new(start, start + 3),
                    kind: GenDeclKind::Var,
                    l_paren: None,
                    specs: ListRef::EMPTY,
                    r_paren: None,
                };
                top.push(TopLevelDecl::Decl(
                    arena.decls.alloc(Decl::Gen(decl), Span::new(start, end)),
                ));
            }
        }
    }

    let mut group_ids: Vec<CommentGroupId> = Vec::new();
    for starts in groups {
        let comments: Vec<CommentId> = starts
            .iter()
            .map(|&s| {
                arena.comments.alloc(
                    Comment {
                        kind: CommentKind::Line,
                    },
                    Span::new(s, s + 2),
                )
            })
            .collect();
        let (Some(&first), Some(&last)) = (starts.first(), starts.last()) else {
            continue;
        };
        let comments = arena.list_comment_ids(comments);
        group_ids.push(
            arena
                .comment_groups
                .alloc(CommentGroup { comments }, Span::new(first, last + 2)),
        );
    }

    let file = SourceFile {
        package_pos: Span::new(0, 0),
        name: IdentName {
            sym: interner.intern("p"),
            pos: Span::empty_at(0),
        },
        decls: arena.list_top_decls(top),
        comments: arena.list_comment_group_ids(group_ids),
    };
    ParsedFile::new(arena, interner, file, &src)
}

/// Records comment start offsets per entered function.
struct Starts {
    reject: &'static [&'static str],
    entered: Vec<String>,
    seen: Vec<(String, u32)>,
    current: String,
}

impl Starts {
    fn new(reject: &'static [&'static str]) -> Self {
        Self {
            reject,
            entered: Vec::new(),
            seen: Vec::new(),
            current: String::new(),
        }
    }

    fn offsets(&self) -> Vec<u32> {
        self.seen.iter().map(|(_, s)| *s).collect()
    }
}

impl LocalCommentVisitor for Starts {
    fn enter_func(&mut self, file: &ParsedFile, decl: FuncDeclId) -> bool {
        let name = file.name(file.arena.funcs[decl].name.sym).to_string();
        self.entered.push(name.clone());
        self.current = name;
        !self.reject.contains(&self.current.as_str())
    }

    fn visit_local_comment(&mut self, file: &ParsedFile, group: CommentGroupId) {
        let start = file.arena.comment_groups.span(group).start;
        self.seen.push((self.current.clone(), start));
    }
}

fn walk(file: &ParsedFile, v: &mut Starts) {
    LocalCommentWalker::new(v).walk_file(file);
}

#[test]
fn only_comments_starting_inside_the_declaration() {
    let file = build(&[Top::Func("f", 10, 50)], &[5, 20, 45, 60]);
    let mut v = Starts::new(&[]);
    walk(&file, &mut v);
    assert_eq!(v.offsets(), vec![20, 45]);
}

#[test]
fn declaration_bounds_are_inclusive() {
    let file = build(&[Top::Func("f", 10, 50)], &[9, 10, 50, 51]);
    let mut v = Starts::new(&[]);
    walk(&file, &mut v);
    assert_eq!(v.offsets(), vec![10, 50]);
}

#[test]
fn rejected_functions_are_not_scanned() {
    let file = build(
        &[Top::Func("keep", 0, 20), Top::Func("drop", 30, 60)],
        &[5, 35, 40],
    );
    let mut v = Starts::new(&["drop"]);
    walk(&file, &mut v);
    assert_eq!(v.entered, vec!["keep", "drop"]);
    assert_eq!(v.seen, vec![("keep".to_string(), 5)]);
}

#[test]
fn general_declarations_are_skipped() {
    let file = build(
        &[Top::Var(0, 20), Top::Func("f", 30, 40), Top::Var(50, 70)],
        &[5, 35, 55],
    );
    let mut v = Starts::new(&[]);
    walk(&file, &mut v);
    assert_eq!(v.entered, vec!["f"]);
    assert_eq!(v.offsets(), vec![35]);
}

#[test]
fn every_declaration_rescans_the_full_list() {
    // Overlapping spans see the shared comment once each, in list order.
    let file = build(
        &[Top::Func("a", 0, 40), Top::Func("b", 20, 60)],
        &[10, 30, 50],
    );
    let mut v = Starts::new(&[]);
    walk(&file, &mut v);
    assert_eq!(
        v.seen,
        vec![
            ("a".to_string(), 10),
            ("a".to_string(), 30),
            ("b".to_string(), 30),
            ("b".to_string(), 50),
        ]
    );
}

#[test]
fn groups_are_placed_by_their_first_comment() {
    // The group at 20 runs past the end of `f`, the one at 5 reaches into
    // it; only the start counts.
    let file = build_groups(&[Top::Func("f", 10, 50)], &[vec![5, 12], vec![20, 48, 60]]);
    let mut v = Starts::new(&[]);
    walk(&file, &mut v);
    assert_eq!(v.offsets(), vec![20]);
}

#[test]
fn adjacent_line_comments_are_one_callback() {
    let src = "package p\n\nfunc f() {\n\t// a\n\t// b\n\n\t// c\n}\n";
    let file = parse_source(src).expect("parse");
    let mut v = Starts::new(&[]);
    walk(&file, &mut v);
    let a = src.find("// a").expect("a") as u32;
    let c = src.find("// c").expect("c") as u32;
    assert_eq!(v.offsets(), vec![a, c]);
}

#[test]
fn parsed_file_comments() {
    let src = "\
package p

// top
func f() {
\t// one
\tif true { /* two */ }
} // trailing on the closing line

func g() {}
";
    let file = parse_source(src).expect("parse");
    let mut v = Starts::new(&[]);
    walk(&file, &mut v);
    let texts: Vec<_> = v
        .seen
        .iter()
        .map(|(_, s)| {
            let rest = &src[*s as usize..];
            rest.lines().next().unwrap_or("").to_string()
        })
        .collect();
    assert_eq!(texts, vec!["// one", "/* two */ }"]);
}

proptest! {
    #[test]
    fn containment_matches_inclusive_bounds(
        start in 0usize..60,
        len in 0usize..60,
        mut comments in prop::collection::vec(0usize..126, 0..12),
    ) {
        comments.sort_unstable();
        let end = start + len;
        let file = build(&[Top::Func("f", start, end)], &comments);
        let mut v = Starts::new(&[]);
        walk(&file, &mut v);

        let expected: Vec<u32> = comments
            .iter()
            .filter(|&&c| c >= start && c <= end)
            .map(|&c| c as u32)
            .collect();
        prop_assert_eq!(v.offsets(), expected);
    }
}
