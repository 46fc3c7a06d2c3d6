use go125_parser::ast::{Decl, Expr, Spec, Stmt, TopLevelDecl};
use go125_parser::{parse_source, ParsedFile};

fn assert_parses(src: &str) -> ParsedFile {
    match parse_source(src) {
        Ok(f) => f,
        Err(f) => panic!("expected parse ok, got diagnostics: {:#?}", f.diags),
    }
}

#[test]
fn parses_imports_and_decls() {
    let f = assert_parses(
        r#"
package main

import (
    "fmt"
    . "math"
    _ "net/http"
    str "strings"
)

const (
    A = 1
    B int = 2
    C
)

var (
    x = 1
    y, z int
)

type (
    T = int
    U struct { F T; G, H string; *V }
    V interface {
        M(x int) int
        ~int | ~string
    }
)

func main() {
    fmt.Println(Sqrt(4), str.ToUpper("x"))
}
"#,
    );
    assert_eq!(f.file.decls.len(), 5);
    assert_eq!(f.name(f.file.name.sym), "main");
}

#[test]
fn parses_statements() {
    assert_parses(
        r#"
package p

func f(x int, ch chan int) (r int, err error) {
    if x < 0 { return -x, nil }
    if y := x * 2; y > 3 {
        x = y
    } else if y < 0 {
        x--
    } else {
        x += 1
    }
    for i := 0; i < 10; i++ {
        if i == 5 { break }
        continue
    }
    for x < 100 { x <<= 1 }
    for { break }
    for k, v := range map[string]int{"a": 1} { _, _ = k, v }
    for range []int{1,2,3} {
    }
    switch x {
    case 0, 1:
        x++
        fallthrough
    default:
        x = 3
    }
    switch v := interface{}(x).(type) {
    case int, string:
        _ = v
    case nil:
    }
    select {
    case ch <- x:
        return x, nil
    case v, ok := <-ch:
        _, _ = v, ok
    default:
        return 0, nil
    }
loop:
    for {
        go func() {}()
        defer close(ch)
        break loop
    }
    var local struct{ a, b int }
    _ = local
    goto loop
}
"#,
    );
}

#[test]
fn parses_expressions() {
    assert_parses(
        r#"
package p

type P struct{ X, Y int }

func f(a, b, c int, ch chan<- int, in <-chan int, p *P, args ...int) {
    _ = a + b*c - (a<<2) &^ b
    _ = a == b || a < c && b <= c
    _ = &a
    _ = <-in
    _ = []int{1,2,3}[0]
    _ = []int{1,2,3}[1:]
    _ = []int{1,2,3}[:2]
    _ = []int{1,2,3}[0:2:3]
    _ = [...]string{"a", "b"}
    _ = map[string]int{"a":1, "b":2}["a"]
    _ = []P{{1, 2}, {X: 3}}
    _ = &P{X: 1}
    _ = (*p).X
    _ = func(x int) int { return x * 2 }(a)
    _ = f
    f(a, b, c, ch, in, p, args...)
    _ = []byte("abc")
    _ = 'x' + 0x1F + 0o17 + 0b1 + 1_000
    _ = 1.5e3 + 2i
}
"#,
    );
}

#[test]
fn methods_record_receivers() {
    let f = assert_parses("package p\ntype T struct{}\nfunc (t *T) M() {}\nfunc (T) N() {}\n");
    let funcs: Vec<_> = f
        .arena
        .top_decls(f.file.decls)
        .iter()
        .filter_map(|d| match *d {
            TopLevelDecl::Func(id) => Some(id),
            _ => None,
        })
        .collect();
    assert_eq!(funcs.len(), 2);
    assert!(funcs.iter().all(|&id| f.arena.funcs[id].recv.is_some()));
}

#[test]
fn deref_selector_keeps_parens() {
    let f = assert_parses("package p\nvar v = (*k).f\n");
    let TopLevelDecl::Decl(decl) = f.arena.top_decls(f.file.decls)[0] else {
        panic!("expected a var declaration");
    };
    let Decl::Gen(g) = f.arena.decls[decl] else {
        panic!("expected a gen decl");
    };
    let Spec::Value(spec) = f.arena.specs_list(g.specs)[0] else {
        panic!("expected a value spec");
    };
    let value = f.arena.exprs_list(spec.values)[0];
    assert_eq!(f.expr_text(value), "(*k).f");
    let Expr::Selector { expr, .. } = f.arena.exprs[value] else {
        panic!("expected a selector");
    };
    assert!(matches!(f.arena.exprs[expr], Expr::Paren { .. }));
}

#[test]
fn comments_are_kept_in_order() {
    let f = assert_parses("package p // one\n/* two */\nfunc f() {\n\t// three\n\t// four\n}\n");
    let groups: Vec<Vec<&str>> = f
        .arena
        .comment_group_ids(f.file.comments)
        .iter()
        .map(|&g| f.comment_group_texts(g))
        .collect();
    assert_eq!(
        groups,
        vec![vec!["// one"], vec!["/* two */"], vec!["// three", "// four"]]
    );
}

#[test]
fn generic_declarations() {
    assert_parses(
        r#"
package p

type Number interface {
    ~int | ~int64 | float64
}

type List[T any] struct {
    next *List[T]
    val  T
}

type Pair[K comparable, V any] struct {
    Key K
    Val V
}

type Tree[T interface{ Less(T) bool }] struct {
    Left, Right *Tree[T]
    List[T]
}

type Set[T comparable] = map[T]struct{}

func (l *List[T]) Push(v T) *List[T] { return &List[T]{next: l, val: v} }

func (p Pair[K, _]) First() K { return p.Key }

func Sum[N Number](xs ...N) (s N) {
    for _, x := range xs {
        s += x
    }
    return
}

func Keys[M ~map[K]V, K comparable, V any](m M) []K {
    out := make([]K, 0, len(m))
    for k := range m {
        out = append(out, k)
    }
    return out
}

func use() {
    _ = Sum[int](1, 2)
    _ = Keys[map[string]int, string, int](nil)
    _ = Pair[string, int]{Key: "a", Val: 1}
    var f func(List[int]) = nil
    _ = f
}
"#,
    );
}

#[test]
fn errors_keep_a_partial_tree() {
    let failure = parse_source("package p\nfunc f() {\n\tx := \n}\nfunc g() {}\n").unwrap_err();
    assert!(!failure.diags.is_empty());
    let partial = failure.partial.expect("partial tree");
    assert_eq!(partial.file.decls.len(), 2);
}

#[test]
fn labeled_statement_body_is_kept() {
    let f = assert_parses("package p\nfunc f() {\nL:\n\tfor {\n\t\tbreak L\n\t}\n}\n");
    let TopLevelDecl::Func(id) = f.arena.top_decls(f.file.decls)[0] else {
        panic!("expected func");
    };
    let body = f.arena.funcs[id].body.expect("body");
    let stmts = f.arena.stmts_list(body.stmts);
    assert!(matches!(f.arena.stmts[stmts[0]], Stmt::Labeled { .. }));
}
