use go125_lint::checkers::underef::Underef;
use go125_lint::{CheckerParams, Linter, Registry, Warning};
use pretty_assertions::assert_eq;

fn lint_with(params: &[&str], src: &str) -> Vec<Warning> {
    let params = CheckerParams::parse(params).expect("params");
    let checkers = Registry::default_checkers()
        .new_checkers(&params, |info| info.name == "underef")
        .expect("checkers");
    Linter::with_checkers(checkers)
        .lint_file("x.go", src)
        .expect("lint")
}

fn messages(params: &[&str], src: &str) -> Vec<String> {
    lint_with(params, src).into_iter().map(|w| w.text).collect()
}

const TYPES: &str = "\
package p

type Point struct{ X, Y int }

func (p *Point) Move(dx int) { p.X += dx }
func (p Point) Sum() int    { return p.X + p.Y }

type Shape interface{ Area() float64 }
type Row [4]int
";

fn with_types(body: &str) -> String {
    format!("{TYPES}\n{body}")
}

#[test]
fn field_access_through_explicit_deref() {
    let src = with_types("func f(k *Point) {\n\t(*k).X = 5\n}\n");
    let got = lint_with(&[], &src);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].text, "could simplify (*k).X to k.X");
    assert_eq!(got[0].checker, "underef");
    assert_eq!(got[0].to_string(), "x.go:12:2: underef: could simplify (*k).X to k.X");
}

#[test]
fn double_deref_keeps_one_star() {
    let src = with_types("func f(k **Point) int {\n\treturn (**k).X\n}\n");
    assert_eq!(messages(&[], &src), vec!["could simplify (**k).X to (*k).X"]);
}

#[test]
fn pointer_or_interface_pointee_is_left_alone() {
    let src = with_types(
        "\
func f(pp **Point, s *Shape) {
\t_ = (*pp).X
\t_ = (*s).Area()
}
",
    );
    assert!(messages(&[], &src).is_empty());
}

#[test]
fn value_receiver_methods_are_reported() {
    let src = with_types("func f(k *Point) int {\n\treturn (*k).Sum()\n}\n");
    assert_eq!(messages(&[], &src), vec!["could simplify (*k).Sum to k.Sum"]);
}

#[test]
fn pointer_receiver_methods_follow_skip_recv_copy() {
    let src = with_types("func f(k *Point) {\n\t(*k).Move(1)\n}\n");
    assert!(messages(&[], &src).is_empty());
    assert!(messages(&["underef.skipRecvCopy=true"], &src).is_empty());
    assert_eq!(
        messages(&["underef.skipRecvCopy=false"], &src),
        vec!["could simplify (*k).Move to k.Move"]
    );
}

#[test]
fn indexing_reports_only_array_pointees() {
    let src = with_types(
        "\
func f(a *[3]string, s *[]int, m *map[string]int, r *Row) {
\t_ = (*a)[0]
\t_ = (*s)[0]
\t_ = (*m)[\"k\"]
\t_ = (*r)[1]
}
",
    );
    assert_eq!(messages(&[], &src), vec!["could simplify (*a)[0] to a[0]"]);
}

#[test]
fn nested_array_of_pointers() {
    let src = with_types("func f(a **[2]int) int {\n\treturn (*a)[0] + (**a)[1]\n}\n");
    // `*a` is itself a pointer: only the inner dereference is redundant.
    assert_eq!(messages(&[], &src), vec!["could simplify (**a)[1] to (*a)[1]"]);
}

#[test]
fn only_the_direct_paren_deref_shape_matches() {
    let src = with_types(
        "\
func f(k *Point) {
\t_ = k.X
\t_ = ((*k)).X
\tv := *k
\t_ = v.X
}
",
    );
    assert!(messages(&[], &src).is_empty());
}

#[test]
fn unresolved_types_are_skipped() {
    let src = "\
package p

import \"bytes\"

func f(b *bytes.Buffer, u *unknown) {
\t_ = (*b).Len()
\t_ = (*u).x
}
";
    assert!(messages(&[], src).is_empty());
}

#[test]
fn reports_inside_closures_and_package_vars() {
    let src = with_types(
        "\
var origin = &Point{}
var ox = (*origin).X

func f() func() int {
\treturn func() int { return (*origin).Y }
}
",
    );
    assert_eq!(
        messages(&[], &src),
        vec![
            "could simplify (*origin).X to origin.X",
            "could simplify (*origin).Y to origin.Y",
        ]
    );
}

#[test]
fn checker_can_be_built_directly() {
    let linter = Linter::with_checkers(vec![Box::new(Underef::new(false))]);
    let src = with_types("func f(k *Point) {\n\t(*k).Move(1)\n}\n");
    let got = linter.lint_file("y.go", &src).expect("lint");
    assert_eq!(got.len(), 1);
}

#[test]
fn generic_code_is_linted() {
    let src = "\
package p

type T struct{ f int }

type Box[V any] struct{ v V }

func g[X any](x *X) {}

func h(k *T) { _ = (*k).f }

func (b *Box[V]) Get() V { return (*b).v }

func first[E any](b *Box[E]) E { return (*b).v }
";
    assert_eq!(
        messages(&[], src),
        vec![
            "could simplify (*k).f to k.f",
            "could simplify (*b).v to b.v",
            "could simplify (*b).v to b.v",
        ]
    );
}

#[test]
fn type_parameter_pointee_is_skipped() {
    let src = "\
package p

type Getter interface{ Get() int }

func f[T Getter](p *T) int { return (*p).Get() }

func g[S ~struct{ n int }](p *S) { _ = (*p).n }

func h[A ~[4]int](p *A) int { return (*p)[0] }
";
    assert!(messages(&[], src).is_empty());
}
