use go125_parser::ast::ExprId;
use go125_parser::types::TypeKind;
use go125_parser::{check_file, parse_source, ParsedFile, SelectionKind, TypesInfo};
use pretty_assertions::assert_eq;

fn check(src: &str) -> (ParsedFile, TypesInfo) {
    let file = match parse_source(src) {
        Ok(f) => f,
        Err(f) => panic!("parse failed: {:#?}", f.diags),
    };
    let info = check_file(&file);
    (file, info)
}

/// Last expression whose source text is exactly `text`.
fn expr(file: &ParsedFile, text: &str) -> ExprId {
    file.arena
        .exprs
        .ids()
        .filter(|&id| file.expr_text(id) == text)
        .last()
        .unwrap_or_else(|| panic!("no expression `{text}`"))
}

fn type_of(file: &ParsedFile, info: &TypesInfo, text: &str) -> Option<String> {
    info.type_of(expr(file, text)).map(|t| info.type_string(t))
}

#[test]
fn field_through_pointer() {
    let (f, info) = check(
        "package p\ntype T struct{ f int }\nfunc g(k *T) { _ = k.f; _ = (*k).f }\n",
    );
    assert_eq!(type_of(&f, &info, "k").as_deref(), Some("*T"));
    assert_eq!(type_of(&f, &info, "*k").as_deref(), Some("T"));
    assert_eq!(type_of(&f, &info, "(*k).f").as_deref(), Some("int"));

    let sel = info.selection(expr(&f, "k.f")).expect("selection");
    assert_eq!(sel.kind, SelectionKind::Field);
    assert!(sel.indirect);
    assert_eq!(info.type_string(sel.ty), "int");

    let sel = info.selection(expr(&f, "(*k).f")).expect("selection");
    assert!(!sel.indirect);
}

#[test]
fn method_receivers_are_recorded() {
    let (f, info) = check(
        "\
package p
type T struct{}
func (t *T) Ptr() {}
func (t T) Val() int { return 0 }
func g(k *T) { k.Ptr(); _ = k.Val() }
",
    );
    let recv_kind = |text: &str| {
        let sel = info.selection(expr(&f, text)).expect("selection");
        assert_eq!(sel.kind, SelectionKind::Method);
        match info.kind(sel.ty) {
            TypeKind::Signature { recv: Some(r), .. } => info.kind(*r).clone(),
            other => panic!("not a method signature: {other:?}"),
        }
    };
    assert!(matches!(recv_kind("k.Ptr"), TypeKind::Pointer(_)));
    assert!(matches!(recv_kind("k.Val"), TypeKind::Named(_)));
    assert_eq!(type_of(&f, &info, "k.Val()").as_deref(), Some("int"));
}

#[test]
fn embedded_fields_are_promoted() {
    let (f, info) = check(
        "\
package p
type Inner struct{ x string }
type Outer struct{ *Inner; y int }
func g(o Outer) { _ = o.x; _ = o.y }
",
    );
    assert_eq!(type_of(&f, &info, "o.x").as_deref(), Some("string"));
    assert_eq!(type_of(&f, &info, "o.y").as_deref(), Some("int"));
    assert!(info.selection(expr(&f, "o.x")).expect("selection").indirect);
}

#[test]
fn pointer_to_array_indexing() {
    let (f, info) = check("package p\nfunc g(a *[4]int) { _ = a[1]; _ = (*a)[2] }\n");
    assert_eq!(type_of(&f, &info, "a[1]").as_deref(), Some("int"));
    assert_eq!(type_of(&f, &info, "*a").as_deref(), Some("[4]int"));
    assert_eq!(type_of(&f, &info, "(*a)[2]").as_deref(), Some("int"));
}

#[test]
fn named_array_pointee_keeps_its_name() {
    let (f, info) = check("package p\ntype Arr [4]int\nfunc g(p *Arr) { _ = p }\n");
    let t = info.type_of(expr(&f, "p")).expect("typed");
    let TypeKind::Pointer(elem) = *info.kind(t) else {
        panic!("expected a pointer");
    };
    assert!(matches!(info.kind(elem), TypeKind::Named(_)));
    assert!(matches!(
        info.kind(info.underlying(elem)),
        TypeKind::Array { len: Some(4), .. }
    ));
}

#[test]
fn locals_and_short_var_decls() {
    let (f, info) = check(
        "\
package p
const N = 3
var names []string
func g(m map[string]float64) {
\tx := m[\"a\"]
\tv, ok := m[\"b\"]
\tvar arr [N]bool
\t_, _, _, _ = x, v, ok, arr
\t_ = names
}
",
    );
    assert_eq!(type_of(&f, &info, "x").as_deref(), Some("float64"));
    assert_eq!(type_of(&f, &info, "ok").as_deref(), Some("bool"));
    assert_eq!(type_of(&f, &info, "arr").as_deref(), Some("[3]bool"));
    assert_eq!(type_of(&f, &info, "names").as_deref(), Some("[]string"));
}

#[test]
fn interface_methods_resolve() {
    let (f, info) = check(
        "package p\ntype S interface{ String() string }\nfunc g(s S) { _ = s.String() }\n",
    );
    let sel = info.selection(expr(&f, "s.String")).expect("selection");
    assert_eq!(sel.kind, SelectionKind::Method);
    assert_eq!(type_of(&f, &info, "s.String()").as_deref(), Some("string"));
}

#[test]
fn imported_names_stay_unresolved() {
    let (f, info) = check(
        "package p\nimport \"strings\"\nfunc g(b *strings.Builder) { _ = strings.ToUpper; _ = (*b).Len }\n",
    );
    assert_eq!(type_of(&f, &info, "strings.ToUpper"), None);
    assert_eq!(type_of(&f, &info, "(*b).Len"), None);
}

#[test]
fn type_parameters_are_opaque() {
    let (f, info) = check(
        "\
package p

type List[T any] struct {
\tnext *List[T]
\tval  T
}

func (l *List[T]) Val() T { return l.val }

func Map[K comparable, V any](m map[K]V, k K) V { return m[k] }

func use(l *List[int]) {
\t_ = l.Val()
\t_ = Map[string, int](nil, \"a\")
}
",
    );
    assert_eq!(type_of(&f, &info, "l.val").as_deref(), Some("T"));
    assert_eq!(type_of(&f, &info, "l.Val()").as_deref(), Some("T"));
    assert_eq!(type_of(&f, &info, "m[k]").as_deref(), Some("V"));
    assert_eq!(
        type_of(&f, &info, "Map[string, int](nil, \"a\")").as_deref(),
        Some("V")
    );

    let l = expr(&f, "l");
    let ptr = info.type_of(l).expect("l typed");
    let elem = info.arena.pointer_elem(ptr).expect("pointer");
    assert_eq!(info.type_string(elem), "List");
    let TypeKind::Struct { fields } = info.kind(info.underlying(elem)) else {
        panic!("List should be a struct");
    };
    let val = fields.iter().find(|f| f.name == "val").expect("val field");
    assert!(matches!(
        info.kind(info.underlying(val.ty)),
        TypeKind::Interface { .. }
    ));
}
