use go125_lint::{CheckerParams, LintError, Linter, ParamError, Registry};
use pretty_assertions::assert_eq;

#[test]
fn every_checker_is_documented() {
    let registry = Registry::default_checkers();
    let infos: Vec<_> = registry.infos().collect();
    assert!(!infos.is_empty());
    for info in infos {
        assert!(!info.name.is_empty());
        assert!(!info.tags.is_empty(), "{} has no tags", info.name);
        assert!(!info.summary.is_empty(), "{} has no summary", info.name);
        assert!(!info.before.is_empty(), "{} has no before snippet", info.name);
        assert!(!info.after.is_empty(), "{} has no after snippet", info.name);
        assert_ne!(info.before, info.after);
        for p in info.params {
            assert!(!p.doc.is_empty(), "{}.{} is undocumented", info.name, p.name);
        }
    }
}

#[test]
fn underef_documentation() {
    let info = Registry::default_checkers().get("underef").expect("registered");
    assert_eq!(info.summary, "Detects dereference expressions that can be omitted");
    assert_eq!(info.before, "(*k).field = 5\nv := (*a)[5] // only if a is array");
    assert_eq!(info.after, "k.field = 5\nv := a[5]");
    let p = info.param("skipRecvCopy").expect("param");
    assert_eq!(p.default, "true");
}

#[test]
fn unknown_parameters_are_rejected() {
    let registry = Registry::default_checkers();
    for (entry, checker, param) in [
        ("underef.noSuchParam=1", "underef", "noSuchParam"),
        ("nosuch.skipRecvCopy=true", "nosuch", "skipRecvCopy"),
    ] {
        let params = CheckerParams::parse([entry]).expect("parse");
        let err = registry.new_checkers(&params, |_| true).err().expect("error");
        assert_eq!(
            err,
            ParamError::Unknown {
                checker: checker.to_string(),
                param: param.to_string(),
            }
        );
    }
}

#[test]
fn badly_typed_parameters_fail_at_construction() {
    let params = CheckerParams::parse(["underef.skipRecvCopy=yes"]).expect("parse");
    let err = Registry::default_checkers()
        .new_checkers(&params, |_| true)
        .err()
        .expect("error");
    assert!(matches!(err, ParamError::Type { found: "string", .. }));

    let err = LintError::from(err);
    assert_eq!(
        err.to_string(),
        "parameter `underef.skipRecvCopy` expects a bool value, got string `yes`"
    );
}

#[test]
fn disabled_checkers_are_not_built() {
    let registry = Registry::default_checkers();
    let none = registry
        .new_checkers(&CheckerParams::new(), |info| info.name != "underef")
        .expect("checkers");
    assert!(none.is_empty());

    let linter = Linter::with_checkers(none);
    let src = "package p\ntype T struct{ f int }\nfunc g(k *T) { (*k).f = 1 }\n";
    assert!(linter.lint_file("a.go", src).expect("lint").is_empty());
}

#[test]
fn default_linter_runs_underef() {
    let linter = Linter::new().expect("linter");
    assert_eq!(
        linter.checkers().map(|c| c.info().name).collect::<Vec<_>>(),
        vec!["underef"]
    );
}
