// fuzz_targets/lint.rs
#![no_main]

use go125_lint::Linter;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let Ok(linter) = Linter::new() else {
        return;
    };
    if let Ok(warnings) = linter.lint_file("fuzz.go", &s) {
        for w in &warnings {
            let end = w.span.end as usize;
            assert!(w.span.start <= w.span.end);
            assert!(end <= s.len());
            assert!(w.line >= 1 && w.col >= 1);
        }
    }
});
