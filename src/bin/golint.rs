// src/bin/golint.rs
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use go125_lint::{CheckerParams, LintError, Linter, Registry, Warning};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

const USAGE: &str = "\
usage: golint [-p checker.param=value]... [--disable name]... <file.go|dir>...
       golint --list";

// ----------------- arg parsing -----------------

#[derive(Default)]
struct Args {
    params: Vec<String>,
    disabled: Vec<String>,
    paths: Vec<PathBuf>,
    list: bool,
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    let mut args = Args::default();
    let mut it = raw.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "-p" | "--param" => {
                let v = it.next().ok_or_else(|| format!("{a} needs a value"))?;
                args.params.push(v.clone());
            }
            "--disable" => {
                let v = it.next().ok_or_else(|| format!("{a} needs a value"))?;
                args.disabled.push(v.clone());
            }
            "--list" => args.list = true,
            "-h" | "--help" => return Err(String::new()),
            flag if flag.starts_with('-') => return Err(format!("unknown flag {flag}")),
            path => args.paths.push(PathBuf::from(path)),
        }
    }
    if args.paths.is_empty() && !args.list {
        return Err("no input files".into());
    }
    Ok(args)
}

// ----------------- file discovery -----------------

/// `.go` files under `root`, or `root` itself when it is not a directory.
/// Walk errors are returned in place so the caller can report them.
fn go_files(root: &Path) -> Vec<Result<PathBuf, LintError>> {
    if !root.is_dir() {
        return vec![Ok(root.to_path_buf())];
    }
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) if e.file_type().is_file() && e.path().extension().is_some_and(|x| x == "go") => {
                Some(Ok(e.into_path()))
            }
            Ok(_) => None,
            Err(err) => Some(Err(walk_error(root, err))),
        })
        .collect()
}

fn walk_error(root: &Path, err: walkdir::Error) -> LintError {
    let path = err.path().unwrap_or(root).to_path_buf();
    LintError::Io {
        path,
        source: err.into(),
    }
}

fn lint_path(linter: &Linter, path: &Path) -> Result<Vec<Warning>, LintError> {
    let src = std::fs::read_to_string(path).map_err(|source| LintError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    linter.lint_file(&path.display().to_string(), &src)
}

fn list(registry: &Registry) {
    for info in registry.infos() {
        println!("{} [{}]: {}", info.name, info.tags.join(", "), info.summary);
        for p in info.params {
            println!("  {}.{} (default {}): {}", info.name, p.name, p.default, p.doc);
        }
    }
}

fn main() -> ExitCode {
    // Logging stays off unless RUST_LOG is set.
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }

    let raw: Vec<String> = std::env::args().collect();
    let args = match parse_args(&raw) {
        Ok(a) => a,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("golint: {msg}");
            }
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    let registry = Registry::default_checkers();
    if args.list {
        list(&registry);
        return ExitCode::SUCCESS;
    }

    if let Some(name) = args.disabled.iter().find(|n| registry.get(n).is_none()) {
        eprintln!("golint: unknown checker `{name}`");
        return ExitCode::from(2);
    }

    let checkers = CheckerParams::parse(&args.params)
        .and_then(|params| {
            registry.new_checkers(&params, |info| !args.disabled.iter().any(|d| d == info.name))
        });
    let linter = match checkers {
        Ok(c) => Linter::with_checkers(c),
        Err(e) => {
            eprintln!("golint: {e}");
            return ExitCode::from(2);
        }
    };

    let mut warned = false;
    let mut failed = false;
    for path in args.paths.iter().flat_map(|p| go_files(p)) {
        match path.and_then(|path| lint_path(&linter, &path)) {
            Ok(warnings) => {
                for w in &warnings {
                    println!("{w}");
                }
                warned |= !warnings.is_empty();
            }
            Err(e) => {
                eprintln!("golint: {e}");
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::from(2)
    } else if warned {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_errors_become_io_errors() {
        let dir = std::env::temp_dir().join(format!("golint-walk-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("pkg")).expect("mkdir");
        std::fs::write(dir.join("pkg/a.go"), "package pkg\n").expect("write");
        std::fs::write(dir.join("notes.txt"), "").expect("write");

        let missing = dir.join("gone");
        let err = WalkDir::new(&missing)
            .into_iter()
            .find_map(Result::err)
            .expect("walk error");
        match walk_error(&dir, err) {
            LintError::Io { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }

        let found: Vec<PathBuf> = go_files(&dir)
            .into_iter()
            .collect::<Result<_, _>>()
            .expect("walk");
        assert_eq!(found, vec![dir.join("pkg/a.go")]);

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn plain_paths_are_passed_through() {
        let got = go_files(Path::new("does/not/exist.go"));
        assert!(matches!(got.as_slice(), [Ok(p)] if p == Path::new("does/not/exist.go")));
    }
}
