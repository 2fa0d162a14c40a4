//! CLI entry point for the repo-local architecture lint.
//!
//! With no arguments the lint checks `backend/` under the workspace root. A
//! single argument names another crate directory instead.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use thiserror::Error;

const DEFAULT_CRATE_DIR: &str = "backend";

fn main() -> ExitCode {
    let crate_dir = match std::env::args_os().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => match repo_root() {
            Ok(root) => root.join(DEFAULT_CRATE_DIR),
            Err(err) => return report(&err),
        },
    };
    match architecture_lint::lint_crate_sources(&crate_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn report(err: &dyn fmt::Display) -> ExitCode {
    let _ = writeln!(io::stderr().lock(), "{err}");
    ExitCode::FAILURE
}

#[derive(Debug, Clone, Copy, Error)]
#[error("no Cargo.toml declaring [workspace] found above the current directory")]
struct RepoRootError;

fn repo_root() -> Result<PathBuf, RepoRootError> {
    let candidates = [
        std::env::var_os("CARGO_WORKSPACE_DIR").map(PathBuf::from),
        std::env::current_dir().ok(),
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ];
    candidates
        .iter()
        .flatten()
        .find_map(|start| find_workspace_root(start))
        .ok_or(RepoRootError)
}

fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| declares_workspace(&dir.join("Cargo.toml")))
        .map(Path::to_path_buf)
}

fn declares_workspace(manifest: &Path) -> bool {
    fs::read_to_string(manifest).is_ok_and(|contents| contents.contains("[workspace]"))
}
