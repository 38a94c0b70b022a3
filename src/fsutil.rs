//! Profile argument expansion.

use globset::{Glob, GlobMatcher};

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{DiffError, DiffResult};

/// Expand positional profile arguments in order. Plain paths pass through
/// untouched (a missing file surfaces later as a load error); each glob is
/// replaced by its matches, sorted.
pub fn expand_profile_args(args: &[String]) -> DiffResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    for arg in args {
        if !has_glob_meta(arg) {
            out.push(PathBuf::from(arg));
            continue;
        }
        let matches = find_matching_files(arg)?;
        if matches.is_empty() {
            return Err(DiffError::InvalidArgument(format!(
                "no profile matches {arg:?}"
            )));
        }
        out.extend(matches);
    }
    Ok(out)
}

pub fn find_matching_files(pattern: &str) -> DiffResult<Vec<PathBuf>> {
    let matcher = compile_glob(pattern)?;
    let root = walk_root(pattern);
    let mut out = BTreeSet::new();

    for entry in WalkDir::new(&root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !should_skip_dir(e.path()))
    {
        let entry = entry.map_err(|e| {
            let msg = e.to_string();
            DiffError::Io(
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other(msg)),
            )
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let p = entry.path();
        let rel = p.strip_prefix(".").unwrap_or(p);
        if matcher.is_match(rel) || matcher.is_match(p) {
            out.insert(rel.to_path_buf());
        }
    }
    tracing::debug!("glob {pattern:?} matched {} files", out.len());
    Ok(out.into_iter().collect())
}

/// Deepest literal directory in front of the first glob metacharacter.
fn walk_root(pattern: &str) -> PathBuf {
    let prefix = pattern
        .split(['*', '?', '[', ']', '{', '}'])
        .next()
        .unwrap_or_default();
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        return PathBuf::from(".");
    }
    let p = PathBuf::from(trimmed);
    if prefix.ends_with('/') && p.is_dir() {
        return p;
    }
    match p.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn should_skip_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|name| matches!(name, ".git" | "target" | "node_modules"))
}

fn compile_glob(pattern: &str) -> DiffResult<GlobMatcher> {
    Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|e| DiffError::InvalidArgument(format!("invalid glob {pattern:?}: {e}")))
}

fn has_glob_meta(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', ']', '{', '}'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("stackdiff-fsutil-{name}-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("mkdir");
        dir
    }

    fn arg(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    #[test]
    fn literal_paths_pass_through_in_order() {
        let root = temp_dir("literal");
        let b = root.join("b.json");
        let a = root.join("a.json");
        let paths = expand_profile_args(&[arg(&b), arg(&a)]).expect("expand");
        assert_eq!(paths, vec![b, a]);
    }

    #[test]
    fn glob_expands_sorted() {
        let root = temp_dir("glob");
        for name in ["run-2.json", "run-10.json", "run-1.json", "notes.txt"] {
            std::fs::write(root.join(name), b"{}").expect("write");
        }
        let first = root.join("first.json");
        let pattern = format!("{}/run-*.json", arg(&root));
        let paths = expand_profile_args(&[arg(&first), pattern])
            .expect("expand");
        assert_eq!(
            paths,
            vec![
                first,
                root.join("run-1.json"),
                root.join("run-10.json"),
                root.join("run-2.json"),
            ]
        );
    }

    #[test]
    fn glob_without_match_is_rejected() {
        let root = temp_dir("nomatch");
        let pattern = format!("{}/*.json", arg(&root));
        let err = expand_profile_args(&[pattern]).expect_err("no match");
        assert!(matches!(err, DiffError::InvalidArgument(_)), "error: {err}");
    }

    #[test]
    fn invalid_glob_is_rejected() {
        let err = find_matching_files("runs/[.json").expect_err("bad glob");
        assert!(err.to_string().contains("invalid glob"), "error: {err}");
    }
}
