use crate::domain::models::FailureItem;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(thiserror::Error, Debug)]
pub enum PathError {
    #[error("invalid glob pattern {pattern}: {reason}")]
    GlobSyntax { pattern: String, reason: String },
}

#[derive(Debug, Default)]
pub struct PathExpansion {
    pub paths: Vec<PathBuf>,
    pub failures: Vec<FailureItem>,
}

/// Expands glob patterns into absolute, lexically cleaned paths.
///
/// A bad pattern is reported and skipped. Unreadable directories are
/// indistinguishable from no matches, so zero matches is never an error.
pub fn expand_globs(patterns: &[String]) -> PathExpansion {
    info!(num_globs = patterns.len(), "expanding globs");
    let mut out = PathExpansion::default();
    for pattern in patterns {
        match expand_glob(pattern) {
            Ok(paths) => {
                debug!(glob = %pattern, matches = paths.len(), "expanded");
                out.paths.extend(paths);
            }
            Err(e) => {
                warn!(glob = %pattern, error = %e, "skipping glob");
                out.failures.push(FailureItem {
                    path: pattern.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    info!(num_matches = out.paths.len(), "expansion complete");
    out
}

pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>, PathError> {
    let matches = glob::glob(pattern).map_err(|e| PathError::GlobSyntax {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    Ok(matches
        .filter_map(|m| match m {
            Ok(p) => Some(absolute_clean(&p)),
            Err(e) => {
                debug!(glob = %pattern, error = %e, "unreadable path during expansion");
                None
            }
        })
        .collect())
}

pub fn absolute_clean(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    clean(&joined)
}

fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in path.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
