use crate::authorized_keys::{collect_keys, KeyParseError};
use crate::domain::constants::{
    DEFAULT_FORBIDDEN_KEY_FILES, DEFAULT_PERMITTED_KEY_FILES, UNKNOWN_OWNER,
};
use crate::domain::models::{FailureItem, OwnedKey, ScanContext, ScanParams};
use crate::services::owners::{OwnerError, OwnerResolver};
use crate::services::paths::expand_globs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(thiserror::Error, Debug)]
pub enum GatherError {
    #[error(transparent)]
    Owner(#[from] OwnerError),
    #[error("cannot read {path}: {source}")]
    FileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: KeyParseError,
    },
}

/// How a failed owner lookup affects a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerPolicy {
    /// The file is skipped: scanned keys need an owner.
    Required,
    /// Keys are kept with an unknown owner. Used for the permitted and
    /// forbidden lists, where ownership is provenance only.
    BestEffort,
}

#[derive(Debug, Default)]
pub struct Gathered {
    pub keys: Vec<OwnedKey>,
    pub failures: Vec<FailureItem>,
}

/// Reads every key of one file, tagged with owner, path, line and comment.
pub fn owned_keys_from_file(
    path: &Path,
    resolver: &dyn OwnerResolver,
    owners: OwnerPolicy,
) -> Result<Vec<OwnedKey>, GatherError> {
    let shown = path.display().to_string();
    let (owner, owner_id) = match resolver.resolve_file_owner(path) {
        Ok((name, uid)) => (name, Some(uid)),
        Err(e) if owners == OwnerPolicy::BestEffort => {
            debug!(file = %shown, error = %e, "owner unknown");
            (UNKNOWN_OWNER.to_string(), None)
        }
        Err(e) => return Err(e.into()),
    };

    let bytes = std::fs::read(path).map_err(|source| GatherError::FileUnreadable {
        path: shown.clone(),
        source,
    })?;
    let parsed = collect_keys(&bytes).map_err(|source| GatherError::Malformed {
        path: shown.clone(),
        source,
    })?;

    Ok(parsed
        .into_iter()
        .map(|p| OwnedKey {
            owner: owner.clone(),
            owner_id,
            source_file: shown.clone(),
            source_line: p.line,
            comment: p.comment,
            key: p.key,
        })
        .collect())
}

/// Gathers keys from every path. One bad file is reported and skipped; it
/// never stops the remaining files from being read.
pub fn gather_keys(
    paths: &[PathBuf],
    resolver: &dyn OwnerResolver,
    owners: OwnerPolicy,
) -> Gathered {
    let mut out = Gathered::default();
    for path in paths {
        debug!(file = %path.display(), "getting keys from file");
        match owned_keys_from_file(path, resolver, owners) {
            Ok(keys) => {
                debug!(file = %path.display(), new_keys = keys.len(), "file gathered");
                out.keys.extend(keys);
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping file");
                out.failures.push(FailureItem {
                    path: path.display().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }
    out
}

impl ScanContext {
    pub fn new(params: ScanParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn gather_found_from_globs(&mut self, resolver: &dyn OwnerResolver) -> usize {
        let expansion = expand_globs(&self.params.target_globs);
        self.failures.extend(expansion.failures);
        self.gather_found_from_files(&expansion.paths, resolver)
    }

    pub fn gather_found_from_files(
        &mut self,
        paths: &[PathBuf],
        resolver: &dyn OwnerResolver,
    ) -> usize {
        let gathered = gather_keys(paths, resolver, OwnerPolicy::Required);
        self.failures.extend(gathered.failures);
        let n = gathered.keys.len();
        self.found_keys.extend(gathered.keys);
        n
    }

    pub fn gather_permitted_from_files(
        &mut self,
        paths: &[PathBuf],
        resolver: &dyn OwnerResolver,
    ) -> usize {
        let gathered = gather_keys(
            &without_missing_defaults(paths, DEFAULT_PERMITTED_KEY_FILES),
            resolver,
            OwnerPolicy::BestEffort,
        );
        self.failures.extend(gathered.failures);
        let n = gathered.keys.len();
        self.permitted_keys.extend(gathered.keys);
        n
    }

    pub fn gather_forbidden_from_files(
        &mut self,
        paths: &[PathBuf],
        resolver: &dyn OwnerResolver,
    ) -> usize {
        let gathered = gather_keys(
            &without_missing_defaults(paths, DEFAULT_FORBIDDEN_KEY_FILES),
            resolver,
            OwnerPolicy::BestEffort,
        );
        self.failures.extend(gathered.failures);
        let n = gathered.keys.len();
        self.forbidden_keys.extend(gathered.keys);
        n
    }

    /// Gathers all three pools from the configured sources, then classifies.
    pub fn run(&mut self, resolver: &dyn OwnerResolver) -> bool {
        let permitted = to_paths(&self.params.permitted_key_files);
        let forbidden = to_paths(&self.params.forbidden_key_files);

        let found = self.gather_found_from_globs(resolver);
        let permitted = self.gather_permitted_from_files(&permitted, resolver);
        let forbidden = self.gather_forbidden_from_files(&forbidden, resolver);
        info!(found, permitted, forbidden, "key gathering complete");

        self.scan_for_problems()
    }
}

fn to_paths(files: &[String]) -> Vec<PathBuf> {
    files.iter().map(PathBuf::from).collect()
}

/// A built-in default list that is not installed is an empty pool. Any other
/// list is handed to the reader, so a missing one is reported as a failure.
fn without_missing_defaults(paths: &[PathBuf], defaults: &[&str]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|p| {
            let absent_default =
                !p.exists() && defaults.iter().any(|d| Path::new(d) == p.as_path());
            if absent_default {
                info!(file = %p.display(), "default key list not present, treating as empty");
            }
            !absent_default
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        gather_keys, owned_keys_from_file, without_missing_defaults, GatherError, OwnerPolicy,
    };
    use crate::authorized_keys::tests::{KEY_A, KEY_B};
    use crate::domain::constants::{
    DEFAULT_FORBIDDEN_KEY_FILES, DEFAULT_PERMITTED_KEY_FILES, UNKNOWN_OWNER,
};
    use crate::domain::models::{ScanContext, ScanParams};
    use crate::services::owners::{OwnerError, OwnerResolver};
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Owner is the name of the file's parent directory's parent, uid 1000.
    struct HomeDirOwners;

    impl OwnerResolver for HomeDirOwners {
        fn resolve_file_owner(&self, path: &Path) -> Result<(String, u32), OwnerError> {
            let name = path
                .ancestors()
                .nth(2)
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            Ok((name, 1000))
        }

        fn resolve_account_id(&self, _name: &str) -> Result<u32, OwnerError> {
            Ok(1000)
        }
    }

    struct NoOwners;

    impl OwnerResolver for NoOwners {
        fn resolve_file_owner(&self, path: &Path) -> Result<(String, u32), OwnerError> {
            Err(OwnerError::OwnerLookupFailed {
                path: path.display().to_string(),
                reason: "no ownership metadata".to_string(),
            })
        }

        fn resolve_account_id(&self, name: &str) -> Result<u32, OwnerError> {
            Err(OwnerError::AccountNotFound(name.to_string()))
        }
    }

    fn write_keys(root: &Path, user: &str, body: &str) -> PathBuf {
        let ssh = root.join(user).join(".ssh");
        fs::create_dir_all(&ssh).unwrap();
        let path = ssh.join("authorized_keys");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn keys_carry_owner_path_line_and_comment() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_keys(tmp.path(), "alice", &format!("# keys\n{KEY_A} alice@host\n"));
        let keys = owned_keys_from_file(&path, &HomeDirOwners, OwnerPolicy::Required).unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].owner, "alice");
        assert_eq!(keys[0].owner_id, Some(1000));
        assert_eq!(keys[0].source_line, 2);
        assert_eq!(keys[0].comment, "alice@host");
        assert_eq!(keys[0].source_file, path.display().to_string());
    }

    #[test]
    fn bad_file_does_not_stop_gathering() {
        let tmp = tempfile::tempdir().unwrap();
        let bad = write_keys(tmp.path(), "mallory", "garbage line\n");
        let missing = tmp.path().join("nobody/.ssh/authorized_keys");
        let good = write_keys(tmp.path(), "bob", &format!("{KEY_B}\n"));
        let out = gather_keys(&[bad, missing, good], &HomeDirOwners, OwnerPolicy::Required);
        assert_eq!(out.keys.len(), 1);
        assert_eq!(out.keys[0].owner, "bob");
        assert_eq!(out.failures.len(), 2);
    }

    #[test]
    fn owner_policy_decides_unresolved_owners() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_keys(tmp.path(), "x", &format!("{KEY_A}\n"));
        let err = owned_keys_from_file(&path, &NoOwners, OwnerPolicy::Required).unwrap_err();
        assert!(matches!(err, GatherError::Owner(_)));

        let keys = owned_keys_from_file(&path, &NoOwners, OwnerPolicy::BestEffort).unwrap();
        assert_eq!(keys[0].owner, UNKNOWN_OWNER);
        assert_eq!(keys[0].owner_id, None);
    }

    #[test]
    fn missing_default_list_is_an_empty_pool() {
        let tmp = tempfile::tempdir().unwrap();
        let default = tmp.path().join("forbidden_keys");
        let default_str = default.display().to_string();
        let present = tmp.path().join("permitted_keys");
        fs::write(&present, "").unwrap();

        let kept = without_missing_defaults(&[default, present.clone()], &[default_str.as_str()]);
        assert_eq!(kept, vec![present]);
    }

    #[test]
    fn missing_explicit_list_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let mistyped = tmp.path().join("forbiden_keys");
        let mut ctx = ScanContext::new(ScanParams::default());
        let n = ctx.gather_forbidden_from_files(&[mistyped.clone()], &NoOwners);
        assert_eq!(n, 0);
        assert_eq!(ctx.failures.len(), 1);
        assert_eq!(ctx.failures[0].path, mistyped.display().to_string());
        assert!(ctx.failures[0].error.starts_with("cannot read"));
    }

    #[test]
    fn run_gathers_pools_into_their_own_buckets() {
        let tmp = tempfile::tempdir().unwrap();
        write_keys(tmp.path(), "alice", &format!("{KEY_A}\n"));
        write_keys(tmp.path(), "bob", &format!("{KEY_A}\n"));
        let permitted = tmp.path().join("permitted_keys");
        fs::write(&permitted, format!("{KEY_B}\n")).unwrap();
        let forbidden = tmp.path().join("forbidden_keys");
        fs::write(&forbidden, format!("{KEY_A}\n")).unwrap();

        let params = ScanParams {
            target_globs: vec![format!("{}/*/.ssh/authorized_keys", tmp.path().display())],
            permitted_key_files: vec![permitted.display().to_string()],
            forbidden_key_files: vec![forbidden.display().to_string()],
            ignored_owners: vec![],
            lower_uid_bound: 0,
        };
        let mut ctx = ScanContext::new(params);
        assert!(ctx.run(&HomeDirOwners));
        assert_eq!(ctx.found_keys.len(), 2);
        assert_eq!(ctx.permitted_keys.len(), 1);
        assert_eq!(ctx.forbidden_keys.len(), 1);
        assert_eq!(ctx.problems.forbidden_keys.len(), 2);
        assert!(ctx.problems.duplicate_keys.is_empty());
    }
}
