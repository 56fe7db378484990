use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum OwnerError {
    #[error("cannot determine owner of {path}: {reason}")]
    OwnerLookupFailed { path: String, reason: String },
    #[error("account not found: {0}")]
    AccountNotFound(String),
}

/// Identity lookups consumed by the gatherer and the config report.
pub trait OwnerResolver {
    /// Owning account name and uid of a file.
    fn resolve_file_owner(&self, path: &Path) -> Result<(String, u32), OwnerError>;

    fn resolve_account_id(&self, name: &str) -> Result<u32, OwnerError>;
}

/// Resolver backed by file metadata and the system passwd database.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOwners;

#[cfg(unix)]
impl OwnerResolver for SystemOwners {
    fn resolve_file_owner(&self, path: &Path) -> Result<(String, u32), OwnerError> {
        use std::os::unix::fs::MetadataExt;

        let lookup_failed = |reason: String| OwnerError::OwnerLookupFailed {
            path: path.display().to_string(),
            reason,
        };
        let uid = std::fs::metadata(path)
            .map_err(|e| lookup_failed(e.to_string()))?
            .uid();
        match nix::unistd::User::from_uid(nix::unistd::Uid::from_raw(uid)) {
            Ok(Some(user)) => Ok((user.name, uid)),
            Ok(None) => Err(lookup_failed(format!("uid {uid} has no account"))),
            Err(e) => Err(lookup_failed(e.to_string())),
        }
    }

    fn resolve_account_id(&self, name: &str) -> Result<u32, OwnerError> {
        nix::unistd::User::from_name(name)
            .ok()
            .flatten()
            .map(|u| u.uid.as_raw())
            .ok_or_else(|| OwnerError::AccountNotFound(name.to_string()))
    }
}

#[cfg(not(unix))]
impl OwnerResolver for SystemOwners {
    fn resolve_file_owner(&self, path: &Path) -> Result<(String, u32), OwnerError> {
        Err(OwnerError::OwnerLookupFailed {
            path: path.display().to_string(),
            reason: "this platform does not expose file ownership".to_string(),
        })
    }

    fn resolve_account_id(&self, name: &str) -> Result<u32, OwnerError> {
        Err(OwnerError::AccountNotFound(name.to_string()))
    }
}
