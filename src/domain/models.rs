use crate::authorized_keys::Key;
use crate::domain::constants::{
    DEFAULT_FORBIDDEN_KEY_FILES, DEFAULT_LOWER_UID_BOUND, DEFAULT_PERMITTED_KEY_FILES,
    DEFAULT_TARGET_GLOBS,
};
use serde::{Deserialize, Serialize};

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanParams {
    /// Files to parse and scan keys from (glob patterns).
    pub target_globs: Vec<String>,
    /// Keys that are explicitly allowed to be held by multiple users.
    pub permitted_key_files: Vec<String>,
    /// Keys that cannot be used by any user.
    pub forbidden_key_files: Vec<String>,
    /// Users whose keys are ignored in scans.
    pub ignored_owners: Vec<String>,
    /// Accounts with a uid below this are exempt (strict less-than).
    pub lower_uid_bound: u32,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            target_globs: owned(DEFAULT_TARGET_GLOBS),
            permitted_key_files: owned(DEFAULT_PERMITTED_KEY_FILES),
            forbidden_key_files: owned(DEFAULT_FORBIDDEN_KEY_FILES),
            ignored_owners: Vec::new(),
            lower_uid_bound: DEFAULT_LOWER_UID_BOUND,
        }
    }
}

impl ScanParams {
    /// An unresolved uid never exempts an owner.
    pub fn should_ignore_owner(&self, owner: &str, owner_id: Option<u32>) -> bool {
        if self.ignored_owners.iter().any(|o| o == owner) {
            return true;
        }
        matches!(owner_id, Some(uid) if uid < self.lower_uid_bound)
    }
}

/// A public key with the provenance it was gathered from.
#[derive(Debug, Clone, Serialize)]
pub struct OwnedKey {
    pub owner: String,
    pub owner_id: Option<u32>,
    pub source_file: String,
    pub source_line: usize,
    pub comment: String,
    #[serde(flatten)]
    pub key: Key,
}

impl OwnedKey {
    pub fn same_key_as(&self, other: &OwnedKey) -> bool {
        self.key.same_key_as(&other.key)
    }

    /// Same key listed by the same owner at the same place.
    pub fn same_record_as(&self, other: &OwnedKey) -> bool {
        self.same_key_as(other)
            && self.owner == other.owner
            && self.source_file == other.source_file
            && self.source_line == other.source_line
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    NoProblem,
    #[serde(rename = "forbidden_key")]
    KeyForbidden,
    DuplicateKey,
}

impl ProblemType {
    pub fn text(&self) -> &'static str {
        match self {
            ProblemType::NoProblem => "No Problem",
            ProblemType::KeyForbidden => "Forbidden Key",
            ProblemType::DuplicateKey => "Duplicate Key",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    pub problem_type: ProblemType,
    pub problem_key: OwnedKey,
    pub related_keys: Vec<OwnedKey>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProblemSet {
    pub forbidden_keys: Vec<Problem>,
    pub duplicate_keys: Vec<Problem>,
}

impl ProblemSet {
    /// Files a problem into its bucket; `NoProblem` is dropped.
    pub fn record(&mut self, problem: Problem) -> bool {
        match problem.problem_type {
            ProblemType::NoProblem => return false,
            ProblemType::KeyForbidden => self.forbidden_keys.push(problem),
            ProblemType::DuplicateKey => self.duplicate_keys.push(problem),
        }
        true
    }

    pub fn len(&self) -> usize {
        self.forbidden_keys.len() + self.duplicate_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forbidden problems first, then duplicates, each in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.forbidden_keys.iter().chain(self.duplicate_keys.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureItem {
    pub path: String,
    pub error: String,
}

/// A single scan's working set: the three key pools and what was found in them.
#[derive(Debug, Default)]
pub struct ScanContext {
    pub params: ScanParams,
    pub found_keys: Vec<OwnedKey>,
    pub permitted_keys: Vec<OwnedKey>,
    pub forbidden_keys: Vec<OwnedKey>,
    pub problems: ProblemSet,
    pub failures: Vec<FailureItem>,
}

#[derive(Serialize)]
pub struct ScanReport {
    pub any_problems: bool,
    #[serde(flatten)]
    pub problems: ProblemSet,
    pub failures: Vec<FailureItem>,
}

#[derive(Serialize)]
pub struct ConfigReport {
    pub config_file: Option<String>,
    #[serde(flatten)]
    pub params: ScanParams,
    pub unknown_ignored_owners: Vec<String>,
}

#[derive(Serialize)]
pub struct KeyListing {
    pub keys: Vec<OwnedKey>,
    pub failures: Vec<FailureItem>,
}
