//! Problem classification over the gathered key pools.
//!
//! Each found key is decided in a fixed order, first match wins:
//! 1. permitted list match -> no problem
//! 2. ignored owner or uid below the floor -> no problem
//! 3. forbidden list match -> forbidden, with every matching list entry
//! 4. same key held elsewhere -> duplicate, with the other holders and the
//!    subject last
//!
//! Classification reads the context only; it does no I/O and logs nothing.

use crate::domain::models::{OwnedKey, Problem, ProblemSet, ProblemType, ScanContext};

#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub any_problems: bool,
    pub problems: ProblemSet,
}

pub fn classify(ctx: &ScanContext) -> ScanOutcome {
    let mut problems = ProblemSet::default();
    let mut any_problems = false;
    for key in &ctx.found_keys {
        any_problems |= problems.record(classify_key(ctx, key));
    }
    ScanOutcome {
        any_problems,
        problems,
    }
}

pub fn classify_key(ctx: &ScanContext, subject: &OwnedKey) -> Problem {
    if is_key_permitted(ctx, subject) || is_owner_exempt(ctx, subject) {
        return problem(ProblemType::NoProblem, subject, Vec::new());
    }

    let forbidding = find_keys_forbidding(ctx, subject);
    if !forbidding.is_empty() {
        return problem(ProblemType::KeyForbidden, subject, forbidding);
    }

    let mut dups = duplicates_of(ctx, subject);
    if !dups.is_empty() {
        dups.push(subject.clone());
        return problem(ProblemType::DuplicateKey, subject, dups);
    }

    problem(ProblemType::NoProblem, subject, Vec::new())
}

pub fn is_key_permitted(ctx: &ScanContext, k: &OwnedKey) -> bool {
    ctx.permitted_keys.iter().any(|p| p.same_key_as(k))
}

fn is_owner_exempt(ctx: &ScanContext, k: &OwnedKey) -> bool {
    ctx.params.should_ignore_owner(&k.owner, k.owner_id)
}

/// Forbidden-list entries that match `k`, in list order.
pub fn find_keys_forbidding(ctx: &ScanContext, k: &OwnedKey) -> Vec<OwnedKey> {
    ctx.forbidden_keys
        .iter()
        .filter(|f| f.same_key_as(k))
        .cloned()
        .collect()
}

/// Other found entries holding the same key. Re-listings of the very same
/// record and entries of exempt owners are not counted.
pub fn duplicates_of(ctx: &ScanContext, k: &OwnedKey) -> Vec<OwnedKey> {
    ctx.found_keys
        .iter()
        .filter(|o| o.same_key_as(k) && !o.same_record_as(k) && !is_owner_exempt(ctx, o))
        .cloned()
        .collect()
}

fn problem(problem_type: ProblemType, subject: &OwnedKey, related_keys: Vec<OwnedKey>) -> Problem {
    Problem {
        problem_type,
        problem_key: subject.clone(),
        related_keys,
    }
}

impl ScanContext {
    /// Classifies the found pool, replacing any earlier result.
    pub fn scan_for_problems(&mut self) -> bool {
        let outcome = classify(self);
        self.problems = outcome.problems;
        outcome.any_problems
    }
}
