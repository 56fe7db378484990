use crate::*;
use tracing::info;

/// Runs a scan and prints the report. Returns whether any problem was found.
pub fn handle_scan(cli: &Cli, mut params: ScanParams, args: &ScanArgs) -> anyhow::Result<bool> {
    apply_overrides(&mut params, args);

    let mut ctx = ScanContext::new(params);
    let any_problems = ctx.run(&SystemOwners);
    info!(
        forbidden_keys = ctx.problems.forbidden_keys.len(),
        duplicate_keys = ctx.problems.duplicate_keys.len(),
        skipped = ctx.failures.len(),
        "problem scan complete"
    );

    let report = ScanReport {
        any_problems,
        problems: ctx.problems,
        failures: ctx.failures,
    };
    print_one(cli.json, report, report_lines)?;
    Ok(any_problems)
}

/// Command-line values replace the corresponding config lists when given.
pub fn apply_overrides(params: &mut ScanParams, args: &ScanArgs) {
    if !args.targets.is_empty() {
        params.target_globs = args.targets.clone();
    }
    if !args.permitted.is_empty() {
        params.permitted_key_files = args.permitted.clone();
    }
    if !args.forbidden.is_empty() {
        params.forbidden_key_files = args.forbidden.clone();
    }
    if !args.ignored_owners.is_empty() {
        params.ignored_owners = args.ignored_owners.clone();
    }
    if let Some(bound) = args.lower_uid_bound {
        params.lower_uid_bound = bound;
    }
}
