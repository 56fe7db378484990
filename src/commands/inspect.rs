use crate::*;
use std::path::PathBuf;
use tracing::warn;

pub fn handle_keys(cli: &Cli, paths: &[PathBuf]) -> anyhow::Result<()> {
    let gathered = gather_keys(paths, &SystemOwners, OwnerPolicy::BestEffort);
    let listing = KeyListing {
        keys: gathered.keys,
        failures: gathered.failures,
    };
    print_one(cli.json, listing, |l| {
        let mut lines: Vec<String> = l.keys.iter().map(key_row).collect();
        lines.extend(
            l.failures
                .iter()
                .map(|f| format!("skipped\t{}\t{}", f.path, f.error)),
        );
        lines.push(format!("{} keys found", l.keys.len()));
        lines
    })
}

pub fn handle_config(cli: &Cli, loaded: LoadedConfig) -> anyhow::Result<()> {
    let unknown_ignored_owners: Vec<String> = loaded
        .params
        .ignored_owners
        .iter()
        .filter(|owner| match SystemOwners.resolve_account_id(owner) {
            Ok(_) => false,
            Err(e) => {
                warn!(owner = %owner, error = %e, "ignored owner is not a known account");
                true
            }
        })
        .cloned()
        .collect();

    let report = ConfigReport {
        config_file: loaded.path.map(|p| p.display().to_string()),
        params: loaded.params,
        unknown_ignored_owners,
    };
    print_one(cli.json, report, |r| {
        vec![
            format!(
                "config_file: {}",
                r.config_file.as_deref().unwrap_or("(defaults)")
            ),
            format!("target_globs: {}", r.params.target_globs.join(", ")),
            format!(
                "permitted_key_files: {}",
                r.params.permitted_key_files.join(", ")
            ),
            format!(
                "forbidden_key_files: {}",
                r.params.forbidden_key_files.join(", ")
            ),
            format!("ignored_owners: {}", r.params.ignored_owners.join(", ")),
            format!("lower_uid_bound: {}", r.params.lower_uid_bound),
            format!(
                "unknown_ignored_owners: {}",
                r.unknown_ignored_owners.join(", ")
            ),
        ]
    })
}
