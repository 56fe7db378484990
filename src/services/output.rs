use crate::domain::models::{JsonOut, OwnedKey, ScanReport};
use serde::Serialize;

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> Vec<String>,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for line in row(&data) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn place(k: &OwnedKey) -> String {
    format!("{}:{}", k.source_file, k.source_line)
}

pub fn key_row(k: &OwnedKey) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        k.owner,
        place(k),
        k.key.algorithm(),
        k.key.fingerprint(),
        k.comment
    )
}

pub fn report_lines(report: &ScanReport) -> Vec<String> {
    let mut lines = Vec::new();
    for p in report.problems.iter() {
        lines.push(format!(
            "{}\t{}\t{}\t{}",
            p.problem_type.text(),
            p.problem_key.owner,
            place(&p.problem_key),
            p.problem_key.key.fingerprint()
        ));
        for r in &p.related_keys {
            lines.push(format!("  related\t{}\t{}", r.owner, place(r)));
        }
    }
    for f in &report.failures {
        lines.push(format!("skipped\t{}\t{}", f.path, f.error));
    }
    if report.any_problems {
        lines.push(format!("problems: {}", report.problems.len()));
    } else {
        lines.push("no problems found".to_string());
    }
    lines
}
