//! `code-obituary mourn-staged` command, run by the pre-commit hook.

use std::path::Path;

use super::block_on;
use crate::context::ServiceContext;
use crate::mourn::mourn_staged;

/// Execute the `mourn-staged` command.
///
/// Every staged deletion is attempted; failures are collected and reported
/// together once the rest have been written.
///
/// # Errors
///
/// Returns an error string if staged deletions cannot be listed or any
/// file could not be mourned.
pub fn run(ctx: &ServiceContext, repo_root: &Path) -> Result<(), String> {
    let report = block_on(mourn_staged(ctx, repo_root))?.map_err(|e| e.to_string())?;

    if report.mourned.is_empty() && report.failures.is_empty() {
        println!("No staged deletions to mourn.");
        return Ok(());
    }
    for mourned in &report.mourned {
        println!("Mourned {}", mourned.record.path);
    }

    if report.failures.is_empty() {
        return Ok(());
    }
    let details: Vec<String> =
        report.failures.iter().map(|(path, err)| format!("  {path}: {err}")).collect();
    Err(format!("failed to mourn {} file(s):\n{}", report.failures.len(), details.join("\n")))
}
