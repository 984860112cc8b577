//! `code-obituary mourn` command.

use std::path::Path;

use super::block_on;
use crate::context::ServiceContext;
use crate::graveyard::GRAVEYARD_FILE;
use crate::mourn::{mourn, MournRequest};
use crate::obituary::ComposeMode;

/// Execute the `mourn` command.
///
/// Prints the appended block followed by the log location.
///
/// # Errors
///
/// Returns an error string if the file cannot be recovered or the log
/// cannot be written.
pub fn run(
    ctx: &ServiceContext,
    repo_root: &Path,
    path: &Path,
    reason: Option<&str>,
    from_git: bool,
) -> Result<(), String> {
    let request = MournRequest { path: path.to_path_buf(), reason: reason.map(String::from), from_git };
    let mourned = block_on(mourn(ctx, repo_root, &request))?.map_err(|e| e.to_string())?;

    print!("{}", mourned.entry);
    if let ComposeMode::Fallback { reason } = &mourned.mode {
        eprintln!("note: used the template obituary ({reason})");
    }
    println!("Appended to {}", repo_root.join(GRAVEYARD_FILE).display());
    Ok(())
}
