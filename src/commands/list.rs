//! `code-obituary list` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::graveyard::{render_table, Graveyard};

/// Execute the `list` command: one row per obituary.
///
/// # Errors
///
/// Returns an error string if the log cannot be read or parsed.
pub fn run(ctx: &ServiceContext, repo_root: &Path) -> Result<(), String> {
    let records = Graveyard::new(ctx.fs.as_ref(), repo_root).read_all().map_err(|e| e.to_string())?;
    print!("{}", render_table(&records));
    Ok(())
}
