//! `code-obituary install` command.

use crate::context::ServiceContext;
use crate::error::ObituaryError;
use crate::hook::{install_hook, HookAction};

/// Execute the `install` command.
///
/// # Errors
///
/// Returns an error string if the hooks directory cannot be located or the
/// hook cannot be written.
pub fn run(ctx: &ServiceContext) -> Result<(), String> {
    let hooks_dir = ctx
        .git
        .hooks_dir()
        .map_err(|e| ObituaryError::HookInstall(e.to_string()).to_string())?;
    let installed = install_hook(&hooks_dir).map_err(|e| e.to_string())?;

    match installed.action {
        HookAction::Created => println!("Installed pre-commit hook at {}", installed.path.display()),
        HookAction::Appended => {
            println!("Added code-obituary to existing pre-commit hook at {}", installed.path.display());
        }
        HookAction::AlreadyInstalled => {
            println!("Pre-commit hook already installed at {}", installed.path.display());
        }
    }
    Ok(())
}
