//! Pre-commit hook installation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ObituaryError;

/// Marker identifying our hook inside a `pre-commit` script.
const MARKER: &str = "code-obituary";

/// Pre-commit hook script content.
const PRE_COMMIT_HOOK: &str = r#"#!/bin/sh
# code-obituary pre-commit hook (auto-installed)
# Writes an obituary for every staged deletion into GRAVEYARD.md

if ! command -v code-obituary >/dev/null 2>&1; then
    echo "[code-obituary] not found in PATH, skipping hook." >&2
    exit 0
fi

code-obituary mourn-staged || true

REPO_ROOT=$(git rev-parse --show-toplevel)
if [ -f "$REPO_ROOT/GRAVEYARD.md" ]; then
    git add "$REPO_ROOT/GRAVEYARD.md"
fi
"#;

/// What the installer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAction {
    /// A new hook file was written.
    Created,
    /// Our body was appended to an existing foreign hook.
    Appended,
    /// The hook already runs us; nothing changed.
    AlreadyInstalled,
}

/// Result of [`install_hook`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookInstall {
    /// Location of the `pre-commit` script.
    pub path: PathBuf,
    /// What was done to it.
    pub action: HookAction,
}

/// Installs the pre-commit hook into `hooks_dir`, preserving any existing
/// hook.
///
/// # Errors
///
/// Returns [`ObituaryError::HookInstall`] if the directory is missing or
/// the hook cannot be read, written or made executable.
pub fn install_hook(hooks_dir: &Path) -> Result<HookInstall, ObituaryError> {
    if !hooks_dir.is_dir() {
        return Err(ObituaryError::HookInstall(format!(
            "no hooks directory at {}",
            hooks_dir.display()
        )));
    }
    let path = hooks_dir.join("pre-commit");
    let fail = |e: std::io::Error| ObituaryError::HookInstall(format!("{}: {e}", path.display()));

    let (content, action) = if path.exists() {
        let existing = fs::read_to_string(&path).map_err(fail)?;
        if existing.contains(MARKER) {
            info!(path = %path.display(), "pre-commit hook already installed");
            return Ok(HookInstall { path, action: HookAction::AlreadyInstalled });
        }
        // Without the shebang: the existing script keeps its interpreter.
        let body = PRE_COMMIT_HOOK.split_once('\n').map_or(PRE_COMMIT_HOOK, |(_, rest)| rest);
        (format!("{}\n\n{body}", existing.trim_end()), HookAction::Appended)
    } else {
        (PRE_COMMIT_HOOK.to_string(), HookAction::Created)
    };

    fs::write(&path, content).map_err(fail)?;
    make_executable(&path).map_err(fail)?;
    info!(path = %path.display(), ?action, "installed pre-commit hook");

    Ok(HookInstall { path, action })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_hook_in_empty_directory() {
        let dir = tempfile::tempdir().unwrap();

        let installed = install_hook(dir.path()).unwrap();

        assert_eq!(installed.action, HookAction::Created);
        assert_eq!(installed.path, dir.path().join("pre-commit"));
        let content = fs::read_to_string(&installed.path).unwrap();
        assert!(content.starts_with("#!/bin/sh\n"));
        assert!(content.contains("code-obituary mourn-staged || true"));
        assert!(content.contains("git add \"$REPO_ROOT/GRAVEYARD.md\""));
    }

    #[cfg(unix)]
    #[test]
    fn hook_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let installed = install_hook(dir.path()).unwrap();
        let mode = fs::metadata(&installed.path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn second_install_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        install_hook(dir.path()).unwrap();
        let before = fs::read_to_string(dir.path().join("pre-commit")).unwrap();

        let again = install_hook(dir.path()).unwrap();

        assert_eq!(again.action, HookAction::AlreadyInstalled);
        assert_eq!(fs::read_to_string(dir.path().join("pre-commit")).unwrap(), before);
    }

    #[test]
    fn appends_to_foreign_hook() {
        let dir = tempfile::tempdir().unwrap();
        let hook = dir.path().join("pre-commit");
        fs::write(&hook, "#!/bin/bash\ncargo fmt --check\n").unwrap();

        let installed = install_hook(dir.path()).unwrap();

        assert_eq!(installed.action, HookAction::Appended);
        let content = fs::read_to_string(&hook).unwrap();
        assert!(content.starts_with("#!/bin/bash\ncargo fmt --check\n\n"));
        assert!(content.contains("code-obituary mourn-staged"));
        assert_eq!(content.matches("#!").count(), 1);
    }

    #[test]
    fn missing_hooks_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = install_hook(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ObituaryError::HookInstall(_)));
    }
}
