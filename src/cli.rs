//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `code-obituary`.
#[derive(Debug, Parser)]
#[command(
    name = "code-obituary",
    version,
    about = "Write obituaries for deleted code into GRAVEYARD.md"
)]
pub struct Cli {
    /// Log progress at info level (overridden by `OBITUARY_LOG`).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Repository selection shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct RepoArgs {
    /// Repository root (defaults to the enclosing git repository).
    #[arg(long, value_name = "DIR")]
    pub repo_root: Option<PathBuf>,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write an obituary for one file.
    Mourn {
        /// File to mourn, relative to the current directory.
        path: PathBuf,
        /// Cause of death.
        #[arg(short, long)]
        reason: Option<String>,
        /// Read the content from HEAD instead of the working tree.
        #[arg(long)]
        from_git: bool,
        #[command(flatten)]
        repo: RepoArgs,
    },
    /// Write obituaries for every deletion staged for commit.
    MournStaged {
        #[command(flatten)]
        repo: RepoArgs,
    },
    /// Install the pre-commit hook.
    Install {
        #[command(flatten)]
        repo: RepoArgs,
    },
    /// Print every obituary in full.
    View {
        #[command(flatten)]
        repo: RepoArgs,
    },
    /// Print a one-line summary per obituary.
    List {
        #[command(flatten)]
        repo: RepoArgs,
    },
}

impl Command {
    /// Repository selection for this command.
    #[must_use]
    pub fn repo(&self) -> &RepoArgs {
        match self {
            Self::Mourn { repo, .. }
            | Self::MournStaged { repo }
            | Self::Install { repo }
            | Self::View { repo }
            | Self::List { repo } => repo,
        }
    }
}
