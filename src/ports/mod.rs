//! Port traits defining external boundaries.
//!
//! Each trait separates the mourning pipeline from something it does not
//! control: wall-clock time, the disk, the host git repository, and the
//! hosted text-generation service. Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod git;
pub mod llm;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use git::{GitRepo, Lifecycle};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmFuture};

/// Error type shared by all port methods.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
