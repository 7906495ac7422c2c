//! Git context collection.
//!
//! Shells out to the `git` binary to summarize the repository state:
//! current branch, changed files, recent commit subjects, and a capped
//! diff for one of three scopes (working tree, staged, or against a
//! base branch).

pub mod collect;
pub mod types;

pub use collect::{collect, diff_for_scope, is_git_repository};
pub use types::{ChangeKind, ChangedFile, DiffScope, GitContextSummary};
