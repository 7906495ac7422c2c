//! Context extraction for the PromptCraft CLI.
//!
//! This crate turns raw source text into a structured [`ContextSummary`]
//! without ever parsing it for real: a fixed table of language profiles
//! (pattern data, not subclasses) drives a single line-oriented scan that
//! collects imports, declarations, and framework/pattern tags on a
//! best-effort basis. Malformed input degrades, it never fails.
//!
//! It also provides lightweight project/framework detection used to bias
//! template suggestions.

pub mod extract;
pub mod profile;
pub mod project;
pub mod scan;
pub mod types;

// Re-export main entry points
pub use extract::{extract, extract_file};
pub use profile::{classify, generic_profile, LanguageProfile};
pub use project::{detect_frameworks, project_description, suggested_templates};
pub use scan::{scan_directory, DirectoryScan, FileSummary};
pub use types::{ContextSummary, DeclKind, Declaration};
