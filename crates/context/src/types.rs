//! Extraction result types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of a detected declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Function,
    Class,
    Component,
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclKind::Function => write!(f, "function"),
            DeclKind::Class => write!(f, "class"),
            DeclKind::Component => write!(f, "component"),
        }
    }
}

/// A single function/class/component found in the source.
///
/// The signature is a best-effort fragment of the defining line; it is not
/// guaranteed to be syntactically exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub kind: DeclKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Per-file extraction result.
///
/// Import and declaration sequences preserve first-occurrence order from the
/// source text. Tags live in a sorted set so repeated runs are deterministic.
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSummary {
    /// Language profile identifier (e.g., "python", "rust", "text")
    pub language: String,

    /// Module/package tokens, deduplicated in order of first appearance
    pub imports: Vec<String>,

    /// Declarations in order of first appearance
    pub declarations: Vec<Declaration>,

    /// Detected pattern tags (async-usage, test-code, hook-usage, ...)
    pub tags: BTreeSet<String>,

    /// Line count of the full input
    pub lines: usize,

    /// Byte count of the full input
    pub bytes: usize,
}

impl ContextSummary {
    /// Empty summary for the given language id.
    pub fn empty(language: &str) -> Self {
        Self {
            language: language.to_string(),
            imports: Vec::new(),
            declarations: Vec::new(),
            tags: BTreeSet::new(),
            lines: 0,
            bytes: 0,
        }
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.declarations.is_empty() && self.tags.is_empty()
    }
}
