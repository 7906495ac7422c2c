use serde::{Deserialize, Serialize};

/// How a changed file differs from the comparison point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Untracked,
}

impl ChangeKind {
    /// Map a porcelain status letter to a change kind. Copies count as
    /// additions (a new path appears); type changes count as modifications.
    pub fn from_status_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(ChangeKind::Added),
            'C' => Some(ChangeKind::Added),
            'M' => Some(ChangeKind::Modified),
            'T' => Some(ChangeKind::Modified),
            'D' => Some(ChangeKind::Deleted),
            'R' => Some(ChangeKind::Renamed),
            '?' => Some(ChangeKind::Untracked),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Renamed => "renamed",
            ChangeKind::Untracked => "untracked",
        };
        write!(f, "{label}")
    }
}

/// One entry from the change listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub path: String,
    pub kind: ChangeKind,
    /// Line counts from `--numstat`; absent for binary files and
    /// untracked entries.
    pub added_lines: Option<u64>,
    pub removed_lines: Option<u64>,
}

/// Which comparison the diff covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffScope {
    /// Unstaged changes in the working tree.
    WorkingTree,
    /// Changes staged for the next commit.
    Staged,
    /// Everything that differs from a base branch.
    BaseBranch(String),
}

impl std::fmt::Display for DiffScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiffScope::WorkingTree => write!(f, "working tree"),
            DiffScope::Staged => write!(f, "staged"),
            DiffScope::BaseBranch(base) => write!(f, "against {base}"),
        }
    }
}

/// Snapshot of repository state fed to prompt rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitContextSummary {
    /// Current branch name, or `HEAD` when detached.
    pub branch: String,
    pub changed_files: Vec<ChangedFile>,
    /// Most recent commit subjects, newest first.
    pub recent_commits: Vec<String>,
    pub scope: DiffScope,
    /// Unified diff text, capped; ends with a truncation marker line
    /// when the cap was hit.
    pub diff: String,
    pub diff_truncated: bool,
}

impl GitContextSummary {
    pub fn is_clean(&self) -> bool {
        self.changed_files.is_empty() && self.diff.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_char_mapping() {
        assert_eq!(ChangeKind::from_status_char('A'), Some(ChangeKind::Added));
        assert_eq!(
            ChangeKind::from_status_char('?'),
            Some(ChangeKind::Untracked)
        );
        assert_eq!(ChangeKind::from_status_char('X'), None);
    }

    #[test]
    fn test_copy_and_typechange_letters_are_kept() {
        assert_eq!(ChangeKind::from_status_char('C'), Some(ChangeKind::Added));
        assert_eq!(
            ChangeKind::from_status_char('T'),
            Some(ChangeKind::Modified)
        );
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(DiffScope::WorkingTree.to_string(), "working tree");
        assert_eq!(
            DiffScope::BaseBranch("main".to_string()).to_string(),
            "against main"
        );
    }
}
