use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use promptcraft_core::{AppError, AppResult};
use tracing::debug;

use crate::types::{ChangeKind, ChangedFile, DiffScope, GitContextSummary};

/// Diff output larger than this is cut at a line boundary and a
/// truncation marker appended.
pub const MAX_DIFF_BYTES: usize = 32 * 1024;

const DIFF_TRUNCATION_MARKER: &str = "[diff truncated]";
const RECENT_COMMIT_COUNT: usize = 5;

/// Run a git command in `repo` and return stdout, mapping failures to
/// the two vcs error variants.
fn git(repo: &Path, args: &[&str]) -> AppResult<String> {
    debug!(args = ?args, "running git");
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::VcsUnavailable("git binary not found on PATH".to_string())
            } else {
                AppError::VcsOperationFailed(format!("failed to spawn git: {e}"))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AppError::VcsOperationFailed(format!(
            "git {} failed: {}",
            args.first().unwrap_or(&""),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// True when `repo` is inside a git work tree. Missing git binary or a
/// failing check both count as "no repository".
pub fn is_git_repository(repo: &Path) -> bool {
    matches!(
        git(repo, &["rev-parse", "--is-inside-work-tree"]),
        Ok(out) if out.trim() == "true"
    )
}

/// Collect the full git context for a repository.
///
/// Fails with [`AppError::VcsUnavailable`] when `repo` is not a git
/// work tree, and [`AppError::VcsOperationFailed`] when an individual
/// git command errors.
pub fn collect(repo: &Path, scope: DiffScope) -> AppResult<GitContextSummary> {
    if !is_git_repository(repo) {
        return Err(AppError::VcsUnavailable(format!(
            "{} is not a git repository",
            repo.display()
        )));
    }

    let scope = resolve_scope(repo, scope)?;
    let branch = current_branch(repo)?;
    let changed_files = changed_files(repo, &scope)?;
    let recent_commits = recent_commits(repo)?;
    let (diff, diff_truncated) = diff_for_scope(repo, &scope)?;

    Ok(GitContextSummary {
        branch,
        changed_files,
        recent_commits,
        scope,
        diff,
        diff_truncated,
    })
}

/// Verify an explicit base branch, or fall back to `main` then `master`.
fn resolve_scope(repo: &Path, scope: DiffScope) -> AppResult<DiffScope> {
    let base = match scope {
        DiffScope::BaseBranch(base) => base,
        other => return Ok(other),
    };

    if !base.is_empty() {
        if branch_exists(repo, &base) {
            return Ok(DiffScope::BaseBranch(base));
        }
        return Err(AppError::VcsOperationFailed(format!(
            "base branch '{base}' does not exist"
        )));
    }

    for candidate in ["main", "master"] {
        if branch_exists(repo, candidate) {
            return Ok(DiffScope::BaseBranch(candidate.to_string()));
        }
    }

    Err(AppError::VcsOperationFailed(
        "no base branch found (tried main, master)".to_string(),
    ))
}

fn branch_exists(repo: &Path, name: &str) -> bool {
    git(repo, &["rev-parse", "--verify", "--quiet", name]).is_ok()
}

/// Current branch name; detached HEAD reports as `HEAD`.
fn current_branch(repo: &Path) -> AppResult<String> {
    let out = git(repo, &["branch", "--show-current"])?;
    let name = out.trim();
    if name.is_empty() {
        Ok("HEAD".to_string())
    } else {
        Ok(name.to_string())
    }
}

fn recent_commits(repo: &Path) -> AppResult<Vec<String>> {
    // A repository with no commits yet makes `git log` fail; that
    // surfaces as VcsOperationFailed rather than an empty list.
    let count = RECENT_COMMIT_COUNT.to_string();
    let out = git(
        repo,
        &["log", "--max-count", count.as_str(), "--pretty=format:%s"],
    )?;

    Ok(out
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect())
}

/// List changed files for the scope, with per-file line counts where
/// `--numstat` reports them.
fn changed_files(repo: &Path, scope: &DiffScope) -> AppResult<Vec<ChangedFile>> {
    let counts = numstat_counts(repo, scope)?;

    let mut files = Vec::new();
    match scope {
        DiffScope::WorkingTree => {
            let out = git(repo, &["status", "--porcelain"])?;
            for line in out.lines() {
                if let Some(file) = parse_porcelain_line(line, false, &counts) {
                    files.push(file);
                }
            }
        }
        DiffScope::Staged => {
            let out = git(repo, &["status", "--porcelain"])?;
            for line in out.lines() {
                if let Some(file) = parse_porcelain_line(line, true, &counts) {
                    files.push(file);
                }
            }
        }
        DiffScope::BaseBranch(base) => {
            let range = format!("{base}...HEAD");
            let out = git(repo, &["diff", "--name-status", range.as_str()])?;
            for line in out.lines() {
                if let Some(file) = parse_name_status_line(line, &counts) {
                    files.push(file);
                }
            }
        }
    }

    Ok(files)
}

/// Parse one `status --porcelain` line. `staged` selects which of the
/// two status columns applies.
fn parse_porcelain_line(
    line: &str,
    staged: bool,
    counts: &HashMap<String, (u64, u64)>,
) -> Option<ChangedFile> {
    if line.len() < 4 {
        return None;
    }
    let mut chars = line.chars();
    let index_status = chars.next()?;
    let worktree_status = chars.next()?;
    let raw = line[3..].trim();
    // Renames list as "old -> new"; keep the new path.
    let path = match raw.rsplit_once(" -> ") {
        Some((_, new)) => new.to_string(),
        None => raw.to_string(),
    };

    // Untracked files show as "??" and belong to the working tree view.
    if index_status == '?' {
        if staged {
            return None;
        }
        return Some(ChangedFile {
            path,
            kind: ChangeKind::Untracked,
            added_lines: None,
            removed_lines: None,
        });
    }

    // The working-tree view covers the whole status output: a file whose
    // change is fully staged has a blank worktree column but still counts.
    let status = if staged {
        index_status
    } else if ChangeKind::from_status_char(worktree_status).is_some() {
        worktree_status
    } else {
        index_status
    };
    let kind = ChangeKind::from_status_char(status)?;
    let (added, removed) = counts
        .get(&path)
        .map(|&(a, r)| (Some(a), Some(r)))
        .unwrap_or((None, None));

    Some(ChangedFile {
        path,
        kind,
        added_lines: added,
        removed_lines: removed,
    })
}

/// Parse one `diff --name-status` line (base-branch scope).
fn parse_name_status_line(
    line: &str,
    counts: &HashMap<String, (u64, u64)>,
) -> Option<ChangedFile> {
    let mut parts = line.split('\t');
    let status = parts.next()?.chars().next()?;
    let path = parts.next_back()?.to_string();
    let kind = ChangeKind::from_status_char(status)?;
    let (added, removed) = counts
        .get(&path)
        .map(|&(a, r)| (Some(a), Some(r)))
        .unwrap_or((None, None));

    Some(ChangedFile {
        path,
        kind,
        added_lines: added,
        removed_lines: removed,
    })
}

/// Per-file (added, removed) line counts from `diff --numstat`. Binary
/// files report `-` and are skipped.
fn numstat_counts(repo: &Path, scope: &DiffScope) -> AppResult<HashMap<String, (u64, u64)>> {
    let out = match scope {
        DiffScope::WorkingTree => git(repo, &["diff", "--numstat"])?,
        DiffScope::Staged => git(repo, &["diff", "--cached", "--numstat"])?,
        DiffScope::BaseBranch(base) => {
            let range = format!("{base}...HEAD");
            git(repo, &["diff", "--numstat", range.as_str()])?
        }
    };

    let mut counts = HashMap::new();
    for line in out.lines() {
        let mut parts = line.split('\t');
        let (Some(added), Some(removed), Some(path)) =
            (parts.next(), parts.next(), parts.next_back())
        else {
            continue;
        };
        let (Ok(added), Ok(removed)) = (added.parse::<u64>(), removed.parse::<u64>()) else {
            continue;
        };
        counts.insert(path.to_string(), (added, removed));
    }

    Ok(counts)
}

/// Unified diff for the scope, cut at a line boundary once it exceeds
/// [`MAX_DIFF_BYTES`]. Returns the text plus whether truncation happened.
pub fn diff_for_scope(repo: &Path, scope: &DiffScope) -> AppResult<(String, bool)> {
    let out = match scope {
        DiffScope::WorkingTree => git(repo, &["diff"])?,
        DiffScope::Staged => git(repo, &["diff", "--cached"])?,
        DiffScope::BaseBranch(base) => {
            let range = format!("{base}...HEAD");
            git(repo, &["diff", range.as_str()])?
        }
    };

    Ok(cap_diff(out))
}

/// Apply the diff size cap, cutting at a line boundary and appending
/// the truncation marker once.
fn cap_diff(out: String) -> (String, bool) {
    if out.len() <= MAX_DIFF_BYTES {
        return (out, false);
    }

    let mut cut = MAX_DIFF_BYTES;
    while cut > 0 && !out.is_char_boundary(cut) {
        cut -= 1;
    }
    let kept = &out[..cut];
    let kept = match kept.rfind('\n') {
        Some(idx) => &kept[..idx],
        None => kept,
    };

    let mut diff = kept.to_string();
    diff.push('\n');
    diff.push_str(DIFF_TRUNCATION_MARKER);
    (diff, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_repository_is_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = collect(dir.path(), DiffScope::WorkingTree).unwrap_err();
        assert!(matches!(err, AppError::VcsUnavailable(_)));
    }

    #[test]
    fn test_porcelain_untracked() {
        let counts = HashMap::new();
        let file = parse_porcelain_line("?? new.rs", false, &counts).unwrap();
        assert_eq!(file.kind, ChangeKind::Untracked);
        assert_eq!(file.path, "new.rs");
        assert!(parse_porcelain_line("?? new.rs", true, &counts).is_none());
    }

    #[test]
    fn test_porcelain_staged_vs_worktree() {
        let mut counts = HashMap::new();
        counts.insert("src/lib.rs".to_string(), (10, 2));

        // Staged add with a further unstaged modification.
        let staged = parse_porcelain_line("AM src/lib.rs", true, &counts).unwrap();
        assert_eq!(staged.kind, ChangeKind::Added);
        assert_eq!(staged.added_lines, Some(10));

        let worktree = parse_porcelain_line("AM src/lib.rs", false, &counts).unwrap();
        assert_eq!(worktree.kind, ChangeKind::Modified);
    }

    #[test]
    fn test_fully_staged_change_visible_in_working_tree_scope() {
        // Porcelain "M  a.txt": modification staged, worktree clean. The
        // file must still show up in the working-tree listing.
        let counts = HashMap::new();
        let file = parse_porcelain_line("M  a.txt", false, &counts).unwrap();
        assert_eq!(file.path, "a.txt");
        assert_eq!(file.kind, ChangeKind::Modified);

        let added = parse_porcelain_line("A  new.rs", false, &counts).unwrap();
        assert_eq!(added.kind, ChangeKind::Added);

        // A fully clean entry never appears in porcelain output, but a
        // blank-blank line must still map to nothing.
        assert!(parse_porcelain_line("   clean.rs", false, &counts).is_none());
    }

    #[test]
    fn test_diff_cap_appends_marker_once() {
        let mut big = String::new();
        while big.len() <= MAX_DIFF_BYTES {
            big.push_str("+added line\n");
        }

        let (capped, truncated) = cap_diff(big);
        assert!(truncated);
        assert!(capped.len() <= MAX_DIFF_BYTES + DIFF_TRUNCATION_MARKER.len() + 1);
        assert_eq!(capped.matches(DIFF_TRUNCATION_MARKER).count(), 1);
        assert!(capped.ends_with(DIFF_TRUNCATION_MARKER));

        let (small, truncated) = cap_diff("+one line\n".to_string());
        assert!(!truncated);
        assert_eq!(small, "+one line\n");
    }

    #[test]
    fn test_name_status_rename() {
        let counts = HashMap::new();
        let file = parse_name_status_line("R100\told.rs\tnew.rs", &counts).unwrap();
        assert_eq!(file.kind, ChangeKind::Renamed);
        assert_eq!(file.path, "new.rs");
    }
}
