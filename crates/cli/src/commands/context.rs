//! Context command handler: git state collection.

use clap::Args;
use promptcraft_core::{config::AppConfig, AppResult};
use promptcraft_vcs::{collect, DiffScope};

/// Collect git context from the project repository
#[derive(Args, Debug)]
pub struct ContextCommand {
    /// Use staged changes instead of the working tree
    #[arg(long, conflicts_with = "base")]
    pub staged: bool,

    /// Diff against a base branch (empty value tries main, then master)
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub base: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ContextCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let scope = if self.staged {
            DiffScope::Staged
        } else if let Some(base) = &self.base {
            DiffScope::BaseBranch(base.clone())
        } else {
            DiffScope::WorkingTree
        };

        tracing::info!("Collecting git context ({})", scope);
        let summary = collect(&config.project_dir, scope)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        println!("Branch: {}", summary.branch);
        println!("Scope: {}", summary.scope);

        if summary.changed_files.is_empty() {
            println!("\nNo changed files.");
        } else {
            println!("\nChanged files:");
            for file in &summary.changed_files {
                match (file.added_lines, file.removed_lines) {
                    (Some(a), Some(r)) => {
                        println!("  {} {} (+{a}/-{r})", file.kind, file.path)
                    }
                    _ => println!("  {} {}", file.kind, file.path),
                }
            }
        }

        if !summary.recent_commits.is_empty() {
            println!("\nRecent commits:");
            for subject in &summary.recent_commits {
                println!("  {subject}");
            }
        }

        if !summary.diff.trim().is_empty() {
            println!("\n{}", summary.diff);
        }

        Ok(())
    }
}
