//! Quick command handler: one-shot prompt assembly.

use clap::Args;
use promptcraft_context::extract_file;
use promptcraft_core::{config::AppConfig, AppError, AppResult};
use promptcraft_prompt::{quick, QuickInput};
use promptcraft_vcs::{collect, DiffScope};
use std::path::PathBuf;

/// One-shot prompt assembly without a session
#[derive(Args, Debug)]
pub struct QuickCommand {
    /// Template to assemble
    pub template: String,

    /// Fill from a source file's context summary
    #[arg(short, long, conflicts_with_all = ["error", "diff"])]
    pub file: Option<PathBuf>,

    /// Fill from an error message
    #[arg(short, long, conflicts_with = "diff")]
    pub error: Option<String>,

    /// Fill from the repository's git context
    #[arg(short, long)]
    pub diff: bool,

    /// With --diff, use staged changes instead of the working tree
    #[arg(long, requires = "diff")]
    pub staged: bool,
}

impl QuickCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let input = if let Some(file) = &self.file {
            let path = if file.is_absolute() {
                file.clone()
            } else {
                config.project_dir.join(file)
            };
            QuickInput::File(extract_file(&path)?)
        } else if let Some(error) = &self.error {
            QuickInput::Error(error.clone())
        } else if self.diff {
            let scope = if self.staged {
                DiffScope::Staged
            } else {
                DiffScope::WorkingTree
            };
            QuickInput::Git(collect(&config.project_dir, scope)?)
        } else {
            return Err(AppError::Config(
                "quick needs one of --file, --error, or --diff".to_string(),
            ));
        };

        tracing::info!("Quick-assembling template '{}'", self.template);
        println!("{}", quick(&self.template, input)?);
        Ok(())
    }
}
