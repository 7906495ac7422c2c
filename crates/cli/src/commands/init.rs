//! Init command handler: write a starter project config.

use clap::Args;
use promptcraft_context::{detect_frameworks, project_description};
use promptcraft_core::{config::AppConfig, AppError, AppResult};

/// Write a starter .promptcraft.yml for this project
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let path = config.project_dir.join(".promptcraft.yml");
        if path.exists() && !self.force {
            return Err(AppError::Config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }

        let frameworks = detect_frameworks(&config.project_dir);
        tracing::info!("Detected: {}", project_description(&config.project_dir));

        let mut contents = String::from("# PromptCraft project configuration\n");
        match frameworks.first() {
            Some(framework) => contents.push_str(&format!("framework: {framework}\n")),
            None => contents.push_str("# framework: <your framework>\n"),
        }
        contents.push_str("# database: <your database>\n");
        contents.push_str("# style_guide: <link or short description>\n");
        contents.push_str("\nllm:\n");
        contents.push_str(&format!("  provider: {}\n", config.provider));
        contents.push_str(&format!("  model: {}\n", config.model));

        std::fs::write(&path, contents)?;
        config.ensure_state_dir()?;

        println!("Wrote {}", path.display());
        println!("Detected: {}", project_description(&config.project_dir));
        Ok(())
    }
}
