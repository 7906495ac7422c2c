//! Session command handlers.

use clap::{Args, Subcommand};
use promptcraft_core::{config::AppConfig, AppResult};
use promptcraft_prompt::{get_template, render};
use promptcraft_session::SessionStore;

/// Manage saved prompt sessions
#[derive(Args, Debug)]
pub struct SessionCommand {
    #[command(subcommand)]
    pub action: SessionAction,
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
    /// List saved sessions, most recently modified first
    List,

    /// Render a session to stdout
    Show {
        /// Session name
        name: String,
    },

    /// Fill one section of a session
    Set {
        /// Session name
        name: String,

        /// Section label (as shown by `template show`)
        section: String,

        /// Text to store in the section
        text: String,
    },

    /// Delete a session
    Delete {
        /// Session name
        name: String,
    },
}

impl SessionCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        config.ensure_state_dir()?;
        let store = SessionStore::new(&config.state_dir())?;

        match &self.action {
            SessionAction::List => {
                let sessions = store.list()?;
                if sessions.is_empty() {
                    println!("No saved sessions.");
                    return Ok(());
                }
                println!("Saved sessions:");
                for (name, modified) in sessions {
                    println!("  {:<24} {}", name, modified.format("%Y-%m-%d %H:%M UTC"));
                }
                Ok(())
            }
            SessionAction::Show { name } => {
                let spec = store.load(name)?;
                let template = get_template(&spec.template)?;
                println!("{}", render(template, &spec, None, None)?);
                Ok(())
            }
            SessionAction::Set {
                name,
                section,
                text,
            } => {
                let mut spec = store.load(name)?;
                spec.set(section, text)?;
                store.save(name, &spec)?;
                println!("Updated section '{section}' of session '{name}'.");
                Ok(())
            }
            SessionAction::Delete { name } => {
                store.delete(name)?;
                println!("Deleted session '{name}'.");
                Ok(())
            }
        }
    }
}
