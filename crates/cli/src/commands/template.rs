//! Template command handlers.

use clap::{Args, Subcommand};
use promptcraft_context::suggested_templates;
use promptcraft_core::{config::AppConfig, AppResult};
use promptcraft_prompt::{all_templates, get_template, render, PromptSpec};
use promptcraft_session::SessionStore;

/// List, inspect, or instantiate prompt templates
#[derive(Args, Debug)]
pub struct TemplateCommand {
    #[command(subcommand)]
    pub action: TemplateAction,
}

#[derive(Subcommand, Debug)]
pub enum TemplateAction {
    /// List bundled templates, with suggestions for this project
    List,

    /// Show a template's sections and render its empty skeleton
    Show {
        /// Template name
        name: String,
    },

    /// Copy a template into a new named session
    Use {
        /// Template name
        name: String,

        /// Session name to create
        #[arg(long = "as")]
        session: String,
    },
}

impl TemplateCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.action {
            TemplateAction::List => self.list(config),
            TemplateAction::Show { name } => self.show(name),
            TemplateAction::Use { name, session } => self.use_template(config, name, session),
        }
    }

    fn list(&self, config: &AppConfig) -> AppResult<()> {
        let suggested = suggested_templates(&config.project_dir);

        println!("Available templates:");
        for template in all_templates() {
            let marker = if suggested.iter().any(|s| s == template.name) {
                " *"
            } else {
                ""
            };
            println!("  {:<18} {}{marker}", template.name, template.description);
        }
        println!("\n* suggested for this project");
        Ok(())
    }

    fn show(&self, name: &str) -> AppResult<()> {
        let template = get_template(name)?;

        println!("Template: {} - {}", template.name, template.description);
        println!("\nSections:");
        for section in template.sections {
            let tag = if section.context_eligible {
                " (auto-fillable)"
            } else {
                ""
            };
            println!("  {}{tag}", section.label);
        }

        let spec = PromptSpec::new(template);
        println!("\n{}", render(template, &spec, None, None)?);
        Ok(())
    }

    fn use_template(&self, config: &AppConfig, name: &str, session: &str) -> AppResult<()> {
        let template = get_template(name)?;
        config.ensure_state_dir()?;

        let store = SessionStore::new(&config.state_dir())?;
        let spec = PromptSpec::new(template);
        store.save_new(session, &spec)?;

        println!("Created session '{session}' from template '{name}'.");
        println!("Fill sections with: promptcraft session set {session} <section> <text>");
        Ok(())
    }
}
