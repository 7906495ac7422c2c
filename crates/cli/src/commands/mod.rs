//! Command handlers for the PromptCraft CLI.

pub mod context;
pub mod extract;
pub mod init;
pub mod quick;
pub mod run;
pub mod session;
pub mod template;

pub use context::ContextCommand;
pub use extract::ExtractCommand;
pub use init::InitCommand;
pub use quick::QuickCommand;
pub use run::RunCommand;
pub use session::SessionCommand;
pub use template::TemplateCommand;
