//! Configuration management for the PromptCraft CLI.
//!
//! Configuration is merged from three sources, lowest precedence first:
//! - `.promptcraft.yml` in the project directory (written by `init`)
//! - Environment variables (`PROMPTCRAFT_*`, `RUST_LOG`, `NO_COLOR`)
//! - Command-line flags
//!
//! The core pipeline must work with no configuration present at all;
//! everything here is a bias input, never a requirement.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Project root (contains `.promptcraft.yml` and `.promptcraft/`)
    pub project_dir: PathBuf,

    /// Explicit config file path override
    pub config_file: Option<PathBuf>,

    /// LLM provider (e.g., "ollama", "openai")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// API key for providers that need one
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Project hints from `.promptcraft.yml`, if present
    pub project: Option<ProjectHints>,
}

/// Per-project tech-stack hints from `.promptcraft.yml`.
///
/// These MAY bias framework detection and template suggestions; absence of
/// every field is normal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_guide: Option<String>,
}

/// Full `.promptcraft.yml` structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_guide: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmSection>,
}

/// The `llm:` section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    pub provider: String,
    pub model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            project: None,
        }
    }
}

impl AppConfig {
    /// Load configuration for a project directory.
    ///
    /// The project/config paths come in up front (CLI flags, when given)
    /// so the right `.promptcraft.yml` is merged before the remaining
    /// flag overrides apply.
    ///
    /// Recognized environment variables:
    /// - `PROMPTCRAFT_PROJECT`: fallback project directory
    /// - `PROMPTCRAFT_CONFIG`: fallback config file path
    /// - `PROMPTCRAFT_PROVIDER` / `PROMPTCRAFT_MODEL`: LLM selection
    /// - `PROMPTCRAFT_API_KEY` (falls back to `OPENAI_API_KEY`)
    /// - `RUST_LOG`, `NO_COLOR`
    pub fn load(
        project_dir: Option<PathBuf>,
        config_file: Option<PathBuf>,
    ) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(dir) = project_dir {
            config.project_dir = dir;
        } else if let Ok(dir) = std::env::var("PROMPTCRAFT_PROJECT") {
            config.project_dir = PathBuf::from(dir);
        }

        if let Some(file) = config_file {
            config.config_file = Some(file);
        } else if let Ok(file) = std::env::var("PROMPTCRAFT_CONFIG") {
            config.config_file = Some(PathBuf::from(file));
        }

        if !config.project_dir.exists() {
            return Err(AppError::Config(format!(
                "Project directory does not exist: {:?}",
                config.project_dir
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.project_dir.join(".promptcraft.yml"),
        };

        if config_path.exists() {
            config.merge_yaml(&config_path)?;
        }

        // Environment variables override the YAML file
        if let Ok(provider) = std::env::var("PROMPTCRAFT_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("PROMPTCRAFT_MODEL") {
            config.model = model;
        }

        config.api_key = std::env::var("PROMPTCRAFT_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a `.promptcraft.yml` file into this config.
    fn merge_yaml(&mut self, path: &Path) -> AppResult<()> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let file: ConfigFile = serde_yaml::from_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        if let Some(ref llm) = file.llm {
            self.provider = llm.provider.to_lowercase();
            self.model = llm.model.clone();
        }

        self.project = Some(ProjectHints {
            framework: file.framework,
            database: file.database,
            style_guide: file.style_guide,
        });

        Ok(())
    }

    /// Apply the remaining CLI flag overrides, which take precedence over
    /// the config file and environment. Project/config paths are not
    /// overridable here; they are fixed at [`AppConfig::load`] time.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(level) = log_level {
            self.log_level = Some(level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Path to the `.promptcraft` state directory.
    pub fn state_dir(&self) -> PathBuf {
        self.project_dir.join(".promptcraft")
    }

    /// Ensure the `.promptcraft` directory exists.
    pub fn ensure_state_dir(&self) -> AppResult<()> {
        let dir = self.state_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AppError::Config(format!("Failed to create .promptcraft directory: {}", e))
            })?;
        }
        Ok(())
    }

    /// Validate the active provider selection.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["ollama", "openai"];

        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        if self.provider == "openai" && self.api_key.is_none() {
            return Err(AppError::Config(
                "OpenAI provider requires an API key (PROMPTCRAFT_API_KEY or OPENAI_API_KEY)"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3.2");
        assert!(!config.verbose);
        assert!(config.project.is_none());
    }

    #[test]
    fn test_state_dir() {
        let config = AppConfig::default();
        assert!(config.state_dir().ends_with(".promptcraft"));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(
            Some("openai".to_string()),
            Some("gpt-4o-mini".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(config.provider, "openai");
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.verbose);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_load_merges_config_from_given_project_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".promptcraft.yml"),
            "framework: Django\nllm:\n  provider: ollama\n  model: codellama\n",
        )
        .unwrap();

        // The directory comes from a flag, not the environment; its
        // config file must still be merged.
        let config = AppConfig::load(Some(dir.path().to_path_buf()), None).unwrap();

        assert_eq!(config.project_dir, dir.path());
        assert_eq!(config.model, "codellama");
        let hints = config.project.unwrap();
        assert_eq!(hints.framework.as_deref(), Some("Django"));
    }

    #[test]
    fn test_merge_yaml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".promptcraft.yml");
        std::fs::write(
            &path,
            "framework: FastAPI\ndatabase: PostgreSQL\nstyle_guide: PEP 8\nllm:\n  provider: OpenAI\n  model: gpt-4o-mini\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.merge_yaml(&path).unwrap();

        assert_eq!(config.provider, "openai");
        assert_eq!(config.model, "gpt-4o-mini");
        let hints = config.project.unwrap();
        assert_eq!(hints.framework.as_deref(), Some("FastAPI"));
        assert_eq!(hints.style_guide.as_deref(), Some("PEP 8"));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "mystery".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ollama_needs_no_key() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }
}
