//! Extract command handler.

use clap::Args;
use promptcraft_context::{extract_file, scan_directory};
use promptcraft_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

/// Extract a context summary from a source file or directory
#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// Source file or directory to analyze
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExtractCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let path = if self.file.is_absolute() {
            self.file.clone()
        } else {
            config.project_dir.join(&self.file)
        };

        if path.is_dir() {
            return self.execute_scan(&path);
        }

        tracing::info!("Extracting context from {:?}", path);
        let summary = extract_file(&path)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        println!("Language: {}", summary.language);
        println!("Lines: {}  Bytes: {}", summary.lines, summary.bytes);

        if !summary.imports.is_empty() {
            println!("\nImports:");
            for import in &summary.imports {
                println!("  {import}");
            }
        }

        if !summary.declarations.is_empty() {
            println!("\nDeclarations:");
            for decl in &summary.declarations {
                match &decl.signature {
                    Some(sig) => println!("  {} {} ({sig})", decl.kind, decl.name),
                    None => println!("  {} {}", decl.kind, decl.name),
                }
            }
        }

        if !summary.tags.is_empty() {
            let tags: Vec<&str> = summary.tags.iter().map(|t| t.as_str()).collect();
            println!("\nPatterns: {}", tags.join(", "));
        }

        Ok(())
    }

    fn execute_scan(&self, dir: &std::path::Path) -> AppResult<()> {
        tracing::info!("Scanning directory {:?}", dir);
        let scan = scan_directory(dir)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&scan)?);
            return Ok(());
        }

        for file in &scan.files {
            println!(
                "{:<12} {} ({} imports, {} declarations)",
                file.summary.language,
                file.path.display(),
                file.summary.imports.len(),
                file.summary.declarations.len()
            );
        }
        println!("\n{} files scanned", scan.files.len());

        if !scan.tags.is_empty() {
            let tags: Vec<&str> = scan.tags.iter().map(|t| t.as_str()).collect();
            println!("Patterns: {}", tags.join(", "));
        }

        Ok(())
    }
}
