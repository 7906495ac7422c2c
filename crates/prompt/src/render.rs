//! Prompt rendering.
//!
//! `render` is a pure projection: template sections in order, each
//! emitted as a `# Label` heading followed by its body, joined by
//! blank lines. A section's body is its filled text verbatim, else
//! synthesized context when the section accepts it and a summary is
//! present, else the placeholder hint.

use std::sync::OnceLock;

use handlebars::Handlebars;
use promptcraft_core::{AppError, AppResult};
use promptcraft_context::ContextSummary;
use promptcraft_vcs::GitContextSummary;
use serde_json::json;
use tracing::debug;

use crate::types::{PromptSpec, Template};

const CONTEXT_BLOCK: &str = "Language: {{language}}{{#if imports}}\n\nImports:\n{{#each imports}}{{this}}\n{{/each}}{{/if}}{{#if declarations}}\nDeclarations:\n{{#each declarations}}- {{this}}\n{{/each}}{{/if}}{{#if tags}}\nPatterns: {{tags}}{{/if}}";

const GIT_BLOCK: &str = "Branch: {{branch}}{{#if files}}\n\nChanged files:\n{{#each files}}{{this}}\n{{/each}}{{/if}}{{#if commits}}\nRecent commits:\n{{#each commits}}- {{this}}\n{{/each}}{{/if}}{{#if diff}}\nDiff ({{scope}}):\n```diff\n{{diff}}\n```{{/if}}";

fn engine() -> &'static Handlebars<'static> {
    static ENGINE: OnceLock<Handlebars<'static>> = OnceLock::new();
    ENGINE.get_or_init(|| {
        let mut hb = Handlebars::new();
        hb.register_escape_fn(handlebars::no_escape);
        // Registration of embedded string templates cannot fail.
        let _ = hb.register_template_string("context-block", CONTEXT_BLOCK);
        let _ = hb.register_template_string("git-block", GIT_BLOCK);
        hb
    })
}

/// Default text for a context-eligible section from a file summary.
pub fn synthesize_context(summary: &ContextSummary) -> AppResult<String> {
    let declarations: Vec<String> = summary
        .declarations
        .iter()
        .map(|d| match &d.signature {
            Some(sig) => sig.clone(),
            None => format!("{} {}", d.kind, d.name),
        })
        .collect();
    let tags: Vec<&str> = summary.tags.iter().map(|t| t.as_str()).collect();

    let data = json!({
        "language": summary.language,
        "imports": summary.imports,
        "declarations": declarations,
        "tags": tags.join(", "),
    });

    let text = engine()
        .render("context-block", &data)
        .map_err(|e| AppError::Prompt(e.to_string()))?;
    Ok(text.trim_end().to_string())
}

/// Default text for a context-eligible section from a git summary.
pub fn synthesize_git(summary: &GitContextSummary) -> AppResult<String> {
    let files: Vec<String> = summary
        .changed_files
        .iter()
        .map(|f| match (f.added_lines, f.removed_lines) {
            (Some(a), Some(r)) => format!("{} {} (+{a}/-{r})", f.kind, f.path),
            _ => format!("{} {}", f.kind, f.path),
        })
        .collect();

    let data = json!({
        "branch": summary.branch,
        "files": files,
        "commits": summary.recent_commits,
        "scope": summary.scope.to_string(),
        "diff": summary.diff.trim_end(),
    });

    let text = engine()
        .render("git-block", &data)
        .map_err(|e| AppError::Prompt(e.to_string()))?;
    Ok(text.trim_end().to_string())
}

/// Render a prompt specification against its template.
///
/// Inputs are never mutated; the same inputs always produce the same
/// bytes.
pub fn render(
    template: &Template,
    spec: &PromptSpec,
    context: Option<&ContextSummary>,
    git: Option<&GitContextSummary>,
) -> AppResult<String> {
    debug!(template = template.name, "rendering prompt");

    let mut parts = Vec::with_capacity(template.sections.len());
    for section in template.sections {
        let filled = spec.section_text(section.label).unwrap_or("");

        let body = if !filled.trim().is_empty() {
            filled.to_string()
        } else if section.context_eligible && (context.is_some() || git.is_some()) {
            let mut blocks = Vec::new();
            if let Some(summary) = context {
                blocks.push(synthesize_context(summary)?);
            }
            if let Some(summary) = git {
                blocks.push(synthesize_git(summary)?);
            }
            blocks.join("\n\n")
        } else {
            format!("[{}]", section.hint)
        };

        parts.push(format!("# {}\n\n{}", section.label, body));
    }

    Ok(parts.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::get_template;
    use promptcraft_context::{classify, extract};
    use promptcraft_vcs::{ChangeKind, ChangedFile, DiffScope};
    use std::path::Path;

    fn python_summary() -> ContextSummary {
        let source = "import os\nfrom collections import OrderedDict\n\ndef add(a, b):\n    return a + b\n\nclass Foo:\n    pass\n";
        let profile = classify(Some(Path::new("calc.py")), source);
        extract(source, profile)
    }

    #[test]
    fn test_render_is_deterministic() {
        let template = get_template("code-review").unwrap();
        let spec = PromptSpec::new(template);
        let summary = python_summary();

        let first = render(template, &spec, Some(&summary), None).unwrap();
        let second = render(template, &spec, Some(&summary), None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_filled_text_wins_over_synthesis() {
        let template = get_template("code-review").unwrap();
        let mut spec = PromptSpec::new(template);
        spec.set("Code", "fn main() {}").unwrap();
        let summary = python_summary();

        let out = render(template, &spec, Some(&summary), None).unwrap();
        assert!(out.contains("# Code\n\nfn main() {}"));
        assert!(!out.contains("Language: python"));
    }

    #[test]
    fn test_empty_sections_emit_hints() {
        let template = get_template("prompt").unwrap();
        let spec = PromptSpec::new(template);

        let out = render(template, &spec, None, None).unwrap();
        assert!(out.contains("# Persona\n\n[Who the assistant should act as]"));
        assert!(out.contains("# Context\n\n[Relevant code or project context]"));
    }

    #[test]
    fn test_sections_in_template_order() {
        let template = get_template("prompt").unwrap();
        let spec = PromptSpec::new(template);
        let out = render(template, &spec, None, None).unwrap();

        let persona = out.find("# Persona").unwrap();
        let task = out.find("# Task").unwrap();
        let constraints = out.find("# Constraints").unwrap();
        assert!(persona < task && task < constraints);
    }

    #[test]
    fn test_render_does_not_mutate_spec() {
        let template = get_template("code-review").unwrap();
        let spec = PromptSpec::new(template);
        let before = spec.clone();
        let summary = python_summary();

        render(template, &spec, Some(&summary), None).unwrap();
        assert_eq!(spec, before);
    }

    #[test]
    fn test_synthesized_context_lists_imports_per_line() {
        let summary = python_summary();
        let block = synthesize_context(&summary).unwrap();
        assert!(block.contains("Language: python"));
        assert!(block.contains("Imports:\nos\ncollections"));
        assert!(block.contains("def add(a, b)"));
    }

    #[test]
    fn test_synthesized_git_block() {
        let summary = GitContextSummary {
            branch: "feature/x".to_string(),
            changed_files: vec![ChangedFile {
                path: "src/lib.rs".to_string(),
                kind: ChangeKind::Modified,
                added_lines: Some(4),
                removed_lines: Some(1),
            }],
            recent_commits: vec!["Fix parser".to_string()],
            scope: DiffScope::WorkingTree,
            diff: "--- a/src/lib.rs\n+++ b/src/lib.rs\n".to_string(),
            diff_truncated: false,
        };

        let block = synthesize_git(&summary).unwrap();
        assert!(block.contains("Branch: feature/x"));
        assert!(block.contains("modified src/lib.rs (+4/-1)"));
        assert!(block.contains("- Fix parser"));
        assert!(block.contains("```diff"));
    }
}
