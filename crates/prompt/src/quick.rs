//! One-shot prompt assembly.
//!
//! Quick mode skips the session store: it builds a throwaway prompt
//! specification, fills one section from the given input, and renders
//! immediately. The output is byte-identical to saving the same fill
//! as a session and rendering it, because both paths share the same
//! synthesis and render functions.

use promptcraft_context::ContextSummary;
use promptcraft_core::{AppError, AppResult};
use promptcraft_vcs::GitContextSummary;
use tracing::debug;

use crate::registry::get_template;
use crate::render::{render, synthesize_context, synthesize_git};
use crate::types::{PromptSpec, Template};

/// The single input a quick render is built from.
#[derive(Debug, Clone)]
pub enum QuickInput {
    File(ContextSummary),
    Error(String),
    Git(GitContextSummary),
}

/// Pick the section a quick input lands in. Error text prefers a
/// section labelled for errors; code and git context go to the first
/// auto-fillable section that is not error-specific.
fn target_section(template: &Template, input: &QuickInput) -> AppResult<&'static str> {
    let error_input = matches!(input, QuickInput::Error(_));

    if error_input {
        if let Some(section) = template
            .sections
            .iter()
            .find(|s| s.label.contains("Error"))
        {
            return Ok(section.label);
        }
    }

    template
        .sections
        .iter()
        .find(|s| s.context_eligible && (error_input || !s.label.contains("Error")))
        .or_else(|| template.first_context_section())
        .map(|s| s.label)
        .ok_or_else(|| {
            AppError::Prompt(format!(
                "template '{}' has no section that accepts context",
                template.name
            ))
        })
}

/// Assemble and render a one-shot prompt for a template and input.
pub fn quick(template_name: &str, input: QuickInput) -> AppResult<String> {
    let template = get_template(template_name)?;
    let label = target_section(template, &input)?;
    debug!(template = template.name, section = label, "quick render");

    let text = match &input {
        QuickInput::File(summary) => synthesize_context(summary)?,
        QuickInput::Error(message) => message.clone(),
        QuickInput::Git(summary) => synthesize_git(summary)?,
    };

    let mut spec = PromptSpec::new(template);
    spec.set(label, &text)?;
    render(template, &spec, None, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptcraft_context::{classify, extract};
    use std::path::Path;

    fn python_summary() -> ContextSummary {
        let source = "import os\n\ndef add(a, b):\n    return a + b\n";
        let profile = classify(Some(Path::new("calc.py")), source);
        extract(source, profile)
    }

    #[test]
    fn test_quick_equals_session_flow() {
        let summary = python_summary();
        let quick_out = quick("code-review", QuickInput::File(summary.clone())).unwrap();

        // The manual flow: fill the context section from the same
        // summary, then render the saved spec.
        let template = get_template("code-review").unwrap();
        let mut spec = PromptSpec::new(template);
        spec.set("Code", &synthesize_context(&summary).unwrap())
            .unwrap();
        let session_out = render(template, &spec, None, None).unwrap();

        assert_eq!(quick_out, session_out);
    }

    #[test]
    fn test_error_input_targets_error_section() {
        let out = quick(
            "debugging",
            QuickInput::Error("TypeError: 'NoneType' is not callable".to_string()),
        )
        .unwrap();
        assert!(out.contains("# Error Message\n\nTypeError: 'NoneType' is not callable"));
        // The code-context slot stays a hint.
        assert!(out.contains("# Code Context\n\n["));
    }

    #[test]
    fn test_file_input_skips_error_section() {
        let out = quick("debugging", QuickInput::File(python_summary())).unwrap();
        assert!(out.contains("# Code Context\n\nLanguage: python"));
        assert!(out.contains("# Error Message\n\n["));
    }

    #[test]
    fn test_unknown_template_fails_early() {
        let err = quick("nope", QuickInput::Error("x".to_string())).unwrap_err();
        assert!(matches!(err, AppError::TemplateNotFound(_)));
    }
}
