//! The bundled template registry.
//!
//! Static data, built once per process. Templates are looked up by
//! name and listed in registration order.

use std::sync::OnceLock;

use promptcraft_core::{AppError, AppResult};

use crate::types::{Section, Template};

const fn section(label: &'static str, hint: &'static str) -> Section {
    Section {
        label,
        hint,
        context_eligible: false,
    }
}

const fn context_section(label: &'static str, hint: &'static str) -> Section {
    Section {
        label,
        hint,
        context_eligible: true,
    }
}

const PROMPT_SECTIONS: &[Section] = &[
    section("Persona", "Who the assistant should act as"),
    section("Task", "What the assistant should do"),
    context_section("Context", "Relevant code or project context"),
    section("Schemas", "Input/output formats or data shapes"),
    section("Examples", "Example inputs and expected outputs"),
    section("Constraints", "Rules and limits the answer must respect"),
];

const CODE_REVIEW_SECTIONS: &[Section] = &[
    context_section("Code", "The code to review"),
    section("Review Focus", "What the review should concentrate on"),
    section("Coding Standards", "Style guides or conventions to enforce"),
];

const DEBUGGING_SECTIONS: &[Section] = &[
    section("Error Message", "The exact error output"),
    context_section("Code Context", "The code where the error occurs"),
    section("Expected Behavior", "What should happen instead"),
    section("Attempted Fixes", "What has already been tried"),
];

const REFACTORING_SECTIONS: &[Section] = &[
    context_section("Current Code", "The code to refactor"),
    section("Refactoring Goal", "What the refactor should achieve"),
    section("Constraints", "Behavior or interfaces that must not change"),
];

const TESTING_SECTIONS: &[Section] = &[
    context_section("Code Under Test", "The code to write tests for"),
    section("Test Framework", "The test framework and conventions in use"),
    section("Coverage Goals", "Cases and edge conditions to cover"),
];

const FEATURE_PLANNING_SECTIONS: &[Section] = &[
    section("Feature Description", "What the new feature should do"),
    context_section("Existing Architecture", "Current structure the feature fits into"),
    section("Requirements", "Functional and non-functional requirements"),
    section("Acceptance Criteria", "How to tell the feature is done"),
];

fn registry() -> &'static Vec<Template> {
    static REGISTRY: OnceLock<Vec<Template>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        vec![
            Template {
                name: "prompt",
                description: "General-purpose structured prompt",
                sections: PROMPT_SECTIONS,
            },
            Template {
                name: "code-review",
                description: "Request a focused code review",
                sections: CODE_REVIEW_SECTIONS,
            },
            Template {
                name: "debugging",
                description: "Diagnose an error with full context",
                sections: DEBUGGING_SECTIONS,
            },
            Template {
                name: "refactoring",
                description: "Plan a behavior-preserving refactor",
                sections: REFACTORING_SECTIONS,
            },
            Template {
                name: "testing",
                description: "Generate tests for existing code",
                sections: TESTING_SECTIONS,
            },
            Template {
                name: "feature-planning",
                description: "Break a feature down into a plan",
                sections: FEATURE_PLANNING_SECTIONS,
            },
        ]
    })
}

/// All bundled templates, in registration order.
pub fn all_templates() -> &'static [Template] {
    registry()
}

/// Look up a template by name.
pub fn get_template(name: &str) -> AppResult<&'static Template> {
    registry()
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| AppError::TemplateNotFound(name.to_string()))
}
