use chrono::{DateTime, Utc};
use promptcraft_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// One slot in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub label: &'static str,
    /// Shown when the section is neither filled nor synthesizable.
    pub hint: &'static str,
    /// Whether rendering may auto-fill this slot from a context or
    /// git summary.
    pub context_eligible: bool,
}

/// A named, ordered list of sections. Templates are static registry
/// data; they are copied into a [`PromptSpec`] when used, never
/// mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    pub description: &'static str,
    pub sections: &'static [Section],
}

impl Template {
    /// First auto-fillable section, if the template has one.
    pub fn first_context_section(&self) -> Option<&Section> {
        self.sections.iter().find(|s| s.context_eligible)
    }
}

/// A filled section value inside a prompt specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionValue {
    pub label: String,
    pub text: String,
}

/// A working instance of a template: the template id plus one value
/// per template section, in template order. This is the unit of
/// persistence (a "session").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSpec {
    pub template: String,
    pub sections: Vec<SectionValue>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl PromptSpec {
    /// Create an empty specification for a template: every section
    /// present, every value blank.
    pub fn new(template: &Template) -> Self {
        let now = Utc::now();
        PromptSpec {
            template: template.name.to_string(),
            sections: template
                .sections
                .iter()
                .map(|s| SectionValue {
                    label: s.label.to_string(),
                    text: String::new(),
                })
                .collect(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Fill one section by label. The section set is fixed by the
    /// template, so an unknown label is an error rather than an
    /// insertion.
    pub fn set(&mut self, label: &str, text: &str) -> AppResult<()> {
        let Some(value) = self.sections.iter_mut().find(|v| v.label == label) else {
            return Err(AppError::Prompt(format!(
                "template '{}' has no section named '{label}'",
                self.template
            )));
        };
        value.text = text.to_string();
        self.modified_at = Utc::now();
        Ok(())
    }

    pub fn section_text(&self, label: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|v| v.label == label)
            .map(|v| v.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTIONS: &[Section] = &[
        Section {
            label: "Task",
            hint: "What should be done",
            context_eligible: false,
        },
        Section {
            label: "Context",
            hint: "Relevant code context",
            context_eligible: true,
        },
    ];

    const TEMPLATE: Template = Template {
        name: "demo",
        description: "demo template",
        sections: SECTIONS,
    };

    #[test]
    fn test_new_spec_mirrors_template_sections() {
        let spec = PromptSpec::new(&TEMPLATE);
        assert_eq!(spec.template, "demo");
        assert_eq!(spec.sections.len(), 2);
        assert_eq!(spec.sections[0].label, "Task");
        assert!(spec.sections.iter().all(|v| v.text.is_empty()));
    }

    #[test]
    fn test_set_known_and_unknown_labels() {
        let mut spec = PromptSpec::new(&TEMPLATE);
        spec.set("Task", "refactor the parser").unwrap();
        assert_eq!(spec.section_text("Task"), Some("refactor the parser"));
        assert!(spec.set("Nope", "x").is_err());
        // Setting never grows the section list.
        assert_eq!(spec.sections.len(), 2);
    }
}
