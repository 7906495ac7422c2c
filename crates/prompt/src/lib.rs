//! Template registry, prompt specifications, and rendering.
//!
//! Templates are static, ordered lists of sections. A prompt
//! specification is a filled-in copy of one template: the unit the
//! session store persists. Rendering merges filled text, synthesized
//! context, and placeholder hints into one deterministic string.

pub mod quick;
pub mod registry;
pub mod render;
pub mod types;

pub use quick::{quick, QuickInput};
pub use registry::{all_templates, get_template};
pub use render::{render, synthesize_context, synthesize_git};
pub use types::{PromptSpec, Section, SectionValue, Template};
