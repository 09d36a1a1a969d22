//! Prompt System - deterministic prompt assembly
//!
//! Templates live in `templates/` and are rendered with Handlebars.

mod builder;
mod render;

pub use builder::{
    CONSOLIDATE_SYSTEM_PROMPT, ConsolidationStyle, FIELD_PLACEHOLDER, PromptBuilder, VERIFY_SYSTEM_PROMPT,
};
pub use render::PromptRenderer;
