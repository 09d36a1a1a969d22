//! Prompt Builder - pure functions from a topic snapshot to prompt text
//!
//! For identical inputs the output is byte-identical: fields are read in a
//! fixed order, blanks become `FIELD_PLACEHOLDER`, and tasks are re-sorted by
//! creation time before rendering.

use serde::{Deserialize, Serialize};

use super::render::PromptRenderer;
use crate::domain::{OutlineField, Structure, Task, Topic};
use crate::error::Result;

/// Rendered in place of any blank or absent outline field
pub const FIELD_PLACEHOLDER: &str = "Não definido";

/// System turn for coherence checks
pub const VERIFY_SYSTEM_PROMPT: &str = "Você é um validador acadêmico rigoroso que não inventa conteúdo.";

/// System turn for consolidation
pub const CONSOLIDATE_SYSTEM_PROMPT: &str = "Você é um formatador acadêmico rigoroso que não inventa conteúdo.";

const VERIFY_TEMPLATE: &str = include_str!("templates/verify.md");
const CONSOLIDATE_TEMPLATE: &str = include_str!("templates/consolidate.md");

/// Macro-structure requested from the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsolidationStyle {
    /// Introduction, development, conclusion
    #[default]
    Classic,
    /// Abstract through references, one heading per line
    Extended,
}

#[derive(Serialize)]
struct VerifyContext<'a> {
    problema: &'a str,
    tese: &'a str,
    objetivo: &'a str,
}

#[derive(Serialize)]
struct ConsolidateContext<'a> {
    title: &'a str,
    outline: String,
    tasks: String,
    extended: bool,
}

/// Builds the user turn for verify and consolidate requests
pub struct PromptBuilder {
    renderer: PromptRenderer,
}

impl PromptBuilder {
    pub fn new() -> Result<Self> {
        let mut renderer = PromptRenderer::new();
        renderer.register_template("verify", VERIFY_TEMPLATE)?;
        renderer.register_template("consolidate", CONSOLIDATE_TEMPLATE)?;
        Ok(Self { renderer })
    }

    /// Coherence-check prompt over problem, thesis and objective
    pub fn verify(&self, structure: &Structure) -> Result<String> {
        let context = VerifyContext {
            problema: field_or_placeholder(structure, OutlineField::Problema),
            tese: field_or_placeholder(structure, OutlineField::Tese),
            objetivo: field_or_placeholder(structure, OutlineField::Objetivo),
        };
        self.renderer.render_named("verify", &context)
    }

    /// Consolidation prompt over the full outline and every task
    pub fn consolidate(&self, topic: &Topic, tasks: &[Task], style: ConsolidationStyle) -> Result<String> {
        let structure = &topic.structure;
        let title = if topic.title.trim().is_empty() {
            FIELD_PLACEHOLDER
        } else {
            topic.title.as_str()
        };

        let context = ConsolidateContext {
            title,
            outline: render_outline(structure),
            tasks: render_tasks(tasks),
            extended: style == ConsolidationStyle::Extended,
        };
        self.renderer.render_named("consolidate", &context)
    }
}

fn field_or_placeholder(structure: &Structure, field: OutlineField) -> &str {
    structure.get(field).unwrap_or(FIELD_PLACEHOLDER)
}

/// `<Label>: <value>` for every outline field, in display order
fn render_outline(structure: &Structure) -> String {
    OutlineField::ALL
        .iter()
        .map(|field| format!("{}: {}", field.label(), field_or_placeholder(structure, *field)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `Task [<title>]\n<content>` blocks in ascending creation order, blank-line separated
fn render_tasks(tasks: &[Task]) -> String {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    ordered
        .iter()
        .map(|t| format!("Task [{}]\n{}", t.title, t.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
