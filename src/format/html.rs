//! HTML pages for verify and consolidate results
//!
//! Unlike prompts, pages are rendered with HTML escaping on, so the provider's
//! text is shown exactly as returned, markup characters included. Only `&`, `<`,
//! `>` and `"` are encoded.

use handlebars::Handlebars;
use serde::Serialize;

use super::report::VerificationReport;
use crate::domain::Topic;
use crate::error::{RedatorError, Result};

const LAYOUT_TEMPLATE: &str = include_str!("templates/layout.hbs");
const VERIFY_TEMPLATE: &str = include_str!("templates/verify.hbs");
const CONSOLIDATION_TEMPLATE: &str = include_str!("templates/consolidation.hbs");

/// Footer attribution on every page
pub const PAGE_FOOTER: &str = "Gerado com apoio de IA a partir do conteúdo autoral do pesquisador.";

#[derive(Serialize)]
struct VerifyPage<'a> {
    page_title: String,
    topic_id: &'a str,
    topic_title: &'a str,
    status: &'a str,
    approved: bool,
    analysis: &'a str,
    suggestion: &'a str,
    footer: &'a str,
}

#[derive(Serialize)]
struct ConsolidationPage<'a> {
    page_title: String,
    topic_id: &'a str,
    topic_title: &'a str,
    subtitle: &'a str,
    text: &'a str,
    footer: &'a str,
}

/// Minimal HTML escape: text nodes and double-quoted attributes only
fn escape_html(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders result pages
pub struct PageRenderer {
    handlebars: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.set_prevent_indent(true);
        handlebars.register_escape_fn(escape_html);
        for (name, source) in [
            ("layout", LAYOUT_TEMPLATE),
            ("verify", VERIFY_TEMPLATE),
            ("consolidation", CONSOLIDATION_TEMPLATE),
        ] {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| RedatorError::Template(format!("Failed to register page '{}': {}", name, e)))?;
        }
        Ok(Self { handlebars })
    }

    /// Coherence report page
    pub fn verify_page(&self, topic: &Topic, report: &VerificationReport) -> Result<String> {
        let page = VerifyPage {
            page_title: format!("Verificação - {}", topic.title),
            topic_id: &topic.id,
            topic_title: &topic.title,
            status: &report.status,
            approved: report.is_approved(),
            analysis: &report.analysis,
            suggestion: report.suggestion_or_placeholder(),
            footer: PAGE_FOOTER,
        };
        self.render("verify", &page)
    }

    /// Consolidated text inside a whitespace-preserving container
    pub fn consolidation_page(&self, topic: &Topic, subtitle: &str, text: &str) -> Result<String> {
        let page = ConsolidationPage {
            page_title: topic.title.clone(),
            topic_id: &topic.id,
            topic_title: &topic.title,
            subtitle,
            text,
            footer: PAGE_FOOTER,
        };
        self.render("consolidation", &page)
    }

    fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(name, context)
            .map_err(|e| RedatorError::Template(format!("Failed to render page '{}': {}", name, e)))
    }
}
