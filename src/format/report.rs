//! Verification report - the three labeled sections of a coherence check
//!
//! The reply is scanned for `[STATUS]:`, `[ANÁLISE]:` and `[SUGESTÃO]:`.
//! Each label owns the text after it up to the next recognized label or the
//! end of the reply; the first occurrence of a label wins.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Status when the reply carries no `[STATUS]:` marker
pub const STATUS_UNDEFINED: &str = "Indefinido";

/// Shown in place of an empty suggestion
pub const NO_SUGGESTION: &str = "Nenhuma sugestão adicional detectada.";

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[(STATUS|ANÁLISE|SUGESTÃO)\]:").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Status,
    Analysis,
    Suggestion,
}

impl Label {
    fn from_marker(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "status" => Some(Label::Status),
            "análise" => Some(Label::Analysis),
            "sugestão" => Some(Label::Suggestion),
            _ => None,
        }
    }
}

/// Parsed coherence-check reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub status: String,
    pub analysis: String,
    /// Empty when the provider gave none
    pub suggestion: String,
}

impl VerificationReport {
    /// Split a raw reply into status, analysis and suggestion
    pub fn parse(raw: &str) -> Self {
        let markers: Vec<(Label, usize, usize)> = MARKER
            .captures_iter(raw)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let label = Label::from_marker(caps.get(1)?.as_str())?;
                Some((label, whole.start(), whole.end()))
            })
            .collect();

        let section = |wanted: Label| -> Option<&str> {
            let idx = markers.iter().position(|(label, _, _)| *label == wanted)?;
            let start = markers[idx].2;
            let end = markers.get(idx + 1).map(|m| m.1).unwrap_or(raw.len());
            Some(raw[start..end].trim())
        };

        let status = section(Label::Status)
            .and_then(|s| s.lines().next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(STATUS_UNDEFINED)
            .to_string();

        let analysis = section(Label::Analysis)
            .unwrap_or_else(|| raw.trim())
            .to_string();

        let suggestion = section(Label::Suggestion).unwrap_or_default().to_string();

        Self {
            status,
            analysis,
            suggestion,
        }
    }

    /// Status reads as approved (case-insensitive "aprovado")
    pub fn is_approved(&self) -> bool {
        self.status.to_lowercase().contains("aprovado")
    }

    /// Suggestion text, or the fixed placeholder when there is none
    pub fn suggestion_or_placeholder(&self) -> &str {
        if self.suggestion.is_empty() {
            NO_SUGGESTION
        } else {
            &self.suggestion
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_three_markers() {
        let report = VerificationReport::parse("[STATUS]: Aprovado\n[ANÁLISE]: texto x\n[SUGESTÃO]: texto y");
        assert_eq!(report.status, "Aprovado");
        assert_eq!(report.analysis, "texto x");
        assert_eq!(report.suggestion, "texto y");
        assert!(report.is_approved());
    }

    #[test]
    fn test_missing_suggestion_keeps_analysis_to_end() {
        let raw = "[STATUS]: Alerta\n[ANÁLISE]: primeira linha\nsegunda linha\n";
        let report = VerificationReport::parse(raw);
        assert_eq!(report.status, "Alerta");
        assert_eq!(report.analysis, "primeira linha\nsegunda linha");
        assert_eq!(report.suggestion, "");
        assert_eq!(report.suggestion_or_placeholder(), NO_SUGGESTION);
        assert!(!report.is_approved());
    }

    #[test]
    fn test_no_markers_falls_back() {
        let raw = "  O modelo respondeu em formato livre.  ";
        let report = VerificationReport::parse(raw);
        assert_eq!(report.status, STATUS_UNDEFINED);
        assert_eq!(report.analysis, "O modelo respondeu em formato livre.");
        assert_eq!(report.suggestion, "");
    }

    #[test]
    fn test_status_takes_first_line_only() {
        let report = VerificationReport::parse("[STATUS]: Inconsistente\ncomentário solto\n[ANÁLISE]: a");
        assert_eq!(report.status, "Inconsistente");
        assert_eq!(report.analysis, "a");
    }

    #[test]
    fn test_markers_out_of_order() {
        let raw = "[SUGESTÃO]: s\n[STATUS]: Aprovado\n[ANÁLISE]: a";
        let report = VerificationReport::parse(raw);
        assert_eq!(report.status, "Aprovado");
        assert_eq!(report.analysis, "a");
        assert_eq!(report.suggestion, "s");
    }

    #[test]
    fn test_markers_case_insensitive() {
        let report = VerificationReport::parse("[Status]: aprovado com ressalvas\n[análise]: ok");
        assert_eq!(report.status, "aprovado com ressalvas");
        assert_eq!(report.analysis, "ok");
        assert!(report.is_approved());
    }

    #[test]
    fn test_first_occurrence_wins() {
        let raw = "[STATUS]: Alerta\n[ANÁLISE]: um\n[STATUS]: Aprovado";
        let report = VerificationReport::parse(raw);
        assert_eq!(report.status, "Alerta");
        assert_eq!(report.analysis, "um");
    }

    #[test]
    fn test_blank_status_is_undefined() {
        let report = VerificationReport::parse("[STATUS]:\n[ANÁLISE]: a");
        assert_eq!(report.status, STATUS_UNDEFINED);
    }
}
