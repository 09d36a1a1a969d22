//! Document blocks - classification of provider output into a paginated article
//!
//! Lines are split, blanks dropped, short lines naming a known section become
//! upper-cased headings, and every heading after the first is preceded by a
//! page break. The result is format-agnostic; `docx` serializes it.

use super::markup::{Run, reduce_line};

/// Longest trimmed line (exclusive, in characters) that may still be a heading
pub const HEADING_MAX_CHARS: usize = 40;

/// Case-folded keywords that mark a section heading
pub const SECTION_KEYWORDS: &[&str] = &[
    "resumo",
    "abstract",
    "introdução",
    "introduction",
    "referencial teórico",
    "theoretical framework",
    "metodologia",
    "methodology",
    "resultados e discussão",
    "results and discussion",
    "conclusão",
    "conclusion",
    "referências",
    "references",
];

/// Fixed framing text around the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLayout {
    pub subtitle: String,
    pub closing: String,
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self {
            subtitle: "Artigo Científico Consolidado".to_string(),
            closing: "Documento gerado a partir do conteúdo autoral do pesquisador.".to_string(),
        }
    }
}

/// One typed block of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    Subtitle(String),
    Heading(Vec<Run>),
    Paragraph(Vec<Run>),
    PageBreak,
    /// Deliberate empty paragraph before the closing line
    Spacer,
    Closing(String),
}

/// A titled article ready for serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// True when the trimmed line names a section and is short enough to be a title
pub fn is_section_heading(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.chars().count() >= HEADING_MAX_CHARS {
        return false;
    }
    let folded = trimmed.to_lowercase();
    SECTION_KEYWORDS.iter().any(|k| folded.contains(k))
}

/// Body blocks for raw provider text, without title or closing.
/// `\n`, `\r\n` and a bare `\r` all end a line.
pub fn body_blocks(raw: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut seen_heading = false;

    for line in raw.split(['\n', '\r']) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_section_heading(trimmed) {
            if seen_heading {
                blocks.push(Block::PageBreak);
            }
            seen_heading = true;
            blocks.push(Block::Heading(reduce_line(&trimmed.to_uppercase())));
        } else {
            blocks.push(Block::Paragraph(reduce_line(trimmed)));
        }
    }

    blocks
}

/// Full document: title, subtitle, body, spacer, closing
pub fn build_document(title: &str, raw: &str, layout: &DocumentLayout) -> Document {
    let mut blocks = vec![
        Block::Title(title.trim().to_string()),
        Block::Subtitle(layout.subtitle.clone()),
    ];
    blocks.extend(body_blocks(raw));
    blocks.push(Block::Spacer);
    blocks.push(Block::Closing(layout.closing.clone()));
    Document { blocks }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_keyword_line_is_heading() {
        assert!(is_section_heading("Introdução"));
        assert!(is_section_heading("  CONCLUSÃO  "));
        assert!(is_section_heading("5. Resultados e Discussão"));
        assert!(is_section_heading("References"));
    }

    #[test]
    fn test_long_keyword_line_is_body() {
        let line = "Nesta seção a introdução ao tema é retomada com cuidado";
        assert!(line.chars().count() >= HEADING_MAX_CHARS);
        assert!(!is_section_heading(line));

        let blocks = body_blocks(&format!("Resumo\n{}\nConclusão", line));
        assert_eq!(blocks.len(), 4);
        assert!(matches!(blocks[0], Block::Heading(_)));
        assert!(matches!(blocks[1], Block::Paragraph(_)));
        assert_eq!(blocks[2], Block::PageBreak);
        assert!(matches!(blocks[3], Block::Heading(_)));
    }

    #[test]
    fn test_length_guard_counts_characters_not_bytes() {
        // 37 characters, more than 40 bytes because of the accents
        let line = "Conclusão ção ção ção ção ção ção ção";
        assert!(line.len() >= HEADING_MAX_CHARS);
        assert!(line.chars().count() < HEADING_MAX_CHARS);
        assert!(is_section_heading(line));
    }

    #[test]
    fn test_no_keyword_is_body() {
        assert!(!is_section_heading("Desenvolvimento"));
    }

    #[test]
    fn test_markdown_heading_becomes_upper_case() {
        let blocks = body_blocks("### Introdução");
        assert_eq!(blocks, vec![Block::Heading(vec![Run::plain("INTRODUÇÃO")])]);
    }

    #[test]
    fn test_first_heading_has_no_page_break() {
        let blocks = body_blocks("Introdução\ntexto\nMetodologia\nmais\nConclusão");
        assert_ne!(blocks[0], Block::PageBreak);
        assert_eq!(
            blocks,
            vec![
                Block::Heading(vec![Run::plain("INTRODUÇÃO")]),
                Block::Paragraph(vec![Run::plain("texto")]),
                Block::PageBreak,
                Block::Heading(vec![Run::plain("METODOLOGIA")]),
                Block::Paragraph(vec![Run::plain("mais")]),
                Block::PageBreak,
                Block::Heading(vec![Run::plain("CONCLUSÃO")]),
            ]
        );
    }

    #[test]
    fn test_every_later_heading_is_preceded_by_page_break() {
        let raw = "prefácio\nResumo\na\nIntrodução\nb\nReferências";
        let blocks = body_blocks(raw);
        let heading_positions: Vec<usize> = blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| matches!(b, Block::Heading(_)))
            .map(|(i, _)| i)
            .collect();

        assert_eq!(heading_positions.len(), 3);
        assert_ne!(blocks[heading_positions[0] - 1], Block::PageBreak);
        for pos in &heading_positions[1..] {
            assert_eq!(blocks[pos - 1], Block::PageBreak);
        }
        let breaks = blocks.iter().filter(|b| **b == Block::PageBreak).count();
        assert_eq!(breaks, 2);
    }

    #[test]
    fn test_blank_lines_never_produce_blocks() {
        let blocks = body_blocks("\n   \n\tum\n\n \r\ndois\n\n");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph(vec![Run::plain("um")]),
                Block::Paragraph(vec![Run::plain("dois")]),
            ]
        );
    }

    #[test]
    fn test_bare_carriage_return_ends_a_line() {
        let blocks = body_blocks("Introdução\rtexto corrido\rConclusão");
        assert_eq!(
            blocks,
            vec![
                Block::Heading(vec![Run::plain("INTRODUÇÃO")]),
                Block::Paragraph(vec![Run::plain("texto corrido")]),
                Block::PageBreak,
                Block::Heading(vec![Run::plain("CONCLUSÃO")]),
            ]
        );
    }

    #[test]
    fn test_consecutive_lines_stay_separate() {
        let blocks = body_blocks("linha um\nlinha dois");
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_paragraph_keeps_bold_runs() {
        let blocks = body_blocks("**Conclusão:** o resultado foi positivo e consistente com a tese");
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![
                Run::bold("Conclusão:"),
                Run::plain(" o resultado foi positivo e consistente com a tese"),
            ])]
        );
    }

    #[test]
    fn test_no_headings_is_valid() {
        let doc = build_document("T", "apenas texto", &DocumentLayout::default());
        assert!(!doc.blocks.iter().any(|b| matches!(b, Block::Heading(_))));
        assert!(!doc.blocks.contains(&Block::PageBreak));
    }

    #[test]
    fn test_build_document_frames_body() {
        let layout = DocumentLayout {
            subtitle: "Sub".to_string(),
            closing: "Fim".to_string(),
        };
        let doc = build_document(" Evasão escolar ", "Introdução\ntexto", &layout);

        assert_eq!(doc.blocks.first(), Some(&Block::Title("Evasão escolar".to_string())));
        assert_eq!(doc.blocks[1], Block::Subtitle("Sub".to_string()));
        let n = doc.blocks.len();
        assert_eq!(doc.blocks[n - 2], Block::Spacer);
        assert_eq!(doc.blocks[n - 1], Block::Closing("Fim".to_string()));
        assert_eq!(doc.blocks[2], Block::Heading(vec![Run::plain("INTRODUÇÃO")]));
    }
}
