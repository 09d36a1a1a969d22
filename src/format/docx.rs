//! Office document serialization of a `Document`

use std::io::Cursor;

use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run as DocxRun};

use super::document::{Block, Document};
use super::markup::Run;
use crate::error::{RedatorError, Result};

/// MIME type of the produced file
pub const DOCX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

// Half-points
const TITLE_SIZE: usize = 32;
const HEADING_SIZE: usize = 28;

/// Attachment filename for a topic's article
pub fn docx_filename(topic_id: &str) -> String {
    format!("artigo-{}.docx", topic_id)
}

/// Serialize blocks into a .docx byte stream
pub fn render_docx(document: &Document) -> Result<Vec<u8>> {
    let mut docx = Docx::new();
    for block in &document.blocks {
        docx = docx.add_paragraph(paragraph_for(block));
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| RedatorError::Document(format!("Failed to pack docx: {}", e)))?;
    Ok(buf.into_inner())
}

fn paragraph_for(block: &Block) -> Paragraph {
    match block {
        Block::Title(text) => Paragraph::new()
            .add_run(DocxRun::new().add_text(text).bold().size(TITLE_SIZE))
            .align(AlignmentType::Center),
        Block::Subtitle(text) => Paragraph::new()
            .add_run(DocxRun::new().add_text(text).italic())
            .align(AlignmentType::Center),
        Block::Heading(runs) => runs
            .iter()
            .fold(Paragraph::new(), |p, run| {
                p.add_run(DocxRun::new().add_text(&run.text).bold().size(HEADING_SIZE))
            }),
        Block::Paragraph(runs) => runs
            .iter()
            .fold(Paragraph::new(), |p, run| p.add_run(styled(run)))
            .align(AlignmentType::Both),
        Block::PageBreak => Paragraph::new().add_run(DocxRun::new().add_break(BreakType::Page)),
        Block::Spacer => Paragraph::new(),
        Block::Closing(text) => Paragraph::new()
            .add_run(DocxRun::new().add_text(text).italic())
            .align(AlignmentType::Center),
    }
}

fn styled(run: &Run) -> DocxRun {
    let out = DocxRun::new().add_text(&run.text);
    if run.bold { out.bold() } else { out }
}
