//! Response formatting
//!
//! - markup: `**bold**` / `#` reduction into styled runs
//! - document: heading classification and page breaks
//! - report: `[STATUS]` / `[ANÁLISE]` / `[SUGESTÃO]` parsing
//! - html: result pages
//! - docx: office document serialization

pub mod document;
pub mod docx;
pub mod html;
pub mod markup;
pub mod report;

pub use document::{Block, Document, DocumentLayout, HEADING_MAX_CHARS, SECTION_KEYWORDS, body_blocks, build_document, is_section_heading};
pub use docx::{DOCX_CONTENT_TYPE, docx_filename, render_docx};
pub use html::{PAGE_FOOTER, PageRenderer};
pub use markup::{Run, reduce_line};
pub use report::{NO_SUGGESTION, STATUS_UNDEFINED, VerificationReport};
