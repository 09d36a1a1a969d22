//! Redator - academic outline editor
//!
//! Users keep research topics with a fixed outline and freeform task notes.
//! Two operations send that material to a chat-completion provider: a
//! coherence check of the outline, and consolidation of outline and tasks
//! into one article rendered as HTML or .docx.

pub mod config;
pub mod domain;
pub mod editor;
pub mod error;
pub mod format;
pub mod id;
pub mod llm;
pub mod prompt;
pub mod server;
pub mod session;
pub mod storage;
pub mod workspace;

pub use error::{RedatorError, Result};
