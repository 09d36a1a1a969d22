//! Storage layer for Redator - JSONL-backed record store.
//!
//! Topics live in one collection; the tasks of each topic live in a
//! collection of their own, so ownership follows containment.

mod jsonl;
mod topics;
mod traits;

pub use jsonl::JsonlStorage;
pub use topics::{TOPICS_COLLECTION, TopicStore, tasks_collection};
pub use traits::{Filter, HasId, Storage};
