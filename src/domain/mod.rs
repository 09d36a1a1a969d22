//! Domain types for Redator
//!
//! - Topic: a research topic owned by one user, carrying the fixed outline
//! - Structure: the six outline fields of a topic
//! - Task: a freeform note contained in a topic
//! - UserId: the stable identity yielded by the session authority

pub mod task;
pub mod topic;

pub use task::Task;
pub use topic::{OutlineField, Structure, Topic, UserId};
