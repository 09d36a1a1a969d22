//! Topic record and its outline structure

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{generate_topic_id, now_rfc3339};
use crate::storage::HasId;

/// Stable user identifier yielded by the session authority
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A research topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Unique identifier (timestamp + random suffix: "1738300800123-a1b2")
    pub id: String,

    /// Owner; set once at creation and never rewritten
    pub owner_id: UserId,

    pub title: String,

    /// RFC 3339 creation time
    pub created_at: String,

    #[serde(default)]
    pub structure: Structure,
}

impl Topic {
    /// Create an empty topic for its owner
    pub fn new(owner_id: UserId, title: impl Into<String>) -> Self {
        let now = now_rfc3339();
        Self {
            id: generate_topic_id(),
            owner_id,
            title: title.into(),
            created_at: now.clone(),
            structure: Structure {
                updated_at: Some(now),
                ..Default::default()
            },
        }
    }

    /// Returns true if `user` owns this topic
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner_id == *user
    }
}

impl HasId for Topic {
    fn id(&self) -> &str {
        &self.id
    }
}

/// The fixed outline of a topic. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Structure {
    pub problema: Option<String>,
    pub delimitacao: Option<String>,
    pub justificativa: Option<String>,
    pub objetivo: Option<String>,
    pub tese: Option<String>,
    pub conclusao_provisoria: Option<String>,
    pub updated_at: Option<String>,
}

impl Structure {
    /// Field value, or None when absent or blank
    pub fn get(&self, field: OutlineField) -> Option<&str> {
        let value = match field {
            OutlineField::Problema => &self.problema,
            OutlineField::Delimitacao => &self.delimitacao,
            OutlineField::Justificativa => &self.justificativa,
            OutlineField::Objetivo => &self.objetivo,
            OutlineField::Tese => &self.tese,
            OutlineField::ConclusaoProvisoria => &self.conclusao_provisoria,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }
}

/// The six outline fields, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlineField {
    Problema,
    Delimitacao,
    Justificativa,
    Objetivo,
    Tese,
    ConclusaoProvisoria,
}

impl OutlineField {
    pub const ALL: [OutlineField; 6] = [
        OutlineField::Problema,
        OutlineField::Delimitacao,
        OutlineField::Justificativa,
        OutlineField::Objetivo,
        OutlineField::Tese,
        OutlineField::ConclusaoProvisoria,
    ];

    /// Human label used in prompts
    pub fn label(&self) -> &'static str {
        match self {
            OutlineField::Problema => "Problema",
            OutlineField::Delimitacao => "Delimitação",
            OutlineField::Justificativa => "Justificativa",
            OutlineField::Objetivo => "Objetivo",
            OutlineField::Tese => "Tese",
            OutlineField::ConclusaoProvisoria => "Conclusão Provisória",
        }
    }
}
