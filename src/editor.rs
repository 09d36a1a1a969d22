//! Editor - verify and consolidate orchestration
//!
//! load topic -> check owner -> (tasks) -> build prompt -> one provider call.
//! There are no retries; any provider failure or empty reply fails the request.

use std::sync::Arc;

use crate::domain::{Topic, UserId};
use crate::error::{RedatorError, Result};
use crate::format::VerificationReport;
use crate::llm::{CompletionProvider, CompletionRequest};
use crate::prompt::{CONSOLIDATE_SYSTEM_PROMPT, ConsolidationStyle, PromptBuilder, VERIFY_SYSTEM_PROMPT};
use crate::storage::{Storage, TopicStore};
use crate::workspace::Workspace;

/// Shown when consolidating a topic without tasks
pub const NO_TASKS_MESSAGE: &str = "Adicione ao menos uma task antes de consolidar o texto.";

/// Model identifiers per operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorModels {
    pub verify: String,
    pub consolidate: String,
}

/// Consolidated text together with the topic it came from
#[derive(Debug, Clone)]
pub struct Consolidation {
    pub topic: Topic,
    pub text: String,
}

pub struct Editor<S: Storage> {
    workspace: Workspace<S>,
    store: TopicStore<S>,
    provider: Arc<dyn CompletionProvider>,
    prompts: PromptBuilder,
    models: EditorModels,
}

impl<S: Storage> Editor<S> {
    pub fn new(store: TopicStore<S>, provider: Arc<dyn CompletionProvider>, models: EditorModels) -> Result<Self> {
        Ok(Self {
            workspace: Workspace::new(store.clone()),
            store,
            provider,
            prompts: PromptBuilder::new()?,
            models,
        })
    }

    /// Coherence check of problem, thesis and objective
    pub async fn verify(&self, user: &UserId, topic_id: &str) -> Result<(Topic, VerificationReport)> {
        let topic = self.workspace.owned_topic(user, topic_id)?;
        let prompt = self.prompts.verify(&topic.structure)?;

        let text = self.ask(&self.models.verify, VERIFY_SYSTEM_PROMPT, prompt).await?;
        Ok((topic, VerificationReport::parse(&text)))
    }

    /// Merge outline and tasks into one article
    pub async fn consolidate(&self, user: &UserId, topic_id: &str, style: ConsolidationStyle) -> Result<Consolidation> {
        let topic = self.workspace.owned_topic(user, topic_id)?;
        let tasks = self.store.tasks_of(topic_id)?;
        if tasks.is_empty() {
            return Err(RedatorError::ValidationFailed(NO_TASKS_MESSAGE.to_string()));
        }

        let prompt = self.prompts.consolidate(&topic, &tasks, style)?;
        let text = self
            .ask(&self.models.consolidate, CONSOLIDATE_SYSTEM_PROMPT, prompt)
            .await?;
        Ok(Consolidation { topic, text })
    }

    async fn ask(&self, model: &str, system: &str, prompt: String) -> Result<String> {
        let request = CompletionRequest::new(model)
            .with_system(system)
            .with_user_message(prompt);

        let response = self.provider.complete(request).await.map_err(|e| {
            log::warn!("Completion with {} failed: {}", model, e);
            RedatorError::from(e)
        })?;

        if response.content.trim().is_empty() {
            log::warn!("Completion with {} returned empty content", model);
            return Err(RedatorError::Provider("empty completion".to_string()));
        }
        log::debug!("Completion used {} tokens", response.usage.total());
        Ok(response.content)
    }
}
