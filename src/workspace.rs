//! Workspace - ownership-checked CRUD over topics and their tasks
//!
//! Every call names the caller. A topic that does not exist is `NotFound`;
//! a topic owned by someone else is `Unauthorized`, whatever the operation.

use crate::domain::{Structure, Task, Topic, UserId};
use crate::error::{RedatorError, Result};
use crate::id::now_rfc3339;
use crate::storage::{Storage, TopicStore};

/// Per-user view of the topic store
pub struct Workspace<S: Storage> {
    store: TopicStore<S>,
}

impl<S: Storage> Workspace<S> {
    pub fn new(store: TopicStore<S>) -> Self {
        Self { store }
    }

    /// Topic `topic_id` if `user` owns it
    pub fn owned_topic(&self, user: &UserId, topic_id: &str) -> Result<Topic> {
        let topic = self
            .store
            .get_topic(topic_id)?
            .ok_or_else(|| RedatorError::NotFound(format!("topic {}", topic_id)))?;

        if !topic.is_owned_by(user) {
            log::warn!("User {} denied access to topic {}", user, topic_id);
            return Err(RedatorError::Unauthorized);
        }
        Ok(topic)
    }

    /// Caller's topics, newest first
    pub fn list_topics(&self, user: &UserId) -> Result<Vec<Topic>> {
        self.store.topics_by_owner(user)
    }

    pub fn create_topic(&self, user: &UserId, title: &str) -> Result<Topic> {
        let title = required_title(title, "Informe um título para o tópico")?;
        let topic = Topic::new(user.clone(), title);
        self.store.create_topic(&topic)?;
        log::info!("Created topic {} for {}", topic.id, user);
        Ok(topic)
    }

    pub fn get_topic(&self, user: &UserId, topic_id: &str) -> Result<Topic> {
        self.owned_topic(user, topic_id)
    }

    /// Delete a topic and all of its tasks
    pub fn delete_topic(&self, user: &UserId, topic_id: &str) -> Result<()> {
        self.owned_topic(user, topic_id)?;
        self.store.delete_topic(topic_id)?;
        log::info!("Deleted topic {}", topic_id);
        Ok(())
    }

    /// Replace the whole outline; `updated_at` is always reset to now
    pub fn update_structure(&self, user: &UserId, topic_id: &str, structure: Structure) -> Result<Topic> {
        let mut topic = self.owned_topic(user, topic_id)?;
        topic.structure = Structure {
            updated_at: Some(now_rfc3339()),
            ..structure
        };
        self.store.update_topic(&topic)?;
        Ok(topic)
    }

    /// Tasks in ascending creation order
    pub fn list_tasks(&self, user: &UserId, topic_id: &str) -> Result<Vec<Task>> {
        self.owned_topic(user, topic_id)?;
        self.store.tasks_of(topic_id)
    }

    /// New task with blank content
    pub fn create_task(&self, user: &UserId, topic_id: &str, title: &str) -> Result<Task> {
        self.owned_topic(user, topic_id)?;
        let title = required_title(title, "Informe um título para a task")?;
        let task = Task::new(title);
        self.store.create_task(topic_id, &task)?;
        log::debug!("Created task {} in topic {}", task.id, topic_id);
        Ok(task)
    }

    pub fn get_task(&self, user: &UserId, topic_id: &str, task_id: &str) -> Result<Task> {
        self.owned_topic(user, topic_id)?;
        self.store
            .get_task(topic_id, task_id)?
            .ok_or_else(|| RedatorError::NotFound(format!("task {}", task_id)))
    }

    /// Overwrite content, and the title when one is given
    pub fn update_task(
        &self,
        user: &UserId,
        topic_id: &str,
        task_id: &str,
        title: Option<&str>,
        content: &str,
    ) -> Result<Task> {
        let mut task = self.get_task(user, topic_id, task_id)?;
        if let Some(title) = title {
            task.title = required_title(title, "Informe um título para a task")?;
        }
        task.content = content.to_string();
        self.store.update_task(topic_id, &task)?;
        Ok(task)
    }

    pub fn delete_task(&self, user: &UserId, topic_id: &str, task_id: &str) -> Result<()> {
        self.owned_topic(user, topic_id)?;
        self.store.delete_task(topic_id, task_id)
    }
}

fn required_title(title: &str, message: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(RedatorError::ValidationFailed(message.to_string()));
    }
    Ok(title.to_string())
}
