//! Topic- and task-specific storage helpers.

use std::sync::Arc;

use super::traits::{Filter, Storage};
use crate::domain::{Task, Topic, UserId};
use crate::error::Result;

/// Collection name for topics.
pub const TOPICS_COLLECTION: &str = "topics";

/// Collection holding the tasks of one topic.
pub fn tasks_collection(topic_id: &str) -> String {
    format!("{}.{}.tasks", TOPICS_COLLECTION, topic_id)
}

/// Helper for topic and task queries.
///
/// No ownership checks happen here; see `workspace::Workspace`.
pub struct TopicStore<S: Storage> {
    storage: Arc<S>,
}

impl<S: Storage> Clone for TopicStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: Storage> TopicStore<S> {
    /// Create a new TopicStore wrapping the given storage.
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Get a topic by ID.
    pub fn get_topic(&self, id: &str) -> Result<Option<Topic>> {
        self.storage.get(TOPICS_COLLECTION, id)
    }

    /// All topics of an owner, newest first.
    pub fn topics_by_owner(&self, owner: &UserId) -> Result<Vec<Topic>> {
        let mut topics: Vec<Topic> = self
            .storage
            .query(TOPICS_COLLECTION, &[Filter::eq("owner_id", owner)])?;
        topics.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(topics)
    }

    pub fn create_topic(&self, topic: &Topic) -> Result<()> {
        self.storage.create(TOPICS_COLLECTION, topic)
    }

    pub fn update_topic(&self, topic: &Topic) -> Result<()> {
        self.storage.update(TOPICS_COLLECTION, topic)
    }

    /// Delete a topic together with its task collection.
    pub fn delete_topic(&self, id: &str) -> Result<()> {
        self.storage.delete(TOPICS_COLLECTION, id)?;
        self.storage.drop_collection(&tasks_collection(id))
    }

    /// Tasks of a topic in ascending creation order, whatever order the store returns.
    pub fn tasks_of(&self, topic_id: &str) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self.storage.list(&tasks_collection(topic_id))?;
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(tasks)
    }

    pub fn get_task(&self, topic_id: &str, task_id: &str) -> Result<Option<Task>> {
        self.storage.get(&tasks_collection(topic_id), task_id)
    }

    pub fn create_task(&self, topic_id: &str, task: &Task) -> Result<()> {
        self.storage.create(&tasks_collection(topic_id), task)
    }

    pub fn update_task(&self, topic_id: &str, task: &Task) -> Result<()> {
        self.storage.update(&tasks_collection(topic_id), task)
    }

    pub fn delete_task(&self, topic_id: &str, task_id: &str) -> Result<()> {
        self.storage.delete(&tasks_collection(topic_id), task_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonlStorage;
    use tempfile::TempDir;

    fn create_test_store() -> (TopicStore<JsonlStorage>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(JsonlStorage::new(temp_dir.path()).unwrap());
        (TopicStore::new(storage), temp_dir)
    }

    fn task_at(id: &str, created_at: &str) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            content: String::new(),
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn test_create_and_get_topic() {
        let (store, _temp) = create_test_store();
        let topic = Topic::new(UserId::new("alice"), "Tema");
        store.create_topic(&topic).unwrap();

        let retrieved = store.get_topic(&topic.id).unwrap();
        assert_eq!(retrieved, Some(topic));
    }

    #[test]
    fn test_topics_by_owner_filters_and_sorts_newest_first() {
        let (store, _temp) = create_test_store();
        let mut old = Topic::new(UserId::new("alice"), "old");
        old.created_at = "2026-01-01T00:00:00.000Z".to_string();
        let mut new = Topic::new(UserId::new("alice"), "new");
        new.created_at = "2026-02-01T00:00:00.000Z".to_string();
        let other = Topic::new(UserId::new("bob"), "other");

        store.create_topic(&old).unwrap();
        store.create_topic(&other).unwrap();
        store.create_topic(&new).unwrap();

        let topics = store.topics_by_owner(&UserId::new("alice")).unwrap();
        let titles: Vec<_> = topics.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[test]
    fn test_tasks_of_sorts_ascending_regardless_of_insert_order() {
        let (store, _temp) = create_test_store();
        let topic = Topic::new(UserId::new("alice"), "t");
        store.create_topic(&topic).unwrap();

        store.create_task(&topic.id, &task_at("c", "2026-01-03T00:00:00.000Z")).unwrap();
        store.create_task(&topic.id, &task_at("a", "2026-01-01T00:00:00.000Z")).unwrap();
        store.create_task(&topic.id, &task_at("b", "2026-01-02T00:00:00.000Z")).unwrap();

        let ids: Vec<_> = store.tasks_of(&topic.id).unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tasks_are_scoped_to_their_topic() {
        let (store, _temp) = create_test_store();
        let first = Topic::new(UserId::new("alice"), "first");
        let second = Topic::new(UserId::new("alice"), "second");
        store.create_task(&first.id, &Task::new("only in first")).unwrap();

        assert_eq!(store.tasks_of(&first.id).unwrap().len(), 1);
        assert!(store.tasks_of(&second.id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_topic_cascades_to_tasks() {
        let (store, _temp) = create_test_store();
        let topic = Topic::new(UserId::new("alice"), "t");
        store.create_topic(&topic).unwrap();
        store.create_task(&topic.id, &Task::new("n1")).unwrap();

        store.delete_topic(&topic.id).unwrap();

        assert!(store.get_topic(&topic.id).unwrap().is_none());
        assert!(store.tasks_of(&topic.id).unwrap().is_empty());
    }

    #[test]
    fn test_update_and_delete_task() {
        let (store, _temp) = create_test_store();
        let topic = Topic::new(UserId::new("alice"), "t");
        let mut task = Task::new("draft");
        store.create_task(&topic.id, &task).unwrap();

        task.content = "texto".to_string();
        store.update_task(&topic.id, &task).unwrap();
        assert_eq!(store.get_task(&topic.id, &task.id).unwrap().unwrap().content, "texto");

        store.delete_task(&topic.id, &task.id).unwrap();
        assert!(store.get_task(&topic.id, &task.id).unwrap().is_none());
    }
}
