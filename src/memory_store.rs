//! This module provides an in-memory task store
//!
//! It can optionally be backed by a JSON file, and its behaviour can be tweaked to simulate backend failures.

use std::path::PathBuf;
use std::path::Path;
use std::error::Error;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use async_trait::async_trait;

use crate::traits::TaskStore;
use crate::task::{Task, TaskDraft, TaskId, TaskUpdate};
use crate::user::UserId;
use crate::mock_behaviour::{MockBehaviour, Operation};


/// A task store that keeps everything in memory
#[derive(Debug)]
pub struct MemoryStore {
    backing_file: Option<PathBuf>,
    data: Mutex<StoredData>,

    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredData {
    /// Tasks of every user, in the order they have been created
    collections: HashMap<UserId, Vec<Task>>,
}

impl MemoryStore {
    /// Create an empty store, that is not backed by any file
    pub fn new() -> Self {
        Self {
            backing_file: None,
            data: Mutex::new(StoredData::default()),
            mock_behaviour: None,
        }
    }

    /// Create an empty store, that will be saved to `path` by [`Self::save_to_file`]
    pub fn new_with_file(path: &Path) -> Self {
        Self {
            backing_file: Some(PathBuf::from(path)),
            ..Self::new()
        }
    }

    /// Initialize a store from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let data = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(file)?,
        };

        Ok(Self {
            backing_file: Some(PathBuf::from(path)),
            data: Mutex::new(data),
            mock_behaviour: None,
        })
    }

    /// Store the current content to the backing file
    pub fn save_to_file(&self) -> Result<(), Box<dyn Error>> {
        let path = match &self.backing_file {
            None => return Err("This store has no backing file".into()),
            Some(path) => path,
        };
        let file = std::fs::File::create(path)?;
        let data = self.lock_data()?;
        serde_json::to_writer(file, &*data)?;
        log::debug!("Saved store to {:?}", path);
        Ok(())
    }

    pub fn set_mock_behaviour(&mut self, mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>) {
        self.mock_behaviour = mock_behaviour;
    }

    /// Put a task with an already known ID in the collection of `user`, replacing any task with the same ID.
    ///
    /// This bypasses the mock behaviour, and is meant to seed a store before a test
    pub fn insert_task(&self, user: &UserId, task: Task) -> Result<(), Box<dyn Error>> {
        let mut data = self.lock_data()?;
        let collection = data.collections.entry(user.clone()).or_insert_with(Vec::new);
        match collection.iter_mut().find(|t| t.id() == task.id()) {
            Some(existing) => *existing = task,
            None => collection.push(task),
        }
        Ok(())
    }

    /// How many tasks `user` has
    pub fn n_tasks(&self, user: &UserId) -> usize {
        self.lock_data()
            .map(|data| data.collections.get(user).map(|c| c.len()).unwrap_or(0))
            .unwrap_or(0)
    }

    fn lock_data(&self) -> Result<MutexGuard<'_, StoredData>, Box<dyn Error>> {
        self.data.lock().map_err(|err| format!("Store data is poisoned: {}", err).into())
    }

    fn check_behaviour(&self, op: Operation) -> Result<(), Box<dyn Error>> {
        match &self.mock_behaviour {
            None => Ok(()),
            Some(mock) => {
                let mut mock = mock.lock().map_err(|err| format!("Mock behaviour is poisoned: {}", err))?;
                mock.check(op)
            },
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, user: &UserId, draft: &TaskDraft) -> Result<TaskId, Box<dyn Error>> {
        self.check_behaviour(Operation::CreateTask)?;

        let id = TaskId::random();
        let mut data = self.lock_data()?;
        data.collections
            .entry(user.clone())
            .or_insert_with(Vec::new)
            .push(Task::from_draft(id.clone(), draft));
        log::debug!("Created task {} for {}", id, user);
        Ok(id)
    }

    async fn list_tasks(&self, user: &UserId) -> Result<Vec<Task>, Box<dyn Error>> {
        self.check_behaviour(Operation::ListTasks)?;

        let data = self.lock_data()?;
        Ok(data.collections.get(user).cloned().unwrap_or_default())
    }

    async fn update_fields(&self, user: &UserId, id: &TaskId, update: &TaskUpdate) -> Result<(), Box<dyn Error>> {
        self.check_behaviour(Operation::UpdateFields)?;

        let mut data = self.lock_data()?;
        let task = data.collections
            .get_mut(user)
            .and_then(|collection| collection.iter_mut().find(|t| t.id() == id));
        match task {
            None => Err(format!("No task {} in {}", id, user.tasks_collection_path()).into()),
            Some(task) => {
                task.apply(update);
                Ok(())
            },
        }
    }

    async fn delete_task(&self, user: &UserId, id: &TaskId) -> Result<(), Box<dyn Error>> {
        self.check_behaviour(Operation::DeleteTask)?;

        let mut data = self.lock_data()?;
        let collection = match data.collections.get_mut(user) {
            None => return Err(format!("No task {} in {}", id, user.tasks_collection_path()).into()),
            Some(c) => c,
        };
        let n_before = collection.len();
        collection.retain(|t| t.id() != id);
        if collection.len() == n_before {
            return Err(format!("No task {} in {}", id, user.tasks_collection_path()).into());
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Category;

    #[tokio::test]
    async fn collections_are_per_user() {
        let store = MemoryStore::new();
        let alice = UserId::from("alice");
        let bob = UserId::from("bob");

        let mut draft = TaskDraft::new();
        draft.title = String::from("Alice's task");
        let id = store.create_task(&alice, &draft).await.unwrap();

        assert_eq!(store.list_tasks(&alice).await.unwrap().len(), 1);
        assert!(store.list_tasks(&bob).await.unwrap().is_empty());
        assert!(store.delete_task(&bob, &id).await.is_err());
        assert!(store.update_fields(&bob, &id, &TaskUpdate::finished(true)).await.is_err());
    }

    #[tokio::test]
    async fn update_and_delete() {
        let store = MemoryStore::new();
        let user = UserId::from("user");
        let mut draft = TaskDraft::new();
        draft.title = String::from("Buy milk");
        draft.category = Some(Category::Shopping);
        let id = store.create_task(&user, &draft).await.unwrap();

        store.update_fields(&user, &id, &TaskUpdate::finished(true)).await.unwrap();
        let tasks = store.list_tasks(&user).await.unwrap();
        assert!(tasks[0].is_finished());
        assert_eq!(tasks[0].category(), Some(Category::Shopping));

        // Writing nothing still requires the task to exist
        store.update_fields(&user, &id, &TaskUpdate::default()).await.unwrap();

        store.delete_task(&user, &id).await.unwrap();
        assert_eq!(store.n_tasks(&user), 0);
        let err = store.update_fields(&user, &id, &TaskUpdate::default()).await.unwrap_err();
        assert!(err.to_string().contains("users/user/tasks"));
        assert!(store.delete_task(&user, &id).await.is_err());
    }

    #[tokio::test]
    async fn mocked_failures() {
        let mut store = MemoryStore::new();
        let mock = Arc::new(Mutex::new(MockBehaviour::failing(Operation::CreateTask, 1, 1)));
        store.set_mock_behaviour(Some(Arc::clone(&mock)));
        let user = UserId::from("user");

        assert!(store.create_task(&user, &TaskDraft::new()).await.is_ok());
        assert!(store.create_task(&user, &TaskDraft::new()).await.is_err());
        assert!(store.create_task(&user, &TaskDraft::new()).await.is_ok());
        assert_eq!(store.n_tasks(&user), 2);
    }

    #[tokio::test]
    async fn serde_store() {
        let path = std::env::temp_dir().join(format!("pocket-tasks-{}.json", TaskId::random()));
        let store = MemoryStore::new_with_file(&path);
        let user = UserId::from("user");
        let mut draft = TaskDraft::new();
        draft.title = String::from("Persisted");
        store.create_task(&user, &draft).await.unwrap();
        store.save_to_file().unwrap();

        let retrieved = MemoryStore::from_file(&path).unwrap();
        assert_eq!(retrieved.list_tasks(&user).await.unwrap(), store.list_tasks(&user).await.unwrap());

        let _ = std::fs::remove_file(&path);
        assert!(MemoryStore::new().save_to_file().is_err());
    }
}
