//! Screens the app can be asked to show

use chrono::{DateTime, Utc};

use crate::task::{Category, Task, TaskId};

/// A request to change screen, returned by view-models and the session holder
#[derive(Clone, Debug, PartialEq)]
pub enum Navigation {
    Login,
    Register,
    /// The task list
    Home,
    /// Go back to whatever screen was shown before
    Back,
    TaskDetail(TaskRoute),
}

/// The parameters handed to the task detail screen.
///
/// The detail screen works on this snapshot, it does not fetch the task again
#[derive(Clone, Debug, PartialEq)]
pub struct TaskRoute {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub is_finished: bool,
    pub date_added: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub date_finished: Option<DateTime<Utc>>,
}

impl From<&Task> for TaskRoute {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().clone(),
            title: task.title().to_string(),
            description: task.description().to_string(),
            category: task.category(),
            is_finished: task.is_finished(),
            date_added: *task.date_added(),
            due_date: *task.due_date(),
            date_finished: task.date_finished().copied(),
        }
    }
}
