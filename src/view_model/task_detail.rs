//! The screen that shows, and edits, a single task

use std::error::Error;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::traits::TaskStore;
use crate::task::{Category, TaskId, TaskUpdate};
use crate::user::Session;
use crate::feedback::UserFeedback;
use crate::navigation::{Navigation, TaskRoute};

/// The fields of a task a user can edit
#[derive(Clone, Debug, PartialEq)]
pub struct EditableFields {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub due_date: DateTime<Utc>,
}

impl From<&TaskRoute> for EditableFields {
    fn from(route: &TaskRoute) -> Self {
        Self {
            title: route.title.clone(),
            description: route.description.clone(),
            category: route.category,
            due_date: route.due_date,
        }
    }
}

impl From<&EditableFields> for TaskUpdate {
    fn from(fields: &EditableFields) -> Self {
        TaskUpdate {
            title: Some(fields.title.clone()),
            description: Some(fields.description.clone()),
            category: Some(fields.category),
            due_date: Some(fields.due_date),
            ..TaskUpdate::default()
        }
    }
}

/// State of the task detail screen
pub struct TaskDetailViewModel<S: TaskStore> {
    store: Arc<S>,
    session: Session,

    /// What the screen was opened with
    route: TaskRoute,
    fields: EditableFields,
    is_editing: bool,
    is_loading: bool,
    feedback: Option<UserFeedback>,
}

impl<S: TaskStore> TaskDetailViewModel<S> {
    /// Build a view-model from the navigation parameters. The task is not fetched again
    pub fn new(store: Arc<S>, session: Session, route: TaskRoute) -> Self {
        let fields = EditableFields::from(&route);
        Self {
            store,
            session,
            route,
            fields,
            is_editing: false,
            is_loading: false,
            feedback: None,
        }
    }

    pub fn id(&self) -> &TaskId { &self.route.id }
    pub fn fields(&self) -> &EditableFields { &self.fields }
    pub fn is_editing(&self) -> bool { self.is_editing }
    pub fn is_loading(&self) -> bool { self.is_loading }
    pub fn feedback(&self) -> Option<&UserFeedback> { self.feedback.as_ref() }

    pub fn take_feedback(&mut self) -> Option<UserFeedback> {
        self.feedback.take()
    }

    pub fn status_text(&self) -> &'static str {
        if self.route.is_finished { "Completed" } else { "Pending" }
    }

    pub fn description_text(&self) -> &str {
        if self.fields.description.is_empty() {
            "No description provided"
        } else {
            &self.fields.description
        }
    }

    pub fn category_text(&self) -> &'static str {
        self.fields.category.map(|c| c.as_str()).unwrap_or("Uncategorized")
    }

    /// Only present when the task carries a finish date
    pub fn date_finished(&self) -> Option<&DateTime<Utc>> {
        self.route.date_finished.as_ref()
    }

    pub fn start_editing(&mut self) {
        self.is_editing = true;
    }

    /// Drop the pending edits, and go back to read-only mode
    pub fn cancel_editing(&mut self) {
        self.fields = EditableFields::from(&self.route);
        self.is_editing = false;
    }

    pub fn set_title<T: ToString>(&mut self, title: T) {
        self.fields.title = title.to_string();
    }
    pub fn set_description<T: ToString>(&mut self, description: T) {
        self.fields.description = description.to_string();
    }
    pub fn set_category(&mut self, category: Option<Category>) {
        self.fields.category = category;
    }
    pub fn set_due_date(&mut self, due_date: DateTime<Utc>) {
        self.fields.due_date = due_date;
    }

    /// Write the editable fields to the store.
    ///
    /// Editing mode is left whatever the outcome. On success, this returns where to navigate next.
    pub async fn save(&mut self) -> Result<Navigation, Box<dyn Error>> {
        log::debug!("Saving changes to task {}...", self.route.id);
        self.is_loading = true;
        let update = TaskUpdate::from(&self.fields);
        let result = self.store.update_fields(self.session.user_id(), &self.route.id, &update).await;
        self.is_loading = false;
        self.is_editing = false;

        match result {
            Ok(()) => {
                log::info!("Updated task {}", self.route.id);
                self.feedback = Some(UserFeedback::toast("Task updated successfully"));
                Ok(Navigation::Back)
            },
            Err(err) => {
                log::error!("Error updating document {}: {}", self.route.id, err);
                self.feedback = Some(UserFeedback::failure("Failed to update task. Please try again"));
                Err(err)
            },
        }
    }
}
