//! The "add task" screen

use std::error::Error;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::traits::TaskStore;
use crate::task::{Category, TaskDraft, TaskId};
use crate::user::Session;
use crate::feedback::UserFeedback;
use crate::navigation::Navigation;

/// Holds a draft task until it is submitted
pub struct TaskCreationViewModel<S: TaskStore> {
    store: Arc<S>,
    session: Session,

    draft: TaskDraft,
    is_loading: bool,
    feedback: Option<UserFeedback>,
}

impl<S: TaskStore> TaskCreationViewModel<S> {
    pub fn new(store: Arc<S>, session: Session) -> Self {
        Self {
            store,
            session,
            draft: TaskDraft::new(),
            is_loading: false,
            feedback: None,
        }
    }

    pub fn draft(&self) -> &TaskDraft { &self.draft }
    pub fn is_loading(&self) -> bool { self.is_loading }
    pub fn feedback(&self) -> Option<&UserFeedback> { self.feedback.as_ref() }

    pub fn take_feedback(&mut self) -> Option<UserFeedback> {
        self.feedback.take()
    }

    pub fn set_title<T: ToString>(&mut self, title: T) {
        self.draft.title = title.to_string();
    }
    pub fn set_description<T: ToString>(&mut self, description: T) {
        self.draft.description = description.to_string();
    }
    pub fn set_category(&mut self, category: Option<Category>) {
        self.draft.category = category;
    }
    pub fn set_due_date(&mut self, due_date: DateTime<Utc>) {
        self.draft.due_date = due_date;
    }

    /// Send the draft to the store.
    ///
    /// On success, the draft is cleared, and this returns the ID of the new task together with where to navigate next. \
    /// On failure, the draft is kept as is, so that the user can try again.
    pub async fn submit(&mut self) -> Result<(TaskId, Navigation), Box<dyn Error>> {
        if self.draft.title.trim().is_empty() {
            log::warn!("Not adding a task without a title");
            self.feedback = Some(UserFeedback::failure("Please enter a title."));
            return Err("A task requires a title".into());
        }

        self.is_loading = true;
        let result = self.store.create_task(self.session.user_id(), &self.draft).await;
        self.is_loading = false;

        match result {
            Ok(id) => {
                log::info!("Document written with ID: {}", id);
                self.draft = TaskDraft::new();
                self.feedback = Some(UserFeedback::toast("Task added successfully"));
                Ok((id, Navigation::Home))
            },
            Err(err) => {
                log::error!("Error adding document: {}", err);
                self.feedback = Some(UserFeedback::failure("Failed to add task. Please try again."));
                Err(err)
            },
        }
    }
}
