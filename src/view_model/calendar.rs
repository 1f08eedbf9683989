//! The calendar screen: tasks indexed by the day they are due

use std::collections::BTreeMap;
use std::error::Error;
use std::sync::Arc;

use chrono::NaiveDate;
use itertools::Itertools;

use crate::traits::TaskStore;
use crate::task::{Task, TaskId};
use crate::user::Session;
use crate::feedback::UserFeedback;
use crate::navigation::{Navigation, TaskRoute};
use crate::utils::comparison::compare_tasks_by_due_date;

/// State of the calendar screen.
///
/// It fetches tasks on its own, and shares nothing with the task list
pub struct CalendarViewModel<S: TaskStore> {
    store: Arc<S>,
    session: Session,

    /// Tasks by local due day, each day sorted by due date
    by_day: BTreeMap<NaiveDate, Vec<Task>>,
    selected_day: Option<NaiveDate>,
    feedback: Option<UserFeedback>,
}

impl<S: TaskStore> CalendarViewModel<S> {
    pub fn new(store: Arc<S>, session: Session) -> Self {
        Self {
            store,
            session,
            by_day: BTreeMap::new(),
            selected_day: None,
            feedback: None,
        }
    }

    pub fn selected_day(&self) -> Option<NaiveDate> { self.selected_day }
    pub fn feedback(&self) -> Option<&UserFeedback> { self.feedback.as_ref() }

    pub fn take_feedback(&mut self) -> Option<UserFeedback> {
        self.feedback.take()
    }

    /// Fetch every task again, and rebuild the index.
    /// The selected day is kept.
    pub async fn refresh(&mut self) -> Result<(), Box<dyn Error>> {
        match self.store.list_tasks(self.session.user_id()).await {
            Ok(tasks) => {
                self.by_day = index_by_due_day(tasks);
                log::debug!("Calendar now has tasks on {} days", self.by_day.len());
                Ok(())
            },
            Err(err) => {
                log::error!("Error fetching tasks: {}", err);
                self.feedback = Some(UserFeedback::failure("Failed to fetch tasks. Please try again."));
                Err(err)
            },
        }
    }

    pub fn select_day(&mut self, day: NaiveDate) {
        self.selected_day = Some(day);
    }

    /// The tasks due on the selected day (nothing when no day is selected)
    pub fn tasks_for_selected_day(&self) -> &[Task] {
        match self.selected_day {
            None => &[],
            Some(day) => self.tasks_on(day),
        }
    }

    pub fn tasks_on(&self, day: NaiveDate) -> &[Task] {
        self.by_day.get(&day).map(|tasks| tasks.as_slice()).unwrap_or(&[])
    }

    /// Every day that has at least one task, in chronological order
    pub fn marked_days(&self) -> Vec<NaiveDate> {
        self.by_day.keys().copied().collect()
    }

    pub fn open(&self, id: &TaskId) -> Option<Navigation> {
        self.by_day.values()
            .flatten()
            .find(|t| t.id() == id)
            .map(|task| Navigation::TaskDetail(TaskRoute::from(task)))
    }
}

fn index_by_due_day(tasks: Vec<Task>) -> BTreeMap<NaiveDate, Vec<Task>> {
    tasks.into_iter()
        .into_group_map_by(|task| task.due_day())
        .into_iter()
        .map(|(day, tasks)| {
            let sorted = tasks.into_iter()
                .sorted_by(compare_tasks_by_due_date)
                .collect();
            (day, sorted)
        })
        .collect()
}
