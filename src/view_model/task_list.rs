//! The task list, shown on the home screen

use std::error::Error;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::traits::TaskStore;
use crate::task::{Task, TaskId, TaskUpdate};
use crate::user::Session;
use crate::feedback::UserFeedback;
use crate::navigation::{Navigation, TaskRoute};
use super::{CategoryFilter, DueGroups};

/// State of the task list screen
pub struct TaskListViewModel<S: TaskStore> {
    store: Arc<S>,
    session: Session,

    /// Every task of the user, as last fetched (and locally modified since)
    tasks: Vec<Task>,
    filter: CategoryFilter,
    is_loading: bool,
    feedback: Option<UserFeedback>,
}

impl<S: TaskStore> TaskListViewModel<S> {
    /// Create a view-model. It starts loading, and holds no task until [`Self::refresh`] is called
    pub fn new(store: Arc<S>, session: Session) -> Self {
        Self {
            store,
            session,
            tasks: Vec::new(),
            filter: CategoryFilter::All,
            is_loading: true,
            feedback: None,
        }
    }

    pub fn tasks(&self) -> &[Task] { &self.tasks }
    pub fn filter(&self) -> CategoryFilter { self.filter }
    pub fn is_loading(&self) -> bool { self.is_loading }
    pub fn session(&self) -> &Session { &self.session }
    pub fn feedback(&self) -> Option<&UserFeedback> { self.feedback.as_ref() }

    /// Returns the last feedback, so that it is shown only once
    pub fn take_feedback(&mut self) -> Option<UserFeedback> {
        self.feedback.take()
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    /// Replace the local tasks with the full collection from the store.
    ///
    /// This is meant to be called whenever the screen gets the focus.
    /// In case of error, the previous tasks are kept.
    pub async fn refresh(&mut self) -> Result<(), Box<dyn Error>> {
        self.is_loading = true;
        let result = self.store.list_tasks(self.session.user_id()).await;
        self.is_loading = false;

        match result {
            Ok(tasks) => {
                log::debug!("Fetched {} tasks for {}", tasks.len(), self.session.user_id());
                self.tasks = tasks;
                Ok(())
            },
            Err(err) => {
                log::error!("Error fetching tasks: {}", err);
                self.feedback = Some(UserFeedback::failure("Failed to fetch tasks. Please try again."));
                Err(err)
            },
        }
    }

    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        log::debug!("Category changed to: {}", filter);
        self.filter = filter;
    }

    /// The tasks that match the current category filter, in store order
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks.iter()
            .filter(|t| self.filter.matches(t))
            .collect()
    }

    /// The visible tasks, split according to `today`
    pub fn groups(&self, today: NaiveDate) -> DueGroups<'_> {
        DueGroups::split(self.visible_tasks(), today)
    }

    /// The visible tasks, split according to the current local day
    pub fn groups_for_today(&self) -> DueGroups<'_> {
        self.groups(super::today())
    }

    /// Whether the screen should show "No tasks found"
    pub fn is_empty(&self, today: NaiveDate) -> bool {
        self.groups(today).is_empty()
    }

    /// Flip the completion status of a task.
    ///
    /// The local state is updated right away. In case the store refuses the change, it is reverted and the error is returned.
    pub async fn toggle_complete(&mut self, id: &TaskId) -> Result<(), Box<dyn Error>> {
        let new_status = match self.tasks.iter_mut().find(|t| t.id() == id) {
            None => {
                log::warn!("Not toggling unknown task {}", id);
                return Err(format!("No task with ID {}", id).into());
            },
            Some(task) => {
                let new_status = !task.is_finished();
                task.set_finished(new_status);
                new_status
            },
        };

        let result = self.store.update_fields(self.session.user_id(), id, &TaskUpdate::finished(new_status)).await;
        match result {
            Ok(()) => {
                log::info!("Marked task {} as {}", id, if new_status { "complete" } else { "incomplete" });
                Ok(())
            },
            Err(err) => {
                log::error!("Error marking task {} as complete: {}", id, err);
                match self.tasks.iter_mut().find(|t| t.id() == id) {
                    Some(task) => {
                        log::warn!("Reverting completion status of task {}", id);
                        task.set_finished(!new_status);
                    },
                    None => log::warn!("Task {} vanished before its completion status could be reverted", id),
                }
                self.feedback = Some(UserFeedback::failure("Failed to update task. Please try again."));
                Err(err)
            },
        }
    }

    /// Delete a task.
    ///
    /// It is removed from the local state right away. In case the store refuses the deletion, it is put back where it was and the error is returned.
    pub async fn remove(&mut self, id: &TaskId) -> Result<(), Box<dyn Error>> {
        let index = match self.tasks.iter().position(|t| t.id() == id) {
            None => {
                log::warn!("Not deleting unknown task {}", id);
                return Err(format!("No task with ID {}", id).into());
            },
            Some(index) => index,
        };
        let removed = self.tasks.remove(index);

        let result = self.store.delete_task(self.session.user_id(), id).await;
        match result {
            Ok(()) => {
                log::info!("Deleted task {}", id);
                Ok(())
            },
            Err(err) => {
                log::error!("Error deleting task {}: {}", id, err);
                log::warn!("Putting task {} back", id);
                let index = index.min(self.tasks.len());
                self.tasks.insert(index, removed);
                self.feedback = Some(UserFeedback::failure("Failed to delete task. Please try again."));
                Err(err)
            },
        }
    }

    /// Where to go when a task is picked in the list
    pub fn open(&self, id: &TaskId) -> Option<Navigation> {
        self.task(id).map(|task| Navigation::TaskDetail(TaskRoute::from(task)))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use chrono::{Duration, Local, TimeZone, Utc};

    use crate::memory_store::MemoryStore;
    use crate::mock_behaviour::{MockBehaviour, Operation};
    use crate::task::Category;
    use crate::user::UserId;

    fn session() -> Session {
        Session::new(UserId::from("user"), String::from("user@example.com"), String::new())
    }

    fn due_on(day: NaiveDate) -> chrono::DateTime<Utc> {
        Local.from_local_datetime(&day.and_hms(9, 30, 0)).unwrap().with_timezone(&Utc)
    }

    fn seeded_store(today: NaiveDate) -> MemoryStore {
        let store = MemoryStore::new();
        let user = session().user_id().clone();
        let seeds = vec![
            ("t1", Some(Category::Work), today),
            ("t2", Some(Category::Shopping), today + Duration::days(2)),
            ("t3", None, today - Duration::days(1)),
            ("t4", Some(Category::Work), today + Duration::days(7)),
        ];
        for (id, category, day) in seeds {
            let task = Task::new_with_parameters(TaskId::from(id), format!("Task {}", id), String::new(),
                category, false, Utc::now(), due_on(day), None);
            store.insert_task(&user, task).unwrap();
        }
        store
    }

    #[tokio::test]
    async fn refresh_and_group() {
        let today = NaiveDate::from_ymd(2024, 6, 1);
        let mut vm = TaskListViewModel::new(Arc::new(seeded_store(today)), session());
        assert!(vm.is_loading());

        vm.refresh().await.unwrap();
        assert!(vm.is_loading() == false);
        assert_eq!(vm.tasks().len(), 4);

        let groups = vm.groups(today);
        assert_eq!(groups.today.len(), 1);
        assert_eq!(groups.future.len(), 2);
        assert_eq!(groups.past.len(), 1);

        vm.set_category_filter(CategoryFilter::Only(Category::Work));
        let groups = vm.groups(today);
        assert_eq!(groups.today.len(), 1);
        assert_eq!(groups.future.len(), 1);
        assert!(groups.past.is_empty());

        vm.set_category_filter(CategoryFilter::Only(Category::Personal));
        assert!(vm.is_empty(today));
    }

    #[tokio::test]
    async fn groups_for_the_current_day() {
        let today = crate::view_model::today();
        let mut vm = TaskListViewModel::new(Arc::new(seeded_store(today)), session());
        vm.refresh().await.unwrap();

        let groups = vm.groups_for_today();
        assert_eq!(groups, vm.groups(today));
        assert_eq!(groups.today.iter().map(|t| t.id().as_str()).collect::<Vec<_>>(), vec!["t1"]);
    }

    #[tokio::test]
    async fn failed_toggle_is_reverted() {
        let today = NaiveDate::from_ymd(2024, 6, 1);
        let mut store = seeded_store(today);
        store.set_mock_behaviour(Some(Arc::new(Mutex::new(MockBehaviour::failing(Operation::UpdateFields, 0, 1)))));
        let mut vm = TaskListViewModel::new(Arc::new(store), session());
        vm.refresh().await.unwrap();

        let id = TaskId::from("t1");
        assert!(vm.toggle_complete(&id).await.is_err());
        assert!(vm.task(&id).unwrap().is_finished() == false);
        assert!(vm.take_feedback().unwrap().is_alert());
        assert!(vm.feedback().is_none());

        vm.toggle_complete(&id).await.unwrap();
        assert!(vm.task(&id).unwrap().is_finished());
    }

    #[tokio::test]
    async fn failed_removal_is_reverted() {
        let today = NaiveDate::from_ymd(2024, 6, 1);
        let mut store = seeded_store(today);
        store.set_mock_behaviour(Some(Arc::new(Mutex::new(MockBehaviour::failing(Operation::DeleteTask, 0, 1)))));
        let mut vm = TaskListViewModel::new(Arc::new(store), session());
        vm.refresh().await.unwrap();
        let order_before: Vec<TaskId> = vm.tasks().iter().map(|t| t.id().clone()).collect();

        let id = TaskId::from("t2");
        assert!(vm.remove(&id).await.is_err());
        let order_after: Vec<TaskId> = vm.tasks().iter().map(|t| t.id().clone()).collect();
        assert_eq!(order_before, order_after);

        vm.remove(&id).await.unwrap();
        assert!(vm.task(&id).is_none());
    }

    #[tokio::test]
    async fn unknown_ids_never_reach_the_store() {
        let mut store = MemoryStore::new();
        store.set_mock_behaviour(Some(Arc::new(Mutex::new(MockBehaviour::fail_now(1)))));
        let store = Arc::new(store);
        let mut vm = TaskListViewModel::new(Arc::clone(&store), session());

        assert!(vm.toggle_complete(&TaskId::from("nope")).await.is_err());
        assert!(vm.remove(&TaskId::from("nope")).await.is_err());
        assert!(vm.open(&TaskId::from("nope")).is_none());

        // The single mocked failure is still pending
        assert!(vm.refresh().await.is_err());
        assert!(vm.refresh().await.is_ok());
    }

    #[tokio::test]
    async fn open_a_task() {
        let today = NaiveDate::from_ymd(2024, 6, 1);
        let mut vm = TaskListViewModel::new(Arc::new(seeded_store(today)), session());
        vm.refresh().await.unwrap();

        match vm.open(&TaskId::from("t2")) {
            Some(Navigation::TaskDetail(route)) => {
                assert_eq!(route.title, "Task t2");
                assert_eq!(route.category, Some(Category::Shopping));
            },
            other => panic!("Unexpected navigation {:?}", other),
        }
    }
}
