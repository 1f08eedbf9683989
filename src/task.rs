//! To-do tasks, as stored under `users/{uid}/tasks`

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use chrono::{DateTime, Local, NaiveDate, Utc};

/// The category a task can be filed under
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Work,
    Personal,
    Shopping,
    Others,
}

impl Category {
    /// Every category, in the order they are offered to the user
    pub const ALL: [Category; 4] = [Category::Work, Category::Personal, Category::Shopping, Category::Others];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Shopping => "Shopping",
            Category::Others => "Others",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL.iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown category {:?}", s))
    }
}


/// The identifier the store gave to a task.
///
/// It is opaque, and only unique within a given user's collection
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    content: String,
}

impl TaskId {
    /// Generate a random TaskId, the way a store picks one for a new document
    pub fn random() -> Self {
        let random = uuid::Uuid::new_v4().to_simple().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}
impl From<String> for TaskId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for TaskId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Used to support serde
impl Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.content)
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<TaskId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(TaskId{ content: s })
    }
}


/// A to-do task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Assigned by the store on creation
    id: TaskId,

    title: String,
    description: String,
    category: Option<Category>,

    is_finished: bool,
    date_added: DateTime<Utc>,
    due_date: DateTime<Utc>,
    /// Nothing in this crate sets it: completion toggles leave it as it is
    date_finished: Option<DateTime<Utc>>,
}

impl Task {
    /// Build the task a store holds once it has accepted `draft` under `id`
    pub fn from_draft(id: TaskId, draft: &TaskDraft) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            category: draft.category,
            is_finished: draft.is_finished,
            date_added: draft.date_added,
            due_date: draft.due_date,
            date_finished: draft.date_finished,
        }
    }

    /// Create a Task instance with every field given, e.g. when decoding a stored document
    pub fn new_with_parameters(id: TaskId, title: String, description: String, category: Option<Category>,
                               is_finished: bool, date_added: DateTime<Utc>, due_date: DateTime<Utc>,
                               date_finished: Option<DateTime<Utc>>,
                            ) -> Self
    {
        Self { id, title, description, category, is_finished, date_added, due_date, date_finished }
    }

    pub fn id(&self) -> &TaskId                       { &self.id           }
    pub fn title(&self) -> &str                       { &self.title        }
    pub fn description(&self) -> &str                 { &self.description  }
    pub fn category(&self) -> Option<Category>        { self.category      }
    pub fn is_finished(&self) -> bool                 { self.is_finished   }
    pub fn date_added(&self) -> &DateTime<Utc>        { &self.date_added   }
    pub fn due_date(&self) -> &DateTime<Utc>          { &self.due_date     }
    pub fn date_finished(&self) -> Option<&DateTime<Utc>> { self.date_finished.as_ref() }

    /// The local calendar day this task is due
    pub fn due_day(&self) -> NaiveDate {
        self.due_date.with_timezone(&Local).date_naive()
    }

    pub fn set_finished(&mut self, finished: bool) {
        self.is_finished = finished;
    }

    /// Apply the fields that are present in `update`, leave the others untouched
    pub fn apply(&mut self, update: &TaskUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(is_finished) = update.is_finished {
            self.is_finished = is_finished;
        }
        if let Some(date_finished) = update.date_finished {
            self.date_finished = date_finished;
        }
    }
}


/// A task that has not been given to a store yet
#[derive(Clone, Debug, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub is_finished: bool,
    pub date_added: DateTime<Utc>,
    /// Defaults to the creation time, until the user picks a date
    pub due_date: DateTime<Utc>,
    pub date_finished: Option<DateTime<Utc>>,
}

impl TaskDraft {
    /// A blank draft, created (and due) now
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            title: String::new(),
            description: String::new(),
            category: None,
            is_finished: false,
            date_added: now,
            due_date: now,
            date_finished: None,
        }
    }
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self::new()
    }
}


/// A partial update of a task.
///
/// Only the fields that are `Some` are written.
/// `category` and `date_finished` are doubly optional, so that "leave it" and "unset it" can be told apart.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Option<Category>>,
    pub due_date: Option<DateTime<Utc>>,
    pub is_finished: Option<bool>,
    pub date_finished: Option<Option<DateTime<Utc>>>,
}

impl TaskUpdate {
    /// The update sent when the completion status is toggled
    pub fn finished(is_finished: bool) -> Self {
        Self { is_finished: Some(is_finished), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Names of the stored fields this update writes, in a stable order
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::new();
        if self.title.is_some()         { paths.push(crate::document::TITLE); }
        if self.description.is_some()   { paths.push(crate::document::DESCRIPTION); }
        if self.category.is_some()      { paths.push(crate::document::CATEGORY); }
        if self.due_date.is_some()      { paths.push(crate::document::DUE_DATE); }
        if self.is_finished.is_some()   { paths.push(crate::document::IS_FINISHED); }
        if self.date_finished.is_some() { paths.push(crate::document::DATE_FINISHED); }
        paths
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Task {
        let added = Utc.ymd(2024, 5, 20).and_hms(8, 0, 0);
        let due = Utc.ymd(2024, 6, 1).and_hms(12, 0, 0);
        Task::new_with_parameters("t1".into(), "Old".into(), "desc".into(), Some(Category::Work),
            false, added, due, None)
    }

    #[test]
    fn category_names() {
        for cat in Category::ALL.iter() {
            assert_eq!(cat.as_str().parse::<Category>().unwrap(), *cat);
        }
        assert!("Uncategorized".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut task = sample();
        let before = task.clone();

        task.apply(&TaskUpdate { title: Some("New".into()), ..TaskUpdate::default() });
        assert_eq!(task.title(), "New");
        assert_eq!(task.description(), before.description());
        assert_eq!(task.category(), before.category());
        assert_eq!(task.due_date(), before.due_date());

        task.apply(&TaskUpdate { category: Some(None), ..TaskUpdate::default() });
        assert_eq!(task.category(), None);
    }

    #[test]
    fn toggling_leaves_date_finished_alone() {
        let mut task = sample();
        task.apply(&TaskUpdate::finished(true));
        assert!(task.is_finished());
        assert_eq!(task.date_finished(), None);
    }

    #[test]
    fn field_paths() {
        assert!(TaskUpdate::default().is_empty());
        assert_eq!(TaskUpdate::finished(true).field_paths(), vec!["isFinished"]);

        let update = TaskUpdate {
            title: Some("a".into()),
            category: Some(Some(Category::Shopping)),
            due_date: Some(Utc::now()),
            ..TaskUpdate::default()
        };
        assert_eq!(update.field_paths(), vec!["title", "category", "dueDate"]);
    }
}
