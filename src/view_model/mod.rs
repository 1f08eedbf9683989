//! Presentation logic of every screen
//!
//! A view-model holds the state a screen renders, and performs the actions the screen triggers.
//! Each of them talks to a [`TaskStore`](crate::traits::TaskStore) directly, on behalf of an explicitly given [`Session`](crate::user::Session).
//!
//! Actions that write to the store update the local state first, so that the screen reacts immediately.
//! If the store then fails, the local change is reverted and the error is returned.

pub mod task_list;
pub mod task_creation;
pub mod task_detail;
pub mod calendar;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Local, NaiveDate};

use crate::task::{Category, Task};

/// Restricts a list of tasks to a category
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Every filter, in the order they are offered to the user
    pub fn choices() -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(Category::ALL.iter().map(|c| CategoryFilter::Only(*c)))
            .collect()
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(cat) => task.category() == Some(*cat),
        }
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        CategoryFilter::All
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "All"),
            CategoryFilter::Only(cat) => write!(f, "{}", cat),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" => Ok(CategoryFilter::All),
            other => other.parse().map(CategoryFilter::Only),
        }
    }
}


/// Tasks split by where their due day falls, relative to a given day
#[derive(Debug, Default, PartialEq)]
pub struct DueGroups<'a> {
    /// Shown under "Due Today"
    pub today: Vec<&'a Task>,
    /// Shown under "Future Tasks"
    pub future: Vec<&'a Task>,
    /// Computed, but not shown by default
    pub past: Vec<&'a Task>,
}

impl<'a> DueGroups<'a> {
    pub const TODAY_HEADER: &'static str = "Due Today";
    pub const FUTURE_HEADER: &'static str = "Future Tasks";

    /// Split `tasks` according to their local due day. The relative order of tasks is kept
    pub fn split<I>(tasks: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut groups = Self::default();
        for task in tasks {
            let due = task.due_day();
            if due == today {
                groups.today.push(task);
            } else if due > today {
                groups.future.push(task);
            } else {
                groups.past.push(task);
            }
        }
        groups
    }

    /// Whether there is nothing to show in the default view (past tasks are not shown)
    pub fn is_empty(&self) -> bool {
        self.today.is_empty() && self.future.is_empty()
    }
}

/// The current local day
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
