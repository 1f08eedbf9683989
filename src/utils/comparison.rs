//! Utilities to compare tasks
//!
//! These can be used to sort results, e.g. by using `sorted_by` from the `itertools` crate

use std::cmp::Ordering;

use crate::task::Task;

/// Earliest due first. Tasks due at the same time are sorted alphabetically
pub fn compare_tasks_by_due_date(left: &Task, right: &Task) -> Ordering {
    left.due_date().cmp(right.due_date())
        .then_with(|| compare_tasks_alpha(left, right))
}

/// Compare tasks alphabetically, ignoring case
pub fn compare_tasks_alpha(left: &Task, right: &Task) -> Ordering {
    Ord::cmp(&left.title().to_lowercase(), &right.title().to_lowercase())
}
