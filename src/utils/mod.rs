//! Some utility functions

use std::io::{stdin, stdout, Read, Write};

use crate::task::Task;
use crate::view_model::DueGroups;

pub mod comparison;

/// A debug utility that pretty-prints a task
pub fn print_task(task: &Task) {
    let completion = if task.is_finished() { "✓" } else { " " };
    let category = task.category().map(|c| c.as_str()).unwrap_or("-");
    println!("    {} {}\t[{}] due {}\t{}", completion, task.title(), category, task.due_day(), task.id());
}

/// A debug utility that pretty-prints a list of tasks
pub fn print_task_list<'a, I>(tasks: I)
where
    I: IntoIterator<Item = &'a Task>,
{
    for task in tasks {
        print_task(task);
    }
}

/// A debug utility that pretty-prints tasks the way the home screen groups them
pub fn print_due_groups(groups: &DueGroups) {
    println!("{}", DueGroups::TODAY_HEADER);
    print_task_list(groups.today.iter().copied());
    println!("{}", DueGroups::FUTURE_HEADER);
    print_task_list(groups.future.iter().copied());
}


/// Wait for the user to press enter
pub fn pause() {
    let mut stdout = stdout();
    if stdout.write_all(b"Press Enter to continue...").is_err() || stdout.flush().is_err() {
        return;
    }
    let _ = stdin().read_exact(&mut [0]);
}
