//! This is an example of how pocket-tasks can be used.
//! It signs in, and prints the tasks of the user the way the home and calendar screens show them.

use std::sync::Arc;

use pocket_tasks::view_model::task_list::TaskListViewModel;
use pocket_tasks::view_model::calendar::CalendarViewModel;
use pocket_tasks::utils::{pause, print_due_groups, print_task_list};

mod shared;
use shared::sign_in;


#[tokio::main]
async fn main() {
    env_logger::init();

    println!("This example prints the tasks of a user, grouped by due day.");
    println!("You can also set the RUST_LOG environment variable to display more info about the requests.");
    println!("");
    pause();

    let (session, store) = sign_in().await;
    let store = Arc::new(store);

    let mut list = TaskListViewModel::new(Arc::clone(&store), session.clone());
    if let Err(err) = list.refresh().await {
        log::error!("Unable to fetch tasks: {}", err);
        return;
    }
    println!("---- Home -----");
    let groups = list.groups_for_today();
    if groups.is_empty() {
        println!("No tasks");
    } else {
        print_due_groups(&groups);
    }

    let mut calendar = CalendarViewModel::new(store, session);
    if let Err(err) = calendar.refresh().await {
        log::error!("Unable to fetch tasks: {}", err);
        return;
    }
    println!("---- Calendar -----");
    for day in calendar.marked_days() {
        println!("{}", day);
        print_task_list(calendar.tasks_on(day));
    }
}
