//! This is an example of how pocket-tasks can be used.
//! This binary simply toggles all completion statuses of the tasks it finds.

use std::error::Error;
use std::sync::Arc;

use pocket_tasks::{RemoteStore, TaskId};
use pocket_tasks::view_model::task_list::TaskListViewModel;
use pocket_tasks::utils::{pause, print_task_list};

mod shared;
use shared::sign_in;


#[tokio::main]
async fn main() {
    env_logger::init();

    println!("This example toggles the completion status of every task of a user.");
    println!("Make sure the POCKET_TASKS_* environment variables hold valid settings and credentials.");
    println!("");
    pause();

    let (session, store) = sign_in().await;
    let mut list = TaskListViewModel::new(Arc::new(store), session);

    toggle_all_tasks(&mut list).await.unwrap();
}

async fn toggle_all_tasks(list: &mut TaskListViewModel<RemoteStore>) -> Result<(), Box<dyn Error>> {
    list.refresh().await?;
    println!("---- Before -----");
    print_task_list(list.tasks());

    let ids: Vec<TaskId> = list.tasks().iter().map(|t| t.id().clone()).collect();
    let mut n_toggled = 0;
    for id in &ids {
        match list.toggle_complete(id).await {
            Ok(()) => n_toggled += 1,
            Err(err) => log::warn!("Task {} was not toggled: {}", id, err),
        }
    }
    println!("{} items toggled.", n_toggled);

    // Fetch again, to show what the store actually holds
    list.refresh().await?;
    println!("---- After -----");
    print_task_list(list.tasks());

    Ok(())
}
