//! This is an example of how pocket-tasks can be used without any backend.
//! Tasks are kept in a JSON file, and a few of them are added every time this runs.

use std::path::Path;
use std::sync::Arc;

use chrono::{Duration, Utc};

use pocket_tasks::{Category, MemoryStore, Session, UserId};
use pocket_tasks::view_model::CategoryFilter;
use pocket_tasks::view_model::task_creation::TaskCreationViewModel;
use pocket_tasks::view_model::task_list::TaskListViewModel;
use pocket_tasks::utils::print_due_groups;

const STORE_FILE: &str = "demo_store.json";


#[tokio::main]
async fn main() {
    env_logger::init();

    let path = Path::new(STORE_FILE);
    let store = match MemoryStore::from_file(path) {
        Ok(store) => store,
        Err(err) => {
            log::warn!("Invalid store file: {}. Using an empty store", err);
            MemoryStore::new_with_file(path)
        }
    };
    let store = Arc::new(store);

    // The same user every time, so that tasks from previous runs show up
    let session = Session::new(UserId::from("demo"), String::from("demo@example.com"), String::new());

    let mut creation = TaskCreationViewModel::new(Arc::clone(&store), session.clone());
    for (title, category, in_days) in &[
        ("Buy milk", Category::Shopping, 0),
        ("Write report", Category::Work, 2),
        ("Call mom", Category::Personal, 5),
    ] {
        creation.set_title(title);
        creation.set_category(Some(*category));
        creation.set_due_date(Utc::now() + Duration::days(*in_days));
        if let Err(err) = creation.submit().await {
            log::error!("Unable to add {}: {}", title, err);
        }
    }

    let mut list = TaskListViewModel::new(Arc::clone(&store), session);
    list.refresh().await.unwrap();
    println!("---- All tasks -----");
    print_due_groups(&list.groups_for_today());

    list.set_category_filter(CategoryFilter::Only(Category::Work));
    println!("---- {} -----", list.filter());
    print_due_groups(&list.groups_for_today());

    store.save_to_file().unwrap();
    println!("Tasks saved to {}", STORE_FILE);
}
