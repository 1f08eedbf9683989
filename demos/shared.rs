use pocket_tasks::config::BackendConfig;
use pocket_tasks::{AuthClient, RemoteStore, Session, SessionHolder};

const ENV_EMAIL: &str = "POCKET_TASKS_EMAIL";
const ENV_PASSWORD: &str = "POCKET_TASKS_PASSWORD";


/// Prints what these demos expect from the environment
pub fn print_settings(config: &BackendConfig) {
    println!("This will use the following settings:");
    println!("  * project    = {}", config.project_id);
    println!("  * auth URL   = {}", config.auth_url);
    println!("  * store URL  = {}", config.store_url);
    println!("Set POCKET_TASKS_API_KEY, POCKET_TASKS_PROJECT_ID, {} and {} to change them.", ENV_EMAIL, ENV_PASSWORD);
}

/// Reads the backend settings and credentials from the environment, signs in,
/// and returns a store for the tasks of the signed-in user
pub async fn sign_in() -> (Session, RemoteStore) {
    let config = BackendConfig::from_env().unwrap();
    print_settings(&config);

    let email = std::env::var(ENV_EMAIL).unwrap();
    let password = std::env::var(ENV_PASSWORD).unwrap();

    let holder = SessionHolder::new(AuthClient::new(config.clone()));
    let session = holder.sign_in(&email, &password).await.unwrap();
    println!("Signed in as {} ({})", session.email(), session.user_id());

    let store = RemoteStore::new(&config, &session).unwrap();
    (session, store)
}
