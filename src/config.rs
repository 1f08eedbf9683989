//! Support for library configuration options

use std::error::Error;
use std::path::Path;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use url::Url;

/// Name this client announces to the backend, in the `X-Client-Name` header of every request.
/// Feel free to override it when initing this library.
pub static CLIENT_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("PocketTasks".to_string())));

/// Returns the current value of [`CLIENT_NAME`]
pub fn client_name() -> String {
    match CLIENT_NAME.lock() {
        Ok(name) => name.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com/v1/";
const DEFAULT_STORE_URL: &str = "https://firestore.googleapis.com/v1/";

const ENV_API_KEY: &str = "POCKET_TASKS_API_KEY";
const ENV_PROJECT_ID: &str = "POCKET_TASKS_PROJECT_ID";
const ENV_AUTH_URL: &str = "POCKET_TASKS_AUTH_URL";
const ENV_STORE_URL: &str = "POCKET_TASKS_STORE_URL";

/// Where the backend lives, and how to identify to it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Public key of the backend project, sent to the identity service
    pub api_key: String,
    pub project_id: String,
    /// Base URL of the identity service
    #[serde(default = "default_auth_url")]
    pub auth_url: Url,
    /// Base URL of the document store
    #[serde(default = "default_store_url")]
    pub store_url: Url,
}

fn default_auth_url() -> Url {
    Url::parse(DEFAULT_AUTH_URL).unwrap(/* this cannot panic, this is a valid constant URL */)
}

fn default_store_url() -> Url {
    Url::parse(DEFAULT_STORE_URL).unwrap(/* this cannot panic, this is a valid constant URL */)
}

impl BackendConfig {
    /// A config that uses the default backend URLs
    pub fn new<S: ToString, T: ToString>(api_key: S, project_id: T) -> Self {
        Self {
            api_key: api_key.to_string(),
            project_id: project_id.to_string(),
            auth_url: default_auth_url(),
            store_url: default_store_url(),
        }
    }

    /// Read a config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let file = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => file,
        };
        let config = serde_json::from_reader(file)?;
        Ok(config)
    }

    /// Read a config from the `POCKET_TASKS_*` environment variables.
    ///
    /// `POCKET_TASKS_API_KEY` and `POCKET_TASKS_PROJECT_ID` are required, the URLs are optional
    pub fn from_env() -> Result<Self, Box<dyn Error>> {
        let api_key = std::env::var(ENV_API_KEY)
            .map_err(|_| format!("{} must be set", ENV_API_KEY))?;
        let project_id = std::env::var(ENV_PROJECT_ID)
            .map_err(|_| format!("{} must be set", ENV_PROJECT_ID))?;

        let mut config = Self::new(api_key, project_id);
        if let Ok(url) = std::env::var(ENV_AUTH_URL) {
            config.auth_url = Url::parse(&url)?;
        }
        if let Ok(url) = std::env::var(ENV_STORE_URL) {
            config.store_url = Url::parse(&url)?;
        }
        Ok(config)
    }

    /// URL of the root of the documents of this project, ending with a `/`
    pub fn documents_root(&self) -> Result<Url, Box<dyn Error>> {
        let mut url = self.store_url.clone();
        url.path_segments_mut()
            .map_err(|_| format!("{} cannot be a base URL", self.store_url))?
            .pop_if_empty()
            .extend(&["projects", self.project_id.as_str(), "databases", "(default)", "documents", ""]);
        Ok(url)
    }
}
