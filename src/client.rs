//! Code to authenticate against the identity service of the backend

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::config::{client_name, BackendConfig};
use crate::session::AuthError;
use crate::traits::AuthBackend;
use crate::user::{Credentials, Session, UserId};

/// What the identity service replies on success
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountReply {
    local_id: String,
    id_token: String,
    email: Option<String>,
}

/// What the identity service replies on failure
#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: ErrorBody,
}
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// An email/password client for the identity service
pub struct AuthClient {
    config: BackendConfig,
    http: reqwest::Client,
}

impl AuthClient {
    pub fn new(config: BackendConfig) -> Self {
        Self { config, http: reqwest::Client::new() }
    }

    pub fn config(&self) -> &BackendConfig { &self.config }

    /// URL of an `accounts:*` endpoint, with the API key
    fn endpoint(&self, action: &str) -> Result<Url, AuthError> {
        let mut url = self.config.auth_url.clone();
        url.path_segments_mut()
            .map_err(|_| AuthError::Backend(format!("{} cannot be a base URL", self.config.auth_url)))?
            .pop_if_empty()
            .push(&format!("accounts:{}", action));
        url.query_pairs_mut().append_pair("key", &self.config.api_key);
        Ok(url)
    }

    async fn account_request(&self, action: &str, credentials: &Credentials) -> Result<Session, AuthError> {
        let url = self.endpoint(action)?;
        log::debug!("Calling accounts:{} for {}", action, credentials.email());

        let response = self.http
            .post(url)
            .header("X-Client-Name", client_name())
            .json(&json!({
                "email": credentials.email(),
                "password": credentials.password(),
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if status.is_success() == false {
            return Err(error_from_reply(status, &text));
        }

        let reply: AccountReply = serde_json::from_str(&text)
            .map_err(|err| AuthError::Backend(format!("Invalid reply to accounts:{}: {}", action, err)))?;
        let email = reply.email.unwrap_or_else(|| credentials.email().to_string());
        Ok(Session::new(UserId::from(reply.local_id), email, reply.id_token))
    }
}

/// Client errors carry a reason code (e.g. `INVALID_PASSWORD`), anything else is a backend failure
fn error_from_reply(status: reqwest::StatusCode, text: &str) -> AuthError {
    let code = serde_json::from_str::<ErrorReply>(text)
        .map(|reply| reply.error.message)
        .unwrap_or_else(|_| text.to_string());

    if status.is_client_error() {
        AuthError::InvalidCredentials(code)
    } else {
        AuthError::Backend(format!("Unexpected HTTP status code {:?}: {}", status, code))
    }
}

#[async_trait]
impl AuthBackend for AuthClient {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        self.account_request("signInWithPassword", credentials).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        self.account_request("signUp", credentials).await
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        // ID tokens are stateless, forgetting them is enough
        log::debug!("Dropping the token of {}", session.user_id());
        Ok(())
    }
}
