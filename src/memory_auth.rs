//! An in-memory identity service, to test session handling without a live backend

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::traits::AuthBackend;
use crate::session::AuthError;
use crate::user::{Credentials, Session, UserId};
use crate::mock_behaviour::{MockBehaviour, Operation};

struct Account {
    password: String,
    user_id: UserId,
}

/// Accounts are kept in memory, and lost when this is dropped
#[derive(Default)]
pub struct MemoryAuth {
    accounts: Mutex<HashMap<String, Account>>,
    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mock_behaviour(&mut self, mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>) {
        self.mock_behaviour = mock_behaviour;
    }

    pub fn n_accounts(&self) -> usize {
        self.accounts.lock().map(|accounts| accounts.len()).unwrap_or(0)
    }

    fn check_behaviour(&self, op: Operation) -> Result<(), AuthError> {
        match &self.mock_behaviour {
            None => Ok(()),
            Some(mock) => {
                let mut mock = mock.lock().map_err(|err| AuthError::Backend(err.to_string()))?;
                mock.check(op).map_err(|err| AuthError::Backend(err.to_string()))
            },
        }
    }
}

#[async_trait]
impl AuthBackend for MemoryAuth {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        self.check_behaviour(Operation::SignIn)?;

        let accounts = self.accounts.lock().map_err(|err| AuthError::Backend(err.to_string()))?;
        match accounts.get(credentials.email()) {
            None => Err(AuthError::InvalidCredentials(String::from("EMAIL_NOT_FOUND"))),
            Some(account) if account.password != credentials.password() => {
                Err(AuthError::InvalidCredentials(String::from("INVALID_PASSWORD")))
            },
            Some(account) => Ok(Session::new(account.user_id.clone(), credentials.email().to_string(), String::new())),
        }
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        self.check_behaviour(Operation::SignUp)?;

        let mut accounts = self.accounts.lock().map_err(|err| AuthError::Backend(err.to_string()))?;
        if accounts.contains_key(credentials.email()) {
            return Err(AuthError::InvalidCredentials(String::from("EMAIL_EXISTS")));
        }
        let user_id = UserId::from(uuid::Uuid::new_v4().to_simple().to_string());
        accounts.insert(credentials.email().to_string(), Account {
            password: credentials.password().to_string(),
            user_id: user_id.clone(),
        });
        Ok(Session::new(user_id, credentials.email().to_string(), String::new()))
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), AuthError> {
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accounts() {
        let auth = MemoryAuth::new();
        let creds = Credentials::new("a@b.c", "pw");
        let session = auth.sign_up(&creds).await.unwrap();
        assert_eq!(auth.sign_up(&creds).await, Err(AuthError::InvalidCredentials(String::from("EMAIL_EXISTS"))));
        assert_eq!(auth.sign_in(&creds).await.unwrap().user_id(), session.user_id());
        assert!(auth.sign_in(&Credentials::new("x@y.z", "pw")).await.is_err());
    }

    #[tokio::test]
    async fn mocked_outage() {
        let mut auth = MemoryAuth::new();
        auth.set_mock_behaviour(Some(Arc::new(Mutex::new(MockBehaviour::fail_now(1)))));
        let creds = Credentials::new("a@b.c", "pw");
        assert!(matches!(auth.sign_up(&creds).await, Err(AuthError::Backend(_))));
        assert!(auth.sign_up(&creds).await.is_ok());
    }
}
