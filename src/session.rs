//! Keeps track of who is signed in
//!
//! A [`SessionHolder`] wraps an [`AuthBackend`] and publishes every change of the current user,
//! so that a UI can switch between its authenticated and unauthenticated screens.

use std::fmt::{Display, Formatter};
use std::sync::Mutex;

use crate::feedback::UserFeedback;
use crate::navigation::Navigation;
use crate::traits::AuthBackend;
use crate::user::{Credentials, Session};

/// Why an authentication attempt did not succeed
#[derive(Clone, Debug, PartialEq)]
pub enum AuthError {
    /// The password and its confirmation differ. The backend has not been contacted
    PasswordMismatch,
    /// The backend refused the credentials (the payload is the backend's own reason code)
    InvalidCredentials(String),
    /// There is no signed-in user to perform this action for
    NotSignedIn,
    /// The backend could not be reached, or answered something unexpected
    Backend(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::PasswordMismatch => write!(f, "Passwords do not match"),
            AuthError::InvalidCredentials(code) => write!(f, "Invalid credentials ({})", code),
            AuthError::NotSignedIn => write!(f, "No user is signed in"),
            AuthError::Backend(msg) => write!(f, "Authentication backend error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Backend(err.to_string())
    }
}


/// See [`SessionHolder::subscribe`]
pub type SessionReceiver = tokio::sync::watch::Receiver<Option<Session>>;
type SessionSender = tokio::sync::watch::Sender<Option<Session>>;

/// Holds the current session, on top of an authentication backend
pub struct SessionHolder<A: AuthBackend> {
    backend: A,
    sender: SessionSender,
    /// Kept so that sending never fails for lack of listeners
    current: SessionReceiver,
    feedback: Mutex<Option<UserFeedback>>,
}

impl<A: AuthBackend> SessionHolder<A> {
    /// Create a holder with nobody signed in
    pub fn new(backend: A) -> Self {
        let (sender, current) = tokio::sync::watch::channel(None);
        Self { backend, sender, current, feedback: Mutex::new(None) }
    }

    pub fn backend(&self) -> &A { &self.backend }

    /// The currently signed-in user, if any
    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    /// Get notified whenever the current user changes
    pub fn subscribe(&self) -> SessionReceiver {
        self.sender.subscribe()
    }

    /// Returns the alert of the last failed attempt, so that it is shown only once
    pub fn take_feedback(&self) -> Option<UserFeedback> {
        match self.feedback.lock() {
            Ok(mut feedback) => feedback.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }

    fn set_feedback(&self, feedback: UserFeedback) {
        match self.feedback.lock() {
            Ok(mut slot) => *slot = Some(feedback),
            Err(poisoned) => *poisoned.into_inner() = Some(feedback),
        }
    }

    /// Where the app should land, given who is signed in
    pub fn landing_route(&self) -> Navigation {
        match self.current.borrow().as_ref() {
            Some(_) => Navigation::Home,
            None => Navigation::Login,
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let credentials = Credentials::new(email, password);
        match self.backend.sign_in(&credentials).await {
            Err(err) => {
                log::error!("Unable to sign in as {}: {}", email, err);
                self.set_feedback(UserFeedback::alert("Login Error", &err));
                Err(err)
            },
            Ok(session) => {
                log::info!("Signed in as {} ({})", session.email(), session.user_id());
                self.publish(Some(session.clone()));
                Ok(session)
            },
        }
    }

    /// Register a new account and sign in with it
    pub async fn sign_up(&self, email: &str, password: &str, confirmation: &str) -> Result<Session, AuthError> {
        if password != confirmation {
            log::warn!("Not registering {}: passwords do not match", email);
            self.set_feedback(UserFeedback::failure(AuthError::PasswordMismatch));
            return Err(AuthError::PasswordMismatch);
        }

        let credentials = Credentials::new(email, password);
        match self.backend.sign_up(&credentials).await {
            Err(err) => {
                log::error!("Unable to register {}: {}", email, err);
                self.set_feedback(UserFeedback::alert("Registration Error", &err));
                Err(err)
            },
            Ok(session) => {
                log::info!("Registered {} ({})", session.email(), session.user_id());
                self.publish(Some(session.clone()));
                Ok(session)
            },
        }
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let session = self.current().ok_or(AuthError::NotSignedIn)?;
        if let Err(err) = self.backend.sign_out(&session).await {
            log::error!("Unable to sign out {}: {}", session.email(), err);
            self.set_feedback(UserFeedback::alert("Logout Error", &err));
            return Err(err);
        }
        log::info!("Signed out {}", session.email());
        self.publish(None);
        Ok(())
    }

    fn publish(&self, session: Option<Session>) {
        if self.sender.send(session).is_err() {
            log::error!("Session channel is closed");
        }
    }
}
