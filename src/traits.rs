//! The seams between view-models and backends
//!
//! Both traits have a remote implementation (talking to the actual backend) and an in-memory one (used in tests and demos).

use std::error::Error;

use async_trait::async_trait;

use crate::task::{Task, TaskDraft, TaskId, TaskUpdate};
use crate::user::{Credentials, Session, UserId};
use crate::session::AuthError;

/// A document store that holds a collection of tasks for every user
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Store a new task in the collection of `user`, and return the ID the store picked for it
    async fn create_task(&self, user: &UserId, draft: &TaskDraft) -> Result<TaskId, Box<dyn Error>>;

    /// Returns every task of the collection of `user`.
    /// This is always the full collection, in no particular order
    async fn list_tasks(&self, user: &UserId) -> Result<Vec<Task>, Box<dyn Error>>;

    /// Write the fields that are present in `update`.
    /// This fails in case the task does not exist, even when `update` is empty
    async fn update_fields(&self, user: &UserId, id: &TaskId, update: &TaskUpdate) -> Result<(), Box<dyn Error>>;

    /// Remove a task from the collection of `user`
    async fn delete_task(&self, user: &UserId, id: &TaskId) -> Result<(), Box<dyn Error>>;
}

/// An email/password identity service
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// Create an account, and return a session for it
    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// Give up a session. Backends that do not track sessions can simply forget about it
    async fn sign_out(&self, session: &Session) -> Result<(), AuthError>;
}
