//! This crate provides the logic of a personal to-do list app.
//!
//! Tasks belong to a signed-in user, and live in a per-user collection of a remote document store. \
//! The [`TaskStore`](traits::TaskStore) trait abstracts that store: [`RemoteStore`] talks to the actual backend,
//! and [`MemoryStore`] keeps everything in memory (for tests, or offline demos).
//!
//! Authentication goes through a [`SessionHolder`], that wraps an [`AuthBackend`](traits::AuthBackend)
//! (either the remote [`AuthClient`], or the in-memory [`MemoryAuth`]) and tells listeners whenever the current user changes.
//!
//! The screens of the app are modelled in the [`view_model`] module. These view-models do not depend on any UI toolkit:
//! they hold the state a screen displays, and run the actions a user can trigger. \
//! Mutations are applied optimistically, and rolled back in case the store reports a failure.

pub mod traits;

mod task;
pub use task::{Category, Task, TaskDraft, TaskId, TaskUpdate};
pub mod user;
pub use user::{Credentials, Session, UserId};
pub mod session;
pub use session::{AuthError, SessionHolder};

pub mod client;
pub use client::AuthClient;
pub mod remote_store;
pub use remote_store::RemoteStore;
pub mod document;

pub mod memory_store;
pub use memory_store::MemoryStore;
pub mod memory_auth;
pub use memory_auth::MemoryAuth;
pub mod mock_behaviour;

pub mod navigation;
pub use navigation::{Navigation, TaskRoute};
pub mod feedback;
pub use feedback::UserFeedback;
pub mod view_model;

pub mod config;
pub mod utils;
