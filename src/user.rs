//! User identities and authenticated sessions

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The identity the authentication backend gave to a user.
///
/// Every task collection is scoped under one of these
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId {
    content: String,
}

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Path segments of this user's task collection, relative to the store root
    pub fn tasks_collection(&self) -> [&str; 3] {
        ["users", &self.content, "tasks"]
    }

    /// The path of this user's task collection, relative to the store root
    pub fn tasks_collection_path(&self) -> String {
        self.tasks_collection().join("/")
    }
}
impl From<String> for UserId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for UserId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Used to support serde
impl Serialize for UserId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.content)
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<UserId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(UserId{ content: s })
    }
}


/// Just a wrapper around an email and a password
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn new<S: ToString, T: ToString>(email: S, password: T) -> Self {
        Self { email: email.to_string(), password: password.to_string() }
    }

    pub fn email(&self) -> &str { &self.email }
    pub fn password(&self) -> &str { &self.password }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}


/// A signed-in user.
///
/// View-models are given one of these explicitly, rather than looking up a "current user" somewhere.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    user_id: UserId,
    email: String,
    /// Bearer token the store expects on every request. Fake backends leave it empty
    id_token: String,
}

impl Session {
    pub fn new(user_id: UserId, email: String, id_token: String) -> Self {
        Self { user_id, email, id_token }
    }

    pub fn user_id(&self) -> &UserId { &self.user_id }
    pub fn email(&self) -> &str { &self.email }
    pub fn id_token(&self) -> &str { &self.id_token }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_path() {
        let uid = UserId::from("abc123");
        assert_eq!(uid.tasks_collection_path(), "users/abc123/tasks");
    }

    #[test]
    fn password_is_not_logged() {
        let creds = Credentials::new("me@example.com", "hunter2");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("me@example.com"));
        assert!(printed.contains("hunter2") == false);
    }
}
