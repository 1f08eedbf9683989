//! Messages shown to the user after an action

use std::fmt::{Display, Error, Formatter};

/// What the user should be told about the last action of a view-model
#[derive(Clone, Debug, PartialEq)]
pub enum UserFeedback {
    /// A short, non-blocking confirmation
    Toast(String),
    /// A blocking message, used for failures
    Alert{ title: String, message: String },
}

impl UserFeedback {
    pub fn toast<S: ToString>(msg: S) -> Self {
        Self::Toast(msg.to_string())
    }

    pub fn alert<T: ToString, S: ToString>(title: T, message: S) -> Self {
        Self::Alert {
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    /// The generic alert shown when a remote action failed
    pub fn failure<S: ToString>(message: S) -> Self {
        Self::alert("Error", message)
    }

    pub fn is_alert(&self) -> bool {
        matches!(self, Self::Alert{ .. })
    }
}

impl Display for UserFeedback {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            UserFeedback::Toast(msg) => write!(f, "{}", msg),
            UserFeedback::Alert{title, message} => write!(f, "{}: {}", title, message),
        }
    }
}
