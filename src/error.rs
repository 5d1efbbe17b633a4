use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Message used when a rejection carries no structured error.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

/// Normalized error shown to the user: a non-empty, ordered list of messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{}", .messages.join("; "))]
pub struct RequestError {
    messages: Vec<String>,
}

impl RequestError {
    /// Build an error from messages. Returns `None` when the list is empty.
    pub fn new<I, S>(messages: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let messages: Vec<String> = messages.into_iter().map(Into::into).collect();
        if messages.is_empty() {
            None
        } else {
            Some(Self { messages })
        }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    /// The fixed error used for any unstructured rejection
    pub fn fallback() -> Self {
        Self::single(DEFAULT_ERROR_MESSAGE)
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Extract a structured error from a transport failure.
    ///
    /// Walks the error chain so a `RequestError` wrapped in `.context(...)`
    /// is still found. Anything else is unstructured and yields `None`.
    pub fn from_rejection(err: &anyhow::Error) -> Option<Self> {
        err.chain()
            .find_map(|cause| cause.downcast_ref::<RequestError>())
            .cloned()
    }

    /// Structured error if present, otherwise the fixed fallback.
    pub fn normalize(rejection: Option<RequestError>) -> Self {
        rejection.unwrap_or_else(Self::fallback)
    }
}

impl<'de> Deserialize<'de> for RequestError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            messages: Vec<String>,
        }

        let raw = Raw::deserialize(deserializer)?;
        RequestError::new(raw.messages)
            .ok_or_else(|| serde::de::Error::custom("request error must carry at least one message"))
    }
}
