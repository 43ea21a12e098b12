//! Chat message model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person using the page.
    User,
    /// The (synthesized) agent.
    Agent,
}

impl Sender {
    /// Lowercase name used in ids and serialized payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single immutable chat message.
///
/// Messages are only ever created by the session reducer and are never
/// edited or removed for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Session-unique identifier, `"<sender>-<sequence>"`.
    pub id: String,
    /// Raw message text as typed or synthesized.
    pub content: String,
    /// Author of the message.
    pub sender: Sender,
    /// Creation instant.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub(crate) fn new(
        sequence: u64,
        sender: Sender,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("{sender}-{sequence}"),
            content: content.into(),
            sender,
            timestamp,
        }
    }

    /// Whether the message was written by the user.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}
