//! Events pushed from a session to the page.
//!
//! A [`Session`](crate::session::Session) publishes [`SessionEvent`]s on a
//! broadcast channel whenever its state changes. The SSE handler turns each one
//! into a [`ChatEvent`] carrying whatever the browser needs to update itself,
//! usually a re-rendered HTML fragment.
//!
//! # Example
//!
//! ```rust
//! use agent_chat::events::{ChatEvent, sse_event};
//!
//! let event = ChatEvent::TypingChanged { is_typing: true };
//! let sse = sse_event(&event);
//! assert!(sse.starts_with("event: typing.changed\n"));
//! ```

use serde::{Deserialize, Serialize};

use crate::session::ChatMessage;

/// Internal change notifications broadcast by a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A message was appended.
    MessageAppended(ChatMessage),
    /// The typing indicator flipped.
    TypingChanged(bool),
    /// Auto-scroll was recomputed to a new value.
    AutoScrollChanged(bool),
    /// The viewport should move to the bottom.
    ScrollToBottom,
    /// The session was torn down.
    Closed,
}

/// Wire events delivered to the browser over SSE.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum ChatEvent {
    /// The message region was re-rendered.
    #[serde(rename = "messages.updated")]
    MessagesUpdated {
        /// Rendered message list (bubbles, typing indicator or welcome placeholder).
        html: String,
        /// Whether the client should move the viewport to the bottom afterwards.
        follow: bool,
    },

    /// The composer should be disabled (`true`) or re-enabled.
    #[serde(rename = "typing.changed")]
    TypingChanged {
        /// Whether a reply is outstanding.
        is_typing: bool,
    },

    /// Auto-scroll and the jump-to-bottom affordance changed.
    #[serde(rename = "scroll.changed")]
    ScrollChanged {
        /// Whether the list follows new content.
        auto_scroll: bool,
        /// Whether the jump-to-bottom button is visible.
        show_jump_button: bool,
    },

    /// Move the viewport to the bottom.
    #[serde(rename = "scroll.bottom")]
    ScrollToBottom,

    /// The session ended; the stream closes after this event.
    #[serde(rename = "session.closed")]
    SessionClosed,
}

impl ChatEvent {
    /// Whether the stream should end after delivering this event.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::SessionClosed)
    }
}

/// SSE event name for a [`ChatEvent`].
pub fn event_name(evt: &ChatEvent) -> &'static str {
    match evt {
        ChatEvent::MessagesUpdated { .. } => "messages.updated",
        ChatEvent::TypingChanged { .. } => "typing.changed",
        ChatEvent::ScrollChanged { .. } => "scroll.changed",
        ChatEvent::ScrollToBottom => "scroll.bottom",
        ChatEvent::SessionClosed => "session.closed",
    }
}

/// JSON payload for a [`ChatEvent`].
pub fn event_json(evt: &ChatEvent) -> String {
    serde_json::to_string(evt).unwrap_or_else(|e| {
        serde_json::json!({ "type": "error", "data": { "message": e.to_string() } }).to_string()
    })
}

/// Convert a [`ChatEvent`] to an SSE-formatted string.
pub fn sse_event(evt: &ChatEvent) -> String {
    let json = event_json(evt);
    let event_name = event_name(evt);

    format!("event: {event_name}\ndata: {json}\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_updated_serialization() {
        let event = ChatEvent::MessagesUpdated {
            html: "<p>hi</p>".to_string(),
            follow: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("messages.updated"));
        assert!(json.contains("<p>hi</p>"));
        assert!(json.contains("\"follow\":true"));
    }

    #[test]
    fn test_sse_event_format() {
        let sse = sse_event(&ChatEvent::ScrollToBottom);
        assert!(sse.starts_with("event: scroll.bottom\n"));
        assert!(sse.contains("data: "));
        assert!(sse.ends_with("\n\n"));
    }

    #[test]
    fn test_only_closed_is_terminal() {
        assert!(ChatEvent::SessionClosed.is_terminal());
        assert!(!ChatEvent::TypingChanged { is_typing: false }.is_terminal());
    }
}
