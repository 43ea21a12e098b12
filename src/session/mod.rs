//! Chat session state and management.
//!
//! Each page load gets its own in-memory session holding the message list,
//! the typing state and the auto-scroll flag. Nothing is persisted; a session
//! ends when the page closes it or it idles out.
//!
//! # Architecture
//!
//! - [`SessionState`]: the state machine, mutated only by [`SessionState::reduce`]
//! - [`Session`]: shared handle that executes effects (reply timer, events)
//! - [`SessionStore`]: thread-safe store for all live sessions
//!
//! # Example
//!
//! ```rust
//! use agent_chat::session::{SessionState, Action};
//!
//! let mut state = SessionState::default();
//! let effects = state.reduce(Action::Send("Hello!".into()), chrono::Utc::now());
//! assert!(!effects.is_empty());
//! assert!(state.is_typing());
//! ```

mod message;
mod state;
mod thread;

pub use message::{ChatMessage, Sender};
pub use state::{Action, Effect, Phase, SessionState};
pub use thread::{DEFAULT_SESSION_TIMEOUT, ReplyDelay, Session, SessionSettings, SessionStore};
