//! Chat page sections.
//!
//! Each function renders one region of the page from the session state and
//! the agent profile. The SSE handler reuses [`message_items`] to push updates.

mod header;
mod input_area;
mod message;
mod message_list;
mod quick_actions;
mod shell;

pub use header::agent_header;
pub use input_area::composer;
pub use message::{message_bubble, typing_bubble};
pub use message_list::{jump_button, message_items, message_region, welcome_placeholder};
pub use quick_actions::quick_actions;
pub use shell::chat_shell;
