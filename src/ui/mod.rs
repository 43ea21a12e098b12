//! Server-rendered HTML.
//!
//! Everything here is a pure function from state to markup. Text coming from
//! users or configuration is escaped before it reaches the page.
//!
//! # Structure
//!
//! - [`app`]: Page document
//! - [`components`]: Reusable ShadCN-style building blocks
//! - [`chat`]: Chat page sections
//! - [`markup`]: Escaping, content transform and relative time

pub mod app;
pub mod chat;
pub mod components;
pub mod markup;
