//! Agent chat page
//!
//! A single-page chat with a simulated AI agent. The server owns each page's
//! conversation, renders HTML with plain string components, and pushes
//! re-rendered fragments to the browser over Server-Sent Events.
//!
//! # Architecture
//!
//! - **Server**: Axum router with JSON endpoints, HTML fragments and SSE
//! - **Session**: Pure reducer plus a runtime that executes its effects
//! - **Synthesizer**: Canned replies after a randomized typing delay
//! - **UI**: Server-rendered ShadCN-style components and a small script
//!
//! # Modules
//!
//! - [`actions`]: Quick actions and their messages
//! - [`config`]: Layered configuration
//! - [`events`]: Session notifications and the SSE wire format
//! - [`scroll`]: Auto-scroll controller
//! - [`session`]: Conversation state machine and session store
//! - [`synthesizer`]: Reply selection
//! - [`ui`]: HTML rendering

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod actions;
pub mod config;
pub mod error;
pub mod events;
pub mod scroll;
pub mod server;
pub mod session;
pub mod synthesizer;
pub mod ui;

use std::sync::Arc;

use crate::config::AppConfig;
use session::SessionStore;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Live page sessions.
    pub sessions: SessionStore,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}
