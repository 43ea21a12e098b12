//! Reusable UI building blocks.
//!
//! Small ShadCN-flavoured components rendered to HTML strings. Callers pass
//! inner HTML that is already safe; text arguments are escaped here.
//!
//! # Components
//!
//! - [`Button`]: Clickable button with variants
//! - [`badge`]: Status badge/tag
//! - [`avatar`]: Avatar with initials fallback
//! - [`scroll_area`]: Scrollable container
//! - [`toast`]: Notification card
//! - [`Icon`]: Inline SVG icons

mod avatar;
mod badge;
mod button;
mod icons;
mod scroll_area;
mod toast;

pub use avatar::avatar;
pub use badge::{BadgeVariant, badge};
pub use button::{Button, ButtonSize, ButtonVariant};
pub use icons::Icon;
pub use scroll_area::scroll_area;
pub use toast::toast;
