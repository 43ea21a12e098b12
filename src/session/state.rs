//! Chat session state machine.
//!
//! All mutations go through [`SessionState::reduce`], which is pure apart
//! from the caller-supplied clock reading. Side effects (timers, rendering,
//! pushing events to the browser) are returned as [`Effect`]s and executed by
//! the [`Session`](super::Session) runtime.

use chrono::{DateTime, Duration, Utc};

use super::message::{ChatMessage, Sender};
use crate::scroll::{ScrollController, ScrollMetrics};

/// Whether a synthesized reply is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No reply pending; the composer is enabled.
    #[default]
    Idle,
    /// A reply timer is scheduled; the composer is disabled.
    AwaitingReply,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The user submitted text (composer or quick action).
    Send(String),
    /// The reply timer fired with synthesized text.
    ReplyReady(String),
    /// The viewport was scrolled manually.
    Scrolled(ScrollMetrics),
    /// The jump-to-bottom button was pressed.
    JumpToBottom,
}

/// Work the runtime must carry out after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// A message was appended to the store.
    Appended(ChatMessage),
    /// The typing indicator flipped.
    TypingChanged(bool),
    /// Start the one-shot reply timer for this prompt.
    ScheduleReply {
        /// The user text the reply answers.
        prompt: String,
    },
    /// Auto-scroll was recomputed to a new value.
    AutoScrollChanged(bool),
    /// Move the viewport to the newest content.
    ScrollToBottom,
}

/// In-memory state of one page session.
#[derive(Debug, Clone)]
pub struct SessionState {
    messages: Vec<ChatMessage>,
    phase: Phase,
    scroll: ScrollController,
    next_sequence: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(ScrollController::default())
    }
}

impl SessionState {
    #[must_use]
    pub fn new(scroll: ScrollController) -> Self {
        Self {
            messages: Vec::new(),
            phase: Phase::Idle,
            scroll,
            next_sequence: 1,
        }
    }

    /// Messages in display order.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a reply is outstanding.
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.phase == Phase::AwaitingReply
    }

    #[must_use]
    pub fn auto_scroll(&self) -> bool {
        self.scroll.auto_scroll()
    }

    #[must_use]
    pub fn scroll(&self) -> &ScrollController {
        &self.scroll
    }

    /// Whether the welcome placeholder replaces the message list.
    #[must_use]
    pub fn shows_welcome(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recent message written by the user, if any.
    #[must_use]
    pub fn last_user_message(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.is_user())
    }

    /// Apply one action and return the effects it produced.
    ///
    /// An empty vector means the action was a no-op.
    pub fn reduce(&mut self, action: Action, now: DateTime<Utc>) -> Vec<Effect> {
        match (self.phase, action) {
            (Phase::Idle, Action::Send(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return Vec::new();
                }
                let message = self.append(Sender::User, text, now);
                self.phase = Phase::AwaitingReply;

                let mut effects = vec![
                    Effect::Appended(message),
                    Effect::TypingChanged(true),
                    Effect::ScheduleReply {
                        prompt: text.to_string(),
                    },
                ];
                self.push_follow(&mut effects);
                effects
            }
            (Phase::AwaitingReply, Action::ReplyReady(text)) => {
                let message = self.append(Sender::Agent, text, now);
                self.phase = Phase::Idle;

                let mut effects = vec![Effect::Appended(message), Effect::TypingChanged(false)];
                self.push_follow(&mut effects);
                effects
            }
            // Composer is disabled while typing; a reply with nothing pending is stale.
            (Phase::AwaitingReply, Action::Send(_)) | (Phase::Idle, Action::ReplyReady(_)) => {
                Vec::new()
            }
            (_, Action::Scrolled(metrics)) => {
                if self.scroll.on_scroll(metrics) {
                    vec![Effect::AutoScrollChanged(self.scroll.auto_scroll())]
                } else {
                    Vec::new()
                }
            }
            (_, Action::JumpToBottom) => vec![Effect::ScrollToBottom],
        }
    }

    fn push_follow(&self, effects: &mut Vec<Effect>) {
        if self.scroll.auto_scroll() {
            effects.push(Effect::ScrollToBottom);
        }
    }

    fn append(&mut self, sender: Sender, content: impl Into<String>, now: DateTime<Utc>) -> ChatMessage {
        // Keep timestamps strictly increasing even when the clock has not moved.
        let timestamp = match self.messages.last() {
            Some(last) if now <= last.timestamp => last.timestamp + Duration::microseconds(1),
            _ => now,
        };
        let message = ChatMessage::new(self.next_sequence, sender, content, timestamp);
        self.next_sequence += 1;
        self.messages.push(message.clone());
        message
    }
}
