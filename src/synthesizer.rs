//! Agent reply synthesis.
//!
//! There is no model behind the agent: [`CannedResponder`] picks one of a
//! fixed set of replies at random. The [`Responder`] trait is the seam where a
//! real backend call would go.

use async_trait::async_trait;
use rand::seq::IndexedRandom;

/// Replies the canned agent chooses from.
pub const CANNED_REPLIES: [&str; 5] = [
    "I understand you're looking for assistance. How can I help you today?",
    "That's a great question! Let me provide you with the information you need.",
    "I'm here to help you achieve your goals. What specific area would you like to focus on?",
    "Based on your message, I can suggest several options that might be useful for you.",
    "I'll be happy to guide you through this process step by step.",
];

/// Produces agent reply text for the latest user message.
#[async_trait]
pub trait Responder: Send + Sync + std::fmt::Debug {
    /// Reply to `last_user_text`. Must always return non-empty text.
    async fn respond(&self, last_user_text: &str) -> String;
}

/// Uniform random choice over [`CANNED_REPLIES`]; the input is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedResponder;

impl CannedResponder {
    /// Pick a reply without going through the async trait.
    #[must_use]
    pub fn pick(&self) -> &'static str {
        CANNED_REPLIES
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(CANNED_REPLIES[0])
    }
}

#[async_trait]
impl Responder for CannedResponder {
    async fn respond(&self, last_user_text: &str) -> String {
        let reply = self.pick();
        tracing::debug!(
            prompt_length = last_user_text.len(),
            reply_length = reply.len(),
            "Synthesized canned reply"
        );
        reply.to_string()
    }
}
