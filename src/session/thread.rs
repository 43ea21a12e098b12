//! Live chat sessions and the in-memory session store.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::message::ChatMessage;
use super::state::{Action, Effect, SessionState};
use crate::events::SessionEvent;
use crate::scroll::{DEFAULT_SCROLL_THRESHOLD, ScrollController, ScrollMetrics};
use crate::synthesizer::{CannedResponder, Responder};

/// Default session timeout (30 minutes).
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Buffered events per subscriber before it starts lagging.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Inclusive range the simulated typing delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyDelay {
    min: Duration,
    max: Duration,
}

impl Default for ReplyDelay {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500), Duration::from_millis(2500))
    }
}

impl ReplyDelay {
    /// `max` below `min` collapses the range to `min`.
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    #[must_use]
    pub fn min(&self) -> Duration {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draw a delay uniformly from `[min, max]` at millisecond resolution.
    #[must_use]
    pub fn sample(&self) -> Duration {
        let lo = duration_millis(self.min);
        let hi = duration_millis(self.max);
        Duration::from_millis(rand::rng().random_range(lo..=hi))
    }
}

fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Everything a new session is built from.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Produces agent reply text.
    pub responder: Arc<dyn Responder>,
    /// Simulated typing delay.
    pub reply_delay: ReplyDelay,
    /// Auto-scroll distance threshold.
    pub scroll_threshold: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            responder: Arc::new(CannedResponder),
            reply_delay: ReplyDelay::default(),
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
        }
    }
}

/// A single page session.
///
/// Cheap to clone; all clones share the same state. Every mutation goes
/// through [`Session::dispatch`], which runs the reducer and then executes the
/// resulting effects (broadcasting events, scheduling the reply timer).
#[derive(Debug)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// Unique session identifier.
    id: String,
    /// Chat state machine.
    state: RwLock<SessionState>,
    /// Last activity time.
    last_activity: RwLock<DateTime<Utc>>,
    /// Change notifications for SSE subscribers.
    events: broadcast::Sender<SessionEvent>,
    /// Cancelled when the session is closed; aborts a pending reply.
    shutdown: CancellationToken,
    responder: Arc<dyn Responder>,
    reply_delay: ReplyDelay,
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Session {
    /// Create a new session with the given ID.
    fn new(id: String, settings: &SessionSettings) -> Self {
        let now = Utc::now();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(SessionInner {
                id,
                state: RwLock::new(SessionState::new(ScrollController::new(
                    settings.scroll_threshold,
                ))),
                last_activity: RwLock::new(now),
                events,
                shutdown: CancellationToken::new(),
                responder: Arc::clone(&settings.responder),
                reply_delay: settings.reply_delay,
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Submit user text. Blank text and sends while typing are ignored.
    ///
    /// Returns `true` when the message was accepted.
    pub fn send_message(&self, text: &str) -> bool {
        !self.dispatch(Action::Send(text.to_string())).is_empty()
    }

    /// Record a manual scroll and return the resulting auto-scroll flag.
    pub fn scrolled(&self, metrics: ScrollMetrics) -> bool {
        self.dispatch(Action::Scrolled(metrics));
        self.auto_scroll()
    }

    /// Ask the page to move to the bottom without changing auto-scroll.
    pub fn jump_to_bottom(&self) {
        self.dispatch(Action::JumpToBottom);
    }

    /// Run one action through the state machine and execute its effects.
    ///
    /// Closed sessions ignore all actions. Effects run under the state lock,
    /// so subscribers observe events in the order the state changed.
    pub fn dispatch(&self, action: Action) -> Vec<Effect> {
        let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
        if self.is_closed() {
            tracing::debug!(session_id = %self.id(), action = ?action, "Ignoring action on closed session");
            return Vec::new();
        }

        let effects = state.reduce(action, Utc::now());
        if !effects.is_empty() {
            self.touch();
        }
        for effect in &effects {
            self.execute(effect);
        }
        drop(state);
        effects
    }

    fn execute(&self, effect: &Effect) {
        match effect {
            Effect::Appended(message) => {
                tracing::info!(
                    name: "chat.message.appended",
                    session_id = %self.id(),
                    message_id = %message.id,
                    sender = %message.sender,
                    content_length = message.content.len(),
                    "Message appended"
                );
                self.publish(SessionEvent::MessageAppended(message.clone()));
            }
            Effect::TypingChanged(is_typing) => {
                self.publish(SessionEvent::TypingChanged(*is_typing));
            }
            Effect::ScheduleReply { prompt } => self.schedule_reply(prompt.clone()),
            Effect::AutoScrollChanged(auto_scroll) => {
                tracing::debug!(session_id = %self.id(), auto_scroll, "Auto-scroll changed");
                self.publish(SessionEvent::AutoScrollChanged(*auto_scroll));
            }
            Effect::ScrollToBottom => self.publish(SessionEvent::ScrollToBottom),
        }
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine; the page may not have connected yet.
        let _ = self.inner.events.send(event);
    }

    fn schedule_reply(&self, prompt: String) {
        let delay = self.inner.reply_delay.sample();
        let session = self.clone();
        let shutdown = self.inner.shutdown.clone();

        tracing::info!(
            name: "chat.reply.scheduled",
            session_id = %self.id(),
            delay_ms = duration_millis(delay),
            "Reply scheduled"
        );

        tokio::spawn(async move {
            tokio::select! {
                () = shutdown.cancelled() => {
                    tracing::info!(
                        name: "chat.reply.cancelled",
                        session_id = %session.id(),
                        "Pending reply cancelled"
                    );
                }
                () = tokio::time::sleep(delay) => {
                    let text = session.inner.responder.respond(&prompt).await;
                    session.dispatch(Action::ReplyReady(text));
                }
            }
        });
    }

    /// Subscribe to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Tear the session down. Cancels a pending reply and notifies subscribers.
    pub fn close(&self) {
        let state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
        if self.is_closed() {
            return;
        }
        self.inner.shutdown.cancel();
        self.publish(SessionEvent::Closed);
        tracing::info!(
            name: "session.closed",
            session_id = %self.id(),
            message_count = state.message_count(),
            "Session closed"
        );
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Copy of the current state, for rendering.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Get all messages in the conversation.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .messages()
            .to_vec()
    }

    /// Get the number of messages in the conversation.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).message_count()
    }

    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).is_typing()
    }

    #[must_use]
    pub fn auto_scroll(&self) -> bool {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).auto_scroll()
    }

    /// Update the last activity timestamp.
    fn touch(&self) {
        let mut guard = self.inner.last_activity.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Utc::now();
    }

    /// Check if the session has been idle longer than `timeout`.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        let last = *self.inner.last_activity.read().unwrap_or_else(PoisonError::into_inner);
        // A negative span means clock skew; treat as fresh.
        (Utc::now() - last).to_std().is_ok_and(|idle| idle > timeout)
    }

    /// Whether a page is currently streaming this session's events.
    #[must_use]
    pub fn has_subscribers(&self) -> bool {
        self.inner.events.receiver_count() > 0
    }
}

/// Thread-safe store for sessions.
///
/// Provides methods for creating, retrieving, and cleaning up sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

#[derive(Debug)]
struct SessionStoreInner {
    sessions: RwLock<HashMap<String, Session>>,
    settings: SessionSettings,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}

impl SessionStore {
    /// Create a new session store.
    #[must_use]
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                sessions: RwLock::new(HashMap::new()),
                settings,
            }),
        }
    }

    /// Create a new session and return it.
    #[must_use]
    pub fn create(&self) -> Session {
        let id = Uuid::new_v4().to_string();
        let session = Session::new(id.clone(), &self.inner.settings);
        self.write().insert(id, session.clone());
        tracing::info!(name: "session.created", session_id = %session.id(), "Session created");
        session
    }

    /// Get a live session by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Session> {
        self.read().get(id).cloned()
    }

    /// Remove a session by ID and close it.
    pub fn remove(&self, id: &str) -> Option<Session> {
        let removed = self.write().remove(id);
        if let Some(session) = &removed {
            session.close();
        }
        removed
    }

    /// Get the number of active sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close and remove sessions that have been inactive longer than the timeout.
    /// A session with an open event stream is still in use and is kept.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let expired: Vec<Session> = {
            let mut guard = self.write();
            let ids: Vec<String> = guard
                .iter()
                .filter(|(_, s)| !s.has_subscribers() && s.is_expired_with_timeout(timeout))
                .map(|(id, _)| id.clone())
                .collect();
            ids.iter().filter_map(|id| guard.remove(id)).collect()
        };
        for session in &expired {
            session.close();
        }
        expired.len()
    }

    /// Close every session, e.g. on shutdown.
    pub fn close_all(&self) {
        let drained: Vec<Session> = self.write().drain().map(|(_, s)| s).collect();
        for session in drained {
            session.close();
        }
    }

    /// List all session IDs.
    #[must_use]
    pub fn list_ids(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Session>> {
        self.inner.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.inner.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Sender;
    use crate::synthesizer::CANNED_REPLIES;

    #[tokio::test(start_paused = true)]
    async fn test_reply_arrives_after_delay() {
        let store = SessionStore::default();
        let session = store.create();

        assert!(session.send_message("Hello"));
        assert!(session.is_typing());

        tokio::time::sleep(Duration::from_millis(1400)).await;
        assert!(session.is_typing());
        assert_eq!(session.message_count(), 1);

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert!(!session.is_typing());

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].sender, Sender::Agent);
        assert!(CANNED_REPLIES.contains(&messages[1].content.as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_while_typing_is_ignored() {
        let session = SessionStore::default().create();
        assert!(session.send_message("one"));
        assert!(!session.send_message("two"));
        assert!(!session.send_message("   "));

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(session.message_count(), 2);
        assert!(session.send_message("three"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_pending_reply() {
        let store = SessionStore::default();
        let session = store.create();
        session.send_message("Hello");

        assert!(store.remove(session.id()).is_some());
        assert!(session.is_closed());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(session.message_count(), 1);
        assert!(!session.send_message("again"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscriber_sees_full_exchange() {
        let session = SessionStore::default().create();
        let mut rx = session.subscribe();

        session.send_message("Hello");
        assert!(matches!(rx.recv().await.unwrap(), SessionEvent::MessageAppended(m) if m.sender == Sender::User));
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::TypingChanged(true));
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::ScrollToBottom);

        assert!(matches!(rx.recv().await.unwrap(), SessionEvent::MessageAppended(m) if m.sender == Sender::Agent));
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::TypingChanged(false));
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::ScrollToBottom);

        session.close();
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::Closed);
    }

    #[test]
    fn test_session_store() {
        let store = SessionStore::default();

        assert!(store.is_empty());

        let session = store.create();
        assert_eq!(store.len(), 1);

        let retrieved = store.get(session.id()).unwrap();
        assert_eq!(retrieved.id(), session.id());

        store.remove(session.id());
        assert!(store.is_empty());
        assert!(store.get(session.id()).is_none());
    }

    #[test]
    fn test_cleanup_expired() {
        let store = SessionStore::default();
        let a = store.create();
        let _b = store.create();

        assert_eq!(store.cleanup_expired_with_timeout(Duration::from_secs(60)), 0);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(store.cleanup_expired_with_timeout(Duration::from_millis(5)), 2);
        assert!(store.is_empty());
        assert!(a.is_closed());
    }

    #[test]
    fn test_cleanup_keeps_streaming_sessions() {
        let store = SessionStore::default();
        let watched = store.create();
        let idle = store.create();
        let rx = watched.subscribe();

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(store.cleanup_expired_with_timeout(Duration::from_millis(5)), 1);
        assert!(idle.is_closed());
        assert!(!watched.is_closed());
        assert!(store.get(watched.id()).is_some());

        drop(rx);
        assert_eq!(store.cleanup_expired_with_timeout(Duration::from_millis(5)), 1);
        assert!(watched.is_closed());
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_streaming_session_survives_sweep_and_accepts_sends() {
        let store = SessionStore::default();
        let session = store.create();
        let mut rx = session.subscribe();

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(store.cleanup_expired_with_timeout(Duration::from_millis(5)), 0);
        assert!(session.send_message("still here"));
        assert!(matches!(rx.recv().await.unwrap(), SessionEvent::MessageAppended(_)));
    }

    #[test]
    fn test_closed_session_drops_late_reply() {
        let session = SessionStore::default().create();
        let mut rx = session.subscribe();
        session.close();

        assert!(session.dispatch(Action::ReplyReady("late".to_string())).is_empty());
        assert_eq!(session.message_count(), 0);
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Closed);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_concurrent_scrolls_publish_in_state_order() {
        let session = SessionStore::default().create();
        let mut rx = session.subscribe();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let session = session.clone();
                std::thread::spawn(move || {
                    let scroll_top = if i % 2 == 0 { 0.0 } else { 500.0 };
                    session.scrolled(ScrollMetrics {
                        scroll_top,
                        scroll_height: 800.0,
                        client_height: 300.0,
                    });
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut last = None;
        while let Ok(event) = rx.try_recv() {
            if let SessionEvent::AutoScrollChanged(auto_scroll) = event {
                assert_ne!(last, Some(auto_scroll));
                last = Some(auto_scroll);
            }
        }
        assert_eq!(last, Some(session.auto_scroll()));
    }

    #[test]
    fn test_reply_delay_bounds() {
        let delay = ReplyDelay::default();
        for _ in 0..500 {
            let d = delay.sample();
            assert!(d >= Duration::from_millis(1500) && d <= Duration::from_millis(2500));
        }

        let inverted = ReplyDelay::new(Duration::from_millis(10), Duration::from_millis(5));
        assert_eq!(inverted.sample(), Duration::from_millis(10));
    }

    #[test]
    fn test_scroll_through_session() {
        let session = SessionStore::default().create();
        let following = session.scrolled(ScrollMetrics {
            scroll_top: 0.0,
            scroll_height: 800.0,
            client_height: 300.0,
        });
        assert!(!following);
        assert!(!session.auto_scroll());
        session.jump_to_bottom();
        assert!(!session.auto_scroll());
    }
}
