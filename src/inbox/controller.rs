use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::models::{
    ChatMessage, Collections, Record, RecordKind, Sender, UserRecord,
};
use crate::inbox::engine::{self, Filter, Section};
use crate::utils;

/// Matches the original demo's simulated-response timeout.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_secs(2);

const CANNED_REPLY: &str = "Thanks for your message! 😊";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Listing,
    Detail,
}

/// Outcome of tapping a record in the list. Only user records open a
/// detail view; the other kinds have no implemented tap-through, and the
/// caller decides how to present that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    OpenedDetail,
    NotImplemented(RecordKind),
}

/// Per-session chat state for one selected user: the message log and any
/// simulated replies still in flight. Dropped wholesale on back
/// navigation, which also aborts pending reply timers so a late reply can
/// never land in a discarded session.
pub struct DetailSession {
    peer: UserRecord,
    messages: Vec<ChatMessage>,
    next_id: u64,
    reply_tx: mpsc::UnboundedSender<String>,
    reply_rx: mpsc::UnboundedReceiver<String>,
    reply_tasks: Vec<JoinHandle<()>>,
}

impl DetailSession {
    fn new(peer: UserRecord) -> Self {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        let mut session = Self {
            peer,
            messages: Vec::new(),
            next_id: 1,
            reply_tx,
            reply_rx,
            reply_tasks: Vec::new(),
        };
        session.seed_history();
        session
    }

    // Canned opener shown when a chat is first entered.
    fn seed_history(&mut self) {
        self.push(Sender::Other, "Hey! How are you doing today?", "10:30 AM");
        self.push(
            Sender::Me,
            "I'm doing great! Just working on some new projects. How about you?",
            "10:32 AM",
        );
        self.push(
            Sender::Other,
            "That sounds awesome! I'd love to hear more about your projects sometime.",
            "10:35 AM",
        );
        self.push(Sender::Me, "Absolutely! Let's catch up soon 😊", "10:37 AM");
    }

    fn push(&mut self, sender: Sender, text: &str, timestamp_label: &str) {
        self.messages.push(ChatMessage {
            id: self.next_id,
            text: text.to_string(),
            sender,
            timestamp_label: timestamp_label.to_string(),
        });
        self.next_id += 1;
    }

    fn send(&mut self, text: &str, reply_delay: Duration) {
        self.push(Sender::Me, text, &utils::time_label());

        let tx = self.reply_tx.clone();
        let task = utils::spawn_async(async move {
            tokio::time::sleep(reply_delay).await;
            let _ = tx.send(CANNED_REPLY.to_string());
        });
        self.reply_tasks.push(task);
    }

    /// Fold any simulated replies that have arrived into the log. Returns
    /// the number of messages appended.
    pub fn drain_replies(&mut self) -> usize {
        let mut appended = 0;
        while let Ok(text) = self.reply_rx.try_recv() {
            let label = utils::time_label();
            self.push(Sender::Other, &text, &label);
            appended += 1;
        }
        self.reply_tasks.retain(|t| !t.is_finished());
        appended
    }

    pub fn peer(&self) -> &UserRecord {
        &self.peer
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of reply timers still running.
    pub fn pending_replies(&self) -> usize {
        self.reply_tasks.iter().filter(|t| !t.is_finished()).count()
    }
}

impl Drop for DetailSession {
    fn drop(&mut self) {
        for task in &self.reply_tasks {
            task.abort();
        }
    }
}

/// Owns the inbox view state: search text, active category filter, and the
/// optional detail session. Sections are re-derived from the pure engine
/// on every call, so the visible list always reflects the current state.
pub struct InboxController {
    collections: Collections,
    search_query: String,
    active_filter: Filter,
    detail: Option<DetailSession>,
    reply_delay: Duration,
}

impl InboxController {
    pub fn new(collections: Collections) -> Self {
        Self {
            collections,
            search_query: String::new(),
            active_filter: Filter::All,
            detail: None,
            reply_delay: DEFAULT_REPLY_DELAY,
        }
    }

    /// Shrink the simulated-reply timeout; tests use this to avoid real
    /// two-second waits.
    pub fn set_reply_delay(&mut self, delay: Duration) {
        self.reply_delay = delay;
    }

    /// Swap in a fresh snapshot of the collections, e.g. after a backend
    /// refresh. View state is untouched.
    pub fn replace_collections(&mut self, collections: Collections) {
        self.collections = collections;
    }

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.active_filter = filter;
    }

    pub fn active_filter(&self) -> Filter {
        self.active_filter
    }

    pub fn state(&self) -> ViewState {
        if self.detail.is_some() {
            ViewState::Detail
        } else {
            ViewState::Listing
        }
    }

    /// Current visible list, sectioned. Empty output means the caller
    /// should render its empty state.
    pub fn sections(&self) -> Vec<Section> {
        engine::compute_sections(&self.collections, self.active_filter, &self.search_query)
    }

    /// Handle a tap on a list record. Users open a detail session;
    /// conversations and calls report that their tap-through is not
    /// implemented, without changing state.
    pub fn select(&mut self, record: &Record) -> Selection {
        match record {
            Record::User(user) => {
                self.detail = Some(DetailSession::new(user.clone()));
                Selection::OpenedDetail
            }
            other => Selection::NotImplemented(other.kind()),
        }
    }

    /// Back navigation: drop the detail session and cancel any pending
    /// simulated reply.
    pub fn back(&mut self) {
        self.detail = None;
    }

    pub fn detail(&self) -> Option<&DetailSession> {
        self.detail.as_ref()
    }

    /// Append an outgoing message to the active detail session and
    /// schedule the simulated reply. Returns false when there is no active
    /// session or the text trims to nothing.
    pub fn send_message(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        let delay = self.reply_delay;
        match self.detail.as_mut() {
            Some(session) => {
                session.send(trimmed, delay);
                true
            }
            None => false,
        }
    }

    /// Pull arrived simulated replies into the log. No-op in listing
    /// state.
    pub fn drain_replies(&mut self) -> usize {
        self.detail.as_mut().map(|s| s.drain_replies()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::source::fixtures;

    fn controller() -> InboxController {
        let mut c = InboxController::new(fixtures());
        c.set_reply_delay(Duration::from_millis(20));
        c
    }

    fn first_user(c: &InboxController) -> Record {
        Record::User(c.collections().users[0].clone())
    }

    #[test]
    fn initial_state_is_listing_all_unfiltered() {
        let c = controller();
        assert_eq!(c.state(), ViewState::Listing);
        assert_eq!(c.active_filter(), Filter::All);
        assert_eq!(c.search_query(), "");
        assert!(c.detail().is_none());
    }

    #[test]
    fn selecting_a_user_enters_detail() {
        let mut c = controller();
        let user = first_user(&c);
        assert_eq!(c.select(&user), Selection::OpenedDetail);
        assert_eq!(c.state(), ViewState::Detail);
        let session = c.detail().unwrap();
        assert_eq!(session.peer().name, "Alice Johnson");
        // Seeded history from the demo.
        assert_eq!(session.messages().len(), 4);
    }

    #[test]
    fn selecting_other_kinds_stays_in_listing() {
        let mut c = controller();
        let conv = Record::Conversation(c.collections().conversations[0].clone());
        let call = Record::Call(c.collections().calls[0].clone());
        assert_eq!(c.select(&conv), Selection::NotImplemented(RecordKind::Conversation));
        assert_eq!(c.select(&call), Selection::NotImplemented(RecordKind::Call));
        assert_eq!(c.state(), ViewState::Listing);
    }

    #[test]
    fn back_returns_to_listing() {
        let mut c = controller();
        let user = first_user(&c);
        c.select(&user);
        c.back();
        assert_eq!(c.state(), ViewState::Listing);
        assert!(c.detail().is_none());
    }

    #[test]
    fn send_requires_detail_and_non_blank_text() {
        let mut c = controller();
        assert!(!c.send_message("hello"));

        let user = first_user(&c);
        c.select(&user);
        assert!(!c.send_message("   "));
        assert_eq!(c.detail().unwrap().messages().len(), 4);
    }

    #[test]
    fn sent_messages_get_sequential_ids() {
        let mut c = controller();
        let user = first_user(&c);
        c.select(&user);
        assert!(c.send_message("hello"));
        assert!(c.send_message("are you there?"));
        let ids: Vec<u64> = c.detail().unwrap().messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        let last = c.detail().unwrap().messages().last().unwrap().clone();
        assert_eq!(last.sender, Sender::Me);
        assert_eq!(last.text, "are you there?");
    }

    #[test]
    fn simulated_reply_arrives_once_after_delay() {
        let mut c = controller();
        let user = first_user(&c);
        c.select(&user);
        c.send_message("hello");

        // Nothing before the delay elapses.
        assert_eq!(c.drain_replies(), 0);
        std::thread::sleep(Duration::from_millis(120));
        assert_eq!(c.drain_replies(), 1);

        let session = c.detail().unwrap();
        let reply = session.messages().last().unwrap();
        assert_eq!(reply.sender, Sender::Other);
        assert_eq!(reply.text, CANNED_REPLY);

        // And only once.
        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(c.drain_replies(), 0);
    }

    #[test]
    fn back_cancels_pending_reply() {
        let mut c = controller();
        let user = first_user(&c);
        c.select(&user);
        c.send_message("hello");
        c.back();

        std::thread::sleep(Duration::from_millis(120));

        // Re-entering starts a fresh session: seeded history only, and no
        // stray reply from the discarded session.
        c.select(&user);
        assert_eq!(c.drain_replies(), 0);
        assert_eq!(c.detail().unwrap().messages().len(), 4);
    }
}
