use super::*;

/// In-memory link that records every forwarded question.
#[derive(Default)]
struct RecordingLink {
    closed: bool,
    sent: Vec<String>,
}

impl QuestionLink for RecordingLink {
    fn is_open(&self) -> bool {
        !self.closed
    }

    fn send_question(&mut self, text: &str) -> bool {
        self.sent.push(text.to_owned());
        true
    }
}

fn closed_link() -> RecordingLink {
    RecordingLink { closed: true, sent: Vec::new() }
}

/// Link that reports open but whose writer has gone away.
struct DeadWriterLink;

impl QuestionLink for DeadWriterLink {
    fn is_open(&self) -> bool {
        true
    }

    fn send_question(&mut self, _text: &str) -> bool {
        false
    }
}

// =============================================================
// Initial state
// =============================================================

#[test]
fn new_store_has_single_welcome_message() {
    let store = ConversationStore::new();
    assert_eq!(store.messages(), &[ChatMessage::welcome()]);
    assert!(store.messages()[0].is_bot);
    assert!(!store.is_loading());
}

#[test]
fn new_store_sidebar_hidden_and_draft_empty() {
    let store = ConversationStore::default();
    assert!(!store.show_sidebar());
    assert!(store.draft().is_empty());
}

// =============================================================
// send_message
// =============================================================

#[test]
fn send_message_appends_user_message_and_sets_loading() {
    let mut store = ConversationStore::new();
    let mut link = RecordingLink::default();

    assert!(store.send_message("How many orders in Q1?", &mut link));

    assert_eq!(store.messages().len(), 2);
    assert_eq!(store.messages()[1], ChatMessage::user("How many orders in Q1?"));
    assert!(store.is_loading());
    assert_eq!(link.sent, vec!["How many orders in Q1?".to_owned()]);
}

#[test]
fn send_message_while_loading_accepts_only_the_first() {
    let mut store = ConversationStore::new();
    let mut link = RecordingLink::default();

    assert!(store.send_message("first", &mut link));
    assert!(!store.send_message("second", &mut link));
    assert!(!store.send_message("third", &mut link));

    assert_eq!(link.sent, vec!["first".to_owned()]);
    assert_eq!(store.messages().len(), 2);
    assert!(store.is_loading());
}

#[test]
fn send_message_on_closed_link_is_noop() {
    let mut store = ConversationStore::new();
    let mut link = closed_link();

    assert!(!store.send_message("anyone there?", &mut link));

    assert!(link.sent.is_empty());
    assert_eq!(store.messages().len(), 1);
    assert!(!store.is_loading());
}

#[test]
fn send_dropped_by_link_leaves_store_untouched() {
    let mut store = ConversationStore::new();
    let rx = store.subscribe();

    assert!(!store.send_message("Q", &mut DeadWriterLink));

    assert!(!store.is_loading());
    assert_eq!(store.messages(), &[ChatMessage::welcome()]);
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn submit_draft_dropped_by_link_does_not_start_loading() {
    let mut store = ConversationStore::new();
    store.set_draft("Q");

    assert!(!store.submit_draft(&mut DeadWriterLink));

    assert!(!store.is_loading());
    assert_eq!(store.messages().len(), 1);
}

#[test]
fn send_is_accepted_again_after_answer() {
    let mut store = ConversationStore::new();
    let mut link = RecordingLink::default();

    store.send_message("one", &mut link);
    store.receive_answer("1");
    assert!(store.send_message("two", &mut link));
    assert_eq!(link.sent, vec!["one".to_owned(), "two".to_owned()]);
}

// =============================================================
// receive_answer
// =============================================================

#[test]
fn receive_answer_appends_bot_message_and_clears_loading() {
    let mut store = ConversationStore::new();
    let mut link = RecordingLink::default();
    store.send_message("How many orders in Q1?", &mut link);

    store.receive_answer("42 orders");

    assert_eq!(store.messages().last(), Some(&ChatMessage::bot("42 orders")));
    assert!(!store.is_loading());
}

#[test]
fn question_then_answer_keeps_order() {
    let mut store = ConversationStore::new();
    let mut link = RecordingLink::default();

    store.send_message("Q", &mut link);
    store.receive_answer("A");

    let tail = &store.messages()[store.messages().len() - 2..];
    assert_eq!(tail, &[ChatMessage::user("Q"), ChatMessage::bot("A")]);
}

// =============================================================
// reset
// =============================================================

#[test]
fn reset_restores_welcome_and_clears_loading() {
    let mut store = ConversationStore::new();
    let mut link = RecordingLink::default();
    store.send_message("Q", &mut link);
    store.receive_answer("A");
    store.send_message("still waiting", &mut link);
    assert!(store.is_loading());

    store.reset();

    assert_eq!(store.messages(), &[ChatMessage::welcome()]);
    assert!(!store.is_loading());
}

#[test]
fn reset_on_fresh_store_is_stable() {
    let mut store = ConversationStore::new();
    store.reset();
    store.reset();
    assert_eq!(store.messages(), &[ChatMessage::welcome()]);
}

// =============================================================
// Draft
// =============================================================

#[test]
fn submit_draft_sends_and_clears() {
    let mut store = ConversationStore::new();
    let mut link = RecordingLink::default();
    store.set_draft("Top items?");

    assert!(store.submit_draft(&mut link));

    assert!(store.draft().is_empty());
    assert_eq!(link.sent, vec!["Top items?".to_owned()]);
}

#[test]
fn submit_draft_while_loading_keeps_draft() {
    let mut store = ConversationStore::new();
    let mut link = RecordingLink::default();
    store.send_message("first", &mut link);
    store.set_draft("second");

    assert!(!store.submit_draft(&mut link));

    assert_eq!(store.draft(), "second");
    assert_eq!(link.sent.len(), 1);
}

#[test]
fn submit_blank_draft_is_ignored() {
    let mut store = ConversationStore::new();
    let mut link = RecordingLink::default();
    store.set_draft("   ");

    assert!(!store.submit_draft(&mut link));
    assert!(link.sent.is_empty());
    assert_eq!(store.messages().len(), 1);
}

// =============================================================
// Sidebar
// =============================================================

#[test]
fn toggle_sidebar_flips_visibility() {
    let mut store = ConversationStore::new();
    store.toggle_sidebar();
    assert!(store.show_sidebar());
    store.toggle_sidebar();
    assert!(!store.show_sidebar());
    store.set_sidebar(true);
    assert!(store.show_sidebar());
}

// =============================================================
// Scroll notifications
// =============================================================

#[test]
fn every_history_change_notifies_subscribers() {
    let mut store = ConversationStore::new();
    let mut link = RecordingLink::default();
    let mut rx = store.subscribe();
    assert!(!rx.has_changed().unwrap());

    store.send_message("Q", &mut link);
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), Revision { generation: 0, len: 2 });

    store.receive_answer("A");
    assert_eq!(*rx.borrow_and_update(), Revision { generation: 0, len: 3 });

    store.reset();
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), Revision { generation: 1, len: 1 });
}

#[test]
fn reset_then_send_before_reading_still_shows_new_generation() {
    let mut store = ConversationStore::new();
    let mut link = RecordingLink::default();
    let mut rx = store.subscribe();
    store.send_message("Q1", &mut link);
    store.receive_answer("A1");
    let _ = rx.borrow_and_update();

    store.reset();
    store.send_message("Q2", &mut link);

    let revision = *rx.borrow_and_update();
    assert_eq!(revision.generation, 1);
    assert_eq!(revision.len, 2);
    assert_eq!(store.generation(), 1);
}

#[test]
fn rejected_send_does_not_notify() {
    let mut store = ConversationStore::new();
    let mut link = closed_link();
    let rx = store.subscribe();

    store.send_message("Q", &mut link);

    assert!(!rx.has_changed().unwrap());
}
