// End-to-end tests for the inbox view-model over the public crate surface.

use std::time::Duration;

use commhub::api::models::{Record, RecordKind, Sender};
use commhub::api::source::fixtures;
use commhub::inbox::{Filter, InboxController, Selection, ViewState, compute_sections};

fn kind_allowed(filter: Filter, kind: RecordKind) -> bool {
    match filter {
        Filter::All => true,
        Filter::Users => kind == RecordKind::User,
        Filter::Conversations => kind == RecordKind::Conversation,
        Filter::Calls => kind == RecordKind::Call,
    }
}

#[test]
fn output_only_contains_matching_records() {
    let fix = fixtures();
    let filters = [Filter::All, Filter::Users, Filter::Conversations, Filter::Calls];
    let queries = ["", "a", "LI", "team", "zzz-no-match"];

    for filter in filters {
        for query in queries {
            let needle = query.trim().to_lowercase();
            for section in compute_sections(&fix, filter, query) {
                for record in &section.records {
                    assert!(
                        kind_allowed(filter, record.kind()),
                        "{:?} leaked into {:?}",
                        record.kind(),
                        filter
                    );
                    assert!(
                        record.name().to_lowercase().contains(&needle),
                        "{} does not match {query}",
                        record.name()
                    );
                }
            }
        }
    }
}

#[test]
fn compute_sections_is_referentially_transparent() {
    let fix = fixtures();
    let first = compute_sections(&fix, Filter::All, "an");
    let second = compute_sections(&fix, Filter::All, "an");
    assert_eq!(first, second);
}

#[test]
fn users_section_is_absent_when_no_user_matches() {
    // "diana" matches a conversation but no user.
    let sections = compute_sections(&fixtures(), Filter::All, "diana");
    assert!(sections.iter().all(|s| s.title != "Users"));
    assert!(sections.iter().any(|s| s.title == "Recent Chats"));
}

#[test]
fn users_filter_returns_exactly_one_complete_section() {
    let fix = fixtures();
    let sections = compute_sections(&fix, Filter::Users, "");
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "Users");
    let names: Vec<_> = sections[0].records.iter().map(|r| r.name().to_string()).collect();
    assert_eq!(names, ["Alice Johnson", "Bob Smith", "Charlie Brown"]);
}

#[test]
fn li_search_keeps_alice_and_charlie() {
    let sections = compute_sections(&fixtures(), Filter::All, "li");
    let users = sections.iter().find(|s| s.title == "Users").unwrap();
    let names: Vec<_> = users.records.iter().map(|r| r.name().to_string()).collect();
    assert_eq!(names, ["Alice Johnson", "Charlie Brown"]);
}

#[test]
fn empty_query_equals_whitespace_query() {
    let fix = fixtures();
    for filter in [Filter::All, Filter::Users, Filter::Conversations, Filter::Calls] {
        assert_eq!(
            compute_sections(&fix, filter, ""),
            compute_sections(&fix, filter, " \t ")
        );
    }
}

#[test]
fn controller_sections_track_state_changes() {
    let mut c = InboxController::new(fixtures());

    c.set_filter(Filter::Calls);
    c.set_search_query("green");
    let sections = c.sections();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "Calls");
    assert_eq!(sections[0].records.len(), 1);
    assert_eq!(sections[0].records[0].name(), "Fiona Green");

    // No results still yields the single section for a category filter.
    c.set_search_query("nobody");
    let sections = c.sections();
    assert_eq!(sections.len(), 1);
    assert!(sections[0].records.is_empty());
}

#[test]
fn selection_routes_by_kind() {
    let mut c = InboxController::new(fixtures());
    let conv = Record::Conversation(c.collections().conversations[0].clone());
    assert_eq!(c.select(&conv), Selection::NotImplemented(RecordKind::Conversation));
    assert_eq!(c.state(), ViewState::Listing);

    let alice = Record::User(c.collections().users[0].clone());
    assert_eq!(c.select(&alice), Selection::OpenedDetail);
    assert_eq!(c.state(), ViewState::Detail);

    c.back();
    assert_eq!(c.state(), ViewState::Listing);
}

#[tokio::test]
async fn hello_to_alice_gets_exactly_one_reply() {
    let mut c = InboxController::new(fixtures());
    c.set_reply_delay(Duration::from_millis(30));

    let alice = Record::User(c.collections().users[0].clone());
    c.select(&alice);
    let seeded = c.detail().unwrap().messages().len();

    assert!(c.send_message("hello"));
    {
        let log = c.detail().unwrap().messages();
        assert_eq!(log.len(), seeded + 1);
        let sent = log.last().unwrap();
        assert_eq!(sent.sender, Sender::Me);
        assert_eq!(sent.text, "hello");
    }

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(c.drain_replies(), 1);
    {
        let log = c.detail().unwrap().messages();
        assert_eq!(log.len(), seeded + 2);
        assert_eq!(log.last().unwrap().sender, Sender::Other);
    }

    // No further entries without another send.
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(c.drain_replies(), 0);
    assert_eq!(c.detail().unwrap().messages().len(), seeded + 2);
}

#[tokio::test]
async fn reply_is_cancelled_by_back_navigation() {
    let mut c = InboxController::new(fixtures());
    c.set_reply_delay(Duration::from_millis(30));

    let alice = Record::User(c.collections().users[0].clone());
    c.select(&alice);
    c.send_message("hello");
    assert_eq!(c.detail().unwrap().pending_replies(), 1);
    c.back();

    tokio::time::sleep(Duration::from_millis(120)).await;

    c.select(&alice);
    assert_eq!(c.drain_replies(), 0);
    // Fresh session: only the seeded history.
    assert_eq!(c.detail().unwrap().messages().len(), 4);
}
