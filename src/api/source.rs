use async_trait::async_trait;

use crate::api::client::ApiClient;
use crate::api::models::{
    CallDirection, CallMedium, CallOutcome, CallRecord, Collections, ConversationRecord,
    GroupRecord, GroupVisibility, Presence, UserRecord,
};
use crate::error::Error;
use crate::{app::AppState, storage};

/// Where the inbox collections come from. Backed by static fixtures in the
/// demo and by the messaging backend (with the sqlite cache underneath) in
/// a configured deployment.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserRecord>, Error>;
    async fn list_conversations(&self) -> Result<Vec<ConversationRecord>, Error>;
    async fn list_calls(&self) -> Result<Vec<CallRecord>, Error>;
    async fn list_groups(&self) -> Result<Vec<GroupRecord>, Error>;

    async fn collections(&self) -> Result<Collections, Error> {
        Ok(Collections {
            users: self.list_users().await?,
            conversations: self.list_conversations().await?,
            calls: self.list_calls().await?,
        })
    }
}

fn user(id: &str, name: &str, email: &str, presence: Presence) -> UserRecord {
    UserRecord {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        presence,
    }
}

/// The demo data set from the combined inbox screen. Order matters: the
/// engine preserves it, and the tests assert on it.
pub fn fixtures() -> Collections {
    Collections {
        users: vec![
            user("user1", "Alice Johnson", "alice@example.com", Presence::Online),
            user("user2", "Bob Smith", "bob@example.com", Presence::Offline),
            user("user3", "Charlie Brown", "charlie@example.com", Presence::Online),
        ],
        conversations: vec![
            ConversationRecord {
                id: "conv1".into(),
                name: "Diana Prince".into(),
                last_message: "Hey, how are you?".into(),
                timestamp_label: "2 min ago".into(),
                unread_count: 2,
            },
            ConversationRecord {
                id: "conv2".into(),
                name: "Project Team".into(),
                last_message: "Meeting at 3 PM".into(),
                timestamp_label: "10 min ago".into(),
                unread_count: 0,
            },
            ConversationRecord {
                id: "conv3".into(),
                name: "Edward Norton".into(),
                last_message: "Thanks for help!".into(),
                timestamp_label: "1 hour ago".into(),
                unread_count: 1,
            },
        ],
        calls: vec![
            CallRecord {
                id: "call1".into(),
                name: "Fiona Green".into(),
                medium: CallMedium::Video,
                outcome: CallOutcome::Answered,
                direction: CallDirection::Incoming,
                duration_label: "5:32".into(),
                timestamp_label: "2 hours ago".into(),
            },
            CallRecord {
                id: "call2".into(),
                name: "George Wilson".into(),
                medium: CallMedium::Audio,
                outcome: CallOutcome::Missed,
                direction: CallDirection::Incoming,
                duration_label: "--".into(),
                timestamp_label: "4 hours ago".into(),
            },
            CallRecord {
                id: "call3".into(),
                name: "Helen Davis".into(),
                medium: CallMedium::Video,
                outcome: CallOutcome::Answered,
                direction: CallDirection::Outgoing,
                duration_label: "12:45".into(),
                timestamp_label: "Yesterday".into(),
            },
        ],
    }
}

pub fn group_fixtures() -> Vec<GroupRecord> {
    vec![
        GroupRecord {
            id: "group1".into(),
            name: "Project Team".into(),
            description: "Team collaboration group".into(),
            members_count: 12,
            visibility: GroupVisibility::Public,
            has_joined: true,
        },
        GroupRecord {
            id: "group2".into(),
            name: "Design Team".into(),
            description: "UI/UX design discussions".into(),
            members_count: 8,
            visibility: GroupVisibility::Public,
            has_joined: false,
        },
        GroupRecord {
            id: "group3".into(),
            name: "Development Team".into(),
            description: "Code review and discussions".into(),
            members_count: 15,
            visibility: GroupVisibility::Private,
            has_joined: true,
        },
        GroupRecord {
            id: "group4".into(),
            name: "Marketing Team".into(),
            description: "Marketing strategies and campaigns".into(),
            members_count: 6,
            visibility: GroupVisibility::Public,
            has_joined: false,
        },
    ]
}

/// In-memory demo source. Infallible and order-stable.
#[derive(Debug, Default, Clone)]
pub struct FixtureSource;

#[async_trait]
impl RecordSource for FixtureSource {
    async fn list_users(&self) -> Result<Vec<UserRecord>, Error> {
        Ok(fixtures().users)
    }

    async fn list_conversations(&self) -> Result<Vec<ConversationRecord>, Error> {
        Ok(fixtures().conversations)
    }

    async fn list_calls(&self) -> Result<Vec<CallRecord>, Error> {
        Ok(fixtures().calls)
    }

    async fn list_groups(&self) -> Result<Vec<GroupRecord>, Error> {
        Ok(group_fixtures())
    }
}

/// Live source: queries the messaging backend and mirrors results into the
/// sqlite cache, falling back to cached rows when the backend is
/// unreachable.
pub struct RemoteSource {
    client: ApiClient,
    state: AppState,
}

impl RemoteSource {
    pub fn new(state: AppState) -> Self {
        Self {
            client: ApiClient::new(),
            state,
        }
    }
}

#[async_trait]
impl RecordSource for RemoteSource {
    async fn list_users(&self) -> Result<Vec<UserRecord>, Error> {
        match self.client.users(&self.state).await {
            Ok(users) => {
                if let Err(e) = storage::upsert_users(&users) {
                    log::warn!("failed to cache users: {e}");
                }
                Ok(users)
            }
            Err(e) => {
                log::warn!("user query failed, serving cache: {e}");
                storage::get_users(None)
            }
        }
    }

    async fn list_conversations(&self) -> Result<Vec<ConversationRecord>, Error> {
        match self.client.conversations(&self.state).await {
            Ok(convs) => {
                if let Err(e) = storage::upsert_conversations(&convs) {
                    log::warn!("failed to cache conversations: {e}");
                }
                Ok(convs)
            }
            Err(e) => {
                log::warn!("conversation query failed, serving cache: {e}");
                storage::get_conversations(None)
            }
        }
    }

    async fn list_calls(&self) -> Result<Vec<CallRecord>, Error> {
        match self.client.calls(&self.state).await {
            Ok(calls) => {
                if let Err(e) = storage::upsert_calls(&calls) {
                    log::warn!("failed to cache calls: {e}");
                }
                Ok(calls)
            }
            Err(e) => {
                log::warn!("call query failed, serving cache: {e}");
                storage::get_calls(None)
            }
        }
    }

    async fn list_groups(&self) -> Result<Vec<GroupRecord>, Error> {
        self.client.groups(&self.state).await
    }
}
