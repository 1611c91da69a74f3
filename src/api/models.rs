use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Online,
    Away,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallMedium {
    Audio,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallOutcome {
    Answered,
    Missed,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Incoming,
    Outgoing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub presence: Presence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: String,
    pub name: String,
    pub last_message: String,
    pub timestamp_label: String,
    pub unread_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: String,
    pub name: String,
    pub medium: CallMedium,
    pub outcome: CallOutcome,
    pub direction: CallDirection,
    /// "--" unless the call was answered.
    pub duration_label: String,
    pub timestamp_label: String,
}

/// One inbox entry. The set of kinds is closed so the filter and selection
/// logic can match exhaustively instead of comparing type strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    User(UserRecord),
    Conversation(ConversationRecord),
    Call(CallRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    User,
    Conversation,
    Call,
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::User(_) => RecordKind::User,
            Record::Conversation(_) => RecordKind::Conversation,
            Record::Call(_) => RecordKind::Call,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::User(u) => &u.id,
            Record::Conversation(c) => &c.id,
            Record::Call(c) => &c.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Record::User(u) => &u.name,
            Record::Conversation(c) => &c.name,
            Record::Call(c) => &c.name,
        }
    }
}

/// The three inbox collections, in the order the combined view presents
/// them: users, then conversations, then calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    pub users: Vec<UserRecord>,
    pub conversations: Vec<ConversationRecord>,
    pub calls: Vec<CallRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Me,
    Other,
}

/// One entry in a detail session's message log. Ids are sequential within
/// the session; nothing here outlives the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupVisibility {
    Public,
    Private,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub members_count: u32,
    pub visibility: GroupVisibility,
    pub has_joined: bool,
}
