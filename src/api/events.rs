use serde::{Deserialize, Serialize};

use crate::api::models::{CallOutcome, Presence};

/// Push events the backend emits over the event socket. The client only
/// models the shapes; nothing in the inbox core consumes them yet, the
/// listing is rebuilt from the sources instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IncomingEvent {
    #[serde(rename_all = "camelCase")]
    PresenceChanged { user_id: String, presence: Presence },
    #[serde(rename_all = "camelCase")]
    MessageReceived {
        conversation_id: String,
        sender: String,
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    CallStateChanged { call_id: String, outcome: CallOutcome },
}

impl IncomingEvent {
    /// Lenient frame parse: anything that is not a known event is dropped.
    pub fn parse(frame: &str) -> Option<Self> {
        serde_json::from_str(frame).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_frames() {
        let event = IncomingEvent::parse(
            r#"{"type":"presenceChanged","userId":"user1","presence":"away"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            IncomingEvent::PresenceChanged {
                user_id: "user1".into(),
                presence: Presence::Away,
            }
        );

        let event = IncomingEvent::parse(
            r#"{"type":"messageReceived","conversationId":"conv1","sender":"Diana Prince","text":"hi"}"#,
        )
        .unwrap();
        assert!(matches!(event, IncomingEvent::MessageReceived { .. }));
    }

    #[test]
    fn unknown_and_malformed_frames_are_dropped() {
        assert!(IncomingEvent::parse(r#"{"type":"typingStarted","userId":"u1"}"#).is_none());
        assert!(IncomingEvent::parse("{not json").is_none());
    }
}
