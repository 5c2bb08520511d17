//! WebSocket protocol messages between peers and the relay.

use hexafield_core::{Action, SequencedAction, SessionConfig, UserId};
use serde::{Deserialize, Serialize};

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    /// Join a game session, creating it with `config` if it does not exist
    JoinSession {
        session_id: String,
        #[serde(default)]
        config: Option<SessionConfig>,
    },

    /// Leave the current session
    LeaveSession,

    /// Broadcast an action to the session. Kept raw until the relay parses it.
    Dispatch { action: serde_json::Value },

    /// Ask for the relay's copy of the session world
    Snapshot,

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    /// Welcome message with the user id assigned to this connection
    Welcome { user_id: UserId },

    /// Session membership changed
    Joined { session: SessionInfo },

    /// Left the session
    Left,

    /// An action in the session's global order
    Action { seq: u64, action: Action },

    /// Every action so far, for a peer that just joined
    Replay { actions: Vec<SequencedAction> },

    /// The relay's mirror of the session world
    Snapshot { state: serde_json::Value },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

/// Session information for clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    pub members: Vec<UserId>,
    /// Sequence number the next action will get
    pub next_seq: u64,
    pub config: SessionConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexafield_core::PlayerColor;
    use serde_json::json;

    #[test]
    fn test_join_without_config() {
        let msg: ClientMessage =
            serde_json::from_value(json!({"type": "joinSession", "payload": {"sessionId": "s1"}}))
                .unwrap();
        match msg {
            ClientMessage::JoinSession { session_id, config } => {
                assert_eq!(session_id, "s1");
                assert!(config.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_action_message_shape() {
        let msg = ServerMessage::Action {
            seq: 3,
            action: Action::EndTurn {
                player: PlayerColor::Red,
            },
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "type": "action",
                "payload": {
                    "seq": 3,
                    "action": {"type": "endTurn", "payload": {"player": "red"}}
                }
            })
        );
    }
}
