//! Game session management.

use hexafield_core::{Action, SequencedAction, SessionConfig, UserId, World};
use thiserror::Error;
use tracing::debug;

use crate::protocol::SessionInfo;

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("Session is full")]
    SessionFull,

    #[error("Already in session {0}")]
    AlreadyInSession(String),

    #[error("Not in a session")]
    NotInSession,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Malformed action: {0}")]
    MalformedAction(String),

    #[error("Could not encode state: {0}")]
    Encode(String),
}

/// One game session: its connected members and the ordered action log.
///
/// The relay keeps a mirror of the world so it can answer snapshot
/// requests; it never rejects a well-formed action on game grounds.
pub struct GameSession {
    pub id: String,
    pub members: Vec<UserId>,
    log: Vec<SequencedAction>,
    world: World,
}

impl GameSession {
    pub fn new(id: String, config: SessionConfig) -> Self {
        Self {
            id,
            members: Vec::new(),
            log: Vec::new(),
            world: World::new(config),
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.world.config().player_limit()
    }

    pub fn is_member(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }

    /// Add a member and return the log they need to catch up
    pub fn add_member(&mut self, user: UserId) -> Result<Vec<SequencedAction>, RoomError> {
        if self.is_member(&user) {
            return Err(RoomError::AlreadyInSession(self.id.clone()));
        }
        if self.is_full() {
            return Err(RoomError::SessionFull);
        }
        self.members.push(user);
        Ok(self.log.clone())
    }

    /// Returns true if the session is now empty
    pub fn remove_member(&mut self, user: &UserId) -> Result<bool, RoomError> {
        if !self.is_member(user) {
            return Err(RoomError::NotInSession);
        }
        self.members.retain(|m| m != user);
        Ok(self.members.is_empty())
    }

    /// Parse a raw action and give it the next place in the global order
    pub fn sequence(&mut self, raw: serde_json::Value) -> Result<SequencedAction, RoomError> {
        let action: Action =
            serde_json::from_value(raw).map_err(|e| RoomError::MalformedAction(e.to_string()))?;

        let seq = self.log.len() as u64;
        let events = self.world.apply(&action);
        debug!(session = %self.id, seq, action = action.name(), events = events.len(), "sequenced");

        let sequenced = SequencedAction { seq, action };
        self.log.push(sequenced.clone());
        Ok(sequenced)
    }

    pub fn next_seq(&self) -> u64 {
        self.log.len() as u64
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn snapshot(&self) -> Result<serde_json::Value, RoomError> {
        serde_json::to_value(self.world()).map_err(|e| RoomError::Encode(e.to_string()))
    }

    pub fn to_info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id.clone(),
            members: self.members.clone(),
            next_seq: self.next_seq(),
            config: self.world.config().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexafield_core::{Phase, PlayerColor};
    use serde_json::json;

    fn session(max_players: usize) -> GameSession {
        let config = SessionConfig {
            max_players,
            ..SessionConfig::default()
        };
        GameSession::new("table".to_string(), config)
    }

    #[test]
    fn test_add_remove_members() {
        let mut room = session(2);
        assert!(room.add_member("ana".into()).unwrap().is_empty());
        assert!(matches!(
            room.add_member("ana".into()),
            Err(RoomError::AlreadyInSession(_))
        ));
        room.add_member("ben".into()).unwrap();
        assert!(room.is_full());
        assert!(matches!(
            room.add_member("cy".into()),
            Err(RoomError::SessionFull)
        ));

        assert!(!room.remove_member(&"ana".into()).unwrap());
        assert!(room.remove_member(&"ana".into()).is_err());
        assert!(room.remove_member(&"ben".into()).unwrap());
    }

    #[test]
    fn test_sequence_numbers_are_contiguous() {
        let mut room = session(4);
        let first = room
            .sequence(json!({"type": "playerJoin", "payload": {"userId": "ana"}}))
            .unwrap();
        let second = room
            .sequence(json!({"type": "playerJoin", "payload": {"userId": "ben"}}))
            .unwrap();
        assert_eq!(first.seq, 0);
        assert_eq!(second.seq, 1);
        assert_eq!(room.next_seq(), 2);
        assert_eq!(room.world().roster().len(), 2);
    }

    #[test]
    fn test_malformed_action_is_not_logged() {
        let mut room = session(4);
        let result = room.sequence(json!({"type": "chooseColor", "payload": {"userId": "ana", "color": "green"}}));
        assert!(matches!(result, Err(RoomError::MalformedAction(_))));
        assert_eq!(room.next_seq(), 0);
    }

    #[test]
    fn test_impossible_dice_are_not_sequenced() {
        let mut room = session(4);
        for raw in [
            json!({"type": "playerJoin", "payload": {"userId": "ana"}}),
            json!({"type": "playerJoin", "payload": {"userId": "ben"}}),
            json!({"type": "playersReady"}),
            json!({"type": "chooseColor", "payload": {"userId": "ana", "color": "red"}}),
            json!({"type": "chooseColor", "payload": {"userId": "ben", "color": "blue"}}),
        ] {
            room.sequence(raw).unwrap();
        }
        assert_eq!(room.world().game().phase(), Phase::SetupRoll);

        for faces in [[0, 0], [7, 1], [200, 100]] {
            let result = room.sequence(json!({
                "type": "rollForOrder",
                "payload": {"player": "red", "roll": faces}
            }));
            assert!(matches!(result, Err(RoomError::MalformedAction(_))), "{faces:?}");
        }
        assert_eq!(room.next_seq(), 5);
        assert!(room.world().game().player_order().is_empty());
    }

    #[test]
    fn test_late_member_gets_the_log() {
        let mut room = session(4);
        room.add_member("ana".into()).unwrap();
        for raw in [
            json!({"type": "playerJoin", "payload": {"userId": "ana"}}),
            json!({"type": "playerJoin", "payload": {"userId": "ben"}}),
            json!({"type": "playersReady"}),
            json!({"type": "chooseColor", "payload": {"userId": "ana", "color": "red"}}),
        ] {
            room.sequence(raw).unwrap();
        }

        let replay = room.add_member("ben".into()).unwrap();
        assert_eq!(replay.len(), 4);
        assert_eq!(
            replay[3].action,
            Action::ChooseColor {
                user_id: "ana".into(),
                color: PlayerColor::Red,
            }
        );

        let mut world = World::new(SessionConfig::default());
        for sequenced in &replay {
            world.apply(&sequenced.action);
        }
        assert_eq!(&world, room.world());
        assert_eq!(world.game().phase(), Phase::ChooseColors);
    }

    #[test]
    fn test_snapshot_is_the_world() {
        let room = session(4);
        let state = room.snapshot().unwrap();
        assert_eq!(state["game"]["currentPhase"], json!("choose-colors"));
        assert_eq!(room.to_info().next_seq, 0);
    }
}
