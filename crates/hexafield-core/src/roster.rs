//! Who has joined a session and whether the game has started.

use crate::player::UserId;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Joined users in arrival order plus the one-way "ready" latch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRoster {
    players_ready: bool,
    players: Vec<UserId>,
}

impl PlayerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user. Duplicate joins and joins after the latch are ignored.
    /// Returns whether the roster changed.
    pub fn join(&mut self, user: UserId) -> bool {
        if self.players_ready {
            warn!(%user, "join after players were marked ready");
            return false;
        }
        if self.contains(&user) {
            warn!(%user, "duplicate join");
            return false;
        }
        self.players.push(user);
        true
    }

    /// Close the roster. Returns false if it was already closed.
    pub fn mark_ready(&mut self) -> bool {
        !std::mem::replace(&mut self.players_ready, true)
    }

    pub fn is_ready(&self) -> bool {
        self.players_ready
    }

    pub fn players(&self) -> &[UserId] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, user: &UserId) -> bool {
        self.players.contains(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_keeps_arrival_order() {
        let mut roster = PlayerRoster::new();
        assert!(roster.join("b".into()));
        assert!(roster.join("a".into()));
        assert_eq!(roster.players(), &[UserId::new("b"), UserId::new("a")]);
    }

    #[test]
    fn test_duplicate_join_ignored() {
        let mut roster = PlayerRoster::new();
        roster.join("a".into());
        assert!(!roster.join("a".into()));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_ready_is_a_latch() {
        let mut roster = PlayerRoster::new();
        roster.join("a".into());
        assert!(roster.mark_ready());
        assert!(!roster.mark_ready());
        assert!(roster.is_ready());
        assert!(!roster.join("b".into()), "joins close once ready");
        assert_eq!(roster.len(), 1);
    }
}
