//! Session configuration.

use crate::board::BoardLayout;
use crate::player::PlayerColor;
use serde::{Deserialize, Serialize};

/// Settings every peer of a session must agree on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// Players needed before the roster can be marked ready
    pub min_players: usize,
    /// Roster size limit; never more than the number of colors
    pub max_players: usize,
    pub layout: BoardLayout,
    /// Stop in the trade phase after rolling instead of going straight to build
    pub trade_phase: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: PlayerColor::ALL.len(),
            layout: BoardLayout::Starter,
            trade_phase: false,
        }
    }
}

impl SessionConfig {
    /// Roster size limit, capped at the number of colors
    pub fn player_limit(&self) -> usize {
        self.max_players.min(PlayerColor::ALL.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.min_players, 2);
        assert_eq!(config.max_players, 4);
        assert_eq!(config.layout, BoardLayout::Starter);
        assert!(!config.trade_phase);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"layout": {"kind": "randomized", "seed": 42}, "maxPlayers": 9}"#)
                .unwrap();
        assert_eq!(config.layout, BoardLayout::Randomized { seed: 42 });
        assert_eq!(config.min_players, 2);
        assert_eq!(config.player_limit(), 4);
    }
}
