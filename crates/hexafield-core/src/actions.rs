//! Actions broadcast between peers and the events they produce.
//!
//! [`Action`] is the closed set of messages that travel on the bus. On the
//! wire each one is `{"type": "<camelCaseName>", "payload": {...}}`.
//! [`GameEvent`] is what applying an action reports to local observers.

use crate::board::Structure;
use crate::game::{Dice, Phase};
use crate::hex::{CornerCoord, EdgeCoord};
use crate::player::{PlayerColor, ResourceHand, UserId};
use serde::{Deserialize, Serialize};

/// All possible actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    // ==================== Roster ====================
    /// A user entered the session
    PlayerJoin { user_id: UserId },
    /// Close the roster and start choosing colors
    PlayersReady,

    // ==================== Setup ====================
    /// Claim a color for a user
    ChooseColor { user_id: UserId, color: PlayerColor },
    /// Two dice rolled to decide turn order
    RollForOrder { player: PlayerColor, roll: Dice },

    // ==================== Building ====================
    /// Place a settlement on a corner
    BuildSettlement {
        player: PlayerColor,
        coords: CornerCoord,
    },
    /// Place a road on an edge. Also advances the setup rounds.
    BuildRoad { player: PlayerColor, coords: EdgeCoord },
    /// Upgrade the player's settlement on a corner
    BuildCity {
        player: PlayerColor,
        coords: CornerCoord,
    },

    // ==================== Turn ====================
    /// Production from this turn's dice
    RollResources {
        player: PlayerColor,
        resources: ResourceHand,
    },
    /// Pay for a road, settlement or city
    PurchaseItem { player: PlayerColor, cost: ResourceHand },
    /// Leave the trade phase
    DoneTrading { player: PlayerColor },
    /// Pass the turn to the next player
    EndTurn { player: PlayerColor },
}

impl Action {
    /// Wire name of this action
    pub fn name(&self) -> &'static str {
        match self {
            Action::PlayerJoin { .. } => "playerJoin",
            Action::PlayersReady => "playersReady",
            Action::ChooseColor { .. } => "chooseColor",
            Action::RollForOrder { .. } => "rollForOrder",
            Action::BuildSettlement { .. } => "buildSettlement",
            Action::BuildRoad { .. } => "buildRoad",
            Action::BuildCity { .. } => "buildCity",
            Action::RollResources { .. } => "rollResources",
            Action::PurchaseItem { .. } => "purchaseItem",
            Action::DoneTrading { .. } => "doneTrading",
            Action::EndTurn { .. } => "endTurn",
        }
    }
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    PlayerJoined { user_id: UserId },
    PlayersReady,
    ColorChosen { user_id: UserId, color: PlayerColor },
    /// A player's order roll was recorded
    OrderRolled { player: PlayerColor, total: u8 },
    /// Everyone rolled but totals collided; all players roll again
    OrderRerollRequired,
    TurnOrderDecided { order: Vec<PlayerColor> },
    StructureBuilt { structure: Structure },
    CityUpgraded {
        player: PlayerColor,
        corner: CornerCoord,
    },
    ResourcesGranted {
        player: PlayerColor,
        resources: ResourceHand,
    },
    ResourcesSpent {
        player: PlayerColor,
        resources: ResourceHand,
    },
    PhaseChanged { from: Phase, to: Phase },
    TurnPassed { from: PlayerColor, to: PlayerColor },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::CornerDirection;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_action_wire_shape() {
        let action = Action::ChooseColor {
            user_id: UserId::new("u1"),
            color: PlayerColor::Red,
        };
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({"type": "chooseColor", "payload": {"userId": "u1", "color": "red"}})
        );
    }

    #[test]
    fn test_action_parses_from_wire() {
        let value = json!({
            "type": "buildSettlement",
            "payload": {"player": "white", "coords": {"q": 0, "r": -1, "direction": "S"}}
        });
        let action: Action = serde_json::from_value(value).unwrap();
        assert_eq!(
            action,
            Action::BuildSettlement {
                player: PlayerColor::White,
                coords: CornerCoord::new(0, -1, CornerDirection::S),
            }
        );
    }

    #[test]
    fn test_unit_action_has_no_payload() {
        let json = serde_json::to_value(Action::PlayersReady).unwrap();
        assert_eq!(json, json!({"type": "playersReady"}));
        let back: Action = serde_json::from_value(json).unwrap();
        assert_eq!(back, Action::PlayersReady);
    }

    #[test]
    fn test_malformed_payload_rejected() {
        let wrong_direction = json!({
            "type": "buildRoad",
            "payload": {"player": "red", "coords": {"q": 0, "r": 0, "direction": "N"}}
        });
        assert!(serde_json::from_value::<Action>(wrong_direction).is_err());

        let unknown = json!({"type": "stealCard", "payload": {}});
        assert!(serde_json::from_value::<Action>(unknown).is_err());
    }

    #[test]
    fn test_order_roll_faces_checked_on_parse() {
        for faces in [[0, 0], [7, 1], [200, 100]] {
            let value = json!({"type": "rollForOrder", "payload": {"player": "red", "roll": faces}});
            assert!(
                serde_json::from_value::<Action>(value).is_err(),
                "{faces:?} should not parse"
            );
        }

        let value = json!({"type": "rollForOrder", "payload": {"player": "red", "roll": [6, 1]}});
        let action: Action = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(
            action,
            Action::RollForOrder {
                player: PlayerColor::Red,
                roll: Dice::new(6, 1).unwrap(),
            }
        );
        assert_eq!(serde_json::to_value(&action).unwrap(), value);
    }

    #[test]
    fn test_name_matches_tag() {
        let action = Action::EndTurn {
            player: PlayerColor::Blue,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], action.name());
    }
}
