//! Placement legality.
//!
//! A slot is checked against one active [`PlacementMode`]:
//! - the slot kind must fit the mode (roads on edges, buildings on corners)
//! - the slot must touch the board
//! - an occupied slot is only usable to upgrade the player's own settlement
//! - roads must touch the player's own road or building
//! - settlements obey the distance rule against every player's buildings
//!
//! Nothing is cached; callers re-check after every change to the board.

use crate::board::{Board, StructureKind};
use crate::hex::{CornerCoord, EdgeCoord, StructureCoord};
use crate::player::{Item, PlayerColor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// What the local player is currently allowed to place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlacementMode {
    Settlement,
    Road,
    City,
}

impl PlacementMode {
    /// Whether this mode places on edges
    pub const fn is_road(&self) -> bool {
        matches!(self, PlacementMode::Road)
    }
}

impl From<Item> for PlacementMode {
    fn from(item: Item) -> Self {
        match item {
            Item::Road => PlacementMode::Road,
            Item::Settlement => PlacementMode::Settlement,
            Item::City => PlacementMode::City,
        }
    }
}

/// Why a slot cannot be selected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("{mode:?} cannot be placed on this kind of slot")]
    ModeMismatch { mode: PlacementMode },

    #[error("Slot does not touch the board")]
    NotOnBoard,

    #[error("Slot is already occupied")]
    Occupied,

    #[error("No settlement of yours to upgrade here")]
    NothingToUpgrade,

    #[error("Too close to another settlement")]
    TooClose,

    #[error("Road must connect to your roads or buildings")]
    NotConnected,

    #[error("Nothing to place right now")]
    NoActiveMode,

    #[error("Not your turn")]
    NotYourTurn,
}

/// Check a single slot for a player under one placement mode.
pub fn validate(
    board: &Board,
    player: PlayerColor,
    mode: PlacementMode,
    coord: &StructureCoord,
) -> Result<(), PlacementError> {
    if coord.is_edge() != mode.is_road() {
        return Err(PlacementError::ModeMismatch { mode });
    }
    if !board.is_on_board(coord) {
        return Err(PlacementError::NotOnBoard);
    }

    match *coord {
        StructureCoord::Edge(edge) => validate_road(board, player, edge),
        StructureCoord::Corner(corner) => validate_building(board, player, mode, corner),
    }
}

fn validate_road(board: &Board, player: PlayerColor, edge: EdgeCoord) -> Result<(), PlacementError> {
    if board.is_occupied(&edge.into()) {
        return Err(PlacementError::Occupied);
    }

    let owns = |coord: StructureCoord| {
        board
            .structure_at(&coord)
            .is_some_and(|s| s.player == player)
    };
    let connected = edge.adjacent_edges().into_iter().any(|e| owns(e.into()))
        || edge.adjacent_corners().into_iter().any(|c| owns(c.into()));

    if connected {
        Ok(())
    } else {
        Err(PlacementError::NotConnected)
    }
}

fn validate_building(
    board: &Board,
    player: PlayerColor,
    mode: PlacementMode,
    corner: CornerCoord,
) -> Result<(), PlacementError> {
    let occupant = board.structure_at(&corner.into());

    if mode == PlacementMode::City {
        return match occupant {
            Some(s) if s.player == player && s.kind == StructureKind::Settlement => Ok(()),
            Some(_) => Err(PlacementError::Occupied),
            None => Err(PlacementError::NothingToUpgrade),
        };
    }

    if occupant.is_some() {
        return Err(PlacementError::Occupied);
    }
    let crowded = corner
        .adjacent_corners()
        .into_iter()
        .any(|c| board.is_occupied(&c.into()));
    if crowded {
        return Err(PlacementError::TooClose);
    }
    Ok(())
}

/// The first active mode under which the slot is legal.
pub fn selectable_mode(
    board: &Board,
    player: PlayerColor,
    modes: &[PlacementMode],
    coord: &StructureCoord,
) -> Result<PlacementMode, PlacementError> {
    let mut last_error = PlacementError::NoActiveMode;
    for &mode in modes {
        match validate(board, player, mode, coord) {
            Ok(()) => return Ok(mode),
            Err(err) => last_error = err,
        }
    }
    Err(last_error)
}

/// Every corner and edge touching a tile, each listed once.
pub fn candidate_slots(board: &Board) -> Vec<StructureCoord> {
    let mut slots = BTreeSet::new();
    for tile in board.tiles() {
        slots.extend(tile.coord.corners().map(StructureCoord::from));
        slots.extend(tile.coord.edges().map(StructureCoord::from));
    }
    slots.into_iter().collect()
}

/// Candidate slots legal for the player under any active mode.
pub fn legal_slots(board: &Board, player: PlayerColor, modes: &[PlacementMode]) -> Vec<StructureCoord> {
    candidate_slots(board)
        .into_iter()
        .filter(|slot| selectable_mode(board, player, modes, slot).is_ok())
        .collect()
}
