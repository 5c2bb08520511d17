//! Hexafield - rules engine for a networked hex settlement game
//!
//! This crate provides the deterministic core every peer runs:
//! - Hex coordinate math and corner/edge adjacency tables
//! - Board tiles, structures and production lookups
//! - Placement legality
//! - The turn state machine, driven by actions from a shared bus
//!
//! # Architecture
//!
//! Peers never write shared state directly. Local input becomes an
//! [`Action`] handed to an [`ActionBus`]; the bus delivers every action to
//! every peer (the sender included) in one order, and each peer applies it
//! with the same reducer. The engine compiles to:
//! - Native Rust for the relay server and tests
//! - WebAssembly for browser peers (feature `wasm`)
//!
//! # Modules
//!
//! - [`hex`]: Coordinates for hexes, corners and edges
//! - [`adjacency`]: What touches what
//! - [`board`]: Tiles, layouts and placed structures
//! - [`placement`]: Whether a slot can be built on
//! - [`game`]: Phases, turn order and the resource ledger
//! - [`session`]: One peer's world, intents and observers

pub mod actions;
pub mod adjacency;
pub mod board;
pub mod bus;
pub mod config;
pub mod game;
pub mod hex;
pub mod placement;
pub mod player;
pub mod roster;
pub mod session;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{Action, GameEvent};
pub use board::{Board, BoardLayout, Resource, Structure, StructureKind, Terrain, Tile};
pub use bus::{ActionBus, LoopbackBus, SequencedAction, Topic};
pub use config::SessionConfig;
pub use game::{Dice, GameState, InvalidDie, OrderEntry, Phase};
pub use hex::{
    CornerCoord, CornerDirection, CubeCoord, Direction, EdgeCoord, EdgeDirection, HexCoord,
    StructureCoord,
};
pub use placement::{PlacementError, PlacementMode};
pub use player::{Item, PlayerColor, ResourceHand, UserId};
pub use roster::PlayerRoster;
pub use session::{InputEvents, IntentError, Session, SessionObserver, World};
