//! Core game state machine.
//!
//! `GameState` is the phase/turn/resource ledger every peer keeps. It only
//! changes through [`GameState::apply`], a reducer over [`Action`]s: the same
//! action stream produces the same state on every peer.
//!
//! Reducers trust the sender. Legality is checked before an action is
//! dispatched (see [`crate::placement`]); here the only guards are the ones
//! that keep a replayed or duplicated action from being counted twice.

use crate::actions::{Action, GameEvent};
use crate::board::{Board, Structure};
use crate::hex::{CornerCoord, EdgeCoord, StructureCoord};
use crate::player::{PlayerColor, ResourceHand, UserId};
use crate::roster::PlayerRoster;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Users claim colors
    #[default]
    ChooseColors,
    /// Everyone rolls two dice to decide turn order
    SetupRoll,
    /// First settlement and road, in turn order
    SetupFirst,
    /// Second settlement and road, in reverse turn order
    SetupSecond,
    /// Current player rolls for production
    Roll,
    /// Optional trading step between rolling and building
    Trade,
    /// Current player builds, then ends the turn
    Build,
}

impl Phase {
    pub const fn is_setup_placement(&self) -> bool {
        matches!(self, Phase::SetupFirst | Phase::SetupSecond)
    }
}

/// One entry of the turn order: who rolled what
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub player: PlayerColor,
    pub roll: u8,
}

/// A die showed a face other than 1 to 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("die face {0} is out of range 1..=6")]
pub struct InvalidDie(pub u8);

/// Two six-sided dice. Travels as `[a, b]`; other faces fail to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u8; 2]", into = "[u8; 2]")]
pub struct Dice([u8; 2]);

impl Dice {
    pub fn new(first: u8, second: u8) -> Result<Self, InvalidDie> {
        Self::try_from([first, second])
    }

    pub fn faces(&self) -> [u8; 2] {
        self.0
    }

    /// Sum of both faces, 2 to 12
    pub fn total(&self) -> u8 {
        self.0[0] + self.0[1]
    }
}

impl TryFrom<[u8; 2]> for Dice {
    type Error = InvalidDie;

    fn try_from(faces: [u8; 2]) -> Result<Self, Self::Error> {
        match faces.into_iter().find(|f| !(1..=6).contains(f)) {
            Some(bad) => Err(InvalidDie(bad)),
            None => Ok(Self(faces)),
        }
    }
}

impl From<Dice> for [u8; 2] {
    fn from(dice: Dice) -> Self {
        dice.0
    }
}

/// Roll two six-sided dice
pub fn roll_dice<R: Rng>(rng: &mut R) -> Dice {
    Dice([rng.gen_range(1..=6), rng.gen_range(1..=6)])
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    current_player: Option<PlayerColor>,
    player_colors: BTreeMap<PlayerColor, UserId>,
    player_order: Vec<OrderEntry>,
    current_phase: Phase,
    resources: BTreeMap<PlayerColor, ResourceHand>,
    board: Board,
    /// When set, rolling production leads to [`Phase::Trade`] instead of build
    trade_phase: bool,
}

impl GameState {
    /// Fresh game on a dealt board, waiting for colors
    pub fn new(board: Board, trade_phase: bool) -> Self {
        Self {
            current_player: None,
            player_colors: BTreeMap::new(),
            player_order: Vec::new(),
            current_phase: Phase::ChooseColors,
            resources: BTreeMap::new(),
            board,
            trade_phase,
        }
    }

    pub fn phase(&self) -> Phase {
        self.current_phase
    }

    pub fn current_player(&self) -> Option<PlayerColor> {
        self.current_player
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn structures(&self) -> &[Structure] {
        self.board.structures()
    }

    /// Claimed colors and their owners
    pub fn player_colors(&self) -> &BTreeMap<PlayerColor, UserId> {
        &self.player_colors
    }

    /// Turn order once decided; during the order roll, the rolls so far
    pub fn player_order(&self) -> &[OrderEntry] {
        &self.player_order
    }

    /// A player's hand (empty if they never received anything)
    pub fn resources(&self, player: PlayerColor) -> ResourceHand {
        self.resources.get(&player).cloned().unwrap_or_default()
    }

    /// The color a user claimed, if any
    pub fn color_of(&self, user: &UserId) -> Option<PlayerColor> {
        self.player_colors
            .iter()
            .find(|(_, owner)| *owner == user)
            .map(|(color, _)| *color)
    }

    pub fn owner_of(&self, color: PlayerColor) -> Option<&UserId> {
        self.player_colors.get(&color)
    }

    pub fn has_rolled_for_order(&self, player: PlayerColor) -> bool {
        self.player_order.iter().any(|e| e.player == player)
    }

    fn current_index(&self) -> Option<usize> {
        let current = self.current_player?;
        self.player_order.iter().position(|e| e.player == current)
    }

    /// Who plays after the current player, wrapping around
    pub fn next_player(&self) -> Option<PlayerColor> {
        let index = self.current_index()?;
        let next = (index + 1) % self.player_order.len();
        Some(self.player_order[next].player)
    }

    /// What a player's buildings yield for a dice total
    pub fn production_for(&self, player: PlayerColor, dice: Dice) -> ResourceHand {
        self.board.production_for(player, dice.total())
    }

    /// Apply one action, returning what changed.
    ///
    /// Roster actions are handled by [`PlayerRoster`]; `roster` is only read
    /// here to know how many players must pick a color.
    pub fn apply(&mut self, action: &Action, roster: &PlayerRoster) -> Vec<GameEvent> {
        debug!(action = action.name(), phase = ?self.current_phase, "applying action");
        let mut events = Vec::new();

        match action {
            // ==================== Roster ====================
            Action::PlayerJoin { .. } | Action::PlayersReady => {}

            // ==================== Setup ====================
            Action::ChooseColor { user_id, color } => {
                self.choose_color(user_id, *color, roster, &mut events);
            }

            Action::RollForOrder { player, roll } => {
                self.roll_for_order(*player, *roll, &mut events);
            }

            // ==================== Building ====================
            Action::BuildSettlement { player, coords } => {
                self.build_settlement(*player, *coords, &mut events);
            }

            Action::BuildRoad { player, coords } => {
                if self.build_road(*player, *coords, &mut events) {
                    self.advance_setup(&mut events);
                }
            }

            Action::BuildCity { player, coords } => {
                if self.board.upgrade_to_city(*coords, *player) {
                    events.push(GameEvent::CityUpgraded {
                        player: *player,
                        corner: *coords,
                    });
                } else {
                    warn!(%player, ?coords, "no settlement to upgrade");
                }
            }

            // ==================== Turn ====================
            Action::RollResources { player, resources } => {
                self.resources
                    .entry(*player)
                    .or_default()
                    .add_hand(resources);
                events.push(GameEvent::ResourcesGranted {
                    player: *player,
                    resources: resources.clone(),
                });
                let next = if self.trade_phase {
                    Phase::Trade
                } else {
                    Phase::Build
                };
                self.set_phase(next, &mut events);
            }

            Action::PurchaseItem { player, cost } => {
                let hand = self.resources.entry(*player).or_default();
                if hand.try_subtract(cost) {
                    events.push(GameEvent::ResourcesSpent {
                        player: *player,
                        resources: cost.clone(),
                    });
                } else {
                    warn!(%player, ?cost, "purchase not covered by hand; ignoring");
                }
            }

            Action::DoneTrading { .. } => {
                self.set_phase(Phase::Build, &mut events);
            }

            Action::EndTurn { player } => {
                match self.next_player() {
                    Some(next) => {
                        self.current_player = Some(next);
                        events.push(GameEvent::TurnPassed {
                            from: *player,
                            to: next,
                        });
                    }
                    None => warn!(%player, "end of turn with no turn order"),
                }
                self.set_phase(Phase::Roll, &mut events);
            }
        }

        events
    }

    fn set_phase(&mut self, phase: Phase, events: &mut Vec<GameEvent>) {
        if self.current_phase == phase {
            return;
        }
        debug!(from = ?self.current_phase, to = ?phase, "phase change");
        events.push(GameEvent::PhaseChanged {
            from: self.current_phase,
            to: phase,
        });
        self.current_phase = phase;
    }

    fn choose_color(
        &mut self,
        user: &UserId,
        color: PlayerColor,
        roster: &PlayerRoster,
        events: &mut Vec<GameEvent>,
    ) {
        if self.current_phase != Phase::ChooseColors {
            warn!(%user, %color, phase = ?self.current_phase, "color chosen outside choose-colors");
            return;
        }
        if !roster.contains(user) {
            warn!(%user, %color, "color chosen by a user who never joined");
            return;
        }
        if let Some(owner) = self.player_colors.get(&color) {
            warn!(%user, %color, %owner, "color already claimed");
            return;
        }
        if let Some(existing) = self.color_of(user) {
            warn!(%user, %existing, "user already has a color");
            return;
        }

        self.player_colors.insert(color, user.clone());
        events.push(GameEvent::ColorChosen {
            user_id: user.clone(),
            color,
        });

        if self.player_colors.len() >= roster.len() {
            self.set_phase(Phase::SetupRoll, events);
        }
    }

    fn roll_for_order(&mut self, player: PlayerColor, roll: Dice, events: &mut Vec<GameEvent>) {
        if self.current_phase != Phase::SetupRoll {
            warn!(%player, phase = ?self.current_phase, "order roll outside setup-roll");
            return;
        }
        if !self.player_colors.contains_key(&player) {
            warn!(%player, "order roll from an unseated color");
            return;
        }
        if self.has_rolled_for_order(player) {
            warn!(%player, "already rolled for order");
            return;
        }

        let total = roll.total();
        self.player_order.push(OrderEntry {
            player,
            roll: total,
        });
        events.push(GameEvent::OrderRolled { player, total });

        if self.player_order.len() < self.player_colors.len() {
            return;
        }

        let mut totals: Vec<u8> = self.player_order.iter().map(|e| e.roll).collect();
        totals.sort_unstable();
        let has_duplicates = totals.windows(2).any(|w| w[0] == w[1]);

        if has_duplicates {
            debug!(?totals, "tied order rolls; everyone rolls again");
            self.player_order.clear();
            events.push(GameEvent::OrderRerollRequired);
            return;
        }

        self.player_order.sort_by(|a, b| b.roll.cmp(&a.roll));
        self.current_player = self.player_order.first().map(|e| e.player);
        events.push(GameEvent::TurnOrderDecided {
            order: self.player_order.iter().map(|e| e.player).collect(),
        });
        self.set_phase(Phase::SetupFirst, events);
    }

    fn build_settlement(&mut self, player: PlayerColor, corner: CornerCoord, events: &mut Vec<GameEvent>) {
        if let Some(existing) = self.board.structure_at(&StructureCoord::Corner(corner)) {
            warn!(%player, ?corner, occupant = %existing.player, "corner already occupied");
            return;
        }
        let structure = Structure::settlement(player, corner);
        self.board.place(structure.clone());
        events.push(GameEvent::StructureBuilt { structure });
    }

    /// Returns false when the edge was already taken and nothing changed.
    fn build_road(&mut self, player: PlayerColor, edge: EdgeCoord, events: &mut Vec<GameEvent>) -> bool {
        if let Some(existing) = self.board.structure_at(&StructureCoord::Edge(edge)) {
            warn!(%player, ?edge, occupant = %existing.player, "edge already occupied");
            return false;
        }
        let structure = Structure::road(player, edge);
        self.board.place(structure.clone());
        events.push(GameEvent::StructureBuilt { structure });
        true
    }

    /// Setup rounds go forward through the order, then back (snake order).
    fn advance_setup(&mut self, events: &mut Vec<GameEvent>) {
        let Some(index) = self.current_index() else {
            return;
        };
        let last = self.player_order.len() - 1;

        match self.current_phase {
            Phase::SetupFirst => {
                if index == last {
                    // Last player places again at the start of the second round
                    self.set_phase(Phase::SetupSecond, events);
                } else {
                    self.pass_turn(index + 1, events);
                }
            }
            Phase::SetupSecond => {
                if index == 0 {
                    self.grant_starting_resources(events);
                    self.current_player = self.player_order.first().map(|e| e.player);
                    self.set_phase(Phase::Roll, events);
                } else {
                    self.pass_turn(index - 1, events);
                }
            }
            _ => {}
        }
    }

    fn pass_turn(&mut self, to_index: usize, events: &mut Vec<GameEvent>) {
        let to = self.player_order[to_index].player;
        if let Some(from) = self.current_player.replace(to) {
            events.push(GameEvent::TurnPassed { from, to });
        }
    }

    /// One of each resource around every player's second settlement
    fn grant_starting_resources(&mut self, events: &mut Vec<GameEvent>) {
        let order: Vec<PlayerColor> = self.player_order.iter().map(|e| e.player).collect();
        for player in order {
            let Some(corner) = self.board.latest_settlement(player) else {
                warn!(%player, "no settlement for the starting hand");
                continue;
            };
            let grant = self.board.starting_resources(&corner);
            self.resources.entry(player).or_default().add_hand(&grant);
            events.push(GameEvent::ResourcesGranted {
                player,
                resources: grant,
            });
        }
    }
}
