//! One peer's view of a game session.
//!
//! - [`World`] is the replicated part: roster plus game state. It changes only
//!   through [`World::apply`], so peers fed the same action stream agree.
//! - [`Session`] wraps a `World` with everything local to one peer: who the
//!   local user is, what they bought and may place, observers, and the
//!   intents that turn input into actions on the bus.
//!
//! A session keeps at most one of its own actions in flight. Until the bus
//! echoes it back, new intents are refused; this keeps per-frame intents
//! (auto color claim, dice rolls) from being dispatched twice.

use crate::actions::{Action, GameEvent};
use crate::board::{Board, StructureKind};
use crate::bus::{ActionBus, SequencedAction, Topic};
use crate::config::SessionConfig;
use crate::game::{roll_dice, GameState, Phase};
use crate::hex::StructureCoord;
use crate::placement::{self, PlacementError, PlacementMode};
use crate::player::{Item, PlayerColor, UserId};
use crate::roster::PlayerRoster;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Why an intent produced no action
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("Expected phase {expected:?}, game is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Game has not started")]
    NotStarted,

    #[error("Players are already ready")]
    AlreadyStarted,

    #[error("Already joined")]
    AlreadyJoined,

    #[error("Not in the roster")]
    NotInRoster,

    #[error("Session is full")]
    RosterFull,

    #[error("Need {need} players, have {have}")]
    NotEnoughPlayers { have: usize, need: usize },

    #[error("No color claimed")]
    NoColor,

    #[error("Color already chosen")]
    AlreadyChoseColor,

    #[error("No colors left")]
    NoColorsLeft,

    #[error("Already rolled for turn order")]
    AlreadyRolled,

    #[error("Cannot afford {0:?}")]
    CannotAfford(Item),

    #[error("No slot selected")]
    NothingSelected,

    #[error("Waiting for a previous action to be delivered")]
    ActionInFlight,

    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// The replicated state of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    config: SessionConfig,
    roster: PlayerRoster,
    game: GameState,
}

impl World {
    pub fn new(config: SessionConfig) -> Self {
        let game = GameState::new(Board::from_layout(config.layout), config.trade_phase);
        Self {
            config,
            roster: PlayerRoster::new(),
            game,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn roster(&self) -> &PlayerRoster {
        &self.roster
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Apply one delivered action
    pub fn apply(&mut self, action: &Action) -> Vec<GameEvent> {
        match action {
            Action::PlayerJoin { user_id } => {
                if self.roster.len() >= self.config.player_limit() {
                    warn!(user = %user_id, "session full; join ignored");
                    return Vec::new();
                }
                if self.roster.join(user_id.clone()) {
                    vec![GameEvent::PlayerJoined {
                        user_id: user_id.clone(),
                    }]
                } else {
                    Vec::new()
                }
            }
            Action::PlayersReady => {
                if self.roster.mark_ready() {
                    debug!(players = self.roster.len(), "players ready");
                    vec![GameEvent::PlayersReady]
                } else {
                    Vec::new()
                }
            }
            other => self.game.apply(other, &self.roster),
        }
    }
}

/// Receives the events produced by every applied action.
pub trait SessionObserver {
    fn on_event(&mut self, event: &GameEvent, world: &World);
}

impl<F> SessionObserver for F
where
    F: FnMut(&GameEvent, &World),
{
    fn on_event(&mut self, event: &GameEvent, world: &World) {
        self(event, world)
    }
}

/// What the input collaborator saw during one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputEvents {
    /// Confirm pressed (starts the game from the lobby)
    pub confirm: bool,
    /// Primary click pressed (places the hovered slot)
    pub primary_click: bool,
    /// "Done" pressed (ends trading or the turn)
    pub done: bool,
    /// Slot under the pointer, if any
    pub hovered: Option<StructureCoord>,
}

/// A peer's session: replicated world plus local state
pub struct Session {
    world: World,
    local_user: UserId,
    /// Items bought this turn and not yet placed
    purchased: Vec<PlacementMode>,
    /// Own actions dispatched but not yet delivered back
    in_flight: Vec<Action>,
    last_seq: Option<u64>,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("local_user", &self.local_user)
            .field("purchased", &self.purchased)
            .field("in_flight", &self.in_flight)
            .field("last_seq", &self.last_seq)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Session {
    pub fn new(config: SessionConfig, local_user: UserId) -> Self {
        Self::from_world(World::new(config), local_user)
    }

    /// Resume from a replicated snapshot
    pub fn from_world(world: World, local_user: UserId) -> Self {
        Self {
            world,
            local_user,
            purchased: Vec::new(),
            in_flight: Vec::new(),
            last_seq: None,
            observers: Vec::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn game(&self) -> &GameState {
        self.world.game()
    }

    pub fn local_user(&self) -> &UserId {
        &self.local_user
    }

    /// The color the local user claimed
    pub fn local_color(&self) -> Option<PlayerColor> {
        self.world.game().color_of(&self.local_user)
    }

    pub fn is_local_turn(&self) -> bool {
        let current = self.world.game().current_player();
        current.is_some() && current == self.local_color()
    }

    /// "Done" is offered only to the current player while building
    pub fn show_done(&self) -> bool {
        self.is_local_turn() && self.world.game().phase() == Phase::Build
    }

    pub fn has_action_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn add_observer(&mut self, observer: impl SessionObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ==================== Delivery ====================

    /// Apply an action delivered by the bus
    pub fn receive(&mut self, action: &Action) -> Vec<GameEvent> {
        if let Some(i) = self.in_flight.iter().position(|a| a == action) {
            self.in_flight.remove(i);
        }

        let events = self.world.apply(action);

        if matches!(action, Action::EndTurn { .. }) {
            self.purchased.clear();
        }
        if let Action::BuildRoad { player, .. }
        | Action::BuildSettlement { player, .. }
        | Action::BuildCity { player, .. } = action
        {
            if Some(*player) == self.local_color() && !events.is_empty() {
                self.consume_purchase(action);
            }
        }

        for observer in &mut self.observers {
            for event in &events {
                observer.on_event(event, &self.world);
            }
        }
        events
    }

    /// Apply a sequenced action, skipping ones already seen
    pub fn receive_sequenced(&mut self, sequenced: &SequencedAction) -> Vec<GameEvent> {
        if self.last_seq.is_some_and(|last| sequenced.seq <= last) {
            debug!(seq = sequenced.seq, "skipping redelivered action");
            return Vec::new();
        }
        self.last_seq = Some(sequenced.seq);
        self.receive(&sequenced.action)
    }

    /// Next sequence number this session has not seen
    pub fn cursor(&self) -> u64 {
        self.last_seq.map_or(0, |s| s + 1)
    }

    fn consume_purchase(&mut self, action: &Action) {
        if self.world.game().phase() != Phase::Build {
            return;
        }
        let mode = match action {
            Action::BuildRoad { .. } => PlacementMode::Road,
            Action::BuildSettlement { .. } => PlacementMode::Settlement,
            _ => PlacementMode::City,
        };
        if let Some(i) = self.purchased.iter().position(|m| *m == mode) {
            self.purchased.remove(i);
        }
    }

    fn send<B: ActionBus>(&mut self, action: Action, bus: &mut B) -> Action {
        debug!(action = action.name(), user = %self.local_user, "dispatching");
        self.in_flight.push(action.clone());
        bus.dispatch(Topic::World, action.clone());
        action
    }

    fn ensure_idle(&self) -> Result<(), IntentError> {
        if self.has_action_in_flight() {
            return Err(IntentError::ActionInFlight);
        }
        Ok(())
    }

    /// Only roster members take part once the game starts
    fn ensure_seated(&self) -> Result<(), IntentError> {
        if !self.world.roster().contains(&self.local_user) {
            return Err(IntentError::NotInRoster);
        }
        Ok(())
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), IntentError> {
        let actual = self.world.game().phase();
        if actual != expected {
            return Err(IntentError::WrongPhase { expected, actual });
        }
        Ok(())
    }

    /// The local color, provided it is the current player
    fn acting_color(&self) -> Result<PlayerColor, IntentError> {
        let color = self.local_color().ok_or(IntentError::NoColor)?;
        if self.world.game().current_player() != Some(color) {
            return Err(IntentError::NotYourTurn);
        }
        Ok(color)
    }

    // ==================== Placement ====================

    /// Modes the local user may place right now
    pub fn active_modes(&self) -> Vec<PlacementMode> {
        let Ok(color) = self.acting_color() else {
            return Vec::new();
        };
        let game = self.world.game();
        match game.phase() {
            phase if phase.is_setup_placement() => {
                let placed = game.board().structures_of(color).count();
                if placed % 2 == 0 {
                    vec![PlacementMode::Settlement]
                } else {
                    vec![PlacementMode::Road]
                }
            }
            Phase::Build => self.purchased.clone(),
            _ => Vec::new(),
        }
    }

    /// Whether the local user could place on a slot, and under which mode
    pub fn check_placement(&self, coord: &StructureCoord) -> Result<PlacementMode, PlacementError> {
        let color = self.acting_color().map_err(|_| PlacementError::NotYourTurn)?;
        placement::selectable_mode(self.world.game().board(), color, &self.active_modes(), coord)
    }

    /// The hovered slot if it is currently legal for the local user
    pub fn selected_placement(&self, hovered: Option<StructureCoord>) -> Option<(StructureCoord, PlacementMode)> {
        let coord = hovered?;
        self.check_placement(&coord).ok().map(|mode| (coord, mode))
    }

    /// Every slot the local user could place on right now
    pub fn legal_slots(&self) -> Vec<StructureCoord> {
        match self.acting_color() {
            Ok(color) => placement::legal_slots(self.world.game().board(), color, &self.active_modes()),
            Err(_) => Vec::new(),
        }
    }

    // ==================== Intents ====================

    /// Announce the local user to the session
    pub fn join<B: ActionBus>(&mut self, bus: &mut B) -> Result<Action, IntentError> {
        self.ensure_idle()?;
        let roster = self.world.roster();
        if roster.is_ready() {
            return Err(IntentError::AlreadyStarted);
        }
        if roster.contains(&self.local_user) {
            return Err(IntentError::AlreadyJoined);
        }
        if roster.len() >= self.world.config().player_limit() {
            return Err(IntentError::RosterFull);
        }
        let action = Action::PlayerJoin {
            user_id: self.local_user.clone(),
        };
        Ok(self.send(action, bus))
    }

    /// Close the roster and start the game
    pub fn ready<B: ActionBus>(&mut self, bus: &mut B) -> Result<Action, IntentError> {
        self.ensure_idle()?;
        let roster = self.world.roster();
        if roster.is_ready() {
            return Err(IntentError::AlreadyStarted);
        }
        let need = self.world.config().min_players;
        if roster.len() < need {
            return Err(IntentError::NotEnoughPlayers {
                have: roster.len(),
                need,
            });
        }
        Ok(self.send(Action::PlayersReady, bus))
    }

    /// Claim the first unclaimed color
    pub fn choose_color<B: ActionBus>(&mut self, bus: &mut B) -> Result<Action, IntentError> {
        self.ensure_idle()?;
        if !self.world.roster().is_ready() {
            return Err(IntentError::NotStarted);
        }
        self.ensure_seated()?;
        self.expect_phase(Phase::ChooseColors)?;
        if self.local_color().is_some() {
            return Err(IntentError::AlreadyChoseColor);
        }
        let claimed = self.world.game().player_colors();
        let color = PlayerColor::ALL
            .into_iter()
            .find(|c| !claimed.contains_key(c))
            .ok_or(IntentError::NoColorsLeft)?;
        let action = Action::ChooseColor {
            user_id: self.local_user.clone(),
            color,
        };
        Ok(self.send(action, bus))
    }

    /// Roll two dice for turn order
    pub fn roll_for_order<R: Rng, B: ActionBus>(
        &mut self,
        rng: &mut R,
        bus: &mut B,
    ) -> Result<Action, IntentError> {
        self.ensure_idle()?;
        self.ensure_seated()?;
        self.expect_phase(Phase::SetupRoll)?;
        let player = self.local_color().ok_or(IntentError::NoColor)?;
        if self.world.game().has_rolled_for_order(player) {
            return Err(IntentError::AlreadyRolled);
        }
        let action = Action::RollForOrder {
            player,
            roll: roll_dice(rng),
        };
        Ok(self.send(action, bus))
    }

    /// Roll for production and broadcast what the local player earned
    pub fn roll_resources<R: Rng, B: ActionBus>(
        &mut self,
        rng: &mut R,
        bus: &mut B,
    ) -> Result<Action, IntentError> {
        self.ensure_idle()?;
        self.expect_phase(Phase::Roll)?;
        let player = self.acting_color()?;
        let dice = roll_dice(rng);
        let resources = self.world.game().production_for(player, dice);
        debug!(%player, ?dice, ?resources, "production roll");
        Ok(self.send(Action::RollResources { player, resources }, bus))
    }

    /// Place on a slot if it is legal for the local user
    pub fn place<B: ActionBus>(
        &mut self,
        hovered: Option<StructureCoord>,
        bus: &mut B,
    ) -> Result<Action, IntentError> {
        self.ensure_idle()?;
        let player = self.acting_color()?;
        let coord = hovered.ok_or(IntentError::NothingSelected)?;
        let mode = self.check_placement(&coord)?;

        let action = match (coord, mode) {
            (StructureCoord::Edge(coords), _) => Action::BuildRoad { player, coords },
            (StructureCoord::Corner(coords), PlacementMode::City) => Action::BuildCity { player, coords },
            (StructureCoord::Corner(coords), _) => Action::BuildSettlement { player, coords },
        };
        Ok(self.send(action, bus))
    }

    /// Pay for an item and make it placeable
    pub fn purchase<B: ActionBus>(&mut self, item: Item, bus: &mut B) -> Result<Action, IntentError> {
        self.ensure_idle()?;
        self.expect_phase(Phase::Build)?;
        let player = self.acting_color()?;
        let cost = item.cost();
        if !self.world.game().resources(player).can_afford(&cost) {
            return Err(IntentError::CannotAfford(item));
        }
        self.purchased.push(item.into());
        Ok(self.send(Action::PurchaseItem { player, cost }, bus))
    }

    /// Leave the trade phase
    pub fn done_trading<B: ActionBus>(&mut self, bus: &mut B) -> Result<Action, IntentError> {
        self.ensure_idle()?;
        self.expect_phase(Phase::Trade)?;
        let player = self.acting_color()?;
        Ok(self.send(Action::DoneTrading { player }, bus))
    }

    /// Pass the turn
    pub fn end_turn<B: ActionBus>(&mut self, bus: &mut B) -> Result<Action, IntentError> {
        self.ensure_idle()?;
        self.expect_phase(Phase::Build)?;
        let player = self.acting_color()?;
        Ok(self.send(Action::EndTurn { player }, bus))
    }

    /// Run the intent that fits the current phase and this frame's input.
    ///
    /// Returns the dispatched action, if any.
    pub fn tick<R: Rng, B: ActionBus>(
        &mut self,
        input: &InputEvents,
        rng: &mut R,
        bus: &mut B,
    ) -> Option<Action> {
        if self.has_action_in_flight() {
            return None;
        }

        let result = if !self.world.roster().is_ready() {
            if input.confirm {
                self.ready(bus)
            } else {
                Err(IntentError::NotStarted)
            }
        } else {
            match self.world.game().phase() {
                Phase::ChooseColors => self.choose_color(bus),
                Phase::SetupRoll => self.roll_for_order(rng, bus),
                Phase::SetupFirst | Phase::SetupSecond if input.primary_click => {
                    self.place(input.hovered, bus)
                }
                Phase::Roll => self.roll_resources(rng, bus),
                Phase::Trade if input.done => self.done_trading(bus),
                Phase::Build if input.primary_click => self.place(input.hovered, bus),
                Phase::Build if input.done => self.end_turn(bus),
                _ => return None,
            }
        };

        match result {
            Ok(action) => Some(action),
            Err(err) => {
                debug!(user = %self.local_user, %err, "no action this tick");
                None
            }
        }
    }

    /// Structure kind the local player is placing in setup, if any
    pub fn setup_kind(&self) -> Option<StructureKind> {
        if !self.world.game().phase().is_setup_placement() {
            return None;
        }
        match self.active_modes().first() {
            Some(PlacementMode::Road) => Some(StructureKind::Road),
            Some(_) => Some(StructureKind::Settlement),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Resource;
    use crate::bus::LoopbackBus;
    use crate::game::Dice;
    use crate::hex::{CornerCoord, CornerDirection, EdgeCoord, EdgeDirection, HexCoord};
    use crate::player::ResourceHand;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Deliver everything in `outbox` to the session in order
    fn deliver(session: &mut Session, outbox: &mut Vec<Action>) {
        for action in std::mem::take(outbox) {
            session.receive(&action);
        }
    }

    /// A started two-player world where the local user "a" is red
    fn started_pair() -> (Session, Vec<Action>) {
        let mut session = Session::new(SessionConfig::default(), UserId::new("a"));
        for action in [
            Action::PlayerJoin { user_id: "a".into() },
            Action::PlayerJoin { user_id: "b".into() },
            Action::PlayersReady,
            Action::ChooseColor {
                user_id: "a".into(),
                color: PlayerColor::Red,
            },
            Action::ChooseColor {
                user_id: "b".into(),
                color: PlayerColor::Blue,
            },
            Action::RollForOrder {
                player: PlayerColor::Red,
                roll: Dice::new(6, 6).unwrap(),
            },
            Action::RollForOrder {
                player: PlayerColor::Blue,
                roll: Dice::new(1, 1).unwrap(),
            },
        ] {
            session.receive(&action);
        }
        (session, Vec::new())
    }

    #[test]
    fn test_join_and_ready_need_min_players() {
        let mut session = Session::new(SessionConfig::default(), UserId::new("a"));
        let mut outbox = Vec::new();

        session.join(&mut outbox).unwrap();
        assert_eq!(
            session.join(&mut outbox),
            Err(IntentError::ActionInFlight)
        );
        deliver(&mut session, &mut outbox);
        assert_eq!(session.join(&mut outbox), Err(IntentError::AlreadyJoined));

        assert_eq!(
            session.ready(&mut outbox),
            Err(IntentError::NotEnoughPlayers { have: 1, need: 2 })
        );
        session.receive(&Action::PlayerJoin { user_id: "b".into() });
        assert_eq!(session.ready(&mut outbox), Ok(Action::PlayersReady));
    }

    #[test]
    fn test_roster_limit_applies_on_delivery() {
        let config = SessionConfig {
            max_players: 2,
            ..SessionConfig::default()
        };
        let mut world = World::new(config);
        for user in ["a", "b", "c"] {
            world.apply(&Action::PlayerJoin { user_id: user.into() });
        }
        assert_eq!(world.roster().len(), 2);
    }

    #[test]
    fn test_tick_claims_first_free_color() {
        let mut session = Session::new(SessionConfig::default(), UserId::new("b"));
        for action in [
            Action::PlayerJoin { user_id: "a".into() },
            Action::PlayerJoin { user_id: "b".into() },
            Action::PlayersReady,
            Action::ChooseColor {
                user_id: "a".into(),
                color: PlayerColor::Red,
            },
        ] {
            session.receive(&action);
        }

        let mut rng = StdRng::seed_from_u64(1);
        let mut outbox = Vec::new();
        let action = session.tick(&InputEvents::default(), &mut rng, &mut outbox);
        assert_eq!(
            action,
            Some(Action::ChooseColor {
                user_id: "b".into(),
                color: PlayerColor::Blue,
            })
        );
        assert_eq!(
            session.tick(&InputEvents::default(), &mut rng, &mut outbox),
            None,
            "nothing new while the claim is in flight"
        );
        assert_eq!(outbox.len(), 1);
    }

    #[test]
    fn test_user_outside_roster_stays_quiet() {
        let mut outsider = Session::new(SessionConfig::default(), UserId::new("z"));
        for action in [
            Action::PlayerJoin { user_id: "a".into() },
            Action::PlayerJoin { user_id: "b".into() },
            Action::PlayersReady,
        ] {
            outsider.receive(&action);
        }
        let mut outbox = Vec::new();
        assert_eq!(
            outsider.choose_color(&mut outbox),
            Err(IntentError::NotInRoster)
        );

        let mut bus = LoopbackBus::new();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            outsider.tick(&InputEvents::default(), &mut rng, &mut bus);
            bus.flush();
            let delivered = bus.since(outsider.cursor()).to_vec();
            for sequenced in &delivered {
                outsider.receive_sequenced(sequenced);
            }
        }
        assert!(bus.is_empty(), "dispatched {} actions", bus.len());
        assert_eq!(outsider.game().phase(), Phase::ChooseColors);
    }

    #[test]
    fn test_setup_modes_alternate() {
        let (mut session, mut outbox) = started_pair();
        assert_eq!(session.game().phase(), Phase::SetupFirst);
        assert_eq!(session.active_modes(), vec![PlacementMode::Settlement]);
        assert_eq!(session.setup_kind(), Some(StructureKind::Settlement));

        let corner = CornerCoord::north(HexCoord::new(0, 0));
        session.place(Some(corner.into()), &mut outbox).unwrap();
        deliver(&mut session, &mut outbox);
        assert_eq!(session.active_modes(), vec![PlacementMode::Road]);

        let road = EdgeCoord::new(0, -1, EdgeDirection::SE);
        assert!(session.legal_slots().contains(&road.into()));
        let not_connected = EdgeCoord::new(1, 1, EdgeDirection::E);
        assert_eq!(
            session.check_placement(&not_connected.into()),
            Err(PlacementError::NotConnected)
        );
    }

    #[test]
    fn test_selected_placement_only_on_own_turn() {
        let (session, _) = started_pair();
        let corner: StructureCoord = CornerCoord::new(1, 0, CornerDirection::S).into();
        assert_eq!(
            session.selected_placement(Some(corner)),
            Some((corner, PlacementMode::Settlement))
        );
        assert_eq!(session.selected_placement(None), None);

        let mut other = Session::from_world(session.world().clone(), UserId::new("b"));
        assert_eq!(other.selected_placement(Some(corner)), None);
        assert_eq!(
            other.place(Some(corner), &mut Vec::<Action>::new()),
            Err(IntentError::NotYourTurn)
        );
    }

    #[test]
    fn test_purchase_requires_resources_and_grants_mode() {
        let (mut session, mut outbox) = started_pair();
        session.receive(&Action::RollResources {
            player: PlayerColor::Red,
            resources: ResourceHand::with_amounts(1, 1, 0, 0, 0),
        });
        assert_eq!(session.game().phase(), Phase::Build);
        assert!(session.show_done());
        assert_eq!(
            session.purchase(Item::City, &mut outbox),
            Err(IntentError::CannotAfford(Item::City))
        );

        session.purchase(Item::Road, &mut outbox).unwrap();
        deliver(&mut session, &mut outbox);
        assert_eq!(session.active_modes(), vec![PlacementMode::Road]);
        assert!(session.game().resources(PlayerColor::Red).is_empty());
    }

    #[test]
    fn test_observers_see_events() {
        let (mut session, _) = started_pair();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.add_observer(move |event: &GameEvent, _: &World| {
            sink.borrow_mut().push(event.clone());
        });

        session.receive(&Action::RollResources {
            player: PlayerColor::Red,
            resources: ResourceHand::single(Resource::Wool, 1),
        });
        assert_eq!(
            *seen.borrow(),
            vec![
                GameEvent::ResourcesGranted {
                    player: PlayerColor::Red,
                    resources: ResourceHand::single(Resource::Wool, 1),
                },
                GameEvent::PhaseChanged {
                    from: Phase::SetupFirst,
                    to: Phase::Build,
                },
            ]
        );
    }

    #[test]
    fn test_redelivered_sequence_is_skipped() {
        let mut session = Session::new(SessionConfig::default(), UserId::new("a"));
        let join = SequencedAction {
            seq: 0,
            action: Action::PlayerJoin { user_id: "a".into() },
        };
        assert_eq!(session.receive_sequenced(&join).len(), 1);
        assert!(session.receive_sequenced(&join).is_empty());
        assert_eq!(session.cursor(), 1);
    }
}
