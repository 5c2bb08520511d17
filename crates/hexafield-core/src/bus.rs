//! The action bus seam.
//!
//! Peers never mutate shared state directly: they hand actions to an
//! [`ActionBus`], which delivers every action to every peer (the sender
//! included) in one agreed order. The relay server is the networked
//! implementation; [`LoopbackBus`] is an in-process one for local play and
//! tests.

use crate::actions::Action;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Broadcast channel an action travels on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Topic {
    /// Game-wide state shared by all participants
    #[default]
    World,
}

/// An action stamped with its position in the session's global order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencedAction {
    pub seq: u64,
    pub action: Action,
}

/// Outbound half of the bus: somewhere to send actions.
pub trait ActionBus {
    fn dispatch(&mut self, topic: Topic, action: Action);
}

/// In-memory bus that orders actions from any number of local peers.
///
/// Each peer reads the shared log with its own cursor, so every peer sees
/// every action in the same order.
#[derive(Debug, Default)]
pub struct LoopbackBus {
    log: Vec<SequencedAction>,
    pending: VecDeque<Action>,
}

impl LoopbackBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence everything dispatched since the last flush
    pub fn flush(&mut self) {
        while let Some(action) = self.pending.pop_front() {
            let seq = self.log.len() as u64;
            self.log.push(SequencedAction { seq, action });
        }
    }

    /// Sequenced actions at or after `cursor`
    pub fn since(&self, cursor: u64) -> &[SequencedAction] {
        let start = (cursor as usize).min(self.log.len());
        &self.log[start..]
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

impl ActionBus for LoopbackBus {
    fn dispatch(&mut self, _topic: Topic, action: Action) {
        self.pending.push_back(action);
    }
}

/// Collects dispatched actions without delivering them.
impl ActionBus for Vec<Action> {
    fn dispatch(&mut self, _topic: Topic, action: Action) {
        self.push(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::UserId;

    #[test]
    fn test_loopback_sequences_in_dispatch_order() {
        let mut bus = LoopbackBus::new();
        bus.dispatch(Topic::World, Action::PlayerJoin { user_id: UserId::new("a") });
        bus.dispatch(Topic::World, Action::PlayersReady);
        assert!(bus.is_empty(), "nothing is delivered before a flush");

        bus.flush();
        let seqs: Vec<u64> = bus.since(0).iter().map(|s| s.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
        assert_eq!(bus.since(1)[0].action, Action::PlayersReady);
        assert!(bus.since(5).is_empty());
    }
}
