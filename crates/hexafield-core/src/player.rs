//! Player identity and resource management.
//!
//! This module contains:
//! - `UserId` for the participants of a session
//! - `PlayerColor`, the in-game identity a user claims
//! - `ResourceHand` for managing resource counts
//! - Building costs and purchasable items

use crate::board::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a connected user, assigned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Player color. A session has at most one user per color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Red,
    Blue,
    White,
    Orange,
}

impl PlayerColor {
    /// Every color in claim order
    pub const ALL: [PlayerColor; 4] = [
        PlayerColor::Red,
        PlayerColor::Blue,
        PlayerColor::White,
        PlayerColor::Orange,
    ];
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerColor::Red => "red",
            PlayerColor::Blue => "blue",
            PlayerColor::White => "white",
            PlayerColor::Orange => "orange",
        };
        f.write_str(name)
    }
}

/// A hand of resources.
///
/// Counts never go below zero: [`ResourceHand::try_subtract`] leaves the hand
/// untouched when the cost is not covered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHand {
    #[serde(default)]
    pub brick: u32,
    #[serde(default)]
    pub lumber: u32,
    #[serde(default)]
    pub ore: u32,
    #[serde(default)]
    pub grain: u32,
    #[serde(default)]
    pub wool: u32,
}

impl ResourceHand {
    /// Create an empty hand
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hand with specific amounts
    pub const fn with_amounts(brick: u32, lumber: u32, ore: u32, grain: u32, wool: u32) -> Self {
        Self {
            brick,
            lumber,
            ore,
            grain,
            wool,
        }
    }

    /// Create a hand with a single resource
    pub fn single(resource: Resource, amount: u32) -> Self {
        let mut hand = Self::new();
        hand.add(resource, amount);
        hand
    }

    /// Total number of resource cards
    pub fn total(&self) -> u32 {
        self.brick + self.lumber + self.ore + self.grain + self.wool
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Get count of a specific resource
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Brick => self.brick,
            Resource::Lumber => self.lumber,
            Resource::Ore => self.ore,
            Resource::Grain => self.grain,
            Resource::Wool => self.wool,
        }
    }

    fn slot(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Brick => &mut self.brick,
            Resource::Lumber => &mut self.lumber,
            Resource::Ore => &mut self.ore,
            Resource::Grain => &mut self.grain,
            Resource::Wool => &mut self.wool,
        }
    }

    /// Add resources to hand
    pub fn add(&mut self, resource: Resource, amount: u32) {
        let slot = self.slot(resource);
        *slot = slot.saturating_add(amount);
    }

    /// Add another hand to this one
    pub fn add_hand(&mut self, other: &ResourceHand) {
        for resource in Resource::ALL {
            self.add(resource, other.get(resource));
        }
    }

    /// Check if can afford a cost
    pub fn can_afford(&self, cost: &ResourceHand) -> bool {
        Resource::ALL
            .iter()
            .all(|&resource| self.get(resource) >= cost.get(resource))
    }

    /// Try to subtract, returning false (and changing nothing) if insufficient
    pub fn try_subtract(&mut self, cost: &ResourceHand) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        for resource in Resource::ALL {
            *self.slot(resource) -= cost.get(resource);
        }
        true
    }

    /// Non-zero entries in [`Resource::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (Resource, u32)> + '_ {
        Resource::ALL
            .into_iter()
            .map(|resource| (resource, self.get(resource)))
            .filter(|&(_, count)| count > 0)
    }
}

/// Building costs
pub mod costs {
    use super::ResourceHand;

    /// Road: 1 Brick + 1 Lumber
    pub const ROAD: ResourceHand = ResourceHand::with_amounts(1, 1, 0, 0, 0);

    /// Settlement: 1 Brick + 1 Lumber + 1 Grain + 1 Wool
    pub const SETTLEMENT: ResourceHand = ResourceHand::with_amounts(1, 1, 0, 1, 1);

    /// City: 3 Ore + 2 Grain
    pub const CITY: ResourceHand = ResourceHand::with_amounts(0, 0, 3, 2, 0);
}

/// Something a player can buy during the build phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Item {
    Road,
    Settlement,
    City,
}

impl Item {
    pub fn cost(&self) -> ResourceHand {
        match self {
            Item::Road => costs::ROAD,
            Item::Settlement => costs::SETTLEMENT,
            Item::City => costs::CITY,
        }
    }
}
