//! Game board representation: tiles and the structures placed on them.
//!
//! This module contains:
//! - Resource and terrain types
//! - Tiles and the fixed/randomized layouts that produce them
//! - Structures (settlements, cities, roads) and queries over them
//! - Production lookups used by dice rolls and the starting hand

use crate::hex::{CornerCoord, EdgeCoord, HexCoord, StructureCoord};
use crate::player::{PlayerColor, ResourceHand};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resource types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Brick,
    Lumber,
    Ore,
    Grain,
    Wool,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Brick,
        Resource::Lumber,
        Resource::Ore,
        Resource::Grain,
        Resource::Wool,
    ];
}

/// Terrain of a land tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    /// Produces brick
    Hills,
    /// Produces lumber
    Forest,
    /// Produces ore
    Mountains,
    /// Produces grain
    Fields,
    /// Produces wool
    Pasture,
    /// Produces nothing and carries no number
    Desert,
}

impl Terrain {
    /// The resource this terrain yields, if any
    pub const fn resource(&self) -> Option<Resource> {
        match self {
            Terrain::Hills => Some(Resource::Brick),
            Terrain::Forest => Some(Resource::Lumber),
            Terrain::Mountains => Some(Resource::Ore),
            Terrain::Fields => Some(Resource::Grain),
            Terrain::Pasture => Some(Resource::Wool),
            Terrain::Desert => None,
        }
    }
}

/// A single hex tile on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Position on the hex grid
    pub coord: HexCoord,
    pub terrain: Terrain,
    /// Dice number that triggers production (2-12, None for desert)
    pub number: Option<u8>,
}

impl Tile {
    /// Create a new resource tile
    pub const fn new(coord: HexCoord, terrain: Terrain, number: u8) -> Self {
        Self {
            coord,
            terrain,
            number: Some(number),
        }
    }

    /// Create a desert tile
    pub const fn desert(coord: HexCoord) -> Self {
        Self {
            coord,
            terrain: Terrain::Desert,
            number: None,
        }
    }

    /// Get the resource this tile produces, if any
    pub const fn resource(&self) -> Option<Resource> {
        self.terrain.resource()
    }
}

/// Which board to deal at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BoardLayout {
    /// The fixed 19-tile beginner board
    #[default]
    Starter,
    /// Standard tile and number distribution shuffled from a seed
    Randomized { seed: u64 },
}

/// What occupies a structure slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    Settlement,
    City,
    Road,
}

impl StructureKind {
    /// Resource multiplier (how many resources per production)
    pub const fn resource_multiplier(&self) -> u32 {
        match self {
            StructureKind::Settlement => 1,
            StructureKind::City => 2,
            StructureKind::Road => 0,
        }
    }
}

/// A placed settlement, city or road
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub player: PlayerColor,
    #[serde(rename = "type")]
    pub kind: StructureKind,
    pub coords: StructureCoord,
}

impl Structure {
    pub fn settlement(player: PlayerColor, corner: CornerCoord) -> Self {
        Self {
            player,
            kind: StructureKind::Settlement,
            coords: corner.into(),
        }
    }

    pub fn city(player: PlayerColor, corner: CornerCoord) -> Self {
        Self {
            player,
            kind: StructureKind::City,
            coords: corner.into(),
        }
    }

    pub fn road(player: PlayerColor, edge: EdgeCoord) -> Self {
        Self {
            player,
            kind: StructureKind::Road,
            coords: edge.into(),
        }
    }

    /// Settlement or city
    pub const fn is_building(&self) -> bool {
        matches!(self.kind, StructureKind::Settlement | StructureKind::City)
    }
}

/// The complete game board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Tiles in coordinate order
    tiles: Vec<Tile>,
    /// Structures in placement order
    structures: Vec<Structure>,
}

/// Starter board, row by row from the north
const STARTER_LAYOUT: [(i32, i32, Terrain, Option<u8>); 19] = [
    (0, -2, Terrain::Mountains, Some(10)),
    (1, -2, Terrain::Pasture, Some(2)),
    (2, -2, Terrain::Forest, Some(9)),
    (-1, -1, Terrain::Fields, Some(12)),
    (0, -1, Terrain::Hills, Some(6)),
    (1, -1, Terrain::Pasture, Some(4)),
    (2, -1, Terrain::Hills, Some(10)),
    (-2, 0, Terrain::Fields, Some(9)),
    (-1, 0, Terrain::Forest, Some(11)),
    (0, 0, Terrain::Desert, None),
    (1, 0, Terrain::Forest, Some(3)),
    (2, 0, Terrain::Mountains, Some(8)),
    (-2, 1, Terrain::Forest, Some(8)),
    (-1, 1, Terrain::Mountains, Some(3)),
    (0, 1, Terrain::Fields, Some(4)),
    (1, 1, Terrain::Pasture, Some(5)),
    (-2, 2, Terrain::Hills, Some(5)),
    (-1, 2, Terrain::Fields, Some(6)),
    (0, 2, Terrain::Pasture, Some(11)),
];

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from explicit tiles
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Self {
        let mut tiles: Vec<Tile> = tiles.into_iter().collect();
        tiles.sort_by_key(|t| t.coord);
        Self {
            tiles,
            structures: Vec::new(),
        }
    }

    /// Deal the board a layout describes
    pub fn from_layout(layout: BoardLayout) -> Self {
        match layout {
            BoardLayout::Starter => Self::starter(),
            BoardLayout::Randomized { seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                Self::randomized_with_rng(&mut rng)
            }
        }
    }

    /// The fixed 19-tile beginner layout
    pub fn starter() -> Self {
        Self::from_tiles(STARTER_LAYOUT.iter().map(|&(q, r, terrain, number)| Tile {
            coord: HexCoord::new(q, r),
            terrain,
            number,
        }))
    }

    /// Standard 19-tile board with shuffled terrain and numbers.
    ///
    /// 6s and 8s are kept off neighboring tiles when a valid arrangement is
    /// found within a bounded number of reshuffles.
    pub fn randomized_with_rng<R: Rng>(rng: &mut R) -> Self {
        let land_coords = HexCoord::new(0, 0).spiral(2);

        let mut terrains: Vec<Terrain> = [
            (Terrain::Forest, 4),
            (Terrain::Fields, 4),
            (Terrain::Pasture, 4),
            (Terrain::Mountains, 3),
            (Terrain::Hills, 3),
            (Terrain::Desert, 1),
        ]
        .into_iter()
        .flat_map(|(terrain, count)| std::iter::repeat(terrain).take(count))
        .collect();
        terrains.shuffle(rng);

        let numbers: Vec<u8> = vec![2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];

        let resource_coords: Vec<HexCoord> = land_coords
            .iter()
            .zip(&terrains)
            .filter(|(_, terrain)| **terrain != Terrain::Desert)
            .map(|(coord, _)| *coord)
            .collect();

        let assignment = assign_numbers_avoiding_adjacent_68(&resource_coords, &numbers, rng);
        let mut numbered = resource_coords.iter().zip(assignment);

        let tiles = land_coords
            .iter()
            .zip(&terrains)
            .map(|(coord, terrain)| {
                if *terrain == Terrain::Desert {
                    return Tile::desert(*coord);
                }
                let number = numbered.next().map(|(_, n)| n);
                Tile {
                    coord: *coord,
                    terrain: *terrain,
                    number,
                }
            })
            .collect::<Vec<_>>();

        Self::from_tiles(tiles)
    }

    pub fn get_tile(&self, coord: &HexCoord) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.coord == *coord)
    }

    /// Tiles in coordinate order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Structures in placement order
    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    /// Whether a slot touches at least one tile
    pub fn is_on_board(&self, coord: &StructureCoord) -> bool {
        coord
            .adjacent_hexes()
            .iter()
            .flatten()
            .any(|hex| self.get_tile(hex).is_some())
    }

    /// The structure occupying this exact slot, if any
    pub fn structure_at(&self, coord: &StructureCoord) -> Option<&Structure> {
        self.structures.iter().find(|s| s.coords == *coord)
    }

    pub fn is_occupied(&self, coord: &StructureCoord) -> bool {
        self.structure_at(coord).is_some()
    }

    /// Structures owned by a player
    pub fn structures_of(&self, player: PlayerColor) -> impl Iterator<Item = &Structure> {
        self.structures.iter().filter(move |s| s.player == player)
    }

    /// The most recently placed settlement of a player
    pub fn latest_settlement(&self, player: PlayerColor) -> Option<CornerCoord> {
        self.structures
            .iter()
            .rev()
            .filter(|s| s.player == player && s.kind == StructureKind::Settlement)
            .find_map(|s| match s.coords {
                StructureCoord::Corner(corner) => Some(corner),
                StructureCoord::Edge(_) => None,
            })
    }

    /// Append a structure
    pub fn place(&mut self, structure: Structure) {
        self.structures.push(structure);
    }

    /// Turn a player's settlement into a city in place. Returns false when the
    /// corner does not hold a settlement of that player.
    pub fn upgrade_to_city(&mut self, corner: CornerCoord, player: PlayerColor) -> bool {
        let coords = StructureCoord::Corner(corner);
        match self
            .structures
            .iter_mut()
            .find(|s| s.coords == coords && s.player == player)
        {
            Some(structure) if structure.kind == StructureKind::Settlement => {
                structure.kind = StructureKind::City;
                true
            }
            _ => false,
        }
    }

    /// Tiles touching a corner
    pub fn tiles_at_corner(&self, corner: &CornerCoord) -> Vec<&Tile> {
        corner
            .adjacent_hexes()
            .iter()
            .filter_map(|hex| self.get_tile(hex))
            .collect()
    }

    /// What a player's settlements and cities yield for a dice total
    pub fn production_for(&self, player: PlayerColor, roll: u8) -> ResourceHand {
        let mut hand = ResourceHand::new();
        for structure in self.structures_of(player).filter(|s| s.is_building()) {
            let StructureCoord::Corner(corner) = structure.coords else {
                continue;
            };
            for tile in self.tiles_at_corner(&corner) {
                if tile.number != Some(roll) {
                    continue;
                }
                if let Some(resource) = tile.resource() {
                    hand.add(resource, structure.kind.resource_multiplier());
                }
            }
        }
        hand
    }

    /// One of each resource around a corner, deserts excluded
    pub fn starting_resources(&self, corner: &CornerCoord) -> ResourceHand {
        let mut hand = ResourceHand::new();
        for resource in self.tiles_at_corner(corner).iter().filter_map(|t| t.resource()) {
            hand.add(resource, 1);
        }
        hand
    }
}

/// Shuffle numbers until no 6 or 8 sits next to another 6 or 8
fn assign_numbers_avoiding_adjacent_68<R: Rng>(
    coords: &[HexCoord],
    numbers: &[u8],
    rng: &mut R,
) -> Vec<u8> {
    const MAX_ATTEMPTS: usize = 100;

    let mut shuffled = numbers.to_vec();
    for _ in 0..MAX_ATTEMPTS {
        shuffled.shuffle(rng);
        if is_valid_number_placement(coords, &shuffled) {
            break;
        }
    }
    shuffled
}

fn is_valid_number_placement(coords: &[HexCoord], numbers: &[u8]) -> bool {
    let by_coord: HashMap<HexCoord, u8> = coords.iter().copied().zip(numbers.iter().copied()).collect();
    let is_hot = |n: u8| n == 6 || n == 8;

    by_coord.iter().filter(|(_, n)| is_hot(**n)).all(|(coord, _)| {
        coord
            .neighbors()
            .iter()
            .filter_map(|neighbor| by_coord.get(neighbor))
            .all(|&n| !is_hot(n))
    })
}
