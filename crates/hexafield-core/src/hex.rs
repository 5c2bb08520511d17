//! Hex coordinate system using axial coordinates (q, r).
//!
//! This module provides the foundational coordinate types for the board:
//! - `HexCoord`: identifies individual hex tiles (axial form)
//! - `CubeCoord`: the same position with the redundant third axis, used for
//!   direction arithmetic, rings and spirals
//! - `CornerCoord`: identifies corners where settlements/cities are placed
//! - `EdgeCoord`: identifies edges where roads are placed
//!
//! Layout is pointy-top: `q` grows to the east, `r` grows to the south-east,
//! and "north" is towards negative `z` in planar space.
//!
//! Corners are always stored as the N or S corner of some hex and edges as the
//! E, SE or SW side of some hex. Every physical corner and edge has exactly one
//! such encoding, so structural equality is physical equality. Use
//! [`CornerCoord::of_hex`] and [`EdgeCoord::of_hex`] to convert from any of the
//! six corners/sides of a hex.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// Width of a hex relative to its radius (sqrt 3) for pointy-top layout.
pub const HEX_WIDTH: f64 = 1.732_050_807_568_877_2;

/// Default distance from a hex center to its corners.
pub const HEX_RADIUS: f64 = 1.0;

/// One of the six neighbor directions of a hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    West,
    NorthWest,
    NorthEast,
    East,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// All directions in table order. Walking them in this order traces a
    /// closed hexagon, which is what [`HexCoord::ring`] relies on.
    pub const ALL: [Direction; 6] = [
        Direction::West,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// Unit vector for this direction in cube space.
    pub const fn vector(self) -> CubeCoord {
        match self {
            Direction::West => CubeCoord::new(-1, 0, 1),
            Direction::NorthWest => CubeCoord::new(0, -1, 1),
            Direction::NorthEast => CubeCoord::new(1, -1, 0),
            Direction::East => CubeCoord::new(1, 0, -1),
            Direction::SouthEast => CubeCoord::new(0, 1, -1),
            Direction::SouthWest => CubeCoord::new(-1, 1, 0),
        }
    }

    /// The direction pointing back the way this one came.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::SouthWest => Direction::NorthEast,
        }
    }
}

/// Cube coordinate. Invariant: `q + r + s == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct CubeCoord {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

impl CubeCoord {
    pub const fn new(q: i32, r: i32, s: i32) -> Self {
        Self { q, r, s }
    }

    /// Componentwise sum.
    pub const fn add(self, other: CubeCoord) -> Self {
        Self::new(self.q + other.q, self.r + other.r, self.s + other.s)
    }

    /// Componentwise scale.
    pub const fn scale(self, factor: i32) -> Self {
        Self::new(self.q * factor, self.r * factor, self.s * factor)
    }

    /// The adjacent cube one step in `direction`.
    pub const fn neighbor(self, direction: Direction) -> Self {
        self.add(direction.vector())
    }

    /// Drop the redundant axis.
    pub const fn to_axial(self) -> HexCoord {
        HexCoord::new(self.q, self.r)
    }
}

impl Add for CubeCoord {
    type Output = CubeCoord;

    fn add(self, rhs: CubeCoord) -> CubeCoord {
        CubeCoord::add(self, rhs)
    }
}

impl Mul<i32> for CubeCoord {
    type Output = CubeCoord;

    fn mul(self, rhs: i32) -> CubeCoord {
        self.scale(rhs)
    }
}

/// Axial coordinate for the hex grid.
///
/// Two axial coordinates name the same hex iff `q` and `r` are equal. The
/// third cube coordinate `s` is implicit: `q + r + s = 0`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct HexCoord {
    /// Column (increases going east)
    pub q: i32,
    /// Row (increases going southeast)
    pub r: i32,
}

impl HexCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The implicit third coordinate (s = -q - r)
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    pub const fn to_cube(self) -> CubeCoord {
        CubeCoord::new(self.q, self.r, self.s())
    }

    /// Neighbor in a specific direction
    pub const fn neighbor(&self, direction: Direction) -> HexCoord {
        self.to_cube().neighbor(direction).to_axial()
    }

    /// The six neighbors in [`Direction::ALL`] order
    pub fn neighbors(&self) -> [HexCoord; 6] {
        Direction::ALL.map(|d| self.neighbor(d))
    }

    /// Distance to another hex (in hex steps)
    pub fn distance_to(&self, other: &HexCoord) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Hexes at exactly `radius` steps, `6 * radius` of them (just `self` for 0).
    ///
    /// Starts `radius` steps to the south-east and walks each direction of
    /// [`Direction::ALL`] for `radius` steps.
    pub fn ring(&self, radius: u32) -> Vec<HexCoord> {
        if radius == 0 {
            return vec![*self];
        }

        let steps = radius as i32;
        let mut results = Vec::with_capacity(6 * radius as usize);
        let mut hex = self.to_cube() + Direction::SouthEast.vector() * steps;
        for direction in Direction::ALL {
            for _ in 0..steps {
                results.push(hex.to_axial());
                hex = hex.neighbor(direction);
            }
        }
        results
    }

    /// Every hex within `max_radius`, ordered by increasing ring.
    pub fn spiral(&self, max_radius: u32) -> Vec<HexCoord> {
        let mut results = vec![*self];
        for k in 1..=max_radius {
            results.extend(self.ring(k));
        }
        results
    }

    /// Planar center of this hex as `(x, z)`.
    pub fn to_pixel(&self, hex_width: f64, hex_radius: f64) -> (f64, f64) {
        let q = self.q as f64;
        let r = self.r as f64;
        let x = hex_radius * (hex_width * q + hex_width / 2.0 * r);
        let z = hex_radius * (3.0 / 2.0 * r);
        (x, z)
    }

    /// All six corners of this hex, clockwise from north.
    pub fn corners(&self) -> [CornerCoord; 6] {
        HexCorner::ALL.map(|c| CornerCoord::of_hex(*self, c))
    }

    /// All six edges of this hex, clockwise from north-east.
    pub fn edges(&self) -> [EdgeCoord; 6] {
        HexSide::ALL.map(|s| EdgeCoord::of_hex(*self, s))
    }
}

/// The two corners a hex owns in the canonical encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CornerDirection {
    /// Top corner of the hex
    N,
    /// Bottom corner of the hex
    S,
}

/// The three sides a hex owns in the canonical encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    /// Right side
    E,
    /// Bottom-right side
    SE,
    /// Bottom-left side
    SW,
}

/// Any of the six corners of a hex, clockwise from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HexCorner {
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

impl HexCorner {
    pub const ALL: [HexCorner; 6] = [
        HexCorner::North,
        HexCorner::NorthEast,
        HexCorner::SouthEast,
        HexCorner::South,
        HexCorner::SouthWest,
        HexCorner::NorthWest,
    ];
}

/// Any of the six sides of a hex, clockwise from the top-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HexSide {
    NorthEast,
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
}

impl HexSide {
    pub const ALL: [HexSide; 6] = [
        HexSide::NorthEast,
        HexSide::East,
        HexSide::SouthEast,
        HexSide::SouthWest,
        HexSide::West,
        HexSide::NorthWest,
    ];
}

/// Corner coordinate - where settlements and cities are built.
///
/// Each corner touches 3 hexes but is only ever expressed as the N or S corner
/// of one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CornerCoord {
    pub q: i32,
    pub r: i32,
    pub direction: CornerDirection,
}

impl CornerCoord {
    pub const fn new(q: i32, r: i32, direction: CornerDirection) -> Self {
        Self { q, r, direction }
    }

    pub const fn north(hex: HexCoord) -> Self {
        Self::new(hex.q, hex.r, CornerDirection::N)
    }

    pub const fn south(hex: HexCoord) -> Self {
        Self::new(hex.q, hex.r, CornerDirection::S)
    }

    /// Canonical coordinate of any corner of `hex`.
    pub const fn of_hex(hex: HexCoord, corner: HexCorner) -> Self {
        let HexCoord { q, r } = hex;
        match corner {
            HexCorner::North => Self::new(q, r, CornerDirection::N),
            HexCorner::NorthEast => Self::new(q + 1, r - 1, CornerDirection::S),
            HexCorner::SouthEast => Self::new(q, r + 1, CornerDirection::N),
            HexCorner::South => Self::new(q, r, CornerDirection::S),
            HexCorner::SouthWest => Self::new(q - 1, r + 1, CornerDirection::N),
            HexCorner::NorthWest => Self::new(q, r - 1, CornerDirection::S),
        }
    }

    /// The hex this corner is expressed relative to
    pub const fn hex(&self) -> HexCoord {
        HexCoord::new(self.q, self.r)
    }

    /// Planar position as `(x, z)`.
    pub fn to_pixel(&self, hex_width: f64, hex_radius: f64) -> (f64, f64) {
        let (x, z) = self.hex().to_pixel(hex_width, hex_radius);
        match self.direction {
            CornerDirection::N => (x, z - hex_radius),
            CornerDirection::S => (x, z + hex_radius),
        }
    }
}

/// Edge coordinate - where roads are built.
///
/// Each edge is shared by 2 hexes but is only ever expressed as the E, SE or
/// SW side of one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeCoord {
    pub q: i32,
    pub r: i32,
    pub direction: EdgeDirection,
}

impl EdgeCoord {
    pub const fn new(q: i32, r: i32, direction: EdgeDirection) -> Self {
        Self { q, r, direction }
    }

    /// Canonical coordinate of any side of `hex`.
    pub const fn of_hex(hex: HexCoord, side: HexSide) -> Self {
        let HexCoord { q, r } = hex;
        match side {
            HexSide::NorthEast => Self::new(q + 1, r - 1, EdgeDirection::SW),
            HexSide::East => Self::new(q, r, EdgeDirection::E),
            HexSide::SouthEast => Self::new(q, r, EdgeDirection::SE),
            HexSide::SouthWest => Self::new(q, r, EdgeDirection::SW),
            HexSide::West => Self::new(q - 1, r, EdgeDirection::E),
            HexSide::NorthWest => Self::new(q, r - 1, EdgeDirection::SE),
        }
    }

    pub const fn hex(&self) -> HexCoord {
        HexCoord::new(self.q, self.r)
    }

    /// Planar midpoint as `(x, z)`.
    pub fn to_pixel(&self, hex_width: f64, hex_radius: f64) -> (f64, f64) {
        let [a, b] = self.adjacent_corners();
        let (x1, z1) = a.to_pixel(hex_width, hex_radius);
        let (x2, z2) = b.to_pixel(hex_width, hex_radius);
        ((x1 + x2) / 2.0, (z1 + z2) / 2.0)
    }
}

/// Position of any structure: a corner or an edge.
///
/// Serializes as the flat `{q, r, direction}` object; the direction value
/// tells the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructureCoord {
    Corner(CornerCoord),
    Edge(EdgeCoord),
}

impl StructureCoord {
    /// Roads sit on edges
    pub const fn is_edge(&self) -> bool {
        matches!(self, StructureCoord::Edge(_))
    }

    pub const fn hex(&self) -> HexCoord {
        match self {
            StructureCoord::Corner(c) => c.hex(),
            StructureCoord::Edge(e) => e.hex(),
        }
    }

    pub fn to_pixel(&self, hex_width: f64, hex_radius: f64) -> (f64, f64) {
        match self {
            StructureCoord::Corner(c) => c.to_pixel(hex_width, hex_radius),
            StructureCoord::Edge(e) => e.to_pixel(hex_width, hex_radius),
        }
    }
}

impl From<CornerCoord> for StructureCoord {
    fn from(corner: CornerCoord) -> Self {
        StructureCoord::Corner(corner)
    }
}

impl From<EdgeCoord> for StructureCoord {
    fn from(edge: EdgeCoord) -> Self {
        StructureCoord::Edge(edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hex_neighbors() {
        let center = HexCoord::new(0, 0);
        let neighbors = center.neighbors();

        let unique: HashSet<_> = neighbors.iter().collect();
        assert_eq!(unique.len(), 6);

        for neighbor in &neighbors {
            assert_eq!(center.distance_to(neighbor), 1);
        }
    }

    #[test]
    fn test_direction_vectors_stay_on_plane() {
        for direction in Direction::ALL {
            let v = direction.vector();
            assert_eq!(v.q + v.r + v.s, 0, "{direction:?}");
        }
    }

    #[test]
    fn test_east_is_increasing_q() {
        let hex = HexCoord::new(2, -1);
        assert_eq!(hex.neighbor(Direction::East), HexCoord::new(3, -1));
        assert_eq!(hex.neighbor(Direction::SouthEast), HexCoord::new(2, 0));
        assert_eq!(hex.neighbor(Direction::NorthWest), HexCoord::new(2, -2));
    }

    #[test]
    fn test_hex_distance() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(2, -1);
        assert_eq!(a.distance_to(&b), 2);

        let c = HexCoord::new(-3, 3);
        assert_eq!(a.distance_to(&c), 3);
    }

    #[test]
    fn test_ring_zero_is_center() {
        let center = HexCoord::new(4, -2);
        assert_eq!(center.ring(0), vec![center]);
    }

    #[test]
    fn test_ring_one_starts_south_east() {
        let ring = HexCoord::new(0, 0).ring(1);
        assert_eq!(
            ring,
            vec![
                HexCoord::new(0, 1),
                HexCoord::new(-1, 1),
                HexCoord::new(-1, 0),
                HexCoord::new(0, -1),
                HexCoord::new(1, -1),
                HexCoord::new(1, 0),
            ]
        );
    }

    #[test]
    fn test_ring_members_are_at_radius() {
        let center = HexCoord::new(1, 1);
        for hex in center.ring(3) {
            assert_eq!(center.distance_to(&hex), 3);
        }
    }

    #[test]
    fn test_spiral_radius_two_has_19_hexes() {
        let spiral = HexCoord::new(0, 0).spiral(2);
        assert_eq!(spiral.len(), 19);
        assert_eq!(spiral[0], HexCoord::new(0, 0));
    }

    #[test]
    fn test_to_pixel() {
        let (x, z) = HexCoord::new(0, 0).to_pixel(HEX_WIDTH, HEX_RADIUS);
        assert_eq!((x, z), (0.0, 0.0));

        let (x, z) = HexCoord::new(1, 2).to_pixel(2.0, 0.5);
        assert!((x - 0.5 * (2.0 + 2.0)).abs() < 1e-9);
        assert!((z - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_corners_of_hex_are_distinct() {
        let corners = HexCoord::new(0, 0).corners();
        let unique: HashSet<_> = corners.iter().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn test_shared_corner_has_one_encoding() {
        // NE corner of (0,0) is also the SE corner of (0,-1) and the S corner of (1,-1)
        let a = CornerCoord::of_hex(HexCoord::new(0, 0), HexCorner::NorthEast);
        let b = CornerCoord::of_hex(HexCoord::new(0, -1), HexCorner::SouthEast);
        let c = CornerCoord::of_hex(HexCoord::new(1, -1), HexCorner::South);
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_shared_edge_has_one_encoding() {
        let e1 = EdgeCoord::of_hex(HexCoord::new(0, 0), HexSide::East);
        let e2 = EdgeCoord::of_hex(HexCoord::new(1, 0), HexSide::West);
        assert_eq!(e1, e2);

        let e3 = EdgeCoord::of_hex(HexCoord::new(0, 0), HexSide::NorthEast);
        let e4 = EdgeCoord::of_hex(HexCoord::new(1, -1), HexSide::SouthWest);
        assert_eq!(e3, e4);
    }

    #[test]
    fn test_corner_positions_match_across_hexes() {
        for corner in HexCorner::ALL {
            let coord = CornerCoord::of_hex(HexCoord::new(0, 0), corner);
            let (x, z) = coord.to_pixel(HEX_WIDTH, HEX_RADIUS);
            let distance = (x * x + z * z).sqrt();
            assert!((distance - HEX_RADIUS).abs() < 1e-9, "{corner:?} at {x},{z}");
        }
    }

    #[test]
    fn test_structure_coord_wire_shape() {
        let corner = StructureCoord::from(CornerCoord::new(1, -1, CornerDirection::N));
        let json = serde_json::to_string(&corner).unwrap();
        assert_eq!(json, r#"{"q":1,"r":-1,"direction":"N"}"#);

        let edge: StructureCoord = serde_json::from_str(r#"{"q":0,"r":2,"direction":"SE"}"#).unwrap();
        assert_eq!(edge, StructureCoord::Edge(EdgeCoord::new(0, 2, EdgeDirection::SE)));
    }
}
