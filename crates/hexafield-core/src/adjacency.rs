//! Adjacency tables for corners, edges and the hexes they touch.
//!
//! Everything here is a fixed lookup over the canonical encoding from
//! [`crate::hex`]: every result is itself canonical, so callers can compare
//! coordinates with `==` and use them as map keys directly.

use crate::hex::{CornerCoord, CornerDirection, EdgeCoord, EdgeDirection, HexCoord, StructureCoord};

impl CornerCoord {
    /// The three hexes that share this corner, home hex first.
    ///
    /// N: home, north-east, north-west. S: home, south-east, south-west.
    pub const fn adjacent_hexes(&self) -> [HexCoord; 3] {
        let (q, r) = (self.q, self.r);
        match self.direction {
            CornerDirection::N => [
                HexCoord::new(q, r),
                HexCoord::new(q + 1, r - 1),
                HexCoord::new(q, r - 1),
            ],
            CornerDirection::S => [
                HexCoord::new(q, r),
                HexCoord::new(q, r + 1),
                HexCoord::new(q - 1, r + 1),
            ],
        }
    }

    /// The three edges meeting at this corner.
    pub const fn adjacent_edges(&self) -> [EdgeCoord; 3] {
        let (q, r) = (self.q, self.r);
        match self.direction {
            CornerDirection::N => [
                EdgeCoord::new(q, r - 1, EdgeDirection::E),
                EdgeCoord::new(q + 1, r - 1, EdgeDirection::SW),
                EdgeCoord::new(q, r - 1, EdgeDirection::SE),
            ],
            CornerDirection::S => [
                EdgeCoord::new(q, r, EdgeDirection::SE),
                EdgeCoord::new(q - 1, r + 1, EdgeDirection::E),
                EdgeCoord::new(q, r, EdgeDirection::SW),
            ],
        }
    }

    /// The three corners one edge away. Settlements may not be built on these
    /// when this corner is occupied.
    pub const fn adjacent_corners(&self) -> [CornerCoord; 3] {
        let (q, r) = (self.q, self.r);
        match self.direction {
            CornerDirection::N => [
                CornerCoord::new(q + 1, r - 2, CornerDirection::S),
                CornerCoord::new(q + 1, r - 1, CornerDirection::S),
                CornerCoord::new(q, r - 1, CornerDirection::S),
            ],
            CornerDirection::S => [
                CornerCoord::new(q, r + 1, CornerDirection::N),
                CornerCoord::new(q - 1, r + 2, CornerDirection::N),
                CornerCoord::new(q - 1, r + 1, CornerDirection::N),
            ],
        }
    }
}

impl EdgeCoord {
    /// The two hexes on either side of this edge.
    pub const fn adjacent_hexes(&self) -> [HexCoord; 2] {
        let (q, r) = (self.q, self.r);
        match self.direction {
            EdgeDirection::E => [HexCoord::new(q, r), HexCoord::new(q + 1, r)],
            EdgeDirection::SE => [HexCoord::new(q, r), HexCoord::new(q, r + 1)],
            EdgeDirection::SW => [HexCoord::new(q - 1, r + 1), HexCoord::new(q, r)],
        }
    }

    /// The two endpoint corners.
    pub const fn adjacent_corners(&self) -> [CornerCoord; 2] {
        let (q, r) = (self.q, self.r);
        match self.direction {
            EdgeDirection::E => [
                CornerCoord::new(q + 1, r - 1, CornerDirection::S),
                CornerCoord::new(q, r + 1, CornerDirection::N),
            ],
            EdgeDirection::SE => [
                CornerCoord::new(q, r + 1, CornerDirection::N),
                CornerCoord::new(q, r, CornerDirection::S),
            ],
            EdgeDirection::SW => [
                CornerCoord::new(q, r, CornerDirection::S),
                CornerCoord::new(q - 1, r + 1, CornerDirection::N),
            ],
        }
    }

    /// The four edges that share an endpoint with this one.
    pub const fn adjacent_edges(&self) -> [EdgeCoord; 4] {
        let (q, r) = (self.q, self.r);
        match self.direction {
            EdgeDirection::E => [
                EdgeCoord::new(q, r, EdgeDirection::SE),
                EdgeCoord::new(q + 1, r, EdgeDirection::SW),
                EdgeCoord::new(q + 1, r - 1, EdgeDirection::SE),
                EdgeCoord::new(q + 1, r - 1, EdgeDirection::SW),
            ],
            EdgeDirection::SE => [
                EdgeCoord::new(q, r, EdgeDirection::E),
                EdgeCoord::new(q + 1, r, EdgeDirection::SW),
                EdgeCoord::new(q - 1, r + 1, EdgeDirection::E),
                EdgeCoord::new(q, r, EdgeDirection::SW),
            ],
            EdgeDirection::SW => [
                EdgeCoord::new(q, r, EdgeDirection::SE),
                EdgeCoord::new(q - 1, r + 1, EdgeDirection::E),
                EdgeCoord::new(q - 1, r, EdgeDirection::E),
                EdgeCoord::new(q - 1, r, EdgeDirection::SE),
            ],
        }
    }
}

impl StructureCoord {
    /// Hexes touching a structure in three fixed slots.
    ///
    /// Corners fill all three slots. Edges leave the first slot empty; the
    /// E and SE edges keep the home hex in the middle slot and the SW edge
    /// keeps it last.
    pub const fn adjacent_hexes(&self) -> [Option<HexCoord>; 3] {
        match self {
            StructureCoord::Corner(corner) => {
                let [a, b, c] = corner.adjacent_hexes();
                [Some(a), Some(b), Some(c)]
            }
            StructureCoord::Edge(edge) => {
                let [a, b] = edge.adjacent_hexes();
                [None, Some(a), Some(b)]
            }
        }
    }

    /// Corners sharing an edge (for a corner) or the endpoints (for an edge).
    pub fn adjacent_corners(&self) -> Vec<CornerCoord> {
        match self {
            StructureCoord::Corner(corner) => corner.adjacent_corners().to_vec(),
            StructureCoord::Edge(edge) => edge.adjacent_corners().to_vec(),
        }
    }

    /// Edges meeting at a corner, or the edges continuing from an edge.
    pub fn adjacent_edges(&self) -> Vec<EdgeCoord> {
        match self {
            StructureCoord::Corner(corner) => corner.adjacent_edges().to_vec(),
            StructureCoord::Edge(edge) => edge.adjacent_edges().to_vec(),
        }
    }
}
