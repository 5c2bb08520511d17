//! Property tests for the coordinate math and adjacency tables.

use hexafield_core::hex::{CornerCoord, CornerDirection, Direction, EdgeCoord, EdgeDirection, HexCoord};
use proptest::prelude::*;
use std::collections::HashSet;

fn hex() -> impl Strategy<Value = HexCoord> {
    (-50i32..50, -50i32..50).prop_map(|(q, r)| HexCoord::new(q, r))
}

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

fn corner() -> impl Strategy<Value = CornerCoord> {
    (hex(), prop::bool::ANY).prop_map(|(h, north)| {
        if north {
            CornerCoord::north(h)
        } else {
            CornerCoord::south(h)
        }
    })
}

fn edge() -> impl Strategy<Value = EdgeCoord> {
    (
        hex(),
        prop::sample::select(vec![EdgeDirection::E, EdgeDirection::SE, EdgeDirection::SW]),
    )
        .prop_map(|(h, d)| EdgeCoord::new(h.q, h.r, d))
}

proptest! {
    #[test]
    fn ring_has_six_n_distinct_members(center in hex(), radius in 0u32..8) {
        let ring = center.ring(radius);
        let expected = if radius == 0 { 1 } else { 6 * radius as usize };
        prop_assert_eq!(ring.len(), expected);

        let unique: HashSet<_> = ring.iter().collect();
        prop_assert_eq!(unique.len(), ring.len());
        for member in &ring {
            prop_assert_eq!(center.distance_to(member), radius);
        }
    }

    #[test]
    fn spiral_covers_every_hex_once(center in hex(), radius in 0u32..6) {
        let spiral = center.spiral(radius);
        let n = radius as usize;
        prop_assert_eq!(spiral.len(), 1 + 3 * n * (n + 1));

        let unique: HashSet<_> = spiral.iter().collect();
        prop_assert_eq!(unique.len(), spiral.len());
        prop_assert!(spiral.iter().all(|h| center.distance_to(h) <= radius));
    }

    #[test]
    fn neighbor_then_opposite_returns(h in hex(), d in direction()) {
        prop_assert_eq!(h.neighbor(d).neighbor(d.opposite()), h);
        let cube = h.to_cube();
        prop_assert_eq!(cube.neighbor(d).neighbor(d.opposite()), cube);
        prop_assert_eq!(cube.q + cube.r + cube.s, 0);
    }

    #[test]
    fn edge_endpoints_list_the_edge(e in edge()) {
        for c in e.adjacent_corners() {
            prop_assert!(c.adjacent_edges().contains(&e));
        }
    }

    #[test]
    fn corner_edges_list_the_corner(c in corner()) {
        for e in c.adjacent_edges() {
            prop_assert!(e.adjacent_corners().contains(&c));
        }
        for other in c.adjacent_corners() {
            prop_assert!(other.adjacent_corners().contains(&c));
            prop_assert_ne!(other.direction, c.direction);
        }
    }

    #[test]
    fn edges_sharing_an_endpoint_agree(e in edge()) {
        let own: HashSet<CornerCoord> = e.adjacent_corners().into_iter().collect();
        for other in e.adjacent_edges() {
            let theirs: HashSet<CornerCoord> = other.adjacent_corners().into_iter().collect();
            prop_assert_eq!(own.intersection(&theirs).count(), 1);
        }
    }

    #[test]
    fn corner_pixel_is_one_radius_from_home(c in corner()) {
        let (cx, cz) = c.hex().to_pixel(3f64.sqrt(), 2.0);
        let (x, z) = c.to_pixel(3f64.sqrt(), 2.0);
        let distance = ((x - cx).powi(2) + (z - cz).powi(2)).sqrt();
        prop_assert!((distance - 2.0).abs() < 1e-9);
        let expected_dz = if c.direction == CornerDirection::N { -2.0 } else { 2.0 };
        prop_assert!((z - cz - expected_dz).abs() < 1e-9);
    }
}
