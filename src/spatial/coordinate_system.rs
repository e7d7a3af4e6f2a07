//! Grid geometry: coordinates, neighbour stepping and distance
//!
//! The movement graphs only ever talk to geometry through [`CoordinateSystem`],
//! so the overland map (which wraps east-west) and the combat map (which
//! doesn't) share one relaxation shape.

use serde::{Deserialize, Serialize};

use crate::spatial::direction::Direction;

/// Cell position on a single plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coords {
    pub x: i32,
    pub y: i32,
}

impl Coords {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn on_plane(self, plane: u8) -> PlaneCoords {
        PlaneCoords::new(self.x, self.y, plane)
    }
}

/// Cell position on the overland map, including which plane it's on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PlaneCoords {
    pub x: i32,
    pub y: i32,
    pub plane: u8,
}

impl PlaneCoords {
    pub fn new(x: i32, y: i32, plane: u8) -> Self {
        Self { x, y, plane }
    }

    pub fn coords(&self) -> Coords {
        Coords::new(self.x, self.y)
    }
}

/// Read-only geometry the movement graphs are parameterised over
pub trait CoordinateSystem {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    /// Directions in the order relaxation must try them
    fn directions(&self) -> &[Direction] {
        &Direction::RELAXATION_ORDER
    }

    /// Neighbour of `from` in direction `d`, or None if the step leaves the grid
    fn step(&self, from: Coords, d: Direction) -> Option<Coords>;

    /// Number of steps between two cells
    fn distance(&self, a: Coords, b: Coords) -> u32;

    fn contains(&self, c: Coords) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.width() && c.y < self.height()
    }
}

/// Eight-neighbour rectangular grid with optional wrapping on either axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareCoordinateSystem {
    pub width: i32,
    pub height: i32,
    pub wraps_horizontally: bool,
    pub wraps_vertically: bool,
}

impl SquareCoordinateSystem {
    /// Bounded grid with no wrapping (combat maps)
    pub fn bounded(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            wraps_horizontally: false,
            wraps_vertically: false,
        }
    }

    /// Grid wrapping east-west (overland maps)
    pub fn cylinder(width: i32, height: i32) -> Self {
        Self {
            wraps_horizontally: true,
            ..Self::bounded(width, height)
        }
    }

    fn wrap_axis(value: i32, size: i32, wraps: bool) -> Option<i32> {
        if (0..size).contains(&value) {
            Some(value)
        } else if wraps {
            Some(value.rem_euclid(size))
        } else {
            None
        }
    }

    fn axis_distance(a: i32, b: i32, size: i32, wraps: bool) -> u32 {
        let d = (a - b).unsigned_abs();
        if wraps {
            d.min(size as u32 - d)
        } else {
            d
        }
    }
}

impl CoordinateSystem for SquareCoordinateSystem {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn step(&self, from: Coords, d: Direction) -> Option<Coords> {
        let (dx, dy) = d.offset();
        let x = Self::wrap_axis(from.x + dx, self.width, self.wraps_horizontally)?;
        let y = Self::wrap_axis(from.y + dy, self.height, self.wraps_vertically)?;
        Some(Coords::new(x, y))
    }

    fn distance(&self, a: Coords, b: Coords) -> u32 {
        let dx = Self::axis_distance(a.x, b.x, self.width, self.wraps_horizontally);
        let dy = Self::axis_distance(a.y, b.y, self.height, self.wraps_vertically);
        dx.max(dy)
    }
}
