//! Grid geometry shared by the overland and combat maps

pub mod coordinate_system;
pub mod direction;
pub mod grid;

pub use coordinate_system::{CoordinateSystem, Coords, PlaneCoords, SquareCoordinateSystem};
pub use direction::{Direction, DirectionSet};
pub use grid::CellGrid;
