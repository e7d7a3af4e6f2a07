//! Movement results shared by the overland and combat graphs

pub mod classification;
pub mod cost_table;
pub mod grid;
pub mod relax;

pub use classification::MoveType;
pub use cost_table::{stack_cost, MovementCostTable};
pub use grid::{MovementCell, MovementGrid, Reach};
pub use relax::{relax_ring_order, RelaxStats, Step};
