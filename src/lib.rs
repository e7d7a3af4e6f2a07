//! Realm Movement - movement planning for a turn-based fantasy strategy game
//!
//! Given a stack of units and a read-only snapshot of the world, works out
//! for every cell what it costs to get there, which way the cheapest path
//! arrives, whether it fits in this turn's movement and whether stepping in
//! starts a fight. Costs are kept in doubled movement points throughout.
//!
//! - [`campaign`]: overland map across planes, transport capacity, boarding
//! - [`battle`]: combat grid with walls, mud and ranged targets
//! - [`movement`]: the shared relaxation pass and per-cell results

pub mod battle;
pub mod campaign;
pub mod core;
pub mod movement;
pub mod rules;
pub mod spatial;
pub mod units;
