//! Units as movement sees them: capabilities, snapshot and stacks

pub mod expanded;
pub mod roster;
pub mod stack;

pub use expanded::{ExpandedUnit, RangedAttack};
pub use roster::{Player, PlayerKind, Players, UnitRoster, UnitSnapshot, UnitStatus};
pub use stack::{create_unit_stack, UnitStack};
