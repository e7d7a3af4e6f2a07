//! Combat movement - the tactical grid a battle is fought on

pub mod battle_map;
pub mod distance;

pub use battle_map::{CombatCell, CombatMap};
pub use distance::{calculate_combat_movement, CombatContext, CombatUnit};
