//! Content rules consumed by movement planning

pub mod database;
mod loader;
pub mod movement_rate;

pub use database::{
    BorderBlocking, CombatMapLayer, CombatTileBorder, CombatTileMovement, CombatTileType,
    MovementRules, RulesDatabase, TileType, UnitSkill,
};
pub use loader::{load_rules, parse_rules};
pub use movement_rate::{double_movement_to_enter_tile_type, MovementRateRule};
