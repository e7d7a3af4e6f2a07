//! Load the rules database from TOML files

use std::fs;
use std::path::Path;

use crate::core::error::Result;
use crate::rules::database::RulesDatabase;

/// Parse and validate rules from a TOML string
pub fn parse_rules(content: &str) -> Result<RulesDatabase> {
    let rules: RulesDatabase = toml::from_str(content)?;
    rules.validate()?;

    tracing::debug!(
        tile_types = rules.tile_types.len(),
        movement_rate_rules = rules.movement_rate_rules.len(),
        combat_tile_types = rules.combat_tile_types.len(),
        combat_tile_borders = rules.combat_tile_borders.len(),
        "Loaded movement rules"
    );

    Ok(rules)
}

/// Load and validate rules from a TOML file on disk
pub fn load_rules(path: &Path) -> Result<RulesDatabase> {
    let content = fs::read_to_string(path)?;
    parse_rules(&content)
}
