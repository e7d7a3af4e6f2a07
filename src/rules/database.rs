//! Rules database: the content tables movement planning reads
//!
//! Callers pass rules through the [`MovementRules`] trait so the graphs can be
//! driven by any content source; [`RulesDatabase`] is the TOML-backed one.

use serde::{Deserialize, Serialize};

use crate::core::error::{MovementError, Result};
use crate::core::types::{BorderId, CombatTileTypeId, DoubledMoves, SkillId, TileTypeId};
use crate::rules::movement_rate::MovementRateRule;

/// Overland tile type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileType {
    pub id: TileTypeId,
    #[serde(default)]
    pub name: Option<String>,
}

/// Unit skill known to the rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSkill {
    pub id: SkillId,
    #[serde(default)]
    pub name: Option<String>,
}

/// Layers a combat cell is built from, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatMapLayer {
    Terrain,
    Road,
    Building,
}

/// How one combat tile type affects movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatTileMovement {
    /// Leaves the cost to the layers below
    #[default]
    NoEffect,
    Cost(DoubledMoves),
    Impassable,
}

/// Combat tile type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatTileType {
    pub id: CombatTileTypeId,
    pub layer: CombatMapLayer,
    #[serde(default)]
    pub movement: CombatTileMovement,
}

/// What a combat border does to movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderBlocking {
    /// Fire and darkness walls: only affect combat bonuses
    #[default]
    NoBlocking,
    /// Stone walls: the listed sides can't be crossed
    CannotCrossSpecifiedBorders,
    /// Wall corners and towers: nothing may enter the cell
    WholeTileImpassable,
}

/// Combat tile border definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatTileBorder {
    pub id: BorderId,
    #[serde(default)]
    pub blocks_movement: BorderBlocking,
}

/// Read access to the rules the movement graphs depend on
pub trait MovementRules {
    fn tile_types(&self) -> &[TileType];

    /// Movement rate rules in evaluation order
    fn movement_rate_rules(&self) -> &[MovementRateRule];

    fn find_tile_type(&self, id: &TileTypeId) -> Result<&TileType>;

    fn find_unit_skill(&self, id: &SkillId) -> Result<&UnitSkill>;

    fn find_combat_tile_type(&self, id: &CombatTileTypeId) -> Result<&CombatTileType>;

    fn find_combat_tile_border(&self, id: &BorderId) -> Result<&CombatTileBorder>;
}

/// Content tables loaded from the rules TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesDatabase {
    #[serde(default)]
    pub tile_types: Vec<TileType>,
    #[serde(default)]
    pub unit_skills: Vec<UnitSkill>,
    #[serde(default)]
    pub movement_rate_rules: Vec<MovementRateRule>,
    #[serde(default)]
    pub combat_tile_types: Vec<CombatTileType>,
    #[serde(default)]
    pub combat_tile_borders: Vec<CombatTileBorder>,
}

impl RulesDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tile_type(&mut self, id: impl Into<TileTypeId>) -> &mut Self {
        self.tile_types.push(TileType {
            id: id.into(),
            name: None,
        });
        self
    }

    pub fn add_unit_skill(&mut self, id: impl Into<SkillId>) -> &mut Self {
        self.unit_skills.push(UnitSkill {
            id: id.into(),
            name: None,
        });
        self
    }

    pub fn add_rule(&mut self, rule: MovementRateRule) -> &mut Self {
        self.movement_rate_rules.push(rule);
        self
    }

    pub fn add_combat_tile_type(
        &mut self,
        id: impl Into<CombatTileTypeId>,
        layer: CombatMapLayer,
        movement: CombatTileMovement,
    ) -> &mut Self {
        self.combat_tile_types.push(CombatTileType {
            id: id.into(),
            layer,
            movement,
        });
        self
    }

    pub fn add_combat_tile_border(
        &mut self,
        id: impl Into<BorderId>,
        blocks_movement: BorderBlocking,
    ) -> &mut Self {
        self.combat_tile_borders.push(CombatTileBorder {
            id: id.into(),
            blocks_movement,
        });
        self
    }

    /// Check that every id the movement rules reference is defined
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.movement_rate_rules.is_empty() {
            tracing::warn!("Rules database has no movement rate rules; every tile is impassable");
        }

        for (index, rule) in self.movement_rate_rules.iter().enumerate() {
            if let Some(tile) = &rule.tile_type {
                if self.find_tile_type(tile).is_err() {
                    errors.push(format!("rule {}: unknown tile type '{}'", index, tile));
                }
            }
            for skill in [&rule.unit_skill, &rule.unit_stack_skill].into_iter().flatten() {
                if self.find_unit_skill(skill).is_err() {
                    errors.push(format!("rule {}: unknown skill '{}'", index, skill));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(MovementError::Configuration(errors.join(", ")))
        }
    }
}

impl MovementRules for RulesDatabase {
    fn tile_types(&self) -> &[TileType] {
        &self.tile_types
    }

    fn movement_rate_rules(&self) -> &[MovementRateRule] {
        &self.movement_rate_rules
    }

    fn find_tile_type(&self, id: &TileTypeId) -> Result<&TileType> {
        self.tile_types
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| MovementError::Configuration(format!("Tile type not found: {}", id)))
    }

    fn find_unit_skill(&self, id: &SkillId) -> Result<&UnitSkill> {
        self.unit_skills
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| MovementError::Configuration(format!("Unit skill not found: {}", id)))
    }

    fn find_combat_tile_type(&self, id: &CombatTileTypeId) -> Result<&CombatTileType> {
        self.combat_tile_types
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| {
                MovementError::Configuration(format!("Combat tile type not found: {}", id))
            })
    }

    fn find_combat_tile_border(&self, id: &BorderId) -> Result<&CombatTileBorder> {
        self.combat_tile_borders
            .iter()
            .find(|b| &b.id == id)
            .ok_or_else(|| {
                MovementError::Configuration(format!("Combat tile border not found: {}", id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_missing_tile_type_is_configuration_error() {
        let db = RulesDatabase::new();
        let err = db.find_tile_type(&TileTypeId::new("grass")).unwrap_err();
        assert!(matches!(err, MovementError::Configuration(_)));
    }

    #[test]
    fn test_validate_flags_unknown_references() {
        let mut db = RulesDatabase::new();
        db.add_tile_type("grass")
            .add_rule(MovementRateRule::new(Some(2)).for_tile("grass"))
            .add_rule(MovementRateRule::new(Some(2)).for_tile("ocean"))
            .add_rule(MovementRateRule::new(Some(2)).with_unit_skill("flight"));

        let err = db.validate().unwrap_err().to_string();
        assert!(err.contains("ocean"));
        assert!(err.contains("flight"));
        assert!(!err.contains("grass"));
    }

    #[test]
    fn test_validate_accepts_consistent_rules() {
        let mut db = RulesDatabase::new();
        db.add_tile_type("grass")
            .add_unit_skill("flight")
            .add_rule(MovementRateRule::new(Some(2)).with_unit_skill("flight"))
            .add_rule(MovementRateRule::new(Some(2)).for_tile("grass"));
        assert!(db.validate().is_ok());
    }

    #[test]
    fn test_find_combat_border() {
        let mut db = RulesDatabase::new();
        db.add_combat_tile_border("stone_wall", BorderBlocking::CannotCrossSpecifiedBorders);
        let border = db.find_combat_tile_border(&BorderId::new("stone_wall")).unwrap();
        assert_eq!(border.blocks_movement, BorderBlocking::CannotCrossSpecifiedBorders);
        assert!(db.find_combat_tile_border(&BorderId::new("fire_wall")).is_err());
    }
}
